//! Archive extractor
//!
//! Opens a stored archive, logs its entry names and unpacks every entry into
//! the destination folder, keeping the relative paths recorded in the
//! archive. Entries whose path would escape the destination are refused by
//! `ZipArchive::extract` and surface as [`ArchiveError::Extraction`].

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{error, info};
use zip::result::ZipResult;
use zip::ZipArchive;

use super::ArchiveError;

/// What an extraction unpacked
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub archive: PathBuf,
    /// Entry names as recorded in the archive
    pub entries: Vec<String>,
}

/// Extract every entry of `archive_path` into `destination`
pub fn extract_archive(
    archive_path: &Path,
    destination: &Path,
) -> Result<ExtractionReport, ArchiveError> {
    info!("Processing zip file: {}", archive_path.display());

    let entries = unpack(archive_path, destination).map_err(|source| {
        error!(
            "Error processing zip file {}: {}",
            archive_path.display(),
            source
        );
        ArchiveError::Extraction {
            path: archive_path.to_path_buf(),
            source,
        }
    })?;

    info!("Successfully processed zip file: {}", archive_path.display());
    Ok(ExtractionReport {
        archive: archive_path.to_path_buf(),
        entries,
    })
}

fn unpack(archive_path: &Path, destination: &Path) -> ZipResult<Vec<String>> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    let entries: Vec<String> = archive.file_names().map(str::to_string).collect();
    info!("Files in zip: {:?}", entries);

    archive.extract(destination)?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn extracts_nested_entries() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("upload.zip");
        write_zip(&zip_path, &[("top.txt", "top"), ("dir/inner.txt", "inner")]);

        let report = extract_archive(&zip_path, temp_dir.path()).unwrap();

        let mut entries = report.entries.clone();
        entries.sort();
        assert_eq!(entries, vec!["dir/inner.txt", "top.txt"]);
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("dir/inner.txt")).unwrap(),
            "inner"
        );
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("top.txt")).unwrap(),
            "top"
        );
    }

    #[test]
    fn invalid_archive_is_extraction_error() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("fake.zip");
        std::fs::write(&zip_path, b"definitely not a zip").unwrap();

        let err = extract_archive(&zip_path, temp_dir.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::Extraction { .. }));
    }

    #[test]
    fn entry_escaping_destination_is_refused() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("uploads");
        std::fs::create_dir(&destination).unwrap();
        let zip_path = destination.join("evil.zip");
        write_zip(&zip_path, &[("../evil.txt", "outside")]);

        let err = extract_archive(&zip_path, &destination).unwrap_err();

        assert!(matches!(err, ArchiveError::Extraction { .. }));
        assert!(!temp_dir.path().join("evil.txt").exists());
    }

    #[test]
    fn missing_archive_is_extraction_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = extract_archive(&temp_dir.path().join("absent.zip"), temp_dir.path())
            .unwrap_err();
        assert!(matches!(err, ArchiveError::Extraction { .. }));
    }
}
