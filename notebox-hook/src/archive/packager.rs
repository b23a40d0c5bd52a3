//! Zip packager
//!
//! Writes a [`NotesBundle`] to disk as a zip archive with one text entry per
//! note. Entry `Video 1 Notes` becomes `Video_1_Notes.txt` containing
//! `# Video 1 Notes\n\n<content>\n`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{error, info};
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::ArchiveError;
use crate::notes::{NoteEntry, NotesBundle};

/// Entry name for a note: spaces become underscores, plus `.txt`
pub fn note_entry_name(title: &str) -> String {
    format!("{}.txt", title.replace(' ', "_"))
}

/// Entry body for a note: Markdown heading, blank line, content
pub fn note_entry_content(note: &NoteEntry) -> String {
    format!("# {}\n\n{}\n", note.title, note.content)
}

/// Create (or overwrite) the archive at `zip_path`
pub fn package_notes(bundle: &NotesBundle, zip_path: &Path) -> Result<(), ArchiveError> {
    info!("Creating notes zip file: {}", zip_path.display());

    write_notes_zip(bundle, zip_path).map_err(|source| {
        error!(
            "Error creating notes zip file {}: {}",
            zip_path.display(),
            source
        );
        ArchiveError::Packaging {
            path: zip_path.to_path_buf(),
            source,
        }
    })?;

    info!("Successfully created notes zip file: {}", zip_path.display());
    Ok(())
}

fn write_notes_zip(bundle: &NotesBundle, zip_path: &Path) -> ZipResult<()> {
    let file = File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    for note in &bundle.notes {
        zip.start_file(note_entry_name(&note.title), SimpleFileOptions::default())?;
        zip.write_all(note_entry_content(note).as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}
