//! Zip archive handling
//!
//! Both directions are synchronous and run to completion on the calling
//! thread. HTTP handlers move them onto the blocking pool.

pub mod extractor;
pub mod packager;

pub use extractor::{extract_archive, ExtractionReport};
pub use packager::{note_entry_content, note_entry_name, package_notes};

use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Archive component failures
///
/// I/O failures while opening or creating files arrive wrapped in
/// `ZipError::Io`, so each variant carries a single source type.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// File is not a valid archive, or an entry could not be written out
    #[error("Failed to extract {}: {source}", .path.display())]
    Extraction { path: PathBuf, source: ZipError },

    /// Archive could not be created or written
    #[error("Failed to create {}: {source}", .path.display())]
    Packaging { path: PathBuf, source: ZipError },
}
