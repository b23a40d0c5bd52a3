//! Notes synthesis
//!
//! Turns a playlist reference and an email address into a [`NotesBundle`].
//! The entries are fixed placeholder text: no playlist is fetched or
//! inspected. The function is pure and cannot fail, so the packaging and
//! download pipeline downstream of it can be exercised end to end.

use serde::{Deserialize, Serialize};
use tracing::info;

/// One note, packaged as one text file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub title: String,
    pub content: String,
}

impl NoteEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Synthesized notes for one request
///
/// Built fresh per request and only ever persisted as a zip archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesBundle {
    pub playlist_url: String,
    pub email: String,
    pub notes: Vec<NoteEntry>,
}

/// Build the notes bundle for a playlist
pub fn synthesize_notes(playlist_url: &str, email: &str) -> NotesBundle {
    info!(
        "Creating notes for playlist: {} and email: {}",
        playlist_url, email
    );

    NotesBundle {
        playlist_url: playlist_url.to_string(),
        email: email.to_string(),
        notes: vec![
            NoteEntry::new("Video 1 Notes", "Notes for the first video in the playlist"),
            NoteEntry::new("Video 2 Notes", "Notes for the second video in the playlist"),
        ],
    }
}

/// Archive filename for an email: `notes_<local part>.zip`
///
/// The local part is everything before the first `@` (the whole string when
/// there is none). Requests from the same address map to the same name.
pub fn notes_zip_filename(email: &str) -> String {
    let local_part = email.split('@').next().unwrap_or(email);
    format!("notes_{}.zip", local_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_echoes_request_fields() {
        let bundle = synthesize_notes("https://youtube.com/playlist?list=abc", "a@b.com");
        assert_eq!(bundle.playlist_url, "https://youtube.com/playlist?list=abc");
        assert_eq!(bundle.email, "a@b.com");
    }

    #[test]
    fn bundle_has_two_placeholder_notes() {
        let bundle = synthesize_notes("p", "e@x.org");
        assert_eq!(bundle.notes.len(), 2);
        assert_eq!(bundle.notes[0].title, "Video 1 Notes");
        assert_eq!(bundle.notes[1].content, "Notes for the second video in the playlist");
    }

    #[test]
    fn synthesis_is_deterministic() {
        assert_eq!(synthesize_notes("p", "e"), synthesize_notes("p", "e"));
    }

    #[test]
    fn zip_filename_uses_local_part() {
        assert_eq!(notes_zip_filename("a@b.com"), "notes_a.zip");
        assert_eq!(notes_zip_filename("test@example.com"), "notes_test.zip");
    }

    #[test]
    fn zip_filename_without_at_sign() {
        assert_eq!(notes_zip_filename("nobody"), "notes_nobody.zip");
    }
}
