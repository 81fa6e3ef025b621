//! Score ingestion from JSON
//!
//! The engine consumes the well-formed note-sequence model produced by an
//! upstream ingestion step, serialized as JSON. Loading re-checks the
//! data-model invariants so a malformed file fails here, before any scan.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::models::note::Score;

/// Load and validate a score from a JSON file
///
/// # Errors
/// Returns `Error::Io` if the file cannot be read, `Error::Json` if it is
/// not a valid score document, and `Error::MalformedInput` if a note or
/// part violates an invariant.
pub fn load_score(path: &Path) -> Result<Score> {
    let text = std::fs::read_to_string(path)?;
    let score: Score = serde_json::from_str(&text)?;
    score.validate()?;
    debug!(
        "loaded {} notes across {} parts from {}",
        score.total_notes(),
        score.parts.len(),
        path.display()
    );
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    const VALID_SCORE: &str = r#"{
        "meta": { "work": "Invention No. 1", "composer": "J.S. Bach" },
        "parts": [
            {
                "name": "Right hand",
                "notes": [
                    { "pitch": 60, "duration": "sixteenth", "measure": 1, "beat": 1.25, "offset": 0.25 },
                    { "pitch": 62, "duration": "sixteenth", "measure": 1, "beat": 1.5, "offset": 0.5 }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_load_valid_score() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID_SCORE.as_bytes()).unwrap();

        let score = load_score(file.path()).unwrap();
        assert_eq!(score.meta.work.as_deref(), Some("Invention No. 1"));
        assert_eq!(score.parts.len(), 1);
        assert_eq!(score.total_notes(), 2);
        assert_eq!(score.parts[0].notes[0].pitch, 60);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_score(Path::new("/nonexistent/score.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            load_score(file.path()).unwrap_err(),
            Error::Json(_)
        ));
    }

    #[test]
    fn test_unordered_score_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
            "parts": [
                {
                    "name": "Flute",
                    "notes": [
                        { "pitch": 60, "duration": "quarter", "measure": 1, "beat": 2.0, "offset": 1.0 },
                        { "pitch": 62, "duration": "quarter", "measure": 1, "beat": 1.0, "offset": 0.0 }
                    ]
                }
            ]
        }"#,
        )
        .unwrap();
        assert!(matches!(
            load_score(file.path()).unwrap_err(),
            Error::MalformedInput(_)
        ));
    }
}
