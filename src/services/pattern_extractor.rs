//! Pattern extraction service
//!
//! Slides windows of every length in a configured range over each part of a
//! score, producing the canonical pattern of each window together with its
//! provenance. Windows cover consecutive sounding notes only: a rest breaks
//! contiguity, so no window spans one. Rests are implicit in the note data —
//! a gap between one note's sounding end and the next note's offset.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::note::{Note, Score, GAP_EPSILON};
use crate::models::pattern::{Pattern, PatternOccurrence};

/// Split a part's notes into runs of consecutive sounding notes
///
/// A run ends where the next note starts later than the current note stops
/// sounding. Overlapping notes (legato, notated chords flattened by
/// ingestion) stay within one run.
pub(crate) fn contiguous_runs(notes: &[Note]) -> Vec<&[Note]> {
    let mut runs = Vec::new();
    if notes.is_empty() {
        return runs;
    }
    let mut start = 0;
    for i in 0..notes.len() - 1 {
        if notes[i + 1].offset - notes[i].sounding_end() > GAP_EPSILON {
            runs.push(&notes[start..=i]);
            start = i + 1;
        }
    }
    runs.push(&notes[start..]);
    runs
}

/// Sliding-window pattern extractor
#[derive(Debug)]
pub struct PatternExtractor {
    min_length: usize,
    max_length: usize,
}

impl PatternExtractor {
    /// Create an extractor for the window-length range `[min_length, max_length]`
    ///
    /// # Errors
    /// Returns `Error::Config` if `min_length < 2` or `min_length > max_length`.
    pub fn new(min_length: usize, max_length: usize) -> Result<Self> {
        if min_length < 2 {
            return Err(Error::Config(format!(
                "min_length must be at least 2 (got {min_length})"
            )));
        }
        if min_length > max_length {
            return Err(Error::Config(format!(
                "min_length ({min_length}) must not exceed max_length ({max_length})"
            )));
        }
        Ok(Self {
            min_length,
            max_length,
        })
    }

    /// Extract every window of every configured length from every part
    ///
    /// Scan order is deterministic: parts in score order, lengths ascending,
    /// window starts ascending. A part or run shorter than `min_length`
    /// simply contributes no windows.
    pub fn extract(&self, score: &Score) -> Vec<PatternOccurrence> {
        let mut occurrences = Vec::new();

        for part in &score.parts {
            let runs = contiguous_runs(&part.notes);
            for length in self.min_length..=self.max_length {
                for run in &runs {
                    if run.len() < length {
                        continue;
                    }
                    for start in 0..=run.len() - length {
                        let window = &run[start..start + length];
                        occurrences.push(PatternOccurrence {
                            pattern: Pattern::from_notes(window),
                            part: part.name.clone(),
                            measure: window[0].measure,
                            start_beat: window[0].beat,
                        });
                    }
                }
            }
        }

        debug!(
            "extracted {} windows (lengths {}-{}) from {} notes",
            occurrences.len(),
            self.min_length,
            self.max_length,
            score.total_notes()
        );
        occurrences
    }
}
