//! Note and score data model
//!
//! Notes are produced once by score ingestion and are immutable for the
//! engine's lifetime. Within a part, notes are totally ordered by offset
//! (equivalently by (measure, beat)); `Score::validate` enforces this.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Gap threshold in quarter-note units. A following note starting later than
/// the previous note's sounding end by more than this is separated by a rest.
pub(crate) const GAP_EPSILON: f64 = 1e-6;

/// Duration class of a note (ties folded into the class by ingestion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationClass {
    Sixteenth,
    Eighth,
    Quarter,
    Half,
    Whole,
}

impl DurationClass {
    /// Relative numeric duration (sixteenth = 1). Ratios matter for rhythm
    /// scoring, not absolute units.
    pub fn relative_units(&self) -> u32 {
        match self {
            DurationClass::Sixteenth => 1,
            DurationClass::Eighth => 2,
            DurationClass::Quarter => 4,
            DurationClass::Half => 8,
            DurationClass::Whole => 16,
        }
    }

    /// Sounding length in quarter-note units, used for rest-gap detection
    pub fn beats(&self) -> f64 {
        match self {
            DurationClass::Sixteenth => 0.25,
            DurationClass::Eighth => 0.5,
            DurationClass::Quarter => 1.0,
            DurationClass::Half => 2.0,
            DurationClass::Whole => 4.0,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationClass::Sixteenth => "sixteenth",
            DurationClass::Eighth => "eighth",
            DurationClass::Quarter => "quarter",
            DurationClass::Half => "half",
            DurationClass::Whole => "whole",
        }
    }
}

/// A single sounding note within a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI pitch number (middle C = 60)
    pub pitch: i32,

    /// Duration class token
    pub duration: DurationClass,

    /// Measure number where this note appears (1-based)
    pub measure: u32,

    /// Beat position within the measure (1-based)
    pub beat: f64,

    /// Offset in quarter-note units from the start of the piece
    pub offset: f64,
}

impl Note {
    /// Invariant check; returns the violation message, if any
    fn invariant_violation(&self) -> Option<String> {
        if self.measure == 0 {
            return Some(format!("note measure must be >= 1 (got {})", self.measure));
        }
        if !(self.beat >= 1.0) {
            return Some(format!("note beat must be >= 1.0 (got {})", self.beat));
        }
        if !(self.offset >= 0.0) {
            return Some(format!("note offset must be >= 0.0 (got {})", self.offset));
        }
        None
    }

    /// Offset at which this note stops sounding
    pub(crate) fn sounding_end(&self) -> f64 {
        self.offset + self.duration.beats()
    }
}

/// A named part with its notes in chronological order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Part/instrument name (e.g. "Violin I")
    pub name: String,

    /// Notes in chronological order
    pub notes: Vec<Note>,
}

/// Free-text score metadata, opaque to the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreMeta {
    /// Work title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,

    /// Composer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,

    /// Arbitrary notes about the score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A well-formed score: ordered parts, each with its notes in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Score metadata (title, composer, free text)
    #[serde(default)]
    pub meta: ScoreMeta,

    /// Parts in score order
    pub parts: Vec<Part>,
}

impl Score {
    /// Check the data-model invariants ingestion is expected to guarantee
    ///
    /// # Errors
    /// Returns `Error::MalformedInput` if any note is out of range or any
    /// part's notes are not strictly ordered by offset.
    pub fn validate(&self) -> Result<()> {
        for part in &self.parts {
            for note in &part.notes {
                if let Some(violation) = note.invariant_violation() {
                    return Err(Error::MalformedInput(format!(
                        "part '{}': {}",
                        part.name, violation
                    )));
                }
            }
            for pair in part.notes.windows(2) {
                if pair[1].offset <= pair[0].offset {
                    return Err(Error::MalformedInput(format!(
                        "part '{}': notes must be strictly ordered by offset \
                         ({} then {})",
                        part.name, pair[0].offset, pair[1].offset
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total number of notes across all parts
    pub fn total_notes(&self) -> usize {
        self.parts.iter().map(|p| p.notes.len()).sum()
    }
}
