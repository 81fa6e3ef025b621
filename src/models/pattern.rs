//! Canonical pattern descriptors
//!
//! A `Pattern` describes a window of consecutive notes invariantly under
//! transposition (intervals, not pitches) and absolute duration (duration
//! classes, not beat lengths). Patterns are ephemeral: computed on demand
//! per window, never persisted. Two patterns are canonically equal iff
//! both sequences are element-wise equal, which the derived `Eq`/`Hash`
//! provide for use as a grouping key.

use crate::models::note::{DurationClass, Note};

/// Transposition- and duration-scale-invariant descriptor of a note window
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    /// Signed semitone intervals between consecutive notes (len k-1)
    pub intervals: Vec<i32>,

    /// Duration class of each note (len k)
    pub durations: Vec<DurationClass>,
}

impl Pattern {
    /// Extract the canonical pattern of a note window
    pub fn from_notes(window: &[Note]) -> Self {
        let intervals = window
            .windows(2)
            .map(|pair| pair[1].pitch - pair[0].pitch)
            .collect();
        let durations = window.iter().map(|n| n.duration).collect();
        Self {
            intervals,
            durations,
        }
    }

    /// Number of notes this pattern describes
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// True for a pattern of no notes (never produced by extraction)
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

/// One extracted window: a pattern plus where its first note sounds
#[derive(Debug, Clone, PartialEq)]
pub struct PatternOccurrence {
    /// Canonical pattern of the window
    pub pattern: Pattern,

    /// Part name the window was taken from
    pub part: String,

    /// Measure of the window's first note
    pub measure: u32,

    /// Beat of the window's first note within its measure
    pub start_beat: f64,
}
