//! Motif, instance, and analysis records
//!
//! All three records validate on construction and are treated as read-only
//! thereafter, so they are safely shareable across matching runs without
//! synchronization. `MotifAnalysis` is assembled only by the aggregator
//! after every motif and instance is known.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::note::DurationClass;

/// A named melodic/rhythmic pattern
///
/// Created by the detector in detection mode, or directly through
/// [`Motif::new`] for user-defined motifs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motif {
    /// Unique identifier within an analysis (e.g. "m1")
    pub id: String,

    /// Human-readable description of the motif's character
    pub description: String,

    /// Duration class of each note (len k)
    pub rhythm: Vec<DurationClass>,

    /// Signed semitone intervals between consecutive notes (len k-1)
    pub intervals: Vec<i32>,

    /// Overall confidence in this motif definition (0.0 to 1.0)
    pub confidence: f64,

    /// Optional emotional character tag (manual annotation only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
}

impl Motif {
    /// Create a motif, validating the data-model invariants
    ///
    /// # Errors
    /// Returns `Error::MalformedInput` if `confidence` is outside [0, 1] or
    /// the interval sequence is not one shorter than the rhythm sequence.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        rhythm: Vec<DurationClass>,
        intervals: Vec<i32>,
        confidence: f64,
        emotion: Option<String>,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::MalformedInput(format!(
                "motif confidence must be between 0.0 and 1.0 (got {confidence})"
            )));
        }
        if intervals.len() + 1 != rhythm.len() {
            return Err(Error::MalformedInput(format!(
                "intervals length ({}) should be rhythm length - 1 ({})",
                intervals.len(),
                rhythm.len().saturating_sub(1)
            )));
        }
        Ok(Self {
            id: id.into(),
            description: description.into(),
            rhythm,
            intervals,
            confidence,
            emotion,
        })
    }

    /// Number of notes this motif spans
    pub fn len(&self) -> usize {
        self.rhythm.len()
    }

    /// True for a motif of no notes (rejected by the constructor's length rule)
    pub fn is_empty(&self) -> bool {
        self.rhythm.is_empty()
    }
}

/// One located, scored occurrence of a motif within a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotifInstance {
    /// Id of the motif this is an instance of
    pub motif_id: String,

    /// Measure number where this instance begins
    pub measure: u32,

    /// Part name where this instance appears
    pub part: String,

    /// Beat within the measure where this instance starts
    pub start_beat: f64,

    /// How closely this instance matches the motif (0.0 to 1.0)
    pub confidence: f64,

    /// Description of variations from the motif, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<String>,
}

impl MotifInstance {
    /// Create an instance, validating the data-model invariants
    ///
    /// # Errors
    /// Returns `Error::MalformedInput` if `confidence` is outside [0, 1],
    /// `measure` is zero, or `start_beat` is below 1.
    pub fn new(
        motif_id: impl Into<String>,
        part: impl Into<String>,
        measure: u32,
        start_beat: f64,
        confidence: f64,
        variations: Option<String>,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::MalformedInput(format!(
                "instance confidence must be between 0.0 and 1.0 (got {confidence})"
            )));
        }
        if measure == 0 {
            return Err(Error::MalformedInput("instance measure must be >= 1".into()));
        }
        if !(start_beat >= 1.0) {
            return Err(Error::MalformedInput(format!(
                "instance start beat must be >= 1 (got {start_beat})"
            )));
        }
        Ok(Self {
            motif_id: motif_id.into(),
            measure,
            part: part.into(),
            start_beat,
            confidence,
            variations,
        })
    }
}

/// Complete, validated analysis result for a score
///
/// Built only by the aggregator; an immutable snapshot thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotifAnalysis {
    /// Score metadata passthrough plus the engine's source tag
    pub meta: BTreeMap<String, String>,

    /// Identified motifs
    pub motifs: Vec<Motif>,

    /// Motif instances found in the score
    pub instances: Vec<MotifInstance>,
}
