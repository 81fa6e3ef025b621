//! Analysis configuration
//!
//! Detection and matching knobs, loadable from a TOML file and overridable
//! from the command line. Invalid configuration is rejected before any scan
//! runs; confidence clipping inside the scoring math is the only sanctioned
//! clamping.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Motif detection knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    /// Minimum notes in a motif window
    pub min_length: usize,

    /// Maximum notes in a motif window
    pub max_length: usize,

    /// Minimum times a pattern must occur to become a motif
    pub min_occurrences: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 5,
            min_occurrences: 2,
        }
    }
}

impl DetectionConfig {
    /// Check the window range and occurrence threshold
    pub fn validate(&self) -> Result<()> {
        if self.min_length < 2 {
            return Err(Error::Config(format!(
                "min_length must be at least 2 (got {})",
                self.min_length
            )));
        }
        if self.min_length > self.max_length {
            return Err(Error::Config(format!(
                "min_length ({}) must not exceed max_length ({})",
                self.min_length, self.max_length
            )));
        }
        if self.min_occurrences == 0 {
            return Err(Error::Config("min_occurrences must be at least 1".into()));
        }
        Ok(())
    }
}

/// Fuzzy matching knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Allowed semitone deviation per interval position
    pub interval_tolerance: u32,

    /// Allowed normalized duration deviation per rhythm position (0.0 = exact)
    pub rhythm_tolerance: f64,

    /// Minimum confidence for a window to become an instance
    pub min_confidence: f64,

    /// Weight of the interval sub-score in the combined confidence;
    /// the rhythm sub-score gets the remainder
    pub interval_weight: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            interval_tolerance: 0,
            rhythm_tolerance: 0.0,
            min_confidence: 0.5,
            interval_weight: 0.5,
        }
    }
}

impl MatchConfig {
    /// Check tolerances and thresholds
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.rhythm_tolerance) {
            return Err(Error::Config(format!(
                "rhythm_tolerance must be within [0.0, 1.0] (got {})",
                self.rhythm_tolerance
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::Config(format!(
                "min_confidence must be within [0.0, 1.0] (got {})",
                self.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.interval_weight) {
            return Err(Error::Config(format!(
                "interval_weight must be within [0.0, 1.0] (got {})",
                self.interval_weight
            )));
        }
        Ok(())
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Detection knobs
    pub detection: DetectionConfig,

    /// Matching knobs
    pub matching: MatchConfig,
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing keys fall back to defaults; unknown keys are rejected.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&text)?;
        Ok(config)
    }

    /// Check every knob before running any scan
    pub fn validate(&self) -> Result<()> {
        self.detection.validate()?;
        self.matching.validate()?;
        Ok(())
    }
}
