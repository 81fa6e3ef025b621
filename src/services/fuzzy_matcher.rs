//! Fuzzy motif matching service
//!
//! Re-scans a score with windows of exactly the target motif's length and
//! scores every window against the motif. Scoring is tolerance-gated: each
//! interval position matches when the semitone deviation is within
//! `interval_tolerance`, each rhythm position when the normalized duration
//! deviation is within `rhythm_tolerance`. The combined confidence is a
//! weighted average of the two sub-scores, clipped to [0, 1].
//!
//! Overlapping or adjacent windows that each clear `min_confidence` each
//! produce their own instance; the matcher never deduplicates.

use tracing::debug;

use crate::config::MatchConfig;
use crate::error::{Error, Result};
use crate::models::motif::{Motif, MotifInstance};
use crate::models::note::Score;
use crate::models::pattern::Pattern;
use crate::services::pattern_extractor::contiguous_runs;

/// Tolerance-gated motif matcher
#[derive(Debug)]
pub struct FuzzyMatcher {
    config: MatchConfig,
}

impl FuzzyMatcher {
    /// Create a matcher, rejecting invalid configuration up front
    ///
    /// # Errors
    /// Returns `Error::Config` for an out-of-range tolerance, threshold,
    /// or weight.
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Find all instances of a motif in a score
    ///
    /// Emits one instance per window whose confidence reaches
    /// `min_confidence` (boundary inclusive).
    ///
    /// # Errors
    /// Returns `Error::MalformedInput` if the motif's interval and rhythm
    /// sequence lengths disagree.
    pub fn find_instances(&self, motif: &Motif, score: &Score) -> Result<Vec<MotifInstance>> {
        if motif.intervals.len() + 1 != motif.rhythm.len() {
            return Err(Error::MalformedInput(format!(
                "motif '{}': intervals length ({}) should be rhythm length - 1 ({})",
                motif.id,
                motif.intervals.len(),
                motif.rhythm.len().saturating_sub(1)
            )));
        }
        let length = motif.rhythm.len();

        let mut instances = Vec::new();
        for part in &score.parts {
            for run in contiguous_runs(&part.notes) {
                if run.len() < length {
                    continue;
                }
                for start in 0..=run.len() - length {
                    let window = &run[start..start + length];
                    let pattern = Pattern::from_notes(window);
                    let confidence = self.match_confidence(&pattern, motif);
                    if confidence >= self.config.min_confidence {
                        instances.push(MotifInstance::new(
                            motif.id.clone(),
                            part.name.clone(),
                            window[0].measure,
                            window[0].beat,
                            confidence,
                            describe_variations(&pattern, motif),
                        )?);
                    }
                }
            }
        }

        debug!(
            "motif {}: {} instances at min_confidence {}",
            motif.id,
            instances.len(),
            self.config.min_confidence
        );
        Ok(instances)
    }

    /// Combined confidence of one candidate pattern against the motif
    fn match_confidence(&self, candidate: &Pattern, motif: &Motif) -> f64 {
        let tolerance = self.config.interval_tolerance;
        let interval_score =
            gated_match_ratio(&candidate.intervals, &motif.intervals, |&c, &t| {
                (c as i64 - t as i64).unsigned_abs() <= tolerance as u64
            });

        let rhythm_tolerance = self.config.rhythm_tolerance;
        let rhythm_score = gated_match_ratio(&candidate.durations, &motif.rhythm, |c, t| {
            let c = c.relative_units() as f64;
            let t = t.relative_units() as f64;
            (c - t).abs() / c.max(t) <= rhythm_tolerance
        });

        let weight = self.config.interval_weight;
        (weight * interval_score + (1.0 - weight) * rhythm_score).clamp(0.0, 1.0)
    }
}

/// Fraction of positions where candidate and target agree within tolerance
///
/// The shared scoring helper behind both the interval and the rhythm
/// sub-scores. Mismatched lengths score 0.0; empty sequences score 1.0
/// (a single-note motif has no intervals to disagree on).
fn gated_match_ratio<T, F>(candidate: &[T], target: &[T], within: F) -> f64
where
    F: Fn(&T, &T) -> bool,
{
    if candidate.len() != target.len() {
        return 0.0;
    }
    if candidate.is_empty() {
        return 1.0;
    }
    let matches = candidate
        .iter()
        .zip(target)
        .filter(|&(c, t)| within(c, t))
        .count();
    matches as f64 / candidate.len() as f64
}

/// Describe how a window's pattern deviates from the motif, if it does
fn describe_variations(candidate: &Pattern, motif: &Motif) -> Option<String> {
    let mut variations = Vec::new();

    if candidate.intervals != motif.intervals {
        let inverted = !candidate.intervals.is_empty()
            && candidate.intervals.len() == motif.intervals.len()
            && candidate
                .intervals
                .iter()
                .zip(&motif.intervals)
                .all(|(c, m)| *c == -m);
        if inverted {
            variations.push("inverted");
        } else {
            variations.push("altered intervals");
        }
    }

    if candidate.durations != motif.rhythm {
        variations.push("rhythmic variation");
    }

    if variations.is_empty() {
        None
    } else {
        Some(variations.join(", "))
    }
}
