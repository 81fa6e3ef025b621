//! Motif detection service
//!
//! Groups extracted windows by canonical-pattern equality and promotes
//! groups that recur often enough to named motifs. Detection uses exact
//! equality only; fuzzy tolerance belongs to matching. Canonical equality
//! recognizes the same idea restated at a different pitch level, while
//! still requiring the rhythmic contour to match exactly.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::DetectionConfig;
use crate::error::Result;
use crate::models::motif::Motif;
use crate::models::note::{DurationClass, Score};
use crate::models::pattern::Pattern;
use crate::services::pattern_extractor::PatternExtractor;

/// Floor of the baseline confidence; exact-match groups are verbatim
/// repeats, so they never score below it.
const CONFIDENCE_FLOOR: f64 = 0.6;

/// Occurrence bookkeeping for one canonical pattern
struct PatternGroup {
    count: usize,
    /// Sequence number of the group's first window in the scan, used to
    /// assign motif ids deterministically despite HashMap iteration order.
    first_seen: usize,
}

/// Exact-equality motif detector
#[derive(Debug)]
pub struct MotifDetector {
    config: DetectionConfig,
}

impl MotifDetector {
    /// Create a detector, rejecting invalid configuration up front
    ///
    /// # Errors
    /// Returns `Error::Config` for an invalid window range or a zero
    /// occurrence threshold.
    pub fn new(config: DetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Detect recurring motifs in a score
    ///
    /// Motif ids are sequential (`m1`, `m2`, ...) in order of first
    /// occurrence across the scan; the returned list is sorted by baseline
    /// confidence descending (stable, so ties keep id order). Repeated runs
    /// over the same score produce identical output.
    pub fn detect(&self, score: &Score) -> Result<Vec<Motif>> {
        let extractor = PatternExtractor::new(self.config.min_length, self.config.max_length)?;
        let occurrences = extractor.extract(score);

        let mut groups: HashMap<Pattern, PatternGroup> = HashMap::new();
        for (seq, occurrence) in occurrences.into_iter().enumerate() {
            groups
                .entry(occurrence.pattern)
                .and_modify(|g| g.count += 1)
                .or_insert(PatternGroup {
                    count: 1,
                    first_seen: seq,
                });
        }
        debug!("{} distinct canonical patterns", groups.len());

        let mut recurring: Vec<(Pattern, PatternGroup)> = groups
            .into_iter()
            .filter(|(_, group)| group.count >= self.config.min_occurrences)
            .collect();
        recurring.sort_by_key(|(_, group)| group.first_seen);

        let total_notes = score.total_notes();
        let mut motifs = Vec::with_capacity(recurring.len());
        for (index, (pattern, group)) in recurring.into_iter().enumerate() {
            let confidence = baseline_confidence(group.count, pattern.len(), total_notes);
            let motif = Motif::new(
                format!("m{}", index + 1),
                describe_pattern(&pattern.intervals, &pattern.durations),
                pattern.durations,
                pattern.intervals,
                confidence,
                None,
            )?;
            motifs.push(motif);
        }

        // Most prominent motifs first
        motifs.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        info!(
            "detected {} recurring motifs (>= {} occurrences)",
            motifs.len(),
            self.config.min_occurrences
        );
        Ok(motifs)
    }
}

/// Baseline confidence from occurrence density
///
/// Scales from the floor toward 1.0 as the group's windows cover more of
/// the score; a pattern whose occurrences span every note reaches 1.0.
fn baseline_confidence(count: usize, length: usize, total_notes: usize) -> f64 {
    if total_notes == 0 {
        return CONFIDENCE_FLOOR;
    }
    let density = ((count * length) as f64 / total_notes as f64).min(1.0);
    (CONFIDENCE_FLOOR + (1.0 - CONFIDENCE_FLOOR) * density).clamp(0.0, 1.0)
}

/// Generate a human-readable description of a pattern's shape
pub(crate) fn describe_pattern(intervals: &[i32], durations: &[DurationClass]) -> String {
    let rhythm_desc = durations
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join("-");

    let contour_desc = if intervals.is_empty() {
        "single note"
    } else if intervals.iter().all(|&i| i == 0) {
        "repeated note"
    } else if intervals.iter().all(|&i| i > 0) {
        "ascending"
    } else if intervals.iter().all(|&i| i < 0) {
        "descending"
    } else {
        let ups = intervals.iter().filter(|&&i| i > 0).count();
        let downs = intervals.iter().filter(|&&i| i < 0).count();
        if ups > downs {
            "mostly ascending"
        } else if downs > ups {
            "mostly descending"
        } else {
            "wave-like"
        }
    };

    let interval_desc = match intervals.iter().map(|i| i.unsigned_abs()).max() {
        None => "",
        Some(widest) if widest <= 2 => "stepwise",
        Some(widest) if widest <= 4 => "small leaps",
        Some(_) => "wide leaps",
    };

    if interval_desc.is_empty() {
        format!("{rhythm_desc} {contour_desc} pattern")
    } else {
        format!("{rhythm_desc} {contour_desc} {interval_desc} pattern")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::note::{Note, Part, ScoreMeta};

    fn note(pitch: i32, duration: DurationClass, measure: u32, beat: f64, offset: f64) -> Note {
        Note {
            pitch,
            duration,
            measure,
            beat,
            offset,
        }
    }

    /// Eight notes where notes 1-4 and 5-8 share intervals [0, 0, -3] and
    /// durations eighth-eighth-eighth-half.
    fn repeated_phrase_score() -> Score {
        let phrase = |measure: u32, base: f64| {
            vec![
                note(67, DurationClass::Eighth, measure, 1.0, base),
                note(67, DurationClass::Eighth, measure, 1.5, base + 0.5),
                note(67, DurationClass::Eighth, measure, 2.0, base + 1.0),
                note(64, DurationClass::Half, measure, 2.5, base + 1.5),
            ]
        };
        let mut notes = phrase(1, 0.0);
        notes.extend(phrase(2, 3.5));
        Score {
            meta: ScoreMeta {
                work: Some("Symphony No. 5".into()),
                composer: Some("Beethoven".into()),
                notes: None,
            },
            parts: vec![Part {
                name: "Strings".into(),
                notes,
            }],
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_scan() {
        let config = DetectionConfig {
            min_length: 6,
            max_length: 4,
            min_occurrences: 2,
        };
        assert!(matches!(
            MotifDetector::new(config).unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_exact_repetition_detects_single_motif() {
        let detector = MotifDetector::new(DetectionConfig {
            min_length: 4,
            max_length: 4,
            min_occurrences: 2,
        })
        .unwrap();
        let motifs = detector.detect(&repeated_phrase_score()).unwrap();

        assert_eq!(motifs.len(), 1);
        let motif = &motifs[0];
        assert_eq!(motif.id, "m1");
        assert_eq!(motif.intervals, vec![0, 0, -3]);
        assert_eq!(
            motif.rhythm,
            vec![
                DurationClass::Eighth,
                DurationClass::Eighth,
                DurationClass::Eighth,
                DurationClass::Half
            ]
        );
        // Two occurrences of four notes cover all eight notes
        assert_eq!(motif.confidence, 1.0);
        assert!(motif.emotion.is_none());
    }

    #[test]
    fn test_below_occurrence_threshold_yields_no_motif() {
        let detector = MotifDetector::new(DetectionConfig {
            min_length: 4,
            max_length: 4,
            min_occurrences: 3,
        })
        .unwrap();
        assert!(detector.detect(&repeated_phrase_score()).unwrap().is_empty());
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = MotifDetector::new(DetectionConfig {
            min_length: 2,
            max_length: 4,
            min_occurrences: 2,
        })
        .unwrap();
        let score = repeated_phrase_score();
        let first = detector.detect(&score).unwrap();
        let second = detector.detect(&score).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ids_follow_first_occurrence_order() {
        // Alternating 60-62: the [+2] pattern is scanned before [-2] and
        // both recur twice
        let notes = vec![
            note(60, DurationClass::Quarter, 1, 1.0, 0.0),
            note(62, DurationClass::Quarter, 1, 2.0, 1.0),
            note(60, DurationClass::Quarter, 1, 3.0, 2.0),
            note(62, DurationClass::Quarter, 1, 4.0, 3.0),
            note(60, DurationClass::Quarter, 2, 1.0, 4.0),
        ];
        let score = Score {
            meta: ScoreMeta::default(),
            parts: vec![Part {
                name: "Oboe".into(),
                notes,
            }],
        };
        let detector = MotifDetector::new(DetectionConfig {
            min_length: 2,
            max_length: 2,
            min_occurrences: 2,
        })
        .unwrap();
        let motifs = detector.detect(&score).unwrap();

        // [+2] first seen before [-2]; both occur twice with equal length,
        // so equal confidence and the stable sort keeps id order.
        assert_eq!(motifs.len(), 2);
        assert_eq!(motifs[0].id, "m1");
        assert_eq!(motifs[0].intervals, vec![2]);
        assert_eq!(motifs[1].id, "m2");
        assert_eq!(motifs[1].intervals, vec![-2]);
    }

    #[test]
    fn test_overlapping_lengths_reported_as_distinct_motifs() {
        // No subsumption: the length-2 repeated-note pattern and the
        // length-3 pattern covering the same notes are both motifs.
        let detector = MotifDetector::new(DetectionConfig {
            min_length: 2,
            max_length: 3,
            min_occurrences: 2,
        })
        .unwrap();
        let motifs = detector.detect(&repeated_phrase_score()).unwrap();

        assert!(motifs
            .iter()
            .any(|m| m.intervals == vec![0] && m.rhythm.len() == 2));
        assert!(motifs
            .iter()
            .any(|m| m.intervals == vec![0, 0] && m.rhythm.len() == 3));
    }

    #[test]
    fn test_baseline_confidence_floor_and_cap() {
        // Sparse recurrence stays near the floor
        let sparse = baseline_confidence(2, 3, 600);
        assert!(sparse >= CONFIDENCE_FLOOR && sparse < 0.62);
        // Full coverage reaches 1.0
        assert_eq!(baseline_confidence(2, 4, 8), 1.0);
        // More occurrences never lower confidence
        assert!(baseline_confidence(3, 3, 100) > baseline_confidence(2, 3, 100));
    }

    #[test]
    fn test_describe_pattern_contours() {
        let q = DurationClass::Quarter;
        assert_eq!(
            describe_pattern(&[2, 2], &[q, q, q]),
            "quarter-quarter-quarter ascending stepwise pattern"
        );
        assert_eq!(
            describe_pattern(&[0, 0], &[q, q, q]),
            "quarter-quarter-quarter repeated note stepwise pattern"
        );
        assert_eq!(
            describe_pattern(&[-3, -4], &[q, q, q]),
            "quarter-quarter-quarter descending small leaps pattern"
        );
        assert_eq!(
            describe_pattern(&[7, -2], &[q, q, q]),
            "quarter-quarter-quarter wave-like wide leaps pattern"
        );
        assert_eq!(
            describe_pattern(&[2, -2, 5, 1], &[q, q, q, q, q]),
            "quarter-quarter-quarter-quarter-quarter mostly ascending wide leaps pattern"
        );
    }
}
