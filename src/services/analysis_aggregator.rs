//! Analysis aggregation service
//!
//! Assembles motifs, instances, and score metadata into one validated
//! `MotifAnalysis`. There is no partial-success mode: either the
//! cross-reference invariant holds for every instance and every confidence
//! is in range, or aggregation fails and no report is produced.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::motif::{Motif, MotifAnalysis, MotifInstance};
use crate::models::note::ScoreMeta;

/// Source tag written into every report's `meta` section
pub const SOURCE_TAG: &str = "motifscan";

/// Validating assembler for the final analysis snapshot
pub struct AnalysisAggregator;

impl AnalysisAggregator {
    /// Assemble a validated, immutable analysis
    ///
    /// `analysis_notes` (e.g. the detection parameters used) takes the
    /// `notes` slot of the report metadata; the score's own free-text notes
    /// are passed through when no analysis note is supplied.
    ///
    /// # Errors
    /// Returns `Error::Validation` if motif ids collide, any instance
    /// references an unknown motif id, or any confidence lies outside [0, 1].
    pub fn assemble(
        score_meta: &ScoreMeta,
        motifs: Vec<Motif>,
        instances: Vec<MotifInstance>,
        analysis_notes: Option<&str>,
    ) -> Result<MotifAnalysis> {
        let mut known_ids: HashSet<&str> = HashSet::new();
        for motif in &motifs {
            if !known_ids.insert(&motif.id) {
                return Err(Error::Validation(format!(
                    "duplicate motif id '{}'",
                    motif.id
                )));
            }
            if !(0.0..=1.0).contains(&motif.confidence) {
                return Err(Error::Validation(format!(
                    "motif '{}' confidence {} outside [0.0, 1.0]",
                    motif.id, motif.confidence
                )));
            }
        }

        for instance in &instances {
            if !known_ids.contains(instance.motif_id.as_str()) {
                return Err(Error::Validation(format!(
                    "instance references unknown motif id '{}'",
                    instance.motif_id
                )));
            }
            if !(0.0..=1.0).contains(&instance.confidence) {
                return Err(Error::Validation(format!(
                    "instance of '{}' at measure {} has confidence {} outside [0.0, 1.0]",
                    instance.motif_id, instance.measure, instance.confidence
                )));
            }
        }

        let mut meta = BTreeMap::new();
        meta.insert("source".to_string(), SOURCE_TAG.to_string());
        if let Some(work) = &score_meta.work {
            meta.insert("work".to_string(), work.clone());
        }
        if let Some(composer) = &score_meta.composer {
            meta.insert("composer".to_string(), composer.clone());
        }
        if let Some(notes) = analysis_notes.or(score_meta.notes.as_deref()) {
            meta.insert("notes".to_string(), notes.to_string());
        }

        debug!(
            "assembled analysis: {} motifs, {} instances",
            motifs.len(),
            instances.len()
        );
        Ok(MotifAnalysis {
            meta,
            motifs,
            instances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::DurationClass;

    fn motif(id: &str) -> Motif {
        Motif::new(
            id,
            "test",
            vec![DurationClass::Quarter, DurationClass::Quarter],
            vec![2],
            0.8,
            None,
        )
        .unwrap()
    }

    fn instance(motif_id: &str) -> MotifInstance {
        MotifInstance::new(motif_id, "Flute", 1, 1.0, 0.9, None).unwrap()
    }

    #[test]
    fn test_assemble_valid_analysis() {
        let meta = ScoreMeta {
            work: Some("Etude".into()),
            composer: Some("Chopin".into()),
            notes: None,
        };
        let analysis = AnalysisAggregator::assemble(
            &meta,
            vec![motif("m1")],
            vec![instance("m1"), instance("m1")],
            Some("min_length=3"),
        )
        .unwrap();

        assert_eq!(analysis.meta.get("source").map(String::as_str), Some(SOURCE_TAG));
        assert_eq!(analysis.meta.get("work").map(String::as_str), Some("Etude"));
        assert_eq!(
            analysis.meta.get("notes").map(String::as_str),
            Some("min_length=3")
        );
        assert_eq!(analysis.motifs.len(), 1);
        assert_eq!(analysis.instances.len(), 2);
    }

    #[test]
    fn test_dangling_motif_id_rejected() {
        let err = AnalysisAggregator::assemble(
            &ScoreMeta::default(),
            vec![motif("m1")],
            vec![instance("m2")],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_duplicate_motif_ids_rejected() {
        let err = AnalysisAggregator::assemble(
            &ScoreMeta::default(),
            vec![motif("m1"), motif("m1")],
            vec![],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        // Bypass the validating constructor to simulate a corrupted record
        let mut bad = motif("m1");
        bad.confidence = 1.5;
        let err =
            AnalysisAggregator::assemble(&ScoreMeta::default(), vec![bad], vec![], None)
                .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_score_notes_passed_through_without_analysis_notes() {
        let meta = ScoreMeta {
            work: None,
            composer: None,
            notes: Some("autograph copy".into()),
        };
        let analysis =
            AnalysisAggregator::assemble(&meta, vec![], vec![], None).unwrap();
        assert_eq!(
            analysis.meta.get("notes").map(String::as_str),
            Some("autograph copy")
        );
    }
}
