//! Analysis services
//!
//! Control flow: `score_loader` produces a Score, `pattern_extractor`
//! produces candidate windows per part, `motif_detector` clusters windows
//! into motifs, `fuzzy_matcher` re-scans the score per motif, and
//! `analysis_aggregator` merges everything into one validated report.

pub mod analysis_aggregator;
pub mod fuzzy_matcher;
pub mod motif_detector;
pub mod pattern_extractor;
pub mod score_loader;

pub use analysis_aggregator::{AnalysisAggregator, SOURCE_TAG};
pub use fuzzy_matcher::FuzzyMatcher;
pub use motif_detector::MotifDetector;
pub use pattern_extractor::PatternExtractor;
pub use score_loader::load_score;
