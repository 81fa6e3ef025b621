//! Data models for motifscan

pub mod motif;
pub mod note;
pub mod pattern;

pub use motif::{Motif, MotifAnalysis, MotifInstance};
pub use note::{DurationClass, Note, Part, Score, ScoreMeta};
pub use pattern::{Pattern, PatternOccurrence};
