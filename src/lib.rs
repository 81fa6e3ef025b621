//! motifscan - motif detection and fuzzy matching for symbolic scores
//!
//! Identifies recurring short melodic/rhythmic patterns (motifs) in a
//! symbolic music score and locates approximate recurrences of those
//! patterns, producing a structured report of motifs and their instances
//! with confidence scores. Deterministic, rule-based pattern matching with
//! transparent scoring; no audio analysis and no learned inference.

pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod services;

pub use crate::error::{Error, Result};
