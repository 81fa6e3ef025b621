//! Common error types for motifscan

use thiserror::Error;

/// Common result type for motifscan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the analysis engine
///
/// All variants are raised at the boundary where they are detected and are
/// never retried: the engine is a pure, deterministic computation with no
/// transient failure modes.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid thresholds, tolerances, or window range, detected before any scan
    #[error("Configuration error: {0}")]
    Config(String),

    /// A Note, Score, or Motif violates a data-model invariant
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Analysis aggregation found a dangling motif id or out-of-range confidence
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Score or report JSON error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file parse error (wraps toml::de::Error)
    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),
}
