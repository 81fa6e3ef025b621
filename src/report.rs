//! Report rendering
//!
//! Renders a validated `MotifAnalysis` as pretty-printed JSON with three
//! top-level sections: `meta`, `motifs`, `instances`.

use std::path::Path;

use crate::error::Result;
use crate::models::motif::MotifAnalysis;

/// Render an analysis as a pretty-printed JSON string
pub fn to_json_string(analysis: &MotifAnalysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

/// Write an analysis to a JSON file
pub fn save_json(analysis: &MotifAnalysis, path: &Path) -> Result<()> {
    let mut json = to_json_string(analysis)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}
