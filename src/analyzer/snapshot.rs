use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

/// A saved render of a listing page: a JSON object whose `html` key holds the
/// page source. Other keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub html: String,
}

impl Snapshot {
    pub fn from_json(text: &str) -> AppResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| AppError::SnapshotError(format!("Invalid snapshot JSON: {e}")))
    }
}

/// Reads a snapshot file and returns its HTML (empty when the key is missing).
pub fn load_snapshot_html(path: &Path) -> AppResult<String> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Snapshot::from_json(&text)?.html)
}
