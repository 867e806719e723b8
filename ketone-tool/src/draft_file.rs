use std::path::Path;

use ketone_sched::DraftForm;
use tracing::debug;

use crate::error::KtError;

/// Reads a draft form, choosing the parser by file extension.
pub fn load_draft(path: &Path) -> Result<DraftForm, KtError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| KtError::UnsupportedFormat(path.to_path_buf()))?;

    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "read draft");

    let parsed = match extension.as_str() {
        "toml" => toml::from_str(&content).map_err(|e| e.to_string()),
        "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        _ => return Err(KtError::UnsupportedFormat(path.to_path_buf())),
    };

    parsed.map_err(|message| KtError::DraftParse {
        path: path.to_path_buf(),
        message,
    })
}
