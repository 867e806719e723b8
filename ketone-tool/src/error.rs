use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KtError {
    #[error("Config error in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported draft format: {0} (expected .toml, .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse draft {path}: {message}")]
    DraftParse { path: PathBuf, message: String },

    #[error("Failed to encode payload: {0}")]
    Encode(String),
}
