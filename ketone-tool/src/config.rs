use std::path::{Path, PathBuf};

use ketone_sched::ValidatorOptions;
use serde::Deserialize;

use crate::error::KtError;
use crate::output::OutputFormat;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub validation: ValidatorOptions,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ketone").join("config.toml"))
}

/// Loads the config named on the command line, or the user config if present.
///
/// A missing or unreadable user config falls back to defaults; an explicitly
/// named file must exist and parse.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, KtError> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)?;
        return parse_config(path, &content);
    }

    let Some(path) = config_path() else {
        return Ok(Config::default());
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        return Ok(Config::default());
    };

    Ok(parse_config(&path, &content).unwrap_or_default())
}

fn parse_config(path: &Path, content: &str) -> Result<Config, KtError> {
    toml::from_str(content).map_err(|source| KtError::Config {
        path: path.to_path_buf(),
        source,
    })
}
