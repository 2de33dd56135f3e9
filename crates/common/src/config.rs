//! Shared settings and their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory downloaded view frames are written to.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Directory rendered videos are written to.
pub const DEFAULT_VIDEOS_DIR: &str = "videos";

/// Configuration file read when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "arkstorm=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

pub fn default_assets_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ASSETS_DIR)
}

pub fn default_videos_dir() -> PathBuf {
    PathBuf::from(DEFAULT_VIDEOS_DIR)
}
