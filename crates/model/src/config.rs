//! Pipeline configuration file (`config.toml`).
//!
//! ```toml
//! assets_dir = "assets"
//! videos_dir = "videos"
//!
//! [providers.weatherbell.views.pacific_radar]
//! viewtype = "models"
//! product = "ecmwf-full"
//! region = "pacific_nw"
//! parameter = "precip_24hr_inch"
//! cyclehours = [0, 12]
//! timespanhours = 72
//! time_label_timezone = "America/Los_Angeles"
//! time_label_cords = { x = 420, y = 25 }
//!
//! [videos.daily]
//! filename = "daily"
//! scale = "1280:-2"
//! dimensions = { w = 1920, h = 1080 }
//!
//! [[videos.daily.clips]]
//! view = "pacific_radar"
//! name = "Pacific Radar"
//! speed = 2
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use arkstorm_common::config::{default_assets_dir, default_videos_dir, LoggingConfig};
use serde::{Deserialize, Serialize};

use crate::video::Video;
use crate::view::View;

/// Default timeout for each provider request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Where view frame directories are written.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Where rendered videos are written.
    #[serde(default = "default_videos_dir")]
    pub videos_dir: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub providers: Providers,

    /// Videos keyed by id.
    #[serde(default)]
    pub videos: BTreeMap<String, Video>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Providers {
    #[serde(default)]
    pub weatherbell: WeatherbellConfig,
}

/// WeatherBell provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherbellConfig {
    /// Pre-obtained session token; skips the login request when set.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Timeout for each provider request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Views keyed by name; the name is also the asset subdirectory.
    #[serde(default)]
    pub views: BTreeMap<String, View>,
}

impl Default for WeatherbellConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            views: BTreeMap::new(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl PipelineConfig {
    /// Load and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check cross references between views and videos.
    ///
    /// Returns one message per problem; an empty list means the
    /// configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        let views = &self.providers.weatherbell.views;

        for (name, view) in views {
            if view.cyclehours.is_empty() {
                errors.push(format!("View '{name}' has no cyclehours"));
            }
            if let Some(hour) = view.cyclehours.iter().find(|h| **h > 23) {
                errors.push(format!("View '{name}' has invalid cycle hour {hour}"));
            }
            if let Err(e) = view.time_label() {
                errors.push(format!("View '{name}' time label: {e}"));
            }
        }

        for (id, video) in &self.videos {
            if video.filename.trim().is_empty() {
                errors.push(format!("Video '{id}' has no filename"));
            }
            if video.clips.is_empty() {
                errors.push(format!("Video '{id}' has no clips"));
            }
            for clip in &video.clips {
                if !views.contains_key(&clip.view) {
                    errors.push(format!(
                        "Video '{id}' clip '{}' references unknown view '{}'",
                        clip.name, clip.view
                    ));
                }
                if let Some(problem) = clip.timing_problem() {
                    errors.push(format!("Video '{id}' clip '{}': {problem}", clip.name));
                }
            }
        }

        errors
    }

    /// Fail with a single error listing every validation problem.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationError {
                message: errors.join("; "),
            })
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {message}")]
    ValidationError { message: String },
}

impl From<ConfigError> for arkstorm_common::ArkstormError {
    fn from(err: ConfigError) -> Self {
        arkstorm_common::ArkstormError::config(err.to_string())
    }
}
