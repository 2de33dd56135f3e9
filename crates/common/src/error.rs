//! Error types shared across ArkStorm crates.

use std::path::PathBuf;

/// Top-level error type for ArkStorm operations.
///
/// Every pipeline stage returns the first error it hits; nothing here is
/// retried. The `View` and `Clip` variants wrap an inner error with the
/// name of the unit of work that failed so the CLI can report it.
#[derive(Debug, thiserror::Error)]
pub enum ArkstormError {
    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("No matching cycle: {message}")]
    NoMatchingCycle { message: String },

    #[error("Missing asset: {path} ({message})")]
    MissingAsset { path: PathBuf, message: String },

    #[error("Render error at frame {index} ({url}): {message}")]
    Render {
        index: usize,
        url: String,
        message: String,
    },

    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error("View '{view}' failed: {source}")]
    View {
        view: String,
        #[source]
        source: Box<ArkstormError>,
    },

    #[error("Clip '{clip}' failed: {source}")]
    Clip {
        clip: String,
        #[source]
        source: Box<ArkstormError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ArkstormError.
pub type ArkstormResult<T> = Result<T, ArkstormError>;

impl ArkstormError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth {
            message: msg.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: msg.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn no_matching_cycle(msg: impl Into<String>) -> Self {
        Self::NoMatchingCycle {
            message: msg.into(),
        }
    }

    pub fn missing_asset(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::MissingAsset {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn render(index: usize, url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Render {
            index,
            url: url.into(),
            message: msg.into(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Attach the name of the view being processed.
    pub fn in_view(self, view: impl Into<String>) -> Self {
        Self::View {
            view: view.into(),
            source: Box::new(self),
        }
    }

    /// Attach the name of the clip being processed.
    pub fn in_clip(self, clip: impl Into<String>) -> Self {
        Self::Clip {
            clip: clip.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping view/clip context wrappers.
    pub fn root(&self) -> &ArkstormError {
        match self {
            Self::View { source, .. } | Self::Clip { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wrappers_keep_root_cause() {
        let err = ArkstormError::render(7, "https://example/7.png", "decode failed")
            .in_view("pacific_radar");

        assert!(matches!(err.root(), ArkstormError::Render { index: 7, .. }));
        let message = err.to_string();
        assert!(message.contains("pacific_radar"));
        assert!(message.contains("frame 7"));
    }

    #[test]
    fn test_missing_asset_message_includes_path() {
        let err = ArkstormError::missing_asset("assets/radar", "no frames");
        assert_eq!(err.to_string(), "Missing asset: assets/radar (no frames)");
    }
}
