//! Video and clip definitions, plus the outputs produced when building them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A video assembled from an ordered list of clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Output file name without extension.
    pub filename: String,

    /// Final whole-video scale expression (ffmpeg `scale` argument,
    /// e.g. "1280:-2").
    #[serde(default)]
    pub scale: Option<String>,

    /// Canvas every clip is fitted and padded to.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,

    /// Clips in playback order.
    #[serde(default)]
    pub clips: Vec<Clip>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub w: u32,
    pub h: u32,
}

/// One segment of a video, sourced from a downloaded view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Name of the view whose frames make up this clip.
    pub view: String,

    /// Display name used in the chapter list.
    pub name: String,

    /// Presentation time multiplier; 2.0 plays at half speed.
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Fixed duration in seconds; positive values loop the clip.
    #[serde(default)]
    pub time: f64,

    #[serde(default)]
    pub texts: Vec<TextOverlay>,
}

/// Text drawn over every frame of a clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default = "default_text_size")]
    pub size: u32,
}

/// A clip's position in the built video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputClip {
    pub name: String,
    pub start_time_secs: f64,
}

/// A built (or planned) video and its chapter positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVideo {
    pub file_path: PathBuf,
    pub clips: Vec<OutputClip>,
}

fn default_speed() -> f64 {
    1.0
}

fn default_text_color() -> String {
    "white".to_string()
}

fn default_text_size() -> u32 {
    24
}

impl Video {
    /// Target canvas, when both dimensions are positive.
    pub fn canvas(&self) -> Option<Dimensions> {
        self.dimensions.filter(|d| d.w > 0 && d.h > 0)
    }

    /// Final scale expression, ignoring blank values.
    pub fn scale_expr(&self) -> Option<&str> {
        self.scale.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Output file name including the container extension.
    pub fn output_file_name(&self) -> String {
        format!("{}.mp4", self.filename)
    }
}

impl Clip {
    /// Fixed duration for looped clips.
    pub fn fixed_duration(&self) -> Option<f64> {
        (self.time > 0.0).then_some(self.time)
    }

    /// Why the clip cannot be placed on a timeline, if it can't.
    pub fn timing_problem(&self) -> Option<String> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            Some(format!("speed {} is not a positive number", self.speed))
        } else if !self.time.is_finite() {
            Some(format!("time {} is not finite", self.time))
        } else {
            None
        }
    }
}
