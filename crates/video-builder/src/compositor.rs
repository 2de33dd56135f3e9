//! Filter graph compositor: turns a video definition into an ffmpeg job.
//!
//! Each clip becomes one image-sequence input and one filter chain:
//!
//! ```text
//! [i:v] setpts (sequences only) ── drawtext* ── scale/pad (canvas) ──[vi]
//! [v0][v1]... concat ──[vcat]── scale (final) ──[vout]
//! ```

use std::path::{Path, PathBuf};

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use arkstorm_model::video::{Dimensions, OutputClip, OutputVideo, TextOverlay, Video};
use serde::{Deserialize, Serialize};

use crate::timeline::{plan_timeline, TimelineEntry, INPUT_FRAMERATE};

/// Frame file pattern written by the downloader.
pub const FRAME_PATTERN: &str = "%03d.png";

/// An image-sequence input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInput {
    pub pattern: PathBuf,
    pub framerate: u32,

    /// Loop the sequence for this many seconds.
    pub loop_secs: Option<f64>,
}

impl ClipInput {
    fn from_entry(entry: &TimelineEntry) -> Self {
        Self {
            pattern: entry.source_dir.join(FRAME_PATTERN),
            framerate: INPUT_FRAMERATE,
            loop_secs: entry.loop_secs,
        }
    }

    /// ffmpeg input options, ending with `-i <pattern>`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["-framerate".to_string(), self.framerate.to_string()];
        match self.loop_secs {
            Some(secs) => {
                args.push("-loop".to_string());
                args.push("1".to_string());
                args.push("-t".to_string());
                args.push(secs.to_string());
            }
            None => {
                args.push("-loop".to_string());
                args.push("0".to_string());
            }
        }
        args.push("-i".to_string());
        args.push(self.pattern.display().to_string());
        args
    }
}

/// A fully planned ffmpeg invocation for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    pub output_path: PathBuf,
    pub inputs: Vec<ClipInput>,

    /// Filters applied to each input, in clip order.
    pub clip_filters: Vec<Vec<String>>,

    /// Filter applied after concatenation.
    pub final_filter: Option<String>,

    pub clips: Vec<OutputClip>,

    /// Expected length of the output.
    pub duration_secs: f64,
}

impl RenderJob {
    /// The `-filter_complex` graph.
    pub fn filter_complex(&self) -> String {
        let mut graph = String::new();

        for (index, filters) in self.clip_filters.iter().enumerate() {
            let chain = if filters.is_empty() {
                "null".to_string()
            } else {
                filters.join(",")
            };
            graph.push_str(&format!("[{index}:v]{chain}[v{index}];"));
        }

        for index in 0..self.clip_filters.len() {
            graph.push_str(&format!("[v{index}]"));
        }
        graph.push_str(&format!(
            "concat=n={}:v=1:a=0[vcat];",
            self.clip_filters.len()
        ));

        match &self.final_filter {
            Some(filter) => graph.push_str(&format!("[vcat]{filter}[vout]")),
            None => graph.push_str("[vcat]null[vout]"),
        }

        graph
    }

    /// Complete ffmpeg argument list, output path last.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-nostats".to_string(),
        ];

        for input in &self.inputs {
            args.extend(input.args());
        }

        args.push("-filter_complex".to_string());
        args.push(self.filter_complex());
        args.push("-map".to_string());
        args.push("[vout]".to_string());
        args.extend(codec_args());
        args.push(self.output_path.display().to_string());
        args
    }

    pub fn output_video(&self) -> OutputVideo {
        OutputVideo {
            file_path: self.output_path.clone(),
            clips: self.clips.clone(),
        }
    }
}

/// Plan the render of `video` from frames under `asset_dir`.
pub fn compose(video: &Video, asset_dir: &Path, output_dir: &Path) -> ArkstormResult<RenderJob> {
    if video.clips.is_empty() {
        return Err(ArkstormError::config(format!(
            "video '{}' has no clips",
            video.filename
        )));
    }

    let timeline = plan_timeline(&video.clips, asset_dir)?;
    let canvas = video.canvas();

    let inputs = timeline.iter().map(ClipInput::from_entry).collect();
    let clip_filters = video
        .clips
        .iter()
        .zip(&timeline)
        .map(|(clip, entry)| {
            let mut filters = Vec::new();
            // A looped input already runs for exactly its fixed time.
            if entry.loop_secs.is_none() {
                filters.push(format!("setpts={}*PTS", entry.speed));
            }
            filters.extend(clip.texts.iter().map(drawtext_filter));
            if let Some(canvas) = canvas {
                filters.extend(fit_to_canvas(canvas));
            }
            filters
        })
        .collect();

    Ok(RenderJob {
        output_path: output_dir.join(video.output_file_name()),
        inputs,
        clip_filters,
        final_filter: video.scale_expr().map(|scale| format!("scale={scale}")),
        clips: timeline.iter().map(TimelineEntry::output_clip).collect(),
        duration_secs: timeline.iter().map(|e| e.duration_secs).sum(),
    })
}

/// Scale to fit inside the canvas keeping aspect ratio, then center-pad.
pub fn fit_to_canvas(canvas: Dimensions) -> [String; 2] {
    let Dimensions { w, h } = canvas;
    [
        format!("scale=iw*min({w}/iw\\,{h}/ih):ih*min({w}/iw\\,{h}/ih)"),
        format!("pad={w}:{h}:({w}-iw)/2:({h}-ih)/2"),
    ]
}

pub fn drawtext_filter(text: &TextOverlay) -> String {
    format!(
        "drawtext=text='{}':x={}:y={}:fontsize={}:fontcolor={}",
        escape_drawtext(&text.text),
        text.x,
        text.y,
        text.size,
        text.color
    )
}

/// Escape text for a single-quoted drawtext value.
fn escape_drawtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str("'\\''"),
            '\\' | ':' | '%' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

fn codec_args() -> Vec<String> {
    vec![
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "medium".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
    ]
}
