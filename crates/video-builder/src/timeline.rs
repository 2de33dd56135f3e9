//! Clip timeline: where each clip starts in the built video.
//!
//! Frame sequences play at a fixed 25 images per second, stretched by the
//! clip's speed factor. A clip with a positive fixed `time` loops its
//! frames for exactly that long instead.

use std::path::{Path, PathBuf};

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use arkstorm_model::video::{Clip, OutputClip};
use serde::{Deserialize, Serialize};

/// Seconds each source frame occupies at speed 1.
pub const FRAME_INTERVAL_SECS: f64 = 0.04;

/// Input frame rate matching [`FRAME_INTERVAL_SECS`].
pub const INPUT_FRAMERATE: u32 = 25;

/// A clip placed on the video timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub name: String,

    /// Directory holding the clip's `NNN.png` frames.
    pub source_dir: PathBuf,

    pub frame_count: usize,
    pub speed: f64,

    /// Fixed duration when the clip loops.
    pub loop_secs: Option<f64>,

    pub start_time_secs: f64,
    pub duration_secs: f64,
}

impl TimelineEntry {
    pub fn output_clip(&self) -> OutputClip {
        OutputClip {
            name: self.name.clone(),
            start_time_secs: self.start_time_secs,
        }
    }
}

/// Chapter start times for `clips`, read from the frames under `asset_dir`.
pub fn build_timeline(clips: &[Clip], asset_dir: &Path) -> ArkstormResult<Vec<OutputClip>> {
    Ok(plan_timeline(clips, asset_dir)?
        .iter()
        .map(TimelineEntry::output_clip)
        .collect())
}

/// Resolve each clip's frame directory and lay the clips out in order.
pub fn plan_timeline(clips: &[Clip], asset_dir: &Path) -> ArkstormResult<Vec<TimelineEntry>> {
    let mut sources = Vec::with_capacity(clips.len());
    for clip in clips {
        if let Some(problem) = clip.timing_problem() {
            return Err(ArkstormError::config(problem).in_clip(&clip.name));
        }
        let dir = asset_dir.join(&clip.view);
        let frames = count_frames(&dir).map_err(|e| e.in_clip(&clip.name))?;
        sources.push((dir, frames));
    }
    Ok(layout(clips, sources))
}

/// Assign start times given each clip's frame directory and count.
/// Speeds must be positive and finite; [`plan_timeline`] checks this.
pub fn layout(clips: &[Clip], sources: Vec<(PathBuf, usize)>) -> Vec<TimelineEntry> {
    let mut cursor = 0.0;
    clips
        .iter()
        .zip(sources)
        .map(|(clip, (source_dir, frame_count))| {
            let duration_secs = clip_duration(clip, frame_count);
            let entry = TimelineEntry {
                name: clip.name.clone(),
                source_dir,
                frame_count,
                speed: clip.speed,
                loop_secs: clip.fixed_duration(),
                start_time_secs: cursor,
                duration_secs,
            };
            cursor += duration_secs;
            entry
        })
        .collect()
}

/// Playback length of a clip with `frame_count` source frames.
pub fn clip_duration(clip: &Clip, frame_count: usize) -> f64 {
    match clip.fixed_duration() {
        Some(secs) => secs,
        None => frame_count as f64 * FRAME_INTERVAL_SECS * clip.speed,
    }
}

/// Number of `*.png` frames in a view directory. Missing, unreadable and
/// empty directories are all missing assets.
pub fn count_frames(dir: &Path) -> ArkstormResult<usize> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| ArkstormError::missing_asset(dir, e.to_string()))?;

    let mut count = 0;
    for entry in entries {
        let path = entry
            .map_err(|e| ArkstormError::missing_asset(dir, e.to_string()))?
            .path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("png") {
            count += 1;
        }
    }

    if count == 0 {
        return Err(ArkstormError::missing_asset(dir, "no frame images"));
    }
    Ok(count)
}
