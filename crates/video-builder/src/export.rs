//! Video export: runs planned render jobs through a backend.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use arkstorm_model::video::{OutputVideo, Video};

use crate::compositor::{compose, RenderJob};

/// Trait for render backends.
pub trait RenderBackend: Send {
    /// Execute the render job, writing `job.output_path`.
    fn render(&mut self, job: &RenderJob) -> ArkstormResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Compose and render every video in id order.
///
/// Stops at the first failure; videos rendered before it stay on disk but
/// no partial result is returned.
pub fn build_videos(
    videos: &BTreeMap<String, Video>,
    asset_dir: &Path,
    output_dir: &Path,
    backend: &mut dyn RenderBackend,
) -> ArkstormResult<BTreeMap<String, OutputVideo>> {
    let mut built = BTreeMap::new();
    if videos.is_empty() {
        tracing::info!("No videos configured; nothing to build");
        return Ok(built);
    }

    if !backend.is_available() {
        return Err(ArkstormError::unsupported(format!(
            "render backend '{}' is not available (expected ffmpeg in PATH)",
            backend.name()
        )));
    }

    std::fs::create_dir_all(output_dir)?;
    tracing::info!(backend = backend.name(), videos = videos.len(), "Building videos");

    for (id, video) in videos {
        let job = compose(video, asset_dir, output_dir)?;
        tracing::info!(
            video = %id,
            output = %job.output_path.display(),
            clips = job.clips.len(),
            duration_secs = job.duration_secs,
            "Rendering video"
        );
        backend.render(&job)?;
        built.insert(id.clone(), job.output_video());
    }

    Ok(built)
}

/// Compose every video without rendering.
pub fn plan_videos(
    videos: &BTreeMap<String, Video>,
    asset_dir: &Path,
    output_dir: &Path,
) -> ArkstormResult<BTreeMap<String, RenderJob>> {
    videos
        .iter()
        .map(|(id, video)| Ok((id.clone(), compose(video, asset_dir, output_dir)?)))
        .collect()
}

/// Write a render job as pretty JSON.
pub fn write_plan(job: &RenderJob, path: &Path) -> ArkstormResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(job)?)?;
    tracing::info!(path = %path.display(), "Wrote render plan");
    Ok(())
}

/// Renders jobs with the `ffmpeg` command-line tool.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    binary: String,
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegBackend {
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run_ffmpeg(&self, job: &RenderJob) -> ArkstormResult<()> {
        let mut args = vec!["-progress".to_string(), "pipe:1".to_string()];
        args.extend(job.ffmpeg_args());
        let output = &job.output_path;

        tracing::debug!(args = ?args, "Running ffmpeg");
        let mut cmd = Command::new(&self.binary);
        cmd.args(&args).stdout(Stdio::piped()).stderr(Stdio::piped());

        let start = std::time::Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| ArkstormError::encode(output, format!("failed to start ffmpeg: {e}")))?;

        tracing::info!(pid = child.id(), args_len = args.len(), "ffmpeg process started");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ArkstormError::encode(output, "failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ArkstormError::encode(output, "failed to capture ffmpeg stderr"))?;

        // ffmpeg blocks once the stderr pipe is full.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let mut progress = ProgressState::default();
        for line in BufReader::new(stdout).lines() {
            let line = line.map_err(|e| {
                ArkstormError::encode(output, format!("failed reading ffmpeg progress: {e}"))
            })?;
            if let Some((key, value)) = line.trim().split_once('=') {
                progress.update(key, value);
                if key == "progress" {
                    tracing::debug!(
                        out_time_secs = progress.out_time_secs,
                        fraction = progress.fraction(job.duration_secs),
                        "ffmpeg progress"
                    );
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| ArkstormError::encode(output, format!("failed to wait on ffmpeg: {e}")))?;

        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            return Err(ArkstormError::encode(
                output,
                format!("ffmpeg failed (status {status}): {}", stderr_output.trim()),
            ));
        }

        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            output = %output.display(),
            "Video rendered"
        );
        Ok(())
    }
}

impl RenderBackend for FfmpegBackend {
    fn render(&mut self, job: &RenderJob) -> ArkstormResult<()> {
        if let Some(parent) = job.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.run_ffmpeg(job)
    }

    fn is_available(&self) -> bool {
        command_exists(&self.binary)
    }

    fn name(&self) -> &str {
        &self.binary
    }
}

/// Whether `binary` resolves on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            // ffmpeg reports microseconds under both names.
            "out_time_ms" | "out_time_us" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }

    fn fraction(&self, expected_secs: f64) -> f64 {
        if self.complete {
            1.0
        } else if expected_secs <= 0.0 {
            0.0
        } else {
            (self.out_time_secs / expected_secs).clamp(0.0, 1.0)
        }
    }
}
