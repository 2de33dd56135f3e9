//! Frame download, labeling, and persistence.

use std::io::Cursor;
use std::path::Path;

use arkstorm_common::error::{ArkstormError, ArkstormResult};
use arkstorm_model::frame::Frame;
use arkstorm_model::view::TimeLabel;
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use tempfile::TempDir;

use crate::label::{draw_label, format_label};
use crate::transport::ProviderTransport;

/// File name of the frame at `index` (`000.png`, `001.png`, ...).
pub fn frame_file_name(index: usize) -> String {
    format!("{index:03}.png")
}

/// Downloads frames of one view into its directory.
pub struct FrameRenderer<'a, T: ?Sized> {
    transport: &'a T,
    label: Option<TimeLabel>,
}

impl<'a, T: ProviderTransport + ?Sized> FrameRenderer<'a, T> {
    pub fn new(transport: &'a T, label: Option<TimeLabel>) -> Self {
        Self { transport, label }
    }

    /// Fetch, label and write every frame in order.
    ///
    /// Frames are staged in a sibling directory and replace `target_dir`
    /// only once the whole sequence is written. The first failing frame
    /// aborts the view and leaves the previous frames in place.
    pub async fn render_frames(
        &self,
        frames: &[Frame],
        target_dir: &Path,
    ) -> ArkstormResult<usize> {
        let staging = staging_dir(target_dir)?;
        self.write_frames(frames, staging.path()).await?;
        replace_dir(staging, target_dir).await?;

        tracing::info!(
            frames = frames.len(),
            dir = %target_dir.display(),
            labeled = self.label.is_some(),
            "Rendered frames"
        );
        Ok(frames.len())
    }

    async fn write_frames(&self, frames: &[Frame], dir: &Path) -> ArkstormResult<()> {
        for (index, frame) in frames.iter().enumerate() {
            let response = self
                .transport
                .get(&frame.url)
                .await
                .and_then(|r| r.ensure_ok(&frame.url))
                .map_err(|e| ArkstormError::render(index, &frame.url, e.to_string()))?;

            let png = render_frame(&response.body, frame.timestamp, self.label.as_ref())
                .map_err(|message| ArkstormError::render(index, &frame.url, message))?;

            let path = dir.join(frame_file_name(index));
            tokio::fs::write(&path, png)
                .await
                .map_err(|e| ArkstormError::render(index, &frame.url, e.to_string()))?;
            tracing::debug!(index, path = %path.display(), "Saved frame");
        }
        Ok(())
    }
}

/// Decode an image, stamp the time label when configured, and encode PNG.
pub fn render_frame(
    bytes: &[u8],
    timestamp: DateTime<Utc>,
    label: Option<&TimeLabel>,
) -> Result<Vec<u8>, String> {
    let decoded = image::load_from_memory(bytes).map_err(|e| format!("decode failed: {e}"))?;
    let mut rgba = decoded.to_rgba8();

    if let Some(label) = label {
        let text = format_label(timestamp, label);
        draw_label(&mut rgba, label, &text)?;
    }

    let mut out = Vec::new();
    DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| format!("encode failed: {e}"))?;
    Ok(out)
}

/// Temporary directory next to `target_dir`; removed on drop unless renamed.
fn staging_dir(target_dir: &Path) -> ArkstormResult<TempDir> {
    let name = target_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ArkstormError::config(format!("invalid view directory {}", target_dir.display()))
        })?;
    let parent = match target_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".partial")
        .tempdir_in(parent)?;
    Ok(staging)
}

async fn replace_dir(staging: TempDir, target_dir: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(target_dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    tokio::fs::rename(staging.path(), target_dir).await
}
