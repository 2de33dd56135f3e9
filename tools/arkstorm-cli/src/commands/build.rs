//! Build videos from downloaded frames.

use arkstorm_model::config::PipelineConfig;
use arkstorm_video_builder::chapters::describe;
use arkstorm_video_builder::{build_videos, FfmpegBackend};

pub fn run(config: &PipelineConfig) -> anyhow::Result<()> {
    let mut backend = FfmpegBackend::new();
    let videos = build_videos(
        &config.videos,
        &config.assets_dir,
        &config.videos_dir,
        &mut backend,
    )?;

    for (id, video) in &videos {
        println!("Built {id}: {}", video.file_path.display());
        print!("{}", describe("Chapters:", &video.clips));
        println!();
    }
    Ok(())
}
