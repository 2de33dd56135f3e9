//! Print or save render plans without running ffmpeg.

use std::collections::BTreeMap;
use std::path::PathBuf;

use arkstorm_model::config::PipelineConfig;
use arkstorm_video_builder::{plan_videos, write_plan};

pub fn run(
    config: &PipelineConfig,
    video: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let videos = match video {
        Some(id) => {
            let selected = config
                .videos
                .get(&id)
                .ok_or_else(|| anyhow::anyhow!("Unknown video: {id}"))?;
            BTreeMap::from([(id, selected.clone())])
        }
        None => config.videos.clone(),
    };

    let plans = plan_videos(&videos, &config.assets_dir, &config.videos_dir)?;

    match output {
        Some(dir) => {
            for (id, job) in &plans {
                let path = dir.join(format!("{id}.json"));
                write_plan(job, &path)?;
                println!("Wrote plan for {id}: {}", path.display());
            }
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&plans)?);
            for (id, job) in &plans {
                println!();
                println!("# {id}");
                println!("ffmpeg {}", shell_join(&job.ffmpeg_args()));
            }
        }
    }

    Ok(())
}

/// Quote arguments for copy-pasting into a POSIX shell.
fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            let plain = !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,%".contains(c));
            if plain {
                arg.clone()
            } else {
                format!("'{}'", arg.replace('\'', "'\\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
