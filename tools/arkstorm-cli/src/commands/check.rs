//! Check system capabilities and configuration.

use std::path::Path;

use arkstorm_model::config::{ConfigError, PipelineConfig};
use arkstorm_video_builder::{FfmpegBackend, RenderBackend};
use arkstorm_weatherbell::SessionSource;

pub fn run(path: &Path, loaded: Result<PipelineConfig, ConfigError>) -> anyhow::Result<()> {
    println!("ArkStorm System Check");
    println!("{}", "=".repeat(50));

    let mut ready = true;

    let backend = FfmpegBackend::new();
    if backend.is_available() {
        println!("[OK] Render backend: {}", backend.name());
    } else {
        println!("[FAIL] Render backend: ffmpeg not found in PATH");
        ready = false;
    }

    match loaded {
        Ok(config) => {
            let provider = &config.providers.weatherbell;
            println!("[OK] Configuration: {}", path.display());
            println!(
                "     {} view(s), {} video(s)",
                provider.views.len(),
                config.videos.len()
            );

            let problems = config.validate();
            if problems.is_empty() {
                println!("[OK] Configuration is valid");
            } else {
                ready = false;
                for problem in &problems {
                    println!("[FAIL] {problem}");
                }
            }

            let session = SessionSource::resolve(provider.session_id.as_deref());
            match session {
                SessionSource::Token(_) => println!("[OK] WeatherBell session: token configured"),
                SessionSource::Login(credentials) => println!(
                    "[OK] WeatherBell session: login as {}",
                    credentials.username
                ),
                SessionSource::Unavailable if provider.views.is_empty() => {
                    println!("[OK] WeatherBell session: not needed (no views)")
                }
                SessionSource::Unavailable => {
                    println!("[WARN] WeatherBell session: no session id or credentials");
                }
            }
        }
        Err(e) => {
            println!("[FAIL] Configuration: {e}");
            ready = false;
        }
    }

    println!();
    if ready {
        println!("All checks passed. ArkStorm is ready.");
    } else {
        println!("Some checks failed. See above for details.");
    }

    Ok(())
}
