//! ArkStorm CLI: download forecast imagery and build videos.
//!
//! Usage:
//!   arkstorm run                 Download every view, then build every video
//!   arkstorm download            Download frames for every configured view
//!   arkstorm build               Build videos from downloaded frames
//!   arkstorm plan [--video ID]   Print the ffmpeg render plan without running it
//!   arkstorm check               Check ffmpeg, credentials and configuration

use std::path::PathBuf;

use anyhow::Context;
use arkstorm_common::config::DEFAULT_CONFIG_FILE;
use arkstorm_model::config::PipelineConfig;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "arkstorm",
    about = "Forecast imagery downloader and video builder",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pipeline configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every view, then build every video
    Run,

    /// Download frames for every configured view
    Download,

    /// Build videos from previously downloaded frames
    Build,

    /// Print the render plan for each video
    Plan {
        /// Only plan this video id
        #[arg(long)]
        video: Option<String>,

        /// Write `<id>.json` plan files here instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check ffmpeg, credentials and configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = PipelineConfig::load(&cli.config);

    // Initialize logging
    let mut logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    arkstorm_common::logging::init_logging(&logging);

    if let Commands::Check = cli.command {
        return commands::check::run(&cli.config, loaded);
    }

    let config = loaded
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    config.ensure_valid()?;

    match cli.command {
        Commands::Run => {
            commands::download::run(&config).await?;
            commands::build::run(&config)
        }
        Commands::Download => commands::download::run(&config).await,
        Commands::Build => commands::build::run(&config),
        Commands::Plan { video, output } => commands::plan::run(&config, video, output),
        Commands::Check => commands::check::run(&cli.config, Ok(config)),
    }
}
