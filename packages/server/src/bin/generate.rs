//! One-shot generation CLI
//!
//! Runs the full pipeline for a single URL without the HTTP server:
//! useful for smoke-testing the mulmo toolchain and prompt changes.

use anyhow::{Context, Result};
use clap::Parser;
use server_core::kernel::jobs::JobSpec;
use server_core::kernel::{ContentGenerator, LogProgress, MulmoPipeline};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "generate")]
#[command(about = "Generate a MulmoScript video from a web page")]
struct Cli {
    /// Page to turn into a video
    url: String,

    /// Visual style: "ghibli" or "business"
    #[arg(long, default_value = "ghibli")]
    style: String,

    /// Burn subtitles into the video
    #[arg(long)]
    subtitles: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pipeline = MulmoPipeline::from_config(&config)?;

    let spec = JobSpec {
        url: cli.url,
        style: cli.style,
        subtitles: cli.subtitles,
    };

    println!("Generating content for {}...", spec.url);

    let result = pipeline.generate(&spec, &LogProgress).await?;

    println!("\nGeneration complete!");
    println!("  Script: {}", result.script_path);
    println!("  Output: {}", result.output_dir);

    Ok(())
}
