//! ClipCrop command-line front end
//!
//! Trim and crop videos and export a frame or a clip through ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! clipcrop clip --input trip.mp4 --start 00:01:00 --end 00:01:12.5 --crop 0.25,0,0.5,1
//! clipcrop frame --input trip.mp4 --at 42.3 --output-dir shots
//! clipcrop replay session.yaml --dry-run
//! clipcrop shortcuts
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use clipcrop_cli::cli::{commands, Cli};
use clipcrop_cli::utils::logging::init_logging;

/// Main entry point for the ClipCrop CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.logging_config()) {
        eprintln!("{}", e);
    }

    info!("Starting ClipCrop");

    if let Err(e) = commands::run(cli).await {
        error!(error = %e, "command failed");
        return Err(e);
    }

    info!("ClipCrop completed successfully");
    Ok(())
}
