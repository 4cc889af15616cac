//! CLI module for ClipCrop
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

pub mod args;
pub mod commands;

/// ClipCrop
///
/// Trim and crop a video, then export a still frame or a clip through
/// ffmpeg. Editor sessions can be replayed from recorded event scripts.
#[derive(Parser, Debug)]
#[command(name = "clipcrop")]
#[command(about = "ClipCrop - Trim, crop and export video clips and frames")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (RUST_LOG overrides it)
    #[arg(long, default_value = "info", global = true, env = "CLIPCROP_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format: pretty, compact or json
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: LogFormat,

    /// Settings file (default: $CLIPCROP_CONFIG or the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print encoder command lines instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// ffmpeg executable to run
    #[arg(long, global = true, env = "CLIPCROP_FFMPEG")]
    pub ffmpeg: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::new(self.log_level, self.log_format)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a single frame as an image
    Frame(args::FrameArgs),
    /// Export a trimmed (and optionally cropped) clip
    Clip(args::ClipArgs),
    /// Drive an editor session from an event script and run its exports
    Replay(args::ReplayArgs),
    /// Print the editor keyboard shortcuts
    Shortcuts,
}
