//! Command-line argument definitions

use clap::Args;
use std::path::PathBuf;

/// Where exports are written
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Exact output file path
    #[arg(short, long, conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for the suggested file name (default: current directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the frame command
#[derive(Args, Debug)]
pub struct FrameArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Frame time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short = 't', long)]
    pub at: String,

    /// Crop as normalized x,y,w,h (e.g. 0.25,0.25,0.5,0.5)
    #[arg(long)]
    pub crop: Option<String>,

    /// Media duration in seconds; probed with ffprobe when omitted
    #[arg(long)]
    pub duration: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the clip command
#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub start: String,

    /// End time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub end: String,

    /// Crop as normalized x,y,w,h
    #[arg(long)]
    pub crop: Option<String>,

    /// Media duration in seconds; probed with ffprobe when omitted
    #[arg(long)]
    pub duration: Option<f64>,

    /// Audio policy: always, never or follow-editor
    #[arg(long, env = "CLIPCROP_SAVE_AUDIO")]
    pub audio: Option<String>,

    /// Treat the editor as muted (matters with --audio follow-editor)
    #[arg(long)]
    pub muted: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the replay command
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Event script (YAML, or JSON with a .json extension)
    pub script: PathBuf,

    /// Print the replay report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}
