// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::FileFilter;
use crate::error::EncoderError;
use crate::utils::time::{duration_to_microseconds, format_wire_micros, TimingCalibration};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Crop arguments as the encoder receives them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropArgs {
    pub x: String,
    pub y: String,
    pub w: String,
    pub h: String,
}

impl CropArgs {
    /// `None` for a full-frame crop, which needs no filter
    pub fn from_rect(crop: &CropRect) -> Option<Self> {
        if crop.is_full_frame() {
            return None;
        }
        Some(Self {
            x: crop.x.to_string(),
            y: crop.y.to_string(),
            w: crop.w.to_string(),
            h: crop.h.to_string(),
        })
    }
}

/// Still-frame extraction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Seek position, e.g. `"1966666us"`
    pub time: String,
    pub crop: Option<CropArgs>,
}

/// Clip extraction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start: String,
    pub duration: String,
    pub crop: Option<CropArgs>,
    pub include_audio: bool,
}

/// One unit of encoder work derived from an [`ExportCommand`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum EncoderJob {
    Frame(FrameJob),
    Clip(ClipJob),
}

impl EncoderJob {
    /// Translate a command to wire form. The calibration shifts the frame
    /// time and the clip start; the clip duration is not corrected.
    pub fn from_command(command: &ExportCommand, calibration: &TimingCalibration) -> Self {
        match command {
            ExportCommand::Frame {
                input,
                output,
                time_seconds,
                crop,
            } => EncoderJob::Frame(FrameJob {
                input: input.clone(),
                output: output.clone(),
                time: format_wire_micros(calibration.to_microseconds(*time_seconds)),
                crop: CropArgs::from_rect(crop),
            }),
            ExportCommand::Clip {
                input,
                output,
                start_seconds,
                duration_seconds,
                crop,
                include_audio,
            } => EncoderJob::Clip(ClipJob {
                input: input.clone(),
                output: output.clone(),
                start: format_wire_micros(calibration.to_microseconds(*start_seconds)),
                duration: format_wire_micros(duration_to_microseconds(*duration_seconds)),
                crop: CropArgs::from_rect(crop),
                include_audio: *include_audio,
            }),
        }
    }
}

/// Port for the external media encoder
#[async_trait]
pub trait EncoderPort: Send + Sync {
    /// Write one frame as an image; returns the written path
    async fn extract_frame(&self, job: &FrameJob) -> Result<PathBuf, EncoderError>;

    /// Write a trimmed clip; returns the written path
    async fn extract_clip(&self, job: &ClipJob) -> Result<PathBuf, EncoderError>;

    /// Dispatch either job kind
    async fn run(&self, job: &EncoderJob) -> Result<PathBuf, EncoderError> {
        match job {
            EncoderJob::Frame(job) => self.extract_frame(job).await,
            EncoderJob::Clip(job) => self.extract_clip(job).await,
        }
    }
}

/// Metadata read from a media file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    pub duration: f64,
    pub frame_size: Option<(u32, u32)>,
}

/// Port for media metadata probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, DomainError>;
}

/// Port for choosing where an export is written
#[async_trait]
pub trait SaveDialogPort: Send + Sync {
    /// `None` when the user cancelled
    async fn choose_save_location(&self, hint: &str, filters: &[FileFilter]) -> Option<PathBuf>;
}

/// Port for per-video editor state
#[async_trait]
pub trait ClipStateStore: Send + Sync {
    async fn load(&self, video: &Path) -> Result<Option<ClipRange>, DomainError>;

    async fn save(&self, video: &Path, range: ClipRange) -> Result<(), DomainError>;
}

/// Port for handing a file to the desktop (viewer, file manager)
#[async_trait]
pub trait ShellPort: Send + Sync {
    async fn open(&self, path: &Path) -> Result<(), DomainError>;
}

/// Port for user-facing messages
#[async_trait]
pub trait NotifyPort: Send + Sync {
    async fn error(&self, title: &str, message: &str);

    async fn warn(&self, title: &str, message: &str);
}

/// Port for settings persistence
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Load settings, migrating older records. A missing file yields defaults.
    async fn load_settings(&self) -> Result<Settings, DomainError>;

    async fn save_settings(&self, settings: &Settings) -> Result<(), DomainError>;

    /// Where settings are read from and written to
    fn settings_path(&self) -> PathBuf;
}
