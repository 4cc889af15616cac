// Settings model - Persisted user preferences

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::model::SaveAudio;
use crate::utils::time::{TimingCalibration, FRAMES_PER_SECOND};

/// Current settings record version
pub const SETTINGS_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Font {
    #[default]
    Bitch,
    Boring,
}

/// User preferences. Missing fields take their defaults and unknown
/// fields are ignored, so older and newer files both load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub theme: Theme,
    pub font: Font,
    /// Open the exported file once the encoder finishes
    pub open_after_save: bool,
    pub save_audio: SaveAudio,
    pub video_folders: Vec<PathBuf>,
    /// Rate used to turn `timestamp_correction_frames` into seconds. The
    /// editor's own frame step and loop epsilon stay at 1/60 s.
    pub frame_rate: f64,
    /// Frames added to every exported timestamp (negative seeks earlier)
    pub timestamp_correction_frames: f64,
    /// Pointer travel a crop drag needs before it counts
    pub crop_threshold_px: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            theme: Theme::Auto,
            font: Font::Bitch,
            open_after_save: true,
            save_audio: SaveAudio::Always,
            video_folders: Vec::new(),
            frame_rate: FRAMES_PER_SECOND,
            timestamp_correction_frames: -2.0,
            crop_threshold_px: 4.0,
        }
    }
}

impl Settings {
    /// Timestamp calibration applied when building encoder jobs
    pub fn calibration(&self) -> TimingCalibration {
        if self.frame_rate > 0.0 && self.frame_rate.is_finite() {
            TimingCalibration {
                correction_seconds: self.timestamp_correction_frames / self.frame_rate,
            }
        } else {
            TimingCalibration::from_frames(self.timestamp_correction_frames)
        }
    }
}
