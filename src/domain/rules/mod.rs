// Domain rules - Seeking, preview looping and export policies

use serde::Serialize;

use crate::domain::model::*;
use crate::utils::time::{clamp, FRAME};

/// Rules for resolving a requested seek against the media duration
pub struct SeekRules;

impl SeekRules {
    /// Resolve the target of a seek.
    ///
    /// With `looping`, overshooting either end wraps around, but only when
    /// the playhead is already within two frames of that end. Anything else
    /// clamps to `[0, duration - FRAME]`.
    pub fn resolve(current: f64, to: f64, duration: f64, looping: bool) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        let last = (duration - FRAME).max(0.0);
        if looping && to < 0.0 && current < FRAME * 2.0 {
            last
        } else if looping && to > duration && current - duration > -FRAME * 2.0 {
            0.0
        } else if to.is_nan() {
            clamp(0.0, current, last)
        } else {
            clamp(0.0, to, last)
        }
    }
}

/// Keyboard seek step sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekStep {
    /// Jump to the very start/end
    Extreme,
    /// 10% of the duration
    Large,
    /// 5% of the duration
    Medium,
    /// 1% of the duration
    Small,
    /// Exactly one frame
    Frame,
}

impl SeekStep {
    /// Step length in seconds for a media of `duration`
    pub fn amount(self, duration: f64) -> f64 {
        match self {
            SeekStep::Extreme => f64::INFINITY,
            SeekStep::Large => duration * 0.10,
            SeekStep::Medium => duration * 0.05,
            SeekStep::Small => duration * 0.01,
            SeekStep::Frame => FRAME,
        }
    }
}

/// Preview-loop enforcement
pub struct PreviewRules;

impl PreviewRules {
    /// Position to jump back to when `position` left the clip range, or
    /// `None` when playback may continue
    pub fn loop_target(position: f64, range: &ClipRange, duration: f64) -> Option<f64> {
        if duration <= 0.0 || range.contains_seconds(position, duration) {
            return None;
        }
        Some(Self::loop_start(range, duration))
    }

    /// Where preview playback (re)starts: one frame into the range
    pub fn loop_start(range: &ClipRange, duration: f64) -> f64 {
        let start = range.start() * duration;
        let end = range.end() * duration;
        (start + FRAME).min(end.max(start))
    }
}

/// Audio inclusion for clip exports
pub struct AudioPolicy;

impl AudioPolicy {
    pub fn include_audio(setting: SaveAudio, editor_muted: bool) -> bool {
        match setting {
            SaveAudio::Always => true,
            SaveAudio::Never => false,
            SaveAudio::FollowEditor => !editor_muted,
        }
    }
}

/// Output naming and file type filters for the save dialog
pub struct SaveNaming;

/// A named file type filter, e.g. `PNG Image` / `["png"]`
#[derive(Debug, Clone, PartialEq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

const IMAGE_FILTERS: &[FileFilter] = &[
    FileFilter { name: "PNG Image", extensions: &["png"] },
    FileFilter { name: "WebP Image", extensions: &["webp"] },
    FileFilter { name: "JPEG Image", extensions: &["jpg", "jpeg"] },
    FileFilter { name: "GIF Image", extensions: &["gif"] },
    FileFilter { name: "All files", extensions: &["*"] },
];

const VIDEO_FILTERS: &[FileFilter] = &[
    FileFilter { name: "MP4 Video", extensions: &["mp4"] },
    FileFilter { name: "WebM Video", extensions: &["webm"] },
    FileFilter { name: "Animated GIF", extensions: &["gif"] },
    FileFilter { name: "MP3 Audio", extensions: &["mp3"] },
    FileFilter { name: "PNG Sequence (include \"%d\" in file name)", extensions: &["png"] },
    FileFilter { name: "All files", extensions: &["*"] },
];

impl SaveNaming {
    pub fn image_filters() -> &'static [FileFilter] {
        IMAGE_FILTERS
    }

    pub fn video_filters() -> &'static [FileFilter] {
        VIDEO_FILTERS
    }

    /// Default file name offered for a frame export
    pub fn frame_hint(media: &MediaHandle, time_seconds: f64) -> String {
        format!("{}_{:.3}s.png", media.name_hint(), time_seconds)
    }

    /// Default file name offered for a clip export
    pub fn clip_hint(media: &MediaHandle, start_seconds: f64, duration_seconds: f64) -> String {
        format!(
            "{}_{:.3}s-{:.3}s.mp4",
            media.name_hint(),
            start_seconds,
            start_seconds + duration_seconds
        )
    }
}

#[cfg(test)]
mod tests;
