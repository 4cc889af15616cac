// Domain models - Core editor types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;
use crate::utils::time::{clamp, format_duration};

mod settings;

pub use settings::*;

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        clamp(0.0, value, 1.0)
    }
}

/// The loaded media asset owned by an editor session
#[derive(Debug, Clone, PartialEq)]
pub struct MediaHandle {
    pub path: PathBuf,
    /// Total duration in seconds; unknown until metadata has loaded
    pub duration: Option<f64>,
    /// Natural frame size in pixels, when the backend reports it
    pub frame_size: Option<(u32, u32)>,
}

impl MediaHandle {
    /// Handle for a freshly opened file whose metadata is still loading
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(DomainError::BadArgs("Media path cannot be empty".to_string()));
        }
        Ok(Self {
            path,
            duration: None,
            frame_size: None,
        })
    }

    /// Record metadata once the backend has loaded it
    pub fn set_metadata(&mut self, duration: f64, frame_size: Option<(u32, u32)>) {
        if duration.is_finite() && duration > 0.0 {
            self.duration = Some(duration);
        }
        self.frame_size = frame_size.filter(|(w, h)| *w > 0 && *h > 0);
    }

    /// Duration, or an error if it is not known yet
    pub fn known_duration(&self) -> Result<f64, DomainError> {
        self.duration.ok_or_else(|| {
            DomainError::MediaUnavailable(format!(
                "duration of {} is not known yet",
                self.path.display()
            ))
        })
    }

    /// File stem used as a save-dialog name hint
    pub fn name_hint(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip".to_string())
    }
}

/// Which of the two clip markers a value ended up on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Start,
    End,
}

impl Marker {
    pub fn other(self) -> Self {
        match self {
            Marker::Start => Marker::End,
            Marker::End => Marker::Start,
        }
    }
}

/// Trim in/out points as fractions of the total duration.
///
/// Always satisfies `0 <= start <= end <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRange {
    start: f64,
    end: f64,
}

impl Default for ClipRange {
    fn default() -> Self {
        Self::full()
    }
}

impl ClipRange {
    /// The whole video
    pub fn full() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
        }
    }

    /// Build a range from two arbitrary positions
    pub fn new(a: f64, b: f64) -> Self {
        let (a, b) = (clamp_unit(a), clamp_unit(b));
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= f64::EPSILON
    }

    /// Move the start marker. Returns the marker the value landed on, which
    /// is `End` when `pos` passed the current end and the pair was swapped.
    pub fn set_start(&mut self, pos: f64) -> Marker {
        let pos = clamp_unit(pos);
        if pos > self.end {
            self.start = self.end;
            self.end = pos;
            Marker::End
        } else {
            self.start = pos;
            Marker::Start
        }
    }

    /// Move the end marker; see [`ClipRange::set_start`]
    pub fn set_end(&mut self, pos: f64) -> Marker {
        let pos = clamp_unit(pos);
        if pos < self.start {
            self.end = self.start;
            self.start = pos;
            Marker::Start
        } else {
            self.end = pos;
            Marker::End
        }
    }

    /// Move the given marker
    pub fn set(&mut self, marker: Marker, pos: f64) -> Marker {
        match marker {
            Marker::Start => self.set_start(pos),
            Marker::End => self.set_end(pos),
        }
    }

    /// Shift both markers by `delta`, stopping at the track edges so the
    /// width is preserved
    pub fn slide(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let width = self.width();
        let start = clamp(0.0, self.start + delta, 1.0 - width);
        self.start = start;
        self.end = (start + width).min(1.0);
    }

    /// Copy of this range shifted by `delta`
    pub fn slid(mut self, delta: f64) -> Self {
        self.slide(delta);
        self
    }

    pub fn reset(&mut self) {
        *self = Self::full();
    }

    /// Absolute start and duration in seconds
    pub fn to_seconds(&self, duration: f64) -> (f64, f64) {
        (self.start * duration, self.width() * duration)
    }

    /// Whether `seconds` lies inside the range for a media of `duration`
    pub fn contains_seconds(&self, seconds: f64, duration: f64) -> bool {
        seconds >= self.start * duration && seconds <= self.end * duration
    }
}

impl fmt::Display for ClipRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.start, self.end)
    }
}

/// Persisted per-video editor state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedClip {
    pub clip_start: f64,
    pub clip_end: f64,
}

impl From<ClipRange> for PersistedClip {
    fn from(range: ClipRange) -> Self {
        Self {
            clip_start: range.start(),
            clip_end: range.end(),
        }
    }
}

impl From<PersistedClip> for ClipRange {
    fn from(state: PersistedClip) -> Self {
        ClipRange::new(state.clip_start, state.clip_end)
    }
}

/// Smallest area a drawn crop must have to count as a crop
pub const MIN_CROP_AREA: f64 = 1e-6;

// slack for decimal input such as 0.7 + 0.3
const CROP_EDGE_TOLERANCE: f64 = 1e-9;

/// Normalized crop region of the visual frame. `{0,0,1,1}` means no crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self::full_frame()
    }
}

impl CropRect {
    pub fn full_frame() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
        }
    }

    /// Build a rectangle, clamping it inside the unit square
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        let x = clamp_unit(x);
        let y = clamp_unit(y);
        Self {
            x,
            y,
            w: clamp(0.0, if w.is_nan() { 0.0 } else { w }, 1.0 - x),
            h: clamp(0.0, if h.is_nan() { 0.0 } else { h }, 1.0 - y),
        }
    }

    /// Rectangle spanned by two corner points
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        let (ax, ay) = (clamp_unit(a.0), clamp_unit(a.1));
        let (bx, by) = (clamp_unit(b.0), clamp_unit(b.1));
        let (x0, x1) = (ax.min(bx), ax.max(bx));
        let (y0, y1) = (ay.min(by), ay.max(by));
        Self {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        }
    }

    /// Parse `x,y,w,h`. Unlike [`CropRect::new`] nothing is clamped: a
    /// rectangle reaching past the frame or with no area is an error.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let parts: Vec<f64> = value
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| DomainError::BadArgs(e.to_string()))?;
        let [x, y, w, h] = parts[..] else {
            return Err(DomainError::BadArgs("expected 4 values".to_string()));
        };
        if parts.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(DomainError::BadArgs("values must be within [0,1]".to_string()));
        }
        if x + w > 1.0 + CROP_EDGE_TOLERANCE || y + h > 1.0 + CROP_EDGE_TOLERANCE {
            return Err(DomainError::BadArgs("rectangle extends past the frame".to_string()));
        }
        let rect = Self::new(x, y, w, h);
        if rect.is_degenerate() {
            return Err(DomainError::BadArgs("rectangle has no area".to_string()));
        }
        Ok(rect)
    }

    /// Start a drag-to-draw gesture at a normalized point
    pub fn begin_drag(x: f64, y: f64) -> CropDrag {
        CropDrag {
            origin: (clamp_unit(x), clamp_unit(y)),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::full_frame();
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn is_full_frame(&self) -> bool {
        self.x <= 0.0 && self.y <= 0.0 && self.w >= 1.0 && self.h >= 1.0
    }

    /// Zero or near-zero area; never committed as a crop
    pub fn is_degenerate(&self) -> bool {
        self.area() < MIN_CROP_AREA
    }
}

/// In-progress crop drag anchored at its first corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropDrag {
    origin: (f64, f64),
}

impl CropDrag {
    /// Rectangle between the anchor and the current point
    pub fn update_drag(&self, x: f64, y: f64) -> CropRect {
        CropRect::from_corners(self.origin, (x, y))
    }
}

/// Playback state of the editor
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Current position in seconds
    pub position: f64,
    pub paused: bool,
    pub muted: bool,
    /// Loop strictly inside the clip range
    pub preview: bool,
    /// Known duration in seconds, `0.0` until metadata loads
    pub duration: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            position: 0.0,
            paused: true,
            muted: false,
            preview: false,
            duration: 0.0,
        }
    }
}

impl PlaybackState {
    /// Playhead as a fraction of the duration
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            clamp_unit(self.position / self.duration)
        } else {
            0.0
        }
    }

    /// Time label shown next to the progress bar
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_duration(self.position),
            format_duration(self.duration)
        )
    }
}

/// Timeline zoom; purely a view concern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    /// Multiplier over the fit-to-container width, a power of two >= 1
    pub factor: f64,
    /// Horizontal scroll of the track in pixels
    pub scroll_left: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            factor: 1.0,
            scroll_left: 0.0,
        }
    }
}

impl ZoomState {
    /// Zoom as a percentage label, e.g. `200%`
    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.factor * 100.0)
    }
}

/// Audio inclusion policy for clip exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveAudio {
    #[default]
    Always,
    Never,
    /// Include audio only when the editor is not muted
    #[serde(alias = "editor")]
    FollowEditor,
}

impl SaveAudio {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "editor" | "follow_editor" | "follow-editor" => Ok(Self::FollowEditor),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid audio policy: {}. Valid values: always, never, follow-editor",
                value
            ))),
        }
    }
}

/// Immutable export request produced by a save action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ExportCommand {
    Frame {
        input: PathBuf,
        output: PathBuf,
        time_seconds: f64,
        crop: CropRect,
    },
    Clip {
        input: PathBuf,
        output: PathBuf,
        start_seconds: f64,
        duration_seconds: f64,
        crop: CropRect,
        include_audio: bool,
    },
}

impl ExportCommand {
    pub fn input(&self) -> &Path {
        match self {
            ExportCommand::Frame { input, .. } | ExportCommand::Clip { input, .. } => input,
        }
    }

    pub fn output(&self) -> &Path {
        match self {
            ExportCommand::Frame { output, .. } | ExportCommand::Clip { output, .. } => output,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExportCommand::Frame { .. } => "frame",
            ExportCommand::Clip { .. } => "clip",
        }
    }
}

#[cfg(test)]
mod tests;
