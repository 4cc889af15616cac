//! Plain editor data shared by the gesture handlers and the session

use crate::domain::model::{ClipRange, CropRect, MediaHandle};
use crate::editor::gesture::GestureError;
use crate::editor::playback::PlaybackController;
use crate::editor::surface::{content_rect, Rect};
use crate::editor::track::TrackView;

/// Movement in pixels a crop drag needs on both axes before it counts
pub const DEFAULT_CROP_THRESHOLD_PX: f64 = 4.0;

/// Everything the editor knows about the loaded video and its edits
#[derive(Debug)]
pub struct EditorState {
    pub media: Option<MediaHandle>,
    pub clip: ClipRange,
    pub crop: CropRect,
    /// Crop being drawn, shown instead of `crop` until the drag ends
    pub crop_draft: Option<CropRect>,
    pub playback: PlaybackController,
    pub track: TrackView,
    /// Bounding box of the video element in client pixels
    pub video_rect: Rect,
    pub crop_threshold_px: f64,
}

impl EditorState {
    pub fn new(playback: PlaybackController, track: TrackView, video_rect: Rect) -> Self {
        Self {
            media: None,
            clip: ClipRange::full(),
            crop: CropRect::full_frame(),
            crop_draft: None,
            playback,
            track,
            video_rect,
            crop_threshold_px: DEFAULT_CROP_THRESHOLD_PX,
        }
    }

    /// Duration of the loaded media, or why gestures cannot use it yet
    pub fn require_duration(&self) -> Result<f64, GestureError> {
        let media = self
            .media
            .as_ref()
            .ok_or_else(|| GestureError::MediaNotReady("no video loaded".to_string()))?;
        match media.duration {
            Some(duration) if duration > 0.0 => Ok(duration),
            _ => Err(GestureError::MediaNotReady(format!(
                "metadata for {} has not loaded",
                media.path.display()
            ))),
        }
    }

    /// Timeline fraction under a client x coordinate
    pub fn fraction_at(&self, client_x: f64) -> f64 {
        self.track.fraction_at(client_x)
    }

    /// Playhead as a fraction of the duration
    pub fn playhead_fraction(&self) -> f64 {
        self.playback.state().progress()
    }

    /// Area of the video element covered by picture
    pub fn video_content_rect(&self) -> Rect {
        let frame_size = self.media.as_ref().and_then(|m| m.frame_size);
        content_rect(self.video_rect, frame_size)
    }

    /// Crop that overlays should draw
    pub fn visible_crop(&self) -> CropRect {
        self.crop_draft.unwrap_or(self.crop)
    }
}
