//! The editor session: one loaded video, its edits and its input routing
//!
//! Pointer presses arrive tagged with the element they hit; moves and
//! releases are global and go to whichever gesture is active. Overlay
//! geometry is derived from model state on demand.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::domain::model::{ClipRange, CropRect, Marker, MediaHandle};
use crate::editor::gesture::{GestureError, GestureRouter, ListenerRegistry};
use crate::editor::handlers::{ClipSlide, CropDraw, MarkerDrag, PlayheadScrub};
use crate::editor::input::{KeyEvent, PointerEvent, WheelEvent};
use crate::editor::keymap::{action_for, EditorAction};
use crate::editor::playback::{MediaBackend, PlaybackController};
use crate::editor::state::{EditorState, DEFAULT_CROP_THRESHOLD_PX};
use crate::editor::surface::Rect;
use crate::editor::track::TrackView;
use crate::error::{ClipperError, ClipperResult};

/// Element a pointer press landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTarget {
    Timeline,
    StartMarker,
    EndMarker,
    ClipBody,
    VideoSurface,
}

/// Client-space placement of the timeline and the video element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorLayout {
    pub track: Rect,
    pub video: Rect,
}

impl Default for EditorLayout {
    fn default() -> Self {
        Self {
            track: Rect::new(0.0, 680.0, 1280.0, 40.0),
            video: Rect::new(0.0, 0.0, 1280.0, 680.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub crop_threshold_px: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            crop_threshold_px: DEFAULT_CROP_THRESHOLD_PX,
        }
    }
}

/// Work a key press asks the outer application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    None,
    ExportClip,
    ExportFrame,
}

/// Everything an export needs, copied out of the session at save time
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSnapshot {
    pub media: MediaHandle,
    pub duration: f64,
    pub position: f64,
    pub clip: ClipRange,
    pub crop: CropRect,
    pub muted: bool,
}

/// Derived overlay geometry, in track-viewport pixels for the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub progress: f64,
    pub playhead_x: f64,
    pub range_left_x: f64,
    pub range_right_x: f64,
    pub crop: CropRect,
    pub time_label: String,
    pub zoom_label: String,
    pub paused: bool,
    pub muted: bool,
    pub preview: bool,
}

pub struct EditorSession {
    state: EditorState,
    registry: ListenerRegistry,
    playhead: GestureRouter<PlayheadScrub, EditorState>,
    start_marker: GestureRouter<MarkerDrag, EditorState>,
    end_marker: GestureRouter<MarkerDrag, EditorState>,
    slide: GestureRouter<ClipSlide, EditorState>,
    crop: GestureRouter<CropDraw, EditorState>,
    active: Option<HitTarget>,
    mounted: bool,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("state", &self.state)
            .field("active", &self.active)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl EditorSession {
    pub fn new(backend: Box<dyn MediaBackend>, layout: EditorLayout, options: SessionOptions) -> Self {
        let mut state = EditorState::new(
            PlaybackController::new(backend),
            TrackView::new(layout.track),
            layout.video,
        );
        state.crop_threshold_px = options.crop_threshold_px;

        let registry = ListenerRegistry::new();
        Self {
            state,
            playhead: GestureRouter::new(PlayheadScrub, registry.clone()),
            start_marker: GestureRouter::new(MarkerDrag::new(Marker::Start), registry.clone()),
            end_marker: GestureRouter::new(MarkerDrag::new(Marker::End), registry.clone()),
            slide: GestureRouter::new(ClipSlide, registry.clone()),
            crop: GestureRouter::new(CropDraw, registry.clone()),
            registry,
            active: None,
            mounted: false,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn clip(&self) -> ClipRange {
        self.state.clip
    }

    pub fn crop(&self) -> CropRect {
        self.state.crop
    }

    pub fn media(&self) -> Option<&MediaHandle> {
        self.state.media.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Global pointer listeners currently attached by gestures
    pub fn listener_count(&self) -> usize {
        self.registry.count()
    }

    pub fn active_gesture(&self) -> Option<HitTarget> {
        self.active
    }

    /// Start receiving position updates
    pub fn mount(&mut self) {
        self.state.playback.attach();
        self.mounted = true;
    }

    /// Tear down: cancel gestures and release every subscription
    pub fn unmount(&mut self) {
        self.cancel_gestures();
        self.state.playback.detach();
        self.mounted = false;
    }

    /// Replace the loaded video. `restored` is the clip range saved for
    /// this file, if any.
    pub fn load(&mut self, media: MediaHandle, restored: Option<ClipRange>) {
        self.cancel_gestures();
        self.state.playback.detach();
        self.state.playback.reset();

        self.state.clip = restored.unwrap_or_default();
        self.state.crop.clear();
        self.state.crop_draft = None;
        self.state.track.reset_zoom(0.0, 0.0);
        if let Some(duration) = media.duration {
            self.state.playback.set_duration(duration);
        }
        info!(path = %media.path.display(), clip = %self.state.clip, "video loaded");
        self.state.media = Some(media);

        if self.mounted {
            self.state.playback.attach();
        }
    }

    /// Metadata for the current video arrived
    pub fn on_metadata(&mut self, duration: f64, frame_size: Option<(u32, u32)>) {
        let Some(media) = self.state.media.as_mut() else {
            debug!("metadata without a loaded video ignored");
            return;
        };
        media.set_metadata(duration, frame_size);
        if let Some(duration) = media.duration {
            self.state.playback.set_duration(duration);
        }
        debug!(duration, ?frame_size, "metadata loaded");
    }

    pub fn set_layout(&mut self, layout: EditorLayout) {
        self.state.track.set_viewport(layout.track);
        self.state.video_rect = layout.video;
    }

    /// Pointer pressed on `target`. Returns whether a gesture started.
    pub fn pointer_down(&mut self, target: HitTarget, event: &PointerEvent) -> Result<bool, GestureError> {
        if let Some(active) = self.active {
            trace!(?active, ?target, "press ignored while a gesture is active");
            return Ok(false);
        }
        let state = &mut self.state;
        let started = match target {
            HitTarget::Timeline => self.playhead.pointer_down(state, event),
            HitTarget::StartMarker => self.start_marker.pointer_down(state, event),
            HitTarget::EndMarker => self.end_marker.pointer_down(state, event),
            HitTarget::ClipBody => self.slide.pointer_down(state, event),
            HitTarget::VideoSurface => self.crop.pointer_down(state, event),
        }
        .map_err(|err| {
            debug!(?target, error = %err, "gesture refused");
            err
        })?;
        if started {
            self.active = Some(target);
        }
        Ok(started)
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        let state = &mut self.state;
        match self.active {
            Some(HitTarget::Timeline) => self.playhead.pointer_move(state, event),
            Some(HitTarget::StartMarker) => self.start_marker.pointer_move(state, event),
            Some(HitTarget::EndMarker) => self.end_marker.pointer_move(state, event),
            Some(HitTarget::ClipBody) => self.slide.pointer_move(state, event),
            Some(HitTarget::VideoSurface) => self.crop.pointer_move(state, event),
            None => false,
        }
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> bool {
        let state = &mut self.state;
        match self.active.take() {
            Some(HitTarget::Timeline) => self.playhead.pointer_up(state, event),
            Some(HitTarget::StartMarker) => self.start_marker.pointer_up(state, event),
            Some(HitTarget::EndMarker) => self.end_marker.pointer_up(state, event),
            Some(HitTarget::ClipBody) => self.slide.pointer_up(state, event),
            Some(HitTarget::VideoSurface) => self.crop.pointer_up(state, event),
            None => false,
        }
    }

    /// Abort whatever gesture is in progress
    pub fn cancel_gestures(&mut self) {
        let state = &mut self.state;
        self.playhead.cancel(state);
        self.start_marker.cancel(state);
        self.end_marker.cancel(state);
        self.slide.cancel(state);
        self.crop.cancel(state);
        self.active = None;
    }

    pub fn wheel(&mut self, event: &WheelEvent) {
        let position = self.state.playback.position();
        let duration = self.state.playback.duration();
        self.state.track.on_wheel(event, position, duration);
    }

    /// Handle a key press; saves are handed back to the caller
    pub fn key(&mut self, event: &KeyEvent) -> SessionEffect {
        match action_for(event) {
            Some(action) => self.apply(action),
            None => SessionEffect::None,
        }
    }

    pub fn apply(&mut self, action: EditorAction) -> SessionEffect {
        trace!(?action, "editor action");
        let duration = self.state.playback.duration();
        let position = self.state.playback.position();
        let state = &mut self.state;

        match action {
            EditorAction::TogglePlay => state.playback.toggle_play(),
            EditorAction::TogglePreview => state.playback.toggle_preview(&state.clip),
            EditorAction::ToggleMute => state.playback.toggle_mute(),
            EditorAction::Seek { forward, step } => {
                let amount = step.amount(duration);
                state.playback.seek_by(if forward { amount } else { -amount });
            }
            EditorAction::ZoomIn => state.track.zoom_in(position, duration),
            EditorAction::ZoomOut => state.track.zoom_out(position, duration),
            EditorAction::ResetZoom => state.track.reset_zoom(position, duration),
            EditorAction::CenterTrack => state.track.center_on(position, duration),
            EditorAction::SeekToClipStart => {
                state.playback.seek(state.clip.start() * duration, false);
            }
            EditorAction::SeekToClipEnd => {
                state.playback.seek(state.clip.end() * duration, false);
            }
            EditorAction::PreviewFromStart => state.playback.preview_from_start(&state.clip),
            EditorAction::RemoveCrop => {
                state.crop.clear();
                debug!("crop removed");
            }
            EditorAction::ExportClip => return SessionEffect::ExportClip,
            EditorAction::ExportFrame => return SessionEffect::ExportFrame,
        }
        SessionEffect::None
    }

    /// Advance the media clock by `elapsed` seconds
    pub fn poll(&mut self, elapsed: f64) {
        self.state.playback.poll(elapsed, &self.state.clip);
    }

    /// Frame-accurate position callback
    pub fn on_frame(&mut self, media_time: f64) {
        self.state.playback.publish(media_time, &self.state.clip);
    }

    /// Coarse time-update fallback
    pub fn on_time_update(&mut self, current_time: f64) {
        self.state.playback.publish(current_time, &self.state.clip);
    }

    /// Copy out what an export needs. Fails when no video with a known
    /// duration is loaded.
    pub fn snapshot(&self) -> ClipperResult<EditorSnapshot> {
        let media = self
            .state
            .media
            .as_ref()
            .ok_or_else(|| ClipperError::precondition("no video loaded"))?;
        let duration = media
            .known_duration()
            .map_err(|err| ClipperError::precondition(err.to_string()))?;
        let playback = self.state.playback.state();
        Ok(EditorSnapshot {
            media: media.clone(),
            duration,
            position: playback.position,
            clip: self.state.clip,
            crop: self.state.crop,
            muted: playback.muted,
        })
    }

    pub fn overlay(&self) -> Overlay {
        let playback = self.state.playback.state();
        let track = &self.state.track;
        let progress = playback.progress();
        Overlay {
            progress,
            playhead_x: track.x_of(progress),
            range_left_x: track.x_of(self.state.clip.start()),
            range_right_x: track.x_of(self.state.clip.end()),
            crop: self.state.visible_crop(),
            time_label: playback.time_label(),
            zoom_label: track.zoom().percent_label(),
            paused: playback.paused,
            muted: playback.muted,
            preview: playback.preview,
        }
    }
}
