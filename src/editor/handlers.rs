//! Gesture handlers for the five draggable editor elements

use tracing::debug;

use crate::domain::model::{ClipRange, CropDrag, CropRect, Marker};
use crate::editor::gesture::{GestureError, GestureHandler, StartDecision};
use crate::editor::input::{PointerButton, PointerEvent};
use crate::editor::state::EditorState;

/// Scrubbing the playhead along the timeline.
///
/// Shift+click sets the clip start at the pointer, Shift+right-click the
/// clip end; neither starts a drag.
#[derive(Debug, Default)]
pub struct PlayheadScrub;

impl GestureHandler<EditorState> for PlayheadScrub {
    type State = f64;

    fn on_start(&mut self, ctx: &mut EditorState, event: &PointerEvent) -> Result<StartDecision<f64>, GestureError> {
        let duration = ctx.require_duration()?;
        let fraction = ctx.fraction_at(event.x);

        if event.modifiers.shift {
            let marker = match event.button {
                PointerButton::Primary => Marker::Start,
                PointerButton::Secondary => Marker::End,
                PointerButton::Auxiliary => return Ok(StartDecision::Abort),
            };
            ctx.clip.set(marker, fraction);
            debug!(?marker, fraction, clip = %ctx.clip, "clip marker set from timeline");
            return Ok(StartDecision::Abort);
        }

        if !event.is_primary() {
            return Ok(StartDecision::Abort);
        }
        Ok(StartDecision::ScrubNow(duration))
    }

    fn on_scrub(&mut self, ctx: &mut EditorState, duration: &mut f64, event: &PointerEvent) {
        let fraction = ctx.fraction_at(event.x);
        ctx.playback.seek(fraction * *duration, false);
    }
}

/// Per-drag state of a clip marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerDragState {
    /// Marker under the pointer; flips when the drag crosses the other one
    pub marker: Marker,
}

/// Dragging the clip start or end marker. Right-click snaps the marker to
/// the playhead instead.
#[derive(Debug)]
pub struct MarkerDrag {
    marker: Marker,
}

impl MarkerDrag {
    pub fn new(marker: Marker) -> Self {
        Self { marker }
    }
}

impl GestureHandler<EditorState> for MarkerDrag {
    type State = MarkerDragState;

    fn on_start(&mut self, ctx: &mut EditorState, event: &PointerEvent) -> Result<StartDecision<MarkerDragState>, GestureError> {
        ctx.require_duration()?;
        match event.button {
            PointerButton::Secondary => {
                let at = ctx.playhead_fraction();
                ctx.clip.set(self.marker, at);
                debug!(marker = ?self.marker, at, "marker snapped to playhead");
                Ok(StartDecision::Abort)
            }
            PointerButton::Primary => Ok(StartDecision::Listen(MarkerDragState {
                marker: self.marker,
            })),
            PointerButton::Auxiliary => Ok(StartDecision::Abort),
        }
    }

    fn on_scrub(&mut self, ctx: &mut EditorState, state: &mut MarkerDragState, event: &PointerEvent) {
        let fraction = ctx.fraction_at(event.x);
        state.marker = ctx.clip.set(state.marker, fraction);
    }

    fn on_end(&mut self, ctx: &mut EditorState, state: MarkerDragState, _event: &PointerEvent) {
        debug!(marker = ?state.marker, clip = %ctx.clip, "marker drag finished");
    }
}

/// Per-drag state of a whole-clip slide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideState {
    anchor: f64,
    origin: ClipRange,
}

/// Sliding the whole clip range, keeping its width.
///
/// Every move is applied relative to the range at press time, so repeated
/// clamping at the edges does not accumulate drift.
#[derive(Debug, Default)]
pub struct ClipSlide;

impl GestureHandler<EditorState> for ClipSlide {
    type State = SlideState;

    fn on_start(&mut self, ctx: &mut EditorState, event: &PointerEvent) -> Result<StartDecision<SlideState>, GestureError> {
        ctx.require_duration()?;
        if !event.is_primary() {
            return Ok(StartDecision::Abort);
        }
        Ok(StartDecision::Listen(SlideState {
            anchor: ctx.fraction_at(event.x),
            origin: ctx.clip,
        }))
    }

    fn on_scrub(&mut self, ctx: &mut EditorState, state: &mut SlideState, event: &PointerEvent) {
        let delta = ctx.fraction_at(event.x) - state.anchor;
        ctx.clip = state.origin.slid(delta);
    }

    fn on_end(&mut self, ctx: &mut EditorState, _state: SlideState, _event: &PointerEvent) {
        debug!(clip = %ctx.clip, "clip slide finished");
    }
}

/// Per-drag state of a crop draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropDrawState {
    drag: CropDrag,
    press: (f64, f64),
    committed: bool,
}

/// Drawing a crop rectangle on the video surface.
///
/// Until the pointer has moved past the threshold on both axes the
/// gesture is a click, which toggles play/pause on release.
#[derive(Debug, Default)]
pub struct CropDraw;

impl CropDraw {
    fn point(ctx: &EditorState, event: &PointerEvent) -> (f64, f64) {
        ctx.video_content_rect().normalize(event.x, event.y)
    }
}

impl GestureHandler<EditorState> for CropDraw {
    type State = CropDrawState;

    fn on_start(&mut self, ctx: &mut EditorState, event: &PointerEvent) -> Result<StartDecision<CropDrawState>, GestureError> {
        ctx.require_duration()?;
        if !event.is_primary() {
            return Ok(StartDecision::Abort);
        }
        let (x, y) = Self::point(ctx, event);
        Ok(StartDecision::Listen(CropDrawState {
            drag: CropRect::begin_drag(x, y),
            press: (event.x, event.y),
            committed: false,
        }))
    }

    fn on_scrub(&mut self, ctx: &mut EditorState, state: &mut CropDrawState, event: &PointerEvent) {
        if !state.committed {
            let dx = (event.x - state.press.0).abs();
            let dy = (event.y - state.press.1).abs();
            if dx > ctx.crop_threshold_px && dy > ctx.crop_threshold_px {
                state.committed = true;
            }
        }
        if state.committed {
            let (x, y) = Self::point(ctx, event);
            ctx.crop_draft = Some(state.drag.update_drag(x, y));
        }
    }

    fn on_end(&mut self, ctx: &mut EditorState, state: CropDrawState, event: &PointerEvent) {
        ctx.crop_draft = None;
        if !state.committed {
            ctx.playback.toggle_play();
            return;
        }
        let (x, y) = Self::point(ctx, event);
        let rect = state.drag.update_drag(x, y);
        if rect.is_degenerate() {
            debug!("crop drag collapsed to zero area; ignored");
            return;
        }
        ctx.crop = rect;
        debug!(x = rect.x, y = rect.y, w = rect.w, h = rect.h, "crop set");
    }

    fn on_cancel(&mut self, ctx: &mut EditorState, _state: CropDrawState, _last: &PointerEvent) {
        ctx.crop_draft = None;
    }
}
