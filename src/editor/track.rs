//! Zoomable, scrollable timeline track
//!
//! Maps pointer x coordinates to normalized time through the current zoom
//! and scroll, and keeps the playhead centered after zoom changes.

use tracing::trace;

use crate::domain::model::ZoomState;
use crate::editor::input::WheelEvent;
use crate::editor::surface::Rect;
use crate::utils::time::clamp;

/// Largest zoom factor; deeper zoom stops changing anything visible
pub const MAX_ZOOM: f64 = 256.0;

/// Timeline viewport plus its zoom/scroll state
#[derive(Debug, Clone, PartialEq)]
pub struct TrackView {
    viewport: Rect,
    zoom: ZoomState,
}

impl TrackView {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            zoom: ZoomState::default(),
        }
    }

    pub fn zoom(&self) -> ZoomState {
        self.zoom
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Container was resized or moved
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.zoom.scroll_left = clamp(0.0, self.zoom.scroll_left, self.max_scroll());
    }

    /// Full width of the zoomed track in pixels
    pub fn track_width(&self) -> f64 {
        self.viewport.width * self.zoom.factor
    }

    pub fn max_scroll(&self) -> f64 {
        (self.track_width() - self.viewport.width).max(0.0)
    }

    pub fn zoom_in(&mut self, position: f64, duration: f64) {
        self.set_factor(self.zoom.factor * 2.0, position, duration);
    }

    pub fn zoom_out(&mut self, position: f64, duration: f64) {
        self.set_factor(self.zoom.factor / 2.0, position, duration);
    }

    /// Back to fit-to-container
    pub fn reset_zoom(&mut self, position: f64, duration: f64) {
        self.set_factor(1.0, position, duration);
    }

    fn set_factor(&mut self, factor: f64, position: f64, duration: f64) {
        self.zoom.factor = clamp(1.0, factor, MAX_ZOOM);
        self.center_on(position, duration);
        trace!(factor = self.zoom.factor, scroll = self.zoom.scroll_left, "track zoom");
    }

    /// Scroll so the pixel for `position` sits in the middle of the viewport
    pub fn center_on(&mut self, position: f64, duration: f64) {
        let fraction = if duration > 0.0 {
            clamp(0.0, position / duration, 1.0)
        } else {
            0.0
        };
        let target = self.track_width() * fraction - self.viewport.width / 2.0;
        self.zoom.scroll_left = clamp(0.0, target, self.max_scroll());
    }

    pub fn scroll_by(&mut self, dx: f64) {
        self.zoom.scroll_left = clamp(0.0, self.zoom.scroll_left + dx, self.max_scroll());
    }

    /// Wheel input: with Ctrl/Cmd the vertical delta zooms (negative is
    /// in), otherwise it pans the track
    pub fn on_wheel(&mut self, event: &WheelEvent, position: f64, duration: f64) {
        if event.delta_y == 0.0 {
            return;
        }
        if event.modifiers.command() {
            if event.delta_y < 0.0 {
                self.zoom_in(position, duration);
            } else {
                self.zoom_out(position, duration);
            }
        } else {
            self.scroll_by(event.delta_y);
        }
    }

    /// Normalized time under a client x coordinate
    pub fn fraction_at(&self, client_x: f64) -> f64 {
        let width = self.track_width();
        if width <= 0.0 {
            return 0.0;
        }
        clamp(
            0.0,
            (client_x - self.viewport.left + self.zoom.scroll_left) / width,
            1.0,
        )
    }

    /// Viewport-relative x of a normalized time, for overlays
    pub fn x_of(&self, fraction: f64) -> f64 {
        fraction * self.track_width() - self.zoom.scroll_left
    }
}
