//! Playback and seek controller
//!
//! Owns the playhead, play/pause, mute and preview state, drives the media
//! backend, and accepts position updates from either the frame-accurate
//! callback or the coarser time-update fallback.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::domain::model::{ClipRange, PlaybackState};
use crate::domain::rules::{PreviewRules, SeekRules};

/// A position report from the media backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionUpdate {
    /// Once per presented video frame
    Frame(f64),
    /// Periodic playback time event
    TimeUpdate(f64),
}

impl PositionUpdate {
    pub fn seconds(&self) -> f64 {
        match self {
            PositionUpdate::Frame(t) | PositionUpdate::TimeUpdate(t) => *t,
        }
    }
}

/// The decode/playback resource an editor session drives
pub trait MediaBackend: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn set_current_time(&mut self, seconds: f64);
    fn current_time(&self) -> f64;

    /// Begin per-frame callbacks. Returns `false` when the backend cannot
    /// report individual frames.
    fn subscribe_frames(&mut self) -> bool;
    fn unsubscribe_frames(&mut self);
    fn subscribe_time_updates(&mut self);
    fn unsubscribe_time_updates(&mut self);

    /// Advance by `elapsed` seconds of wall time and collect the position
    /// reports produced meanwhile
    fn poll(&mut self, elapsed: f64) -> Vec<PositionUpdate>;
}

/// Which source is currently feeding positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFeed {
    Detached,
    FrameCallback,
    TimeEvents,
}

/// Playback/seek state machine over a [`MediaBackend`]
pub struct PlaybackController {
    state: PlaybackState,
    backend: Box<dyn MediaBackend>,
    paused_before_preview: Option<bool>,
    feed: PositionFeed,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("feed", &self.feed)
            .finish()
    }
}

impl PlaybackController {
    pub fn new(backend: Box<dyn MediaBackend>) -> Self {
        Self {
            state: PlaybackState::default(),
            backend,
            paused_before_preview: None,
            feed: PositionFeed::Detached,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn duration(&self) -> f64 {
        self.state.duration
    }

    pub fn feed(&self) -> PositionFeed {
        self.feed
    }

    pub fn backend(&self) -> &dyn MediaBackend {
        self.backend.as_ref()
    }

    /// Forget everything about the previous media
    pub fn reset(&mut self) {
        self.backend.pause();
        self.backend.set_current_time(0.0);
        let muted = self.state.muted;
        self.state = PlaybackState {
            muted,
            ..PlaybackState::default()
        };
        self.paused_before_preview = None;
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.state.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.state.position = SeekRules::resolve(
            self.state.position,
            self.state.position,
            self.state.duration,
            false,
        );
    }

    /// Seek to `to` seconds; see [`SeekRules::resolve`] for loop behavior
    pub fn seek(&mut self, to: f64, looping: bool) -> f64 {
        let target = SeekRules::resolve(self.state.position, to, self.state.duration, looping);
        self.state.position = target;
        self.backend.set_current_time(target);
        trace!(requested = to, position = target, looping, "seek");
        target
    }

    pub fn seek_by(&mut self, delta: f64) -> f64 {
        self.seek(self.state.position + delta, true)
    }

    pub fn play(&mut self) {
        if self.state.paused {
            self.state.paused = false;
            self.backend.play();
            debug!(position = self.state.position, "playback started");
        }
    }

    pub fn pause(&mut self) {
        if !self.state.paused {
            self.state.paused = true;
            self.backend.pause();
            debug!(position = self.state.position, "playback paused");
        }
    }

    pub fn toggle_play(&mut self) {
        if self.state.paused {
            self.play();
        } else {
            self.pause();
        }
    }

    pub fn toggle_mute(&mut self) {
        self.state.muted = !self.state.muted;
        self.backend.set_muted(self.state.muted);
        debug!(muted = self.state.muted, "mute toggled");
    }

    pub fn toggle_preview(&mut self, range: &ClipRange) {
        if self.state.preview {
            self.exit_preview();
        } else {
            self.enter_preview(range);
        }
    }

    /// Start looping playback inside `range`, remembering whether the
    /// player was paused so leaving preview can restore it
    pub fn enter_preview(&mut self, range: &ClipRange) {
        if !self.state.preview {
            self.paused_before_preview = Some(self.state.paused);
            self.state.preview = true;
        }
        if let Some(target) = PreviewRules::loop_target(self.state.position, range, self.state.duration) {
            self.seek(target, false);
        }
        self.play();
        debug!(range = %range, "preview entered");
    }

    pub fn exit_preview(&mut self) {
        if !self.state.preview {
            return;
        }
        self.state.preview = false;
        match self.paused_before_preview.take() {
            Some(true) => self.pause(),
            Some(false) => self.play(),
            None => {}
        }
        debug!(paused = self.state.paused, "preview exited");
    }

    /// Jump to the clip start and begin previewing from there
    pub fn preview_from_start(&mut self, range: &ClipRange) {
        let start = PreviewRules::loop_start(range, self.state.duration);
        self.seek(start, false);
        self.enter_preview(range);
    }

    /// Apply a position report. Frame callbacks and time events go through
    /// the same path and applying one twice has no further effect.
    pub fn publish(&mut self, seconds: f64, range: &ClipRange) {
        if !seconds.is_finite() {
            return;
        }
        if self.state.preview {
            if let Some(target) = PreviewRules::loop_target(seconds, range, self.state.duration) {
                self.seek(target, false);
                return;
            }
        }
        self.state.position = seconds;
    }

    /// Subscribe to position updates, preferring frame callbacks
    pub fn attach(&mut self) {
        if self.feed != PositionFeed::Detached {
            return;
        }
        self.feed = if self.backend.subscribe_frames() {
            PositionFeed::FrameCallback
        } else {
            self.backend.subscribe_time_updates();
            PositionFeed::TimeEvents
        };
        debug!(feed = ?self.feed, "position feed attached");
    }

    /// Release every position subscription and stop playback
    pub fn detach(&mut self) {
        match self.feed {
            PositionFeed::FrameCallback => self.backend.unsubscribe_frames(),
            PositionFeed::TimeEvents => self.backend.unsubscribe_time_updates(),
            PositionFeed::Detached => return,
        }
        self.feed = PositionFeed::Detached;
        self.pause();
        debug!("position feed detached");
    }

    /// Let the backend advance and apply whatever it reported
    pub fn poll(&mut self, elapsed: f64, range: &ClipRange) {
        for update in self.backend.poll(elapsed) {
            self.publish(update.seconds(), range);
        }
    }
}

/// Clock-driven stand-in for a real decoder, used for scripted sessions and
/// tests. Loops at the end like a `<video loop>` element.
#[derive(Debug, Clone)]
pub struct SimulatedMedia {
    duration: f64,
    time: f64,
    playing: bool,
    muted: bool,
    frame_callbacks_supported: bool,
    frame_subscribers: usize,
    time_subscribers: usize,
    time_update_interval: f64,
    since_time_update: f64,
    gauge: Arc<AtomicUsize>,
}

impl SimulatedMedia {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            time: 0.0,
            playing: false,
            muted: false,
            frame_callbacks_supported: true,
            frame_subscribers: 0,
            time_subscribers: 0,
            time_update_interval: 0.25,
            since_time_update: 0.0,
            gauge: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A backend that only reports periodic time updates
    pub fn without_frame_callbacks(mut self) -> Self {
        self.frame_callbacks_supported = false;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Subscriptions still registered; zero once the editor is torn down
    pub fn active_subscriptions(&self) -> usize {
        self.frame_subscribers + self.time_subscribers
    }

    /// Live subscription count, readable after the backend is boxed away
    pub fn subscription_gauge(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.gauge)
    }

    fn sync_gauge(&self) {
        self.gauge.store(self.active_subscriptions(), Ordering::SeqCst);
    }
}

impl MediaBackend for SimulatedMedia {
    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = seconds.max(0.0).min(self.duration);
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn subscribe_frames(&mut self) -> bool {
        if self.frame_callbacks_supported {
            self.frame_subscribers += 1;
            self.sync_gauge();
        }
        self.frame_callbacks_supported
    }

    fn unsubscribe_frames(&mut self) {
        self.frame_subscribers = self.frame_subscribers.saturating_sub(1);
        self.sync_gauge();
    }

    fn subscribe_time_updates(&mut self) {
        self.time_subscribers += 1;
        self.sync_gauge();
    }

    fn unsubscribe_time_updates(&mut self) {
        self.time_subscribers = self.time_subscribers.saturating_sub(1);
        self.sync_gauge();
    }

    fn poll(&mut self, elapsed: f64) -> Vec<PositionUpdate> {
        let mut updates = Vec::new();
        if !self.playing || elapsed <= 0.0 || self.duration <= 0.0 {
            return updates;
        }
        self.time += elapsed;
        if self.time >= self.duration {
            self.time %= self.duration;
        }
        if self.frame_subscribers > 0 {
            updates.push(PositionUpdate::Frame(self.time));
        }
        if self.time_subscribers > 0 {
            self.since_time_update += elapsed;
            if self.since_time_update >= self.time_update_interval {
                self.since_time_update = 0.0;
                updates.push(PositionUpdate::TimeUpdate(self.time));
            }
        }
        updates
    }
}
