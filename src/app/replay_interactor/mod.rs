// Replay interactor - Drives an editor session from a recorded event script

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::app::export_interactor::{ExportKind, ExportRequestBuilder};
use crate::app::queue_interactor::{ExportQueue, ExportReport};
use crate::domain::model::*;
use crate::editor::*;
use crate::error::{ClipperError, ClipperResult};
use crate::ports::*;

/// One input or clock event of a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown {
        target: HitTarget,
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    Key(KeyEvent),
    Wheel(WheelEvent),
    /// Let playback run for a while
    Tick {
        seconds: f64,
    },
    /// Frame-accurate position report
    Frame {
        time: f64,
    },
    /// Coarse position report
    TimeUpdate {
        time: f64,
    },
}

/// A video plus the events to play against it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventScript {
    pub video: PathBuf,
    /// Skips probing when given
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub frame_size: Option<(u32, u32)>,
    #[serde(default)]
    pub layout: Option<EditorLayout>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl EventScript {
    /// Parse JSON when `path` ends in `.json`, YAML otherwise
    pub fn parse(content: &str, path: &Path) -> ClipperResult<Self> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let parsed = if is_json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ClipperError::Script {
            message: format!("{}: {}", path.display(), message),
        })
    }

    pub async fn load(path: &Path) -> ClipperResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content, path)
    }
}

/// Final editor state and export outcomes of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub video: PathBuf,
    pub duration: f64,
    pub clip: ClipRange,
    pub crop: CropRect,
    pub overlay: Overlay,
    pub events_applied: usize,
    pub refused_gestures: usize,
    pub exports: Vec<ExportReport>,
    /// Global pointer listeners left after teardown
    pub listeners_after_unmount: usize,
    /// Media subscriptions left after teardown
    pub subscriptions_after_unmount: usize,
}

/// Interactor for scripted editor sessions
pub struct ReplayInteractor {
    probe_port: Arc<dyn ProbePort>,
    state_store: Arc<dyn ClipStateStore>,
    builder: Arc<ExportRequestBuilder>,
    queue: Arc<ExportQueue>,
    options: SessionOptions,
}

impl ReplayInteractor {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        state_store: Arc<dyn ClipStateStore>,
        builder: Arc<ExportRequestBuilder>,
        queue: Arc<ExportQueue>,
        options: SessionOptions,
    ) -> Self {
        Self {
            probe_port,
            state_store,
            builder,
            queue,
            options,
        }
    }

    /// Replay `script`, run the queued exports and report the outcome
    pub async fn execute(&self, script: EventScript) -> ClipperResult<ReplayReport> {
        let media = MediaHandle::new(&script.video)?;
        let (duration, frame_size) = match script.duration {
            Some(duration) => (duration, script.frame_size),
            None => {
                let probed = self.probe_port.probe(&script.video).await?;
                (probed.duration, script.frame_size.or(probed.frame_size))
            }
        };

        let restored = match self.state_store.load(&script.video).await {
            Ok(restored) => restored,
            Err(e) => {
                warn!(error = %e, "saved clip range not restored");
                None
            }
        };

        let backend = SimulatedMedia::new(duration);
        let subscriptions = backend.subscription_gauge();
        let mut session = EditorSession::new(
            Box::new(backend),
            script.layout.unwrap_or_default(),
            self.options,
        );
        session.mount();
        session.load(media, restored);
        session.on_metadata(duration, frame_size);

        let mut events_applied = 0;
        let mut refused_gestures = 0;
        for event in script.events {
            match event {
                ScriptEvent::PointerDown {
                    target,
                    x,
                    y,
                    button,
                    modifiers,
                } => {
                    let event = PointerEvent::at(x, y)
                        .with_button(button)
                        .with_modifiers(modifiers);
                    if let Err(e) = session.pointer_down(target, &event) {
                        debug!(?target, error = %e, "scripted press refused");
                        refused_gestures += 1;
                    }
                }
                ScriptEvent::PointerMove { x, y } => {
                    session.pointer_move(&PointerEvent::at(x, y));
                }
                ScriptEvent::PointerUp { x, y } => {
                    session.pointer_up(&PointerEvent::at(x, y));
                }
                ScriptEvent::Key(key) => {
                    let effect = session.key(&key);
                    if let Some(kind) = ExportKind::from_effect(effect) {
                        // snapshot before awaiting so later events cannot leak in
                        let snapshot = session.snapshot();
                        if let Some(command) = self.builder.save(snapshot, kind).await {
                            self.queue.enqueue(command);
                        }
                    }
                }
                ScriptEvent::Wheel(wheel) => session.wheel(&wheel),
                ScriptEvent::Tick { seconds } => session.poll(seconds),
                ScriptEvent::Frame { time } => session.on_frame(time),
                ScriptEvent::TimeUpdate { time } => session.on_time_update(time),
            }
            events_applied += 1;
        }

        let clip = session.clip();
        if let Err(e) = self.state_store.save(&script.video, clip).await {
            warn!(error = %e, "clip range not saved");
        }

        let overlay = session.overlay();
        let crop = session.crop();
        session.unmount();
        let listeners_after_unmount = session.listener_count();
        let subscriptions_after_unmount = subscriptions.load(Ordering::SeqCst);

        let exports = self.queue.drain().await;
        info!(
            events = events_applied,
            exports = exports.len(),
            clip = %clip,
            "replay finished"
        );

        Ok(ReplayReport {
            video: script.video,
            duration,
            clip,
            crop,
            overlay,
            events_applied,
            refused_gestures,
            exports,
            listeners_after_unmount,
            subscriptions_after_unmount,
        })
    }
}
