//! Three-phase pointer gestures (start / scrub / end)
//!
//! Every draggable element owns one [`GestureRouter`]. A pointer-down asks
//! the handler whether to start; an accepted gesture holds the global
//! move/up/stop listeners as a single guard, which is released on
//! pointer-up, on cancel, and on any early exit.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::editor::input::PointerEvent;

/// Number of global listeners a gesture attaches: move, up, stop
pub const LISTENERS_PER_GESTURE: usize = 3;

/// Why a gesture refused to start
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    #[error("media is not ready: {0}")]
    MediaNotReady(String),
    #[error("gesture rejected: {0}")]
    Rejected(String),
}

/// Shared count of global pointer listeners currently attached
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    attached: Arc<AtomicUsize>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listeners currently attached across all gestures
    pub fn count(&self) -> usize {
        self.attached.load(Ordering::SeqCst)
    }

    /// Attach move, up and stop listeners together
    pub fn attach(&self) -> ListenerGuard {
        self.attached.fetch_add(LISTENERS_PER_GESTURE, Ordering::SeqCst);
        ListenerGuard {
            attached: Arc::clone(&self.attached),
        }
    }
}

/// Detaches its listeners when dropped
#[derive(Debug)]
pub struct ListenerGuard {
    attached: Arc<AtomicUsize>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.attached.fetch_sub(LISTENERS_PER_GESTURE, Ordering::SeqCst);
    }
}

/// Outcome of a handler's start callback
#[derive(Debug, Clone, PartialEq)]
pub enum StartDecision<S> {
    /// Do not start; no listeners are attached
    Abort,
    /// Scrub once with the start event, then listen
    ScrubNow(S),
    /// Listen without an immediate scrub
    Listen(S),
}

/// Callbacks of one draggable element.
///
/// `State` is created by `on_start` and owned by the router until the
/// gesture ends, so handlers never keep per-drag data in themselves.
pub trait GestureHandler<C> {
    type State;

    fn on_start(
        &mut self,
        ctx: &mut C,
        event: &PointerEvent,
    ) -> Result<StartDecision<Self::State>, GestureError>;

    fn on_scrub(&mut self, _ctx: &mut C, _state: &mut Self::State, _event: &PointerEvent) {}

    fn on_end(&mut self, _ctx: &mut C, _state: Self::State, _event: &PointerEvent) {}

    /// Gesture interrupted (view torn down, new media). Behaves like a
    /// pointer-up at the last known position unless overridden.
    fn on_cancel(&mut self, ctx: &mut C, state: Self::State, last: &PointerEvent) {
        self.on_end(ctx, state, last);
    }
}

struct ActiveGesture<S> {
    state: S,
    last: PointerEvent,
    _listeners: ListenerGuard,
}

/// Drives one [`GestureHandler`] through idle → active → idle
pub struct GestureRouter<H, C>
where
    H: GestureHandler<C>,
{
    handler: H,
    registry: ListenerRegistry,
    active: Option<ActiveGesture<H::State>>,
    _ctx: PhantomData<fn(&mut C)>,
}

impl<H, C> GestureRouter<H, C>
where
    H: GestureHandler<C>,
{
    pub fn new(handler: H, registry: ListenerRegistry) -> Self {
        Self {
            handler,
            registry,
            active: None,
            _ctx: PhantomData,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Handle a pointer-down on this element. Returns whether a gesture is
    /// now active. A press while already active is ignored.
    pub fn pointer_down(&mut self, ctx: &mut C, event: &PointerEvent) -> Result<bool, GestureError> {
        if self.active.is_some() {
            trace!("pointer down ignored: gesture already active");
            return Ok(true);
        }

        match self.handler.on_start(ctx, event)? {
            StartDecision::Abort => Ok(false),
            StartDecision::ScrubNow(mut state) => {
                let listeners = self.registry.attach();
                self.handler.on_scrub(ctx, &mut state, event);
                self.active = Some(ActiveGesture {
                    state,
                    last: *event,
                    _listeners: listeners,
                });
                Ok(true)
            }
            StartDecision::Listen(state) => {
                self.active = Some(ActiveGesture {
                    state,
                    last: *event,
                    _listeners: self.registry.attach(),
                });
                Ok(true)
            }
        }
    }

    /// Global pointer-move. Returns whether this router consumed it.
    pub fn pointer_move(&mut self, ctx: &mut C, event: &PointerEvent) -> bool {
        match self.active.as_mut() {
            Some(active) => {
                active.last = *event;
                self.handler.on_scrub(ctx, &mut active.state, event);
                true
            }
            None => false,
        }
    }

    /// Global pointer-up. Listeners are released before `on_end` runs.
    pub fn pointer_up(&mut self, ctx: &mut C, event: &PointerEvent) -> bool {
        match self.active.take() {
            Some(ActiveGesture { state, .. }) => {
                self.handler.on_end(ctx, state, event);
                true
            }
            None => false,
        }
    }

    /// Abort an in-progress gesture as if the pointer was released
    pub fn cancel(&mut self, ctx: &mut C) -> bool {
        match self.active.take() {
            Some(ActiveGesture { state, last, .. }) => {
                self.handler.on_cancel(ctx, state, &last);
                true
            }
            None => false,
        }
    }
}
