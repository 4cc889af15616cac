//! Interactive trim/crop editor core
//!
//! Synchronous and single-owner: an [`session::EditorSession`] is driven by
//! `&mut` calls from whatever loop feeds it input and clock ticks.

pub mod gesture;
pub mod handlers;
pub mod input;
pub mod keymap;
pub mod playback;
pub mod session;
pub mod state;
pub mod surface;
pub mod track;

pub use gesture::{GestureError, ListenerRegistry};
pub use input::{Key, KeyEvent, Modifiers, PointerButton, PointerEvent, WheelEvent};
pub use keymap::EditorAction;
pub use playback::{MediaBackend, SimulatedMedia};
pub use session::{EditorLayout, EditorSession, EditorSnapshot, HitTarget, Overlay, SessionEffect, SessionOptions};
