//! ClipCrop Library
//!
//! Editor core for trimming and cropping a video (clip range, crop
//! rectangle, playback, pointer gestures, zoomable timeline) plus the
//! export pipeline that turns a save action into an ffmpeg invocation.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod editor;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{ClipRange, CropRect, ExportCommand, MediaHandle, Settings};
pub use editor::{EditorSession, EditorSnapshot};
pub use error::{ClipperError, ClipperResult, EncoderError};
