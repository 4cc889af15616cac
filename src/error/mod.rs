//! Error handling module for ClipCrop

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for ClipCrop operations
#[derive(Error, Debug)]
pub enum ClipperError {
    /// Programmer/internal error: the editor was asked to do something its
    /// state cannot support (no media loaded, duration unknown).
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Invalid crop value
    #[error("Invalid crop '{value}': {reason}. Expected x,y,w,h inside the frame, each in [0,1]")]
    InvalidCrop { value: String, reason: String },

    /// Clip range has zero width
    #[error("Clip range is empty: start and end are both at {at_seconds:.3}s")]
    EmptyClip { at_seconds: f64 },

    /// Encoder process failed
    #[error("Encoder failed: {0}")]
    Encoder(#[from] EncoderError),

    /// Configuration could not be read or written
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Event script could not be parsed
    #[error("Invalid event script: {message}")]
    Script { message: String },

    /// Domain layer error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClipperError {
    /// Shorthand for a precondition violation
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Internal errors go to the log, not to user dialogs
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}

/// Errors raised by the external encoder collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncoderError {
    /// The encoder binary could not be started
    #[error("failed to launch {program}: {message}")]
    Launch { program: String, message: String },

    /// The encoder ran and exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The request could not be expressed as an encoder invocation
    #[error("invalid encoder request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for ClipCrop operations
pub type ClipperResult<T> = std::result::Result<T, ClipperError>;
