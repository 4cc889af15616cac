// Tracing notify adapter - User messages surfaced through the log

use crate::ports::*;
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{error, warn};

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warning,
}

/// A message that would have been shown in a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// Reports dialogs as tracing events and keeps them for later inspection
#[derive(Debug, Default)]
pub struct TracingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl TracingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages reported so far
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    fn push(&self, level: NoticeLevel, title: &str, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                level,
                title: title.to_string(),
                message: message.to_string(),
            });
        }
    }
}

#[async_trait]
impl NotifyPort for TracingNotifier {
    async fn error(&self, title: &str, message: &str) {
        error!(title, "{}", message);
        self.push(NoticeLevel::Error, title, message);
    }

    async fn warn(&self, title: &str, message: &str) {
        warn!(title, "{}", message);
        self.push(NoticeLevel::Warning, title, message);
    }
}
