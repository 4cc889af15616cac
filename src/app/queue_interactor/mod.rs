// Queue interactor - Runs export commands one at a time

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

use crate::domain::model::ExportCommand;
use crate::ports::*;
use crate::utils::time::TimingCalibration;

/// Dialog title for encoder failures
pub const SAVE_ERROR_TITLE: &str = "Save error";

/// Body of the encoder failure dialog
pub fn save_error_message(error: &str) -> String {
    format!(
        "Failed to save file.\nThere may be more details in the log.\n\n{}",
        error
    )
}

/// A command waiting for the encoder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub id: u64,
    pub command: ExportCommand,
    pub enqueued_at: DateTime<Utc>,
}

/// What happened to one queue entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub id: u64,
    pub command: ExportCommand,
    pub enqueued_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

impl ExportReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// FIFO export queue.
///
/// Entries are processed strictly one at a time. Encoder failures end up
/// in a dialog and in the report; they never propagate to the caller.
pub struct ExportQueue {
    encoder: Arc<dyn EncoderPort>,
    shell: Arc<dyn ShellPort>,
    notify: Arc<dyn NotifyPort>,
    calibration: TimingCalibration,
    open_after_save: bool,
    pending: Mutex<VecDeque<QueueEntry>>,
    next_id: AtomicU64,
    worker: tokio::sync::Mutex<()>,
}

impl ExportQueue {
    pub fn new(
        encoder: Arc<dyn EncoderPort>,
        shell: Arc<dyn ShellPort>,
        notify: Arc<dyn NotifyPort>,
        calibration: TimingCalibration,
        open_after_save: bool,
    ) -> Self {
        Self {
            encoder,
            shell,
            notify,
            calibration,
            open_after_save,
            pending: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
            worker: tokio::sync::Mutex::new(()),
        }
    }

    /// Append a command; returns its queue id
    pub fn enqueue(&self, command: ExportCommand) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entry = QueueEntry {
            id,
            command,
            enqueued_at: Utc::now(),
        };
        info!(id, kind = entry.command.kind(), output = %entry.command.output().display(), "export queued");
        self.entries().push_back(entry);
        id
    }

    /// Commands not yet started
    pub fn pending(&self) -> Vec<QueueEntry> {
        self.entries().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pop(&self) -> Option<QueueEntry> {
        self.entries().pop_front()
    }

    // a panic elsewhere while holding the lock leaves the deque itself intact
    fn entries(&self) -> MutexGuard<'_, VecDeque<QueueEntry>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the oldest entry, if any
    pub async fn process_next(&self) -> Option<ExportReport> {
        let _worker = self.worker.lock().await;
        let entry = self.pop()?;

        let job = EncoderJob::from_command(&entry.command, &self.calibration);
        let result = self.encoder.run(&job).await;
        let finished_at = Utc::now();

        match result {
            Ok(path) => {
                info!(id = entry.id, output = %path.display(), "export saved");
                if self.open_after_save {
                    if let Err(e) = self.shell.open(&path).await {
                        warn!(id = entry.id, error = %e, "could not open export");
                        self.notify
                            .warn("Open failed", &format!("Saved {} but could not open it.\n\n{}", path.display(), e))
                            .await;
                    }
                }
                Some(ExportReport {
                    id: entry.id,
                    command: entry.command,
                    enqueued_at: entry.enqueued_at,
                    finished_at,
                    output: Some(path),
                    error: None,
                })
            }
            Err(e) => {
                error!(id = entry.id, error = %e, "export failed");
                self.notify
                    .error(SAVE_ERROR_TITLE, &save_error_message(&e.to_string()))
                    .await;
                Some(ExportReport {
                    id: entry.id,
                    command: entry.command,
                    enqueued_at: entry.enqueued_at,
                    finished_at,
                    output: None,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Process until the queue is empty
    pub async fn drain(&self) -> Vec<ExportReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.process_next().await {
            reports.push(report);
        }
        reports
    }
}
