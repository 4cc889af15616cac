//! JSON file store for per-video clip ranges

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::{ClipRange, PersistedClip};
use crate::ports::*;

type StateMap = BTreeMap<String, PersistedClip>;

/// Keeps every video's `{clip_start, clip_end}` in one JSON object keyed
/// by the video path
pub struct JsonClipStateStore {
    file: PathBuf,
    // serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonClipStateStore {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store next to the settings file
    pub fn beside(settings_path: &Path) -> Self {
        let dir = settings_path.parent().unwrap_or_else(|| Path::new("."));
        Self::new(dir.join("clips.json"))
    }

    fn key(video: &Path) -> String {
        video.to_string_lossy().into_owned()
    }

    async fn read_all(&self) -> Result<StateMap, DomainError> {
        match tokio::fs::read_to_string(&self.file).await {
            Ok(content) if content.trim().is_empty() => Ok(StateMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                DomainError::StorageFailed(format!("Corrupt clip state {}: {}", self.file.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StateMap::new()),
            Err(e) => Err(DomainError::StorageFailed(format!(
                "Failed to read clip state {}: {}",
                self.file.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl ClipStateStore for JsonClipStateStore {
    async fn load(&self, video: &Path) -> Result<Option<ClipRange>, DomainError> {
        let _guard = self.lock.lock().await;
        let all = self.read_all().await?;
        Ok(all.get(&Self::key(video)).copied().map(ClipRange::from))
    }

    async fn save(&self, video: &Path, range: ClipRange) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut all = self.read_all().await?;
        all.insert(Self::key(video), PersistedClip::from(range));

        if let Some(parent) = self.file.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::StorageFailed(format!("Failed to create state directory: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(&all)
            .map_err(|e| DomainError::InternalError(format!("Failed to serialize clip state: {}", e)))?;
        tokio::fs::write(&self.file, json)
            .await
            .map_err(|e| DomainError::StorageFailed(format!("Failed to write clip state: {}", e)))?;
        debug!(video = %video.display(), range = %range, "clip range saved");
        Ok(())
    }
}
