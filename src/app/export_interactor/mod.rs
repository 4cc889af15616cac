// Export interactor - Turns an editor snapshot into an export command

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::domain::model::*;
use crate::domain::rules::*;
use crate::editor::{EditorSnapshot, SessionEffect};
use crate::error::{ClipperError, ClipperResult};
use crate::ports::*;

/// Which kind of export a save action asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Frame,
    Clip,
}

impl ExportKind {
    pub fn from_effect(effect: SessionEffect) -> Option<Self> {
        match effect {
            SessionEffect::ExportFrame => Some(Self::Frame),
            SessionEffect::ExportClip => Some(Self::Clip),
            SessionEffect::None => None,
        }
    }
}

/// Builds export commands, prompting for the output location.
///
/// Takes snapshots by value: the caller copies state out of the session
/// before awaiting, so two saves in flight never share data.
pub struct ExportRequestBuilder {
    dialog: Arc<dyn SaveDialogPort>,
    notify: Arc<dyn NotifyPort>,
    save_audio: SaveAudio,
}

impl ExportRequestBuilder {
    pub fn new(dialog: Arc<dyn SaveDialogPort>, notify: Arc<dyn NotifyPort>, save_audio: SaveAudio) -> Self {
        Self {
            dialog,
            notify,
            save_audio,
        }
    }

    /// Still frame at the playhead. `Ok(None)` when the prompt was cancelled.
    pub async fn build_frame_export(&self, snapshot: EditorSnapshot) -> ClipperResult<Option<ExportCommand>> {
        let time_seconds = snapshot.position;
        let hint = SaveNaming::frame_hint(&snapshot.media, time_seconds);
        let Some(output) = self
            .dialog
            .choose_save_location(&hint, SaveNaming::image_filters())
            .await
        else {
            debug!("frame export cancelled");
            return Ok(None);
        };

        Ok(Some(ExportCommand::Frame {
            input: snapshot.media.path,
            output,
            time_seconds,
            crop: snapshot.crop,
        }))
    }

    /// Trimmed clip of the current range. An empty range is refused before
    /// any prompt.
    pub async fn build_clip_export(&self, snapshot: EditorSnapshot) -> ClipperResult<Option<ExportCommand>> {
        if snapshot.clip.is_empty() {
            return Err(ClipperError::EmptyClip {
                at_seconds: snapshot.clip.start() * snapshot.duration,
            });
        }

        let (start_seconds, duration_seconds) = snapshot.clip.to_seconds(snapshot.duration);
        let include_audio = AudioPolicy::include_audio(self.save_audio, snapshot.muted);
        let hint = SaveNaming::clip_hint(&snapshot.media, start_seconds, duration_seconds);
        let Some(output) = self
            .dialog
            .choose_save_location(&hint, SaveNaming::video_filters())
            .await
        else {
            debug!("clip export cancelled");
            return Ok(None);
        };

        Ok(Some(ExportCommand::Clip {
            input: snapshot.media.path,
            output,
            start_seconds,
            duration_seconds,
            crop: snapshot.crop,
            include_audio,
        }))
    }

    /// Build either kind and deal with failures: internal errors are
    /// logged, user mistakes become warnings.
    pub async fn save(&self, snapshot: ClipperResult<EditorSnapshot>, kind: ExportKind) -> Option<ExportCommand> {
        let result = match snapshot {
            Ok(snapshot) => match kind {
                ExportKind::Frame => self.build_frame_export(snapshot).await,
                ExportKind::Clip => self.build_clip_export(snapshot).await,
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(Some(command)) => {
                info!(kind = command.kind(), output = %command.output().display(), "export requested");
                Some(command)
            }
            Ok(None) => None,
            Err(e) if e.is_internal() => {
                error!(error = %e, ?kind, "export request failed");
                None
            }
            Err(e) => {
                self.notify.warn("Nothing to save", &e.to_string()).await;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{PresetSaveDialog, TracingNotifier};
    use crate::adapters::tracing_log::NoticeLevel;

    fn snapshot(clip: ClipRange, muted: bool) -> EditorSnapshot {
        let mut media = MediaHandle::new("/videos/trip.mp4").unwrap();
        media.set_metadata(10.0, None);
        EditorSnapshot {
            media,
            duration: 10.0,
            position: 4.0,
            clip,
            crop: CropRect::full_frame(),
            muted,
        }
    }

    fn builder(dialog: PresetSaveDialog, save_audio: SaveAudio) -> (ExportRequestBuilder, Arc<TracingNotifier>) {
        let notify = Arc::new(TracingNotifier::new());
        let builder = ExportRequestBuilder::new(Arc::new(dialog), notify.clone(), save_audio);
        (builder, notify)
    }

    #[tokio::test]
    async fn test_clip_export_uses_range_and_audio_policy() {
        let (builder, _) = builder(PresetSaveDialog::into_directory("/out"), SaveAudio::FollowEditor);
        let command = builder
            .build_clip_export(snapshot(ClipRange::new(0.25, 0.75), true))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            ExportCommand::Clip {
                input: "/videos/trip.mp4".into(),
                output: "/out/trip_2.500s-7.500s.mp4".into(),
                start_seconds: 2.5,
                duration_seconds: 5.0,
                crop: CropRect::full_frame(),
                include_audio: false,
            }
        );
    }

    #[tokio::test]
    async fn test_frame_export_at_playhead() {
        let (builder, _) = builder(PresetSaveDialog::into_directory("/out"), SaveAudio::Always);
        let command = builder
            .build_frame_export(snapshot(ClipRange::full(), false))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(command.output(), std::path::Path::new("/out/trip_4.000s.png"));
        assert!(matches!(command, ExportCommand::Frame { time_seconds, .. } if time_seconds == 4.0));
    }

    #[tokio::test]
    async fn test_cancelled_prompt_builds_nothing() {
        let (builder, _) = builder(PresetSaveDialog::cancelling(), SaveAudio::Always);
        assert_eq!(builder.build_frame_export(snapshot(ClipRange::full(), false)).await.unwrap(), None);
        assert_eq!(builder.build_clip_export(snapshot(ClipRange::full(), false)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_clip_is_refused_and_warned() {
        let (builder, notify) = builder(PresetSaveDialog::into_directory("/out"), SaveAudio::Always);
        let err = builder
            .build_clip_export(snapshot(ClipRange::new(0.5, 0.5), false))
            .await
            .unwrap_err();
        assert!(matches!(err, ClipperError::EmptyClip { at_seconds } if at_seconds == 5.0));

        let saved = builder
            .save(Ok(snapshot(ClipRange::new(0.5, 0.5), false)), ExportKind::Clip)
            .await;
        assert_eq!(saved, None);
        assert_eq!(notify.notices()[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_precondition_is_logged_not_shown() {
        let (builder, notify) = builder(PresetSaveDialog::into_directory("/out"), SaveAudio::Always);
        let saved = builder
            .save(Err(ClipperError::precondition("no video loaded")), ExportKind::Frame)
            .await;
        assert_eq!(saved, None);
        assert!(notify.notices().is_empty());
    }
}
