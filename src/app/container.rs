use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::{
    DryRunEncoder, FFmpegAdapter, FFprobeAdapter, JsonClipStateStore, PresetSaveDialog,
    SystemShell, TracingNotifier,
};
use crate::app::{
    export_interactor::ExportRequestBuilder, queue_interactor::ExportQueue,
    replay_interactor::ReplayInteractor,
};
use crate::domain::model::Settings;
use crate::editor::SessionOptions;
use crate::ports::{
    ClipStateStore, EncoderPort, NotifyPort, ProbePort, SaveDialogPort, ShellPort,
};

pub trait AppContainer: Send + Sync {
    fn export_builder(&self) -> Arc<ExportRequestBuilder>;
    fn export_queue(&self) -> Arc<ExportQueue>;
    fn replay_interactor(&self) -> Arc<ReplayInteractor>;
    fn probe_port(&self) -> Arc<dyn ProbePort>;
}

/// How the command line wants the adapters wired
#[derive(Debug, Clone, Default)]
pub struct ContainerOptions {
    pub settings: Settings,
    /// Where the settings file lives; the clip state store sits beside it
    pub settings_path: PathBuf,
    /// Log encoder command lines instead of running them
    pub dry_run: bool,
    /// stdout carries a machine-readable report; nothing else may print there
    pub quiet: bool,
    pub ffmpeg: Option<String>,
    /// Exact output path for every export
    pub output: Option<PathBuf>,
    /// Directory for suggested file names
    pub output_dir: Option<PathBuf>,
}

pub struct DefaultAppContainer {
    export_builder: Arc<ExportRequestBuilder>,
    export_queue: Arc<ExportQueue>,
    replay_interactor: Arc<ReplayInteractor>,
    probe_port: Arc<dyn ProbePort>,
}

impl DefaultAppContainer {
    pub fn new(options: ContainerOptions) -> Self {
        let settings = &options.settings;

        let encoder_port: Arc<dyn EncoderPort> = if options.dry_run {
            let encoder = DryRunEncoder::new();
            Arc::new(if options.quiet { encoder.quiet() } else { encoder })
        } else {
            match &options.ffmpeg {
                Some(program) => Arc::new(FFmpegAdapter::with_program(program.clone())),
                None => Arc::new(FFmpegAdapter::new()),
            }
        };
        let dialog_port: Arc<dyn SaveDialogPort> = match (&options.output, &options.output_dir) {
            (Some(output), _) => Arc::new(PresetSaveDialog::to_file(output.clone())),
            (None, Some(dir)) => Arc::new(PresetSaveDialog::into_directory(dir.clone())),
            (None, None) => Arc::new(PresetSaveDialog::into_directory(".")),
        };
        let probe_port: Arc<dyn ProbePort> = Arc::new(FFprobeAdapter::new());
        let state_store: Arc<dyn ClipStateStore> =
            Arc::new(JsonClipStateStore::beside(&options.settings_path));
        let shell_port: Arc<dyn ShellPort> = Arc::new(SystemShell::new());
        let notify_port: Arc<dyn NotifyPort> = Arc::new(TracingNotifier::new());

        // a dry run never opens what it did not write
        let open_after_save = settings.open_after_save && !options.dry_run;
        debug!(dry_run = options.dry_run, open_after_save, "wiring adapters");

        let export_builder = Arc::new(ExportRequestBuilder::new(
            Arc::clone(&dialog_port),
            Arc::clone(&notify_port),
            settings.save_audio,
        ));

        let export_queue = Arc::new(ExportQueue::new(
            Arc::clone(&encoder_port),
            Arc::clone(&shell_port),
            Arc::clone(&notify_port),
            settings.calibration(),
            open_after_save,
        ));

        let replay_interactor = Arc::new(ReplayInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&state_store),
            Arc::clone(&export_builder),
            Arc::clone(&export_queue),
            SessionOptions {
                crop_threshold_px: settings.crop_threshold_px,
            },
        ));

        Self {
            export_builder,
            export_queue,
            replay_interactor,
            probe_port,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn export_builder(&self) -> Arc<ExportRequestBuilder> {
        Arc::clone(&self.export_builder)
    }

    fn export_queue(&self) -> Arc<ExportQueue> {
        Arc::clone(&self.export_queue)
    }

    fn replay_interactor(&self) -> Arc<ReplayInteractor> {
        Arc::clone(&self.replay_interactor)
    }

    fn probe_port(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe_port)
    }
}
