// Adapters - External system implementations

pub mod cli_dialog;
pub mod dry_run;
pub mod exec_ffmpeg;
pub mod json_state;
pub mod probe_ffprobe;
pub mod shell_open;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use cli_dialog::PresetSaveDialog;
pub use dry_run::DryRunEncoder;
pub use exec_ffmpeg::FFmpegAdapter;
pub use json_state::JsonClipStateStore;
pub use probe_ffprobe::FFprobeAdapter;
pub use shell_open::SystemShell;
pub use toml_config::TomlSettingsAdapter;
pub use tracing_log::TracingNotifier;
