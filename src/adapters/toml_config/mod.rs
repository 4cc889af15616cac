// TOML config adapter - Settings persistence using TOML files

use crate::domain::errors::*;
use crate::domain::model::{Settings, SETTINGS_VERSION};
use crate::ports::*;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit settings file
pub const CONFIG_ENV_VAR: &str = "CLIPCROP_CONFIG";

/// Keys written by version 1 records and their current names
const RENAMED_KEYS: &[(&str, &str)] = &[
    ("openAfterSave", "open_after_save"),
    ("saveAudio", "save_audio"),
    ("videoFolders", "video_folders"),
];

/// Bring an older settings table up to the current version in place.
///
/// Version 1 stored booleans as `"true"`/`"false"` strings, used camelCase
/// keys and spelled the follow-editor audio policy `"editor"`.
pub fn migrate(table: &mut toml::Table) {
    let version = table
        .get("version")
        .and_then(|v| v.as_integer())
        .unwrap_or(1);
    if version >= SETTINGS_VERSION as i64 {
        return;
    }

    for (old, new) in RENAMED_KEYS {
        if let Some(value) = table.remove(*old) {
            table.entry(new.to_string()).or_insert(value);
        }
    }

    if let Some(value) = table.get_mut("open_after_save") {
        if let Some(text) = value.as_str() {
            *value = toml::Value::Boolean(text.eq_ignore_ascii_case("true"));
        }
    }

    if let Some(value) = table.get_mut("save_audio") {
        if value.as_str() == Some("editor") {
            *value = toml::Value::String("follow_editor".to_string());
        }
    }

    table.insert("version".to_string(), toml::Value::Integer(SETTINGS_VERSION as i64));
    debug!(from = version, to = SETTINGS_VERSION, "settings migrated");
}

/// Parse a settings file body, migrating as needed
pub fn parse_settings(content: &str) -> Result<Settings, DomainError> {
    let mut table: toml::Table = toml::from_str(content)
        .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML settings: {}", e)))?;
    migrate(&mut table);
    toml::Value::Table(table)
        .try_into()
        .map_err(|e| DomainError::BadArgs(format!("Invalid settings: {}", e)))
}

/// TOML settings adapter
pub struct TomlSettingsAdapter {
    path: PathBuf,
}

impl TomlSettingsAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Adapter at `$CLIPCROP_CONFIG` or the platform config directory
    pub fn at_default_location() -> Self {
        Self::new(Self::default_config_path())
    }

    /// Default settings path
    pub fn default_config_path() -> PathBuf {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(explicit);
        }
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("APPDATA").map(PathBuf::from))
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")));
        match base {
            Some(dir) => dir.join("clipcrop").join("settings.toml"),
            None => PathBuf::from("clipcrop_settings.toml"),
        }
    }
}

#[async_trait]
impl ConfigPort for TomlSettingsAdapter {
    async fn load_settings(&self) -> Result<Settings, DomainError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(DomainError::StorageFailed(format!(
                    "Failed to read settings file {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let settings = parse_settings(&content)?;
        info!(path = %self.path.display(), "settings loaded");
        Ok(settings)
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::StorageFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut settings = settings.clone();
        if settings.version != SETTINGS_VERSION {
            warn!(version = settings.version, "saving settings with current version");
            settings.version = SETTINGS_VERSION;
        }
        let content = toml::to_string_pretty(&settings)
            .map_err(|e| DomainError::InternalError(format!("Failed to serialize settings: {}", e)))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| DomainError::StorageFailed(format!("Failed to write settings file: {}", e)))?;
        Ok(())
    }

    fn settings_path(&self) -> PathBuf {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Font, SaveAudio, Theme};

    #[test]
    fn test_v1_record_is_migrated() {
        let v1 = r#"
            theme = "dark"
            font = "Boring"
            openAfterSave = "false"
            saveAudio = "editor"
            videoFolders = ["/home/me/Videos"]
        "#;
        let settings = parse_settings(v1).unwrap();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font, Font::Boring);
        assert!(!settings.open_after_save);
        assert_eq!(settings.save_audio, SaveAudio::FollowEditor);
        assert_eq!(settings.video_folders, vec![PathBuf::from("/home/me/Videos")]);
        assert_eq!(settings.timestamp_correction_frames, -2.0);
    }

    #[test]
    fn test_missing_and_unknown_fields() {
        let settings = parse_settings("version = 2\nfuture_option = 7\nsave_audio = \"never\"\n").unwrap();
        assert_eq!(settings.save_audio, SaveAudio::Never);
        assert!(settings.open_after_save);
        assert_eq!(settings.crop_threshold_px, 4.0);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        assert!(parse_settings("version = 2\ntheme = \"neon\"\n").is_err());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = TomlSettingsAdapter::new(dir.path().join("nested").join("settings.toml"));
        assert_eq!(adapter.load_settings().await.unwrap(), Settings::default());

        let settings = Settings {
            theme: Theme::Light,
            open_after_save: false,
            crop_threshold_px: 8.0,
            ..Settings::default()
        };
        adapter.save_settings(&settings).await.unwrap();
        assert_eq!(adapter.load_settings().await.unwrap(), settings);
    }
}
