//! Non-interactive save location chooser for the command line

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::rules::FileFilter;
use crate::ports::*;

/// Answers save prompts from command-line options instead of asking.
///
/// An explicit output path wins; otherwise the suggested name is placed in
/// the output directory. With neither, every prompt counts as cancelled.
#[derive(Debug, Clone, Default)]
pub struct PresetSaveDialog {
    output: Option<PathBuf>,
    directory: Option<PathBuf>,
}

impl PresetSaveDialog {
    /// Always answer with this exact path
    pub fn to_file(output: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(output.into()),
            directory: None,
        }
    }

    /// Accept each suggested name inside `directory`
    pub fn into_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            output: None,
            directory: Some(directory.into()),
        }
    }

    /// Cancel every prompt
    pub fn cancelling() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaveDialogPort for PresetSaveDialog {
    async fn choose_save_location(&self, hint: &str, filters: &[FileFilter]) -> Option<PathBuf> {
        let choice = match (&self.output, &self.directory) {
            (Some(output), _) => Some(output.clone()),
            (None, Some(dir)) => Some(dir.join(hint)),
            (None, None) => None,
        };
        debug!(
            hint,
            filters = filters.len(),
            choice = ?choice.as_ref().map(|p| p.display().to_string()),
            "save location"
        );
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::SaveNaming;

    #[tokio::test]
    async fn test_choices() {
        let filters = SaveNaming::video_filters();
        assert_eq!(
            PresetSaveDialog::to_file("/out/x.mp4")
                .choose_save_location("a.mp4", filters)
                .await,
            Some(PathBuf::from("/out/x.mp4"))
        );
        assert_eq!(
            PresetSaveDialog::into_directory("/out")
                .choose_save_location("a.mp4", filters)
                .await,
            Some(PathBuf::from("/out/a.mp4"))
        );
        assert_eq!(
            PresetSaveDialog::cancelling()
                .choose_save_location("a.mp4", filters)
                .await,
            None
        );
    }
}
