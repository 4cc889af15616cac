//! Opens exported files with the desktop's default handler

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use crate::domain::errors::*;
use crate::ports::*;

/// Launches the platform opener (`xdg-open`, `open`, `explorer`)
#[derive(Debug, Clone)]
pub struct SystemShell {
    program: String,
}

impl SystemShell {
    pub fn new() -> Self {
        let program = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(windows) {
            "explorer"
        } else {
            "xdg-open"
        };
        Self::with_program(program)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShellPort for SystemShell {
    async fn open(&self, path: &Path) -> Result<(), DomainError> {
        // only waits for the opener itself, not the viewer it launches
        let status = Command::new(&self.program)
            .arg(path)
            .status()
            .await
            .map_err(|e| DomainError::InternalError(format!("Failed to run {}: {}", self.program, e)))?;
        // explorer exits with 1 even when it succeeds
        if status.success() || cfg!(windows) {
            Ok(())
        } else {
            Err(DomainError::InternalError(format!(
                "{} could not open {} ({})",
                self.program,
                path.display(),
                status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_opener_is_an_error() {
        let shell = SystemShell::with_program("clipcrop-no-such-opener");
        assert!(shell.open(Path::new("/tmp/x.mp4")).await.is_err());
    }
}
