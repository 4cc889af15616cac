//! FFprobe adapter for media file probing
//!
//! Reads duration and the first video stream's frame size.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -of json` output
pub fn parse_probe_json(json: &str) -> Result<ProbeResult, DomainError> {
    let output: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| DomainError::MediaUnavailable(format!("Unreadable ffprobe output: {}", e)))?;

    let duration = output
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| DomainError::MediaUnavailable("ffprobe reported no duration".to_string()))?;

    let frame_size = output
        .streams
        .iter()
        .find_map(|s| match (s.width, s.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        });

    Ok(ProbeResult {
        duration,
        frame_size,
    })
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: String,
}

impl FFprobeAdapter {
    pub fn new() -> Self {
        Self {
            program: "ffprobe".to_string(),
        }
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, DomainError> {
        let output = Command::new(&self.program)
            .args(["-v", "error"])
            .args(["-select_streams", "v:0"])
            .args(["-show_entries", "format=duration:stream=width,height"])
            .args(["-of", "json"])
            .arg(path)
            .output()
            .await
            .map_err(|e| DomainError::MediaUnavailable(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(DomainError::MediaUnavailable(format!(
                "{} failed for {}: {}",
                self.program,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let result = parse_probe_json(&String::from_utf8_lossy(&output.stdout))?;
        debug!(path = %path.display(), duration = result.duration, frame_size = ?result.frame_size, "probed");
        Ok(result)
    }
}
