//! Encoder stand-in that only reports what it would run

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

use crate::adapters::exec_ffmpeg::{clip_args, display_command, frame_args};
use crate::error::EncoderError;
use crate::ports::*;

/// Logs the ffmpeg command line for each job and records the job instead
/// of running it. The line is also echoed to stdout unless quiet.
#[derive(Debug, Default)]
pub struct DryRunEncoder {
    program: String,
    echo: bool,
    jobs: Mutex<Vec<EncoderJob>>,
    command_lines: Mutex<Vec<String>>,
}

impl DryRunEncoder {
    pub fn new() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            echo: true,
            ..Self::default()
        }
    }

    /// Keep stdout free for a machine-readable report
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Jobs received so far, in order
    pub fn jobs(&self) -> Vec<EncoderJob> {
        self.jobs.lock().map(|jobs| jobs.clone()).unwrap_or_default()
    }

    /// Command lines that would have been run
    pub fn command_lines(&self) -> Vec<String> {
        self.command_lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    fn record(&self, job: EncoderJob, line: String) {
        info!(command = %line, "dry run: encoder not started");
        if self.echo {
            println!("{}", line);
        }
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.push(job);
        }
        if let Ok(mut lines) = self.command_lines.lock() {
            lines.push(line);
        }
    }
}

#[async_trait]
impl EncoderPort for DryRunEncoder {
    async fn extract_frame(&self, job: &FrameJob) -> Result<PathBuf, EncoderError> {
        let line = display_command(&self.program, &frame_args(job));
        self.record(EncoderJob::Frame(job.clone()), line);
        Ok(job.output.clone())
    }

    async fn extract_clip(&self, job: &ClipJob) -> Result<PathBuf, EncoderError> {
        let line = display_command(&self.program, &clip_args(job));
        self.record(EncoderJob::Clip(job.clone()), line);
        Ok(job.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_records_without_running() {
        let encoder = DryRunEncoder::new();
        let job = FrameJob {
            input: "/videos/a.mp4".into(),
            output: "/tmp/a.png".into(),
            time: "500000us".to_string(),
            crop: None,
        };
        let written = encoder.extract_frame(&job).await.unwrap();
        assert_eq!(written, PathBuf::from("/tmp/a.png"));
        assert_eq!(encoder.jobs(), vec![EncoderJob::Frame(job)]);
        assert!(encoder.command_lines()[0].starts_with("ffmpeg -hide_banner"));
    }

    #[tokio::test]
    async fn test_quiet_dry_run_still_records_command_lines() {
        let encoder = DryRunEncoder::new().quiet();
        let job = ClipJob {
            input: "/videos/a.mp4".into(),
            output: "/tmp/a_clip.mp4".into(),
            start: "0us".to_string(),
            duration: "1000000us".to_string(),
            crop: None,
            include_audio: true,
        };
        encoder.extract_clip(&job).await.unwrap();
        assert_eq!(encoder.jobs(), vec![EncoderJob::Clip(job)]);
        assert!(encoder.command_lines()[0].contains("-t 1000000us"));
    }
}
