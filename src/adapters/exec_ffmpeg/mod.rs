//! FFmpeg execution adapter
//!
//! Runs `ffmpeg` as a child process for each export job.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::EncoderError;
use crate::ports::*;

/// Lines of encoder stderr kept in error messages
const STDERR_TAIL_LINES: usize = 20;

/// `-vf` argument for a normalized crop
fn crop_filter(crop: &CropArgs) -> String {
    format!(
        "crop=iw*{}:ih*{}:iw*{}:ih*{}",
        crop.w, crop.h, crop.x, crop.y
    )
}

/// Argument list for a still-frame job
pub fn frame_args(job: &FrameJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];
    args.push("-ss".into());
    args.push(job.time.clone().into());
    args.push("-i".into());
    args.push(job.input.clone().into());
    if let Some(crop) = &job.crop {
        args.push("-vf".into());
        args.push(crop_filter(crop).into());
    }
    args.push("-frames:v".into());
    args.push("1".into());
    args.push("-y".into());
    args.push(job.output.clone().into());
    args
}

/// Argument list for a clip job
pub fn clip_args(job: &ClipJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];
    args.push("-ss".into());
    args.push(job.start.clone().into());
    args.push("-i".into());
    args.push(job.input.clone().into());
    args.push("-t".into());
    args.push(job.duration.clone().into());
    if let Some(crop) = &job.crop {
        args.push("-vf".into());
        args.push(crop_filter(crop).into());
    }
    if !job.include_audio {
        args.push("-an".into());
    }
    args.push("-y".into());
    args.push(job.output.clone().into());
    args
}

/// Render a command line for logs
pub fn display_command(program: &str, args: &[OsString]) -> String {
    let mut line = program.to_string();
    for arg in args {
        let arg = arg.to_string_lossy();
        line.push(' ');
        if arg.contains(' ') {
            line.push('"');
            line.push_str(&arg);
            line.push('"');
        } else {
            line.push_str(&arg);
        }
    }
    line
}

/// FFmpeg-based encoder adapter
pub struct FFmpegAdapter {
    program: String,
}

impl FFmpegAdapter {
    /// Adapter using `ffmpeg` from `PATH`
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Adapter using a specific ffmpeg binary
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn execute(&self, args: Vec<OsString>, output: &Path) -> Result<PathBuf, EncoderError> {
        debug!(command = %display_command(&self.program, &args), "running encoder");

        let result = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| EncoderError::Launch {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            return Err(EncoderError::Failed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: tail,
            });
        }

        info!(output = %output.display(), "encoder finished");
        Ok(output.to_path_buf())
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EncoderPort for FFmpegAdapter {
    async fn extract_frame(&self, job: &FrameJob) -> Result<PathBuf, EncoderError> {
        self.execute(frame_args(job), &job.output).await
    }

    async fn extract_clip(&self, job: &ClipJob) -> Result<PathBuf, EncoderError> {
        if job.input == job.output {
            return Err(EncoderError::InvalidRequest(format!(
                "output would overwrite the source video {}",
                job.input.display()
            )));
        }
        self.execute(clip_args(job), &job.output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    fn clip_job() -> ClipJob {
        ClipJob {
            input: "in.mp4".into(),
            output: "out.mp4".into(),
            start: "1966666us".to_string(),
            duration: "3000000us".to_string(),
            crop: None,
            include_audio: true,
        }
    }

    #[test]
    fn test_clip_args_without_crop_keep_audio() {
        let args = strings(clip_args(&clip_job()));
        assert_eq!(
            &args[3..],
            &["-ss", "1966666us", "-i", "in.mp4", "-t", "3000000us", "-y", "out.mp4"]
        );
    }

    #[test]
    fn test_clip_args_with_crop_and_no_audio() {
        let mut job = clip_job();
        job.include_audio = false;
        job.crop = Some(CropArgs {
            x: "0.1".into(),
            y: "0.2".into(),
            w: "0.5".into(),
            h: "0.25".into(),
        });
        let args = strings(clip_args(&job));
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf + 1], "crop=iw*0.5:ih*0.25:iw*0.1:ih*0.2");
        assert!(args.contains(&"-an".to_string()));
    }

    #[test]
    fn test_frame_args_take_a_single_frame() {
        let job = FrameJob {
            input: "in.mp4".into(),
            output: "frame.png".into(),
            time: "0us".to_string(),
            crop: None,
        };
        let args = strings(frame_args(&job));
        assert!(args.windows(2).any(|w| w == ["-frames:v", "1"]));
        assert!(!args.contains(&"-t".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("frame.png"));
    }

    #[test]
    fn test_display_command_quotes_spaces() {
        let line = display_command("ffmpeg", &["-i".into(), "my video.mp4".into()]);
        assert_eq!(line, "ffmpeg -i \"my video.mp4\"");
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_launch_error() {
        let adapter = FFmpegAdapter::with_program("clipcrop-no-such-ffmpeg");
        let err = adapter.extract_clip(&clip_job()).await.unwrap_err();
        assert!(matches!(err, EncoderError::Launch { .. }));
    }
}
