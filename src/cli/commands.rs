//! Command implementations

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::adapters::TomlSettingsAdapter;
use crate::app::{AppContainer, ContainerOptions, DefaultAppContainer, EventScript, ExportReport};
use crate::cli::args::{ClipArgs, FrameArgs, OutputArgs, ReplayArgs};
use crate::cli::{Cli, Commands};
use crate::domain::errors::DomainError;
use crate::domain::model::{ClipRange, CropRect, MediaHandle, SaveAudio, Settings};
use crate::editor::keymap::render_shortcuts;
use crate::editor::EditorSnapshot;
use crate::error::ClipperError;
use crate::ports::{ConfigPort, ProbePort};
use crate::utils::time::{format_duration, TimeParser};

/// Dispatch a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        dry_run,
        ffmpeg,
        command,
        ..
    } = cli;

    if let Commands::Shortcuts = command {
        shortcuts();
        return Ok(());
    }

    // settings precedence: command line > environment > file > defaults
    let config_port = match config {
        Some(path) => TomlSettingsAdapter::new(path),
        None => TomlSettingsAdapter::at_default_location(),
    };
    let settings = config_port
        .load_settings()
        .await
        .with_context(|| format!("Failed to load settings from {}", config_port.settings_path().display()))?;
    debug!(?settings, "settings loaded");

    let options = |settings: Settings, output: OutputArgs| ContainerOptions {
        settings,
        settings_path: config_port.settings_path(),
        dry_run,
        quiet: false,
        ffmpeg: ffmpeg.clone(),
        output: output.output,
        output_dir: output.output_dir,
    };

    match command {
        Commands::Frame(args) => {
            let container = DefaultAppContainer::new(options(settings, args.output.clone()));
            frame(&container, args).await
        }
        Commands::Clip(mut args) => {
            let mut settings = settings;
            if let Some(audio) = args.audio.take() {
                settings.save_audio = SaveAudio::parse(&audio)?;
            }
            let container = DefaultAppContainer::new(options(settings, args.output.clone()));
            clip(&container, args).await
        }
        Commands::Replay(args) => {
            let container = DefaultAppContainer::new(ContainerOptions {
                quiet: args.json,
                ..options(settings, args.output.clone())
            });
            replay(&container, args).await
        }
        Commands::Shortcuts => {
            shortcuts();
            Ok(())
        }
    }
}

/// Execute the frame command
pub async fn frame(container: &dyn AppContainer, args: FrameArgs) -> Result<()> {
    info!(input = %args.input.display(), at = %args.at, "starting frame export");

    let time = TimeParser::parse_time(&args.at)?;
    let crop = parse_crop(args.crop.as_deref())?;
    let duration = resolve_duration(container.probe_port(), &args.input, args.duration).await?;
    if time > duration {
        return Err(anyhow!(
            "Frame time {} is past the end of the video ({})",
            format_duration(time),
            format_duration(duration)
        ));
    }

    let snapshot = EditorSnapshot {
        media: media_with_duration(&args.input, duration)?,
        duration,
        position: time,
        clip: ClipRange::full(),
        crop,
        muted: false,
    };
    let command = container
        .export_builder()
        .build_frame_export(snapshot)
        .await?
        .ok_or_else(|| anyhow!("No output location chosen"))?;

    let queue = container.export_queue();
    queue.enqueue(command);
    finish(queue.drain().await)
}

/// Execute the clip command
pub async fn clip(container: &dyn AppContainer, args: ClipArgs) -> Result<()> {
    info!(input = %args.input.display(), start = %args.start, end = %args.end, "starting clip export");

    let start = TimeParser::parse_time(&args.start)?;
    let end = TimeParser::parse_time(&args.end)?;
    if end < start {
        return Err(DomainError::InvalidTimeRange(format!(
            "end {} is before start {}",
            format_duration(end),
            format_duration(start)
        ))
        .into());
    }
    let crop = parse_crop(args.crop.as_deref())?;
    let duration = resolve_duration(container.probe_port(), &args.input, args.duration).await?;
    if end > duration {
        return Err(DomainError::InvalidTimeRange(format!(
            "end {} is past the end of the video ({})",
            format_duration(end),
            format_duration(duration)
        ))
        .into());
    }

    let snapshot = EditorSnapshot {
        media: media_with_duration(&args.input, duration)?,
        duration,
        position: start,
        clip: ClipRange::new(start / duration, end / duration),
        crop,
        muted: args.muted,
    };
    let command = container
        .export_builder()
        .build_clip_export(snapshot)
        .await?
        .ok_or_else(|| anyhow!("No output location chosen"))?;

    let queue = container.export_queue();
    queue.enqueue(command);
    finish(queue.drain().await)
}

/// Execute the replay command
pub async fn replay(container: &dyn AppContainer, args: ReplayArgs) -> Result<()> {
    info!(script = %args.script.display(), "starting replay");

    let script = EventScript::load(&args.script).await?;
    let report = container.replay_interactor().execute(script).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize replay report")?;
        println!("{}", json);
    } else {
        println!("video:    {}", report.video.display());
        println!("clip:     {}", report.clip);
        println!(
            "crop:     x={:.3} y={:.3} w={:.3} h={:.3}",
            report.crop.x, report.crop.y, report.crop.w, report.crop.h
        );
        println!("playhead: {}", report.overlay.time_label);
        println!("events:   {} ({} refused)", report.events_applied, report.refused_gestures);
        for export in &report.exports {
            print_report(export);
        }
    }

    let failed = report.exports.iter().filter(|r| !r.succeeded()).count();
    if failed > 0 {
        return Err(anyhow!("{} of {} exports failed", failed, report.exports.len()));
    }
    Ok(())
}

/// Print the shortcut table
pub fn shortcuts() {
    println!("{}", render_shortcuts());
}

fn parse_crop(value: Option<&str>) -> Result<CropRect> {
    let Some(value) = value else {
        return Ok(CropRect::full_frame());
    };
    CropRect::parse(value).map_err(|err| {
        let reason = match err {
            DomainError::BadArgs(reason) => reason,
            other => other.to_string(),
        };
        ClipperError::InvalidCrop {
            value: value.to_string(),
            reason,
        }
        .into()
    })
}

fn media_with_duration(path: &Path, duration: f64) -> Result<MediaHandle> {
    let mut media = MediaHandle::new(path)?;
    media.set_metadata(duration, None);
    Ok(media)
}

async fn resolve_duration(probe: Arc<dyn ProbePort>, input: &Path, given: Option<f64>) -> Result<f64> {
    let duration = match given {
        Some(duration) => duration,
        None => {
            let probed = probe
                .probe(input)
                .await
                .with_context(|| format!("Failed to probe {}", input.display()))?;
            debug!(duration = probed.duration, "duration probed");
            probed.duration
        }
    };
    if !duration.is_finite() || duration <= 0.0 {
        return Err(DomainError::MediaUnavailable(format!(
            "{} has no usable duration ({})",
            input.display(),
            duration
        ))
        .into());
    }
    Ok(duration)
}

fn print_report(report: &ExportReport) {
    match (&report.output, &report.error) {
        (Some(output), _) => println!("saved {} {}", report.command.kind(), output.display()),
        (None, Some(error)) => println!("failed {}: {}", report.command.kind(), error),
        (None, None) => {}
    }
}

fn finish(reports: Vec<ExportReport>) -> Result<()> {
    for report in &reports {
        print_report(report);
    }
    match reports.iter().find(|r| !r.succeeded()) {
        Some(failed) => Err(anyhow!(
            "Export failed: {}",
            failed.error.as_deref().unwrap_or("unknown error")
        )),
        None => Ok(()),
    }
}
