use std::sync::atomic::Ordering;
use std::sync::Arc;

use clipcrop_cli::adapters::{DryRunEncoder, PresetSaveDialog, SystemShell, TracingNotifier};
use clipcrop_cli::app::{ExportQueue, ExportRequestBuilder};
use clipcrop_cli::domain::model::{ClipRange, CropRect, ExportCommand, MediaHandle, SaveAudio};
use clipcrop_cli::editor::{
    EditorLayout, EditorSession, HitTarget, Key, KeyEvent, Modifiers, PointerButton, PointerEvent,
    SessionEffect, SessionOptions, SimulatedMedia,
};
use clipcrop_cli::editor::surface::Rect;
use clipcrop_cli::ports::EncoderJob;
use clipcrop_cli::utils::time::TimingCalibration;

/// Test helpers for driving a session
mod test_utils {
    use super::*;

    // track spans x in [0, 1000] at y = 600; video element 1000x500
    pub fn layout() -> EditorLayout {
        EditorLayout {
            track: Rect::new(0.0, 600.0, 1000.0, 40.0),
            video: Rect::new(0.0, 0.0, 1000.0, 500.0),
        }
    }

    pub fn loaded_session(backend: SimulatedMedia, duration: f64) -> EditorSession {
        let mut session = EditorSession::new(Box::new(backend), layout(), SessionOptions::default());
        session.mount();
        session.load(MediaHandle::new("/videos/beach.mp4").unwrap(), None);
        session.on_metadata(duration, Some((1000, 500)));
        session
    }

    pub fn drag(session: &mut EditorSession, target: HitTarget, from: f64, to: f64) {
        assert!(session.pointer_down(target, &PointerEvent::at(from, 620.0)).unwrap());
        session.pointer_move(&PointerEvent::at(to, 620.0));
        session.pointer_up(&PointerEvent::at(to, 620.0));
    }

    /// Small deterministic generator for operation sequences
    pub struct Lcg(u64);

    impl Lcg {
        pub fn new(seed: u64) -> Self {
            Self(seed)
        }

        pub fn next_f64(&mut self) -> f64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }
    }
}

use test_utils::*;

#[test]
fn test_press_before_metadata_attaches_nothing() {
    let backend = SimulatedMedia::new(0.0);
    let mut session = EditorSession::new(Box::new(backend), layout(), SessionOptions::default());
    session.mount();
    session.load(MediaHandle::new("/videos/beach.mp4").unwrap(), None);

    for target in [
        HitTarget::Timeline,
        HitTarget::StartMarker,
        HitTarget::EndMarker,
        HitTarget::ClipBody,
        HitTarget::VideoSurface,
    ] {
        assert!(session.pointer_down(target, &PointerEvent::at(100.0, 620.0)).is_err());
        assert_eq!(session.listener_count(), 0);
        assert_eq!(session.active_gesture(), None);
    }
    assert_eq!(session.state().playback.position(), 0.0);
}

#[test]
fn test_gesture_listeners_live_only_while_dragging() {
    let mut session = loaded_session(SimulatedMedia::new(20.0), 20.0);

    assert!(session.pointer_down(HitTarget::EndMarker, &PointerEvent::at(1000.0, 620.0)).unwrap());
    assert!(session.listener_count() > 0);
    session.pointer_move(&PointerEvent::at(600.0, 620.0));
    assert!(session.listener_count() > 0);
    session.pointer_up(&PointerEvent::at(600.0, 620.0));

    assert_eq!(session.listener_count(), 0);
    assert!((session.clip().end() - 0.6).abs() < 1e-9);
}

#[test]
fn test_teardown_mid_drag_releases_every_subscription() {
    let backend = SimulatedMedia::new(20.0);
    let gauge = backend.subscription_gauge();
    let mut session = loaded_session(backend, 20.0);
    assert!(gauge.load(Ordering::SeqCst) > 0);

    assert!(session.pointer_down(HitTarget::Timeline, &PointerEvent::at(500.0, 620.0)).unwrap());
    session.unmount();

    assert_eq!(session.listener_count(), 0);
    assert_eq!(session.active_gesture(), None);
    assert_eq!(gauge.load(Ordering::SeqCst), 0);

    // moves after teardown go nowhere
    assert!(!session.pointer_move(&PointerEvent::at(900.0, 620.0)));
    assert!((session.state().playback.position() - 10.0).abs() < 1e-9);
}

#[test]
fn test_time_update_fallback_drives_playhead() {
    let backend = SimulatedMedia::new(10.0).without_frame_callbacks();
    let gauge = backend.subscription_gauge();
    let mut session = loaded_session(backend, 10.0);
    assert_eq!(gauge.load(Ordering::SeqCst), 1);

    session.key(&KeyEvent::plain(Key::Space));
    session.poll(1.0);
    assert!((session.state().playback.position() - 1.0).abs() < 1e-9);
    assert!(!session.overlay().paused);
}

#[test]
fn test_clip_stays_ordered_under_random_drags() {
    let mut session = loaded_session(SimulatedMedia::new(30.0), 30.0);
    let mut rng = Lcg::new(7);

    for _ in 0..200 {
        let target = match (rng.next_f64() * 3.0) as u32 {
            0 => HitTarget::StartMarker,
            1 => HitTarget::EndMarker,
            _ => HitTarget::ClipBody,
        };
        let from = rng.next_f64() * 1200.0 - 100.0;
        let to = rng.next_f64() * 1200.0 - 100.0;
        drag(&mut session, target, from, to);

        let clip = session.clip();
        assert!(0.0 <= clip.start() && clip.start() <= clip.end() && clip.end() <= 1.0, "{}", clip);
        assert_eq!(session.listener_count(), 0);
    }
}

#[test]
fn test_crop_drag_then_escape_clears_it() {
    let mut session = loaded_session(SimulatedMedia::new(10.0), 10.0);

    assert!(session.pointer_down(HitTarget::VideoSurface, &PointerEvent::at(250.0, 125.0)).unwrap());
    session.pointer_move(&PointerEvent::at(750.0, 375.0));
    session.pointer_up(&PointerEvent::at(750.0, 375.0));
    assert_eq!(session.crop(), CropRect::new(0.25, 0.25, 0.5, 0.5));

    assert_eq!(session.key(&KeyEvent::plain(Key::Escape)), SessionEffect::None);
    assert_eq!(session.crop(), CropRect::full_frame());
}

#[test]
fn test_zoom_round_trip_keeps_track_in_place() {
    let mut session = loaded_session(SimulatedMedia::new(10.0), 10.0);
    session.pointer_down(HitTarget::Timeline, &PointerEvent::at(0.0, 620.0)).unwrap();
    session.pointer_up(&PointerEvent::at(0.0, 620.0));
    let before = session.overlay();

    let ctrl = |c| KeyEvent::new(Key::Char(c), Modifiers::ctrl());
    session.key(&ctrl('='));
    assert_eq!(session.overlay().zoom_label, "200%");
    session.key(&ctrl('-'));

    let after = session.overlay();
    assert_eq!(after.zoom_label, "100%");
    assert_eq!(after.playhead_x, before.playhead_x);
    assert_eq!(after.range_right_x, before.range_right_x);
}

#[tokio::test]
async fn test_two_saves_in_flight_stay_independent() {
    let mut session = loaded_session(SimulatedMedia::new(10.0), 10.0);
    let shift = Modifiers::shift();
    session
        .pointer_down(HitTarget::Timeline, &PointerEvent::at(250.0, 620.0).with_modifiers(shift))
        .unwrap();
    assert_eq!(
        session.key(&KeyEvent::new(Key::Char('s'), Modifiers::ctrl())),
        SessionEffect::ExportClip
    );
    let first = session.snapshot().unwrap();

    session
        .pointer_down(
            HitTarget::Timeline,
            &PointerEvent::at(500.0, 620.0)
                .with_button(PointerButton::Secondary)
                .with_modifiers(shift),
        )
        .unwrap();
    let second = session.snapshot().unwrap();

    let builder = ExportRequestBuilder::new(
        Arc::new(PresetSaveDialog::into_directory("/out")),
        Arc::new(TracingNotifier::new()),
        SaveAudio::Always,
    );
    let (a, b) = tokio::join!(builder.build_clip_export(first), builder.build_clip_export(second));
    let (a, b) = (a.unwrap().unwrap(), b.unwrap().unwrap());

    match (&a, &b) {
        (
            ExportCommand::Clip {
                start_seconds: s1,
                duration_seconds: d1,
                ..
            },
            ExportCommand::Clip {
                start_seconds: s2,
                duration_seconds: d2,
                ..
            },
        ) => {
            assert_eq!((*s1, *d1), (2.5, 7.5));
            assert_eq!((*s2, *d2), (2.5, 2.5));
        }
        other => panic!("expected two clip commands, got {:?}", other),
    }

    let encoder = Arc::new(DryRunEncoder::new());
    let queue = ExportQueue::new(
        encoder.clone(),
        Arc::new(SystemShell::new()),
        Arc::new(TracingNotifier::new()),
        TimingCalibration::default(),
        false,
    );
    queue.enqueue(a);
    queue.enqueue(b);
    let reports = queue.drain().await;
    assert_eq!(reports.len(), 2);

    let starts: Vec<String> = encoder
        .jobs()
        .into_iter()
        .map(|job| match job {
            EncoderJob::Clip(job) => job.start,
            other => panic!("unexpected job {:?}", other),
        })
        .collect();
    // 2.5s minus two frames at 60fps
    assert_eq!(starts, vec!["2466666us".to_string(), "2466666us".to_string()]);
}

#[test]
fn test_restored_range_survives_load() {
    let mut session = EditorSession::new(
        Box::new(SimulatedMedia::new(10.0)),
        layout(),
        SessionOptions::default(),
    );
    session.load(
        MediaHandle::new("/videos/beach.mp4").unwrap(),
        Some(ClipRange::new(0.5, 0.2)),
    );
    assert_eq!(session.clip(), ClipRange::new(0.2, 0.5));
}
