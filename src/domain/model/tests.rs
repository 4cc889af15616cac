// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;

    /// Small deterministic generator so the sequence tests are reproducible
    struct Lcg(u64);

    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }

        /// Values spread over [-0.5, 1.5] so clamping is exercised
        fn next_pos(&mut self) -> f64 {
            self.next_f64() * 2.0 - 0.5
        }
    }

    fn assert_valid(range: &ClipRange) {
        assert!(range.start() >= 0.0, "start below 0: {}", range);
        assert!(range.end() <= 1.0, "end above 1: {}", range);
        assert!(range.start() <= range.end(), "unordered: {}", range);
    }

    #[test]
    fn test_clip_range_default_is_full() {
        let range = ClipRange::default();
        assert_eq!(range.start(), 0.0);
        assert_eq!(range.end(), 1.0);
        assert_eq!(range.width(), 1.0);
    }

    #[test]
    fn test_clip_range_set_start_then_end_is_order_invariant() {
        let samples = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        for &a in &samples {
            for &b in &samples {
                let mut range = ClipRange::default();
                range.set_start(a);
                range.set_end(b);
                assert_eq!(range.start(), a.min(b), "a={} b={}", a, b);
                assert_eq!(range.end(), a.max(b), "a={} b={}", a, b);
            }
        }
    }

    #[test]
    fn test_clip_range_swap_reports_marker() {
        let mut range = ClipRange::new(0.2, 0.4);
        assert_eq!(range.set_start(0.6), Marker::End);
        assert_eq!(range.start(), 0.4);
        assert_eq!(range.end(), 0.6);

        assert_eq!(range.set_end(0.1), Marker::Start);
        assert_eq!(range.start(), 0.1);
        assert_eq!(range.end(), 0.4);
    }

    #[test]
    fn test_clip_range_clamps_inputs() {
        let mut range = ClipRange::default();
        range.set_start(-3.0);
        range.set_end(7.0);
        assert_eq!(range.start(), 0.0);
        assert_eq!(range.end(), 1.0);
        range.set_start(f64::NAN);
        assert_valid(&range);
    }

    #[test]
    fn test_clip_range_slide_preserves_width() {
        let mut range = ClipRange::new(0.2, 0.5);
        range.slide(0.3);
        assert!((range.start() - 0.5).abs() < 1e-12);
        assert!((range.end() - 0.8).abs() < 1e-12);

        range.slide(1.0);
        assert!((range.end() - 1.0).abs() < 1e-12);
        assert!((range.width() - 0.3).abs() < 1e-9);

        range.slide(-5.0);
        assert_eq!(range.start(), 0.0);
        assert!((range.width() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_clip_range_random_sequences_stay_in_bounds() {
        let mut rng = Lcg(0x5eed);
        for _ in 0..200 {
            let mut range = ClipRange::default();
            for _ in 0..50 {
                match (rng.next_f64() * 4.0) as u32 {
                    0 => {
                        range.set_start(rng.next_pos());
                    }
                    1 => {
                        range.set_end(rng.next_pos());
                    }
                    2 => range.slide(rng.next_pos() - 0.5),
                    _ => range = range.slid(rng.next_pos()),
                }
                assert_valid(&range);
            }
        }
    }

    #[test]
    fn test_clip_range_seconds() {
        let range = ClipRange::new(0.25, 0.75);
        assert_eq!(range.to_seconds(10.0), (2.5, 5.0));
        assert!(range.contains_seconds(5.0, 10.0));
        assert!(!range.contains_seconds(8.0, 10.0));
    }

    #[test]
    fn test_persisted_clip_round_trip_is_sanitized() {
        let state = PersistedClip {
            clip_start: 0.9,
            clip_end: 0.3,
        };
        let range: ClipRange = state.into();
        assert_eq!(range.start(), 0.3);
        assert_eq!(range.end(), 0.9);
    }

    #[test]
    fn test_crop_zero_movement_is_degenerate() {
        let drag = CropRect::begin_drag(0.4, 0.6);
        let rect = drag.update_drag(0.4, 0.6);
        assert_eq!(rect.w, 0.0);
        assert_eq!(rect.h, 0.0);
        assert!(rect.is_degenerate());
    }

    #[test]
    fn test_crop_drag_orders_corners_and_clamps() {
        let drag = CropRect::begin_drag(0.8, 0.9);
        let rect = drag.update_drag(-0.2, 0.3);
        assert_eq!(rect.x, 0.0);
        assert!((rect.y - 0.3).abs() < 1e-12);
        assert!((rect.w - 0.8).abs() < 1e-12);
        assert!((rect.h - 0.6).abs() < 1e-12);
        assert!(rect.x + rect.w <= 1.0);
        assert!(rect.y + rect.h <= 1.0);
    }

    #[test]
    fn test_crop_new_keeps_inside_unit_square() {
        let rect = CropRect::new(0.7, 0.5, 0.6, 2.0);
        assert!((rect.x + rect.w - 1.0).abs() < 1e-12);
        assert!((rect.y + rect.h - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_crop_clear_and_parse() {
        let mut rect = CropRect::parse("0.1, 0.2, 0.5, 0.5").unwrap();
        assert!(!rect.is_full_frame());
        rect.clear();
        assert!(rect.is_full_frame());

        assert!(CropRect::parse("0.1,0.2,0.5").is_err());
        assert!(CropRect::parse("0.1,0.2,0.5,1.5").is_err());
        assert!(CropRect::parse("a,b,c,d").is_err());
    }

    #[test]
    fn test_crop_parse_rejects_what_new_would_clamp() {
        assert!(CropRect::parse("0,0,0,0").is_err());
        assert!(CropRect::parse("0.2,0.2,0.5,0").is_err());
        assert!(CropRect::parse("0.5,0.5,0.8,0.8").is_err());
        assert!(CropRect::parse("0.5,0.1,0.2,0.95").is_err());

        let rect = CropRect::parse("0.7,0,0.3,1").unwrap();
        assert!((rect.x + rect.w - 1.0).abs() < 1e-12);
        assert!(!rect.is_degenerate());
    }

    #[test]
    fn test_media_handle_metadata() {
        let mut media = MediaHandle::new("/videos/holiday.mp4").unwrap();
        assert!(media.known_duration().is_err());
        media.set_metadata(12.5, Some((1920, 1080)));
        assert_eq!(media.known_duration().unwrap(), 12.5);
        assert_eq!(media.name_hint(), "holiday");

        media.set_metadata(f64::NAN, Some((0, 1080)));
        assert_eq!(media.duration, Some(12.5));
        assert_eq!(media.frame_size, None);

        assert!(MediaHandle::new("").is_err());
    }

    #[test]
    fn test_playback_state_labels() {
        let state = PlaybackState {
            position: 61.5,
            duration: 123.0,
            ..PlaybackState::default()
        };
        assert_eq!(state.time_label(), "01:01.500 / 02:03.000");
        assert!((state.progress() - 0.5).abs() < 1e-12);
        assert_eq!(PlaybackState::default().progress(), 0.0);
    }

    #[test]
    fn test_frame_rate_scales_only_the_export_correction() {
        let settings = Settings {
            frame_rate: 25.0,
            ..Settings::default()
        };
        assert!((settings.calibration().correction_seconds + 0.08).abs() < 1e-12);
        assert!((Settings::default().calibration().correction_seconds + 2.0 / 60.0).abs() < 1e-12);
        assert_eq!(crate::utils::time::FRAME, 1.0 / 60.0);
    }

    #[test]
    fn test_save_audio_parse() {
        assert_eq!(SaveAudio::parse("always").unwrap(), SaveAudio::Always);
        assert_eq!(SaveAudio::parse("Never").unwrap(), SaveAudio::Never);
        assert_eq!(SaveAudio::parse("editor").unwrap(), SaveAudio::FollowEditor);
        assert!(SaveAudio::parse("sometimes").is_err());
    }

    #[test]
    fn test_export_command_accessors() {
        let command = ExportCommand::Frame {
            input: "in.mp4".into(),
            output: "out.png".into(),
            time_seconds: 1.0,
            crop: CropRect::default(),
        };
        assert_eq!(command.kind(), "frame");
        assert_eq!(command.output(), std::path::Path::new("out.png"));
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], "frame");
    }
}
