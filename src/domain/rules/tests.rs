// Unit tests for editor rules

#[cfg(test)]
mod tests {
    use crate::domain::model::*;
    use crate::domain::rules::*;
    use crate::utils::time::FRAME;

    const DURATION: f64 = 10.0;

    #[test]
    fn test_seek_past_end_near_end_wraps_to_zero() {
        let current = DURATION - FRAME;
        let to = DURATION + 10.0 * FRAME;
        assert_eq!(SeekRules::resolve(current, to, DURATION, true), 0.0);
    }

    #[test]
    fn test_seek_before_zero_near_zero_wraps_to_end() {
        let to = -10.0 * FRAME;
        assert_eq!(
            SeekRules::resolve(FRAME, to, DURATION, true),
            DURATION - FRAME
        );
    }

    #[test]
    fn test_seek_far_from_boundary_clamps() {
        assert_eq!(SeekRules::resolve(5.0, 50.0, DURATION, true), DURATION - FRAME);
        assert_eq!(SeekRules::resolve(5.0, -50.0, DURATION, true), 0.0);
    }

    #[test]
    fn test_seek_without_loop_never_wraps() {
        assert_eq!(
            SeekRules::resolve(DURATION - FRAME, DURATION + 1.0, DURATION, false),
            DURATION - FRAME
        );
        assert_eq!(SeekRules::resolve(0.0, -1.0, DURATION, false), 0.0);
    }

    #[test]
    fn test_seek_interior_values_are_untouched() {
        let mut to = 0.0;
        while to < DURATION - FRAME {
            let current = if to < 5.0 { 0.0 } else { DURATION - FRAME };
            assert_eq!(SeekRules::resolve(current, to, DURATION, true), to);
            to += 0.37;
        }
    }

    #[test]
    fn test_seek_unknown_duration_stays_at_zero() {
        assert_eq!(SeekRules::resolve(3.0, 5.0, 0.0, true), 0.0);
    }

    #[test]
    fn test_seek_step_amounts() {
        assert_eq!(SeekStep::Extreme.amount(DURATION), f64::INFINITY);
        assert!((SeekStep::Large.amount(DURATION) - 1.0).abs() < 1e-12);
        assert!((SeekStep::Medium.amount(DURATION) - 0.5).abs() < 1e-12);
        assert!((SeekStep::Small.amount(DURATION) - 0.1).abs() < 1e-12);
        assert_eq!(SeekStep::Frame.amount(DURATION), FRAME);
    }

    #[test]
    fn test_preview_loop_target() {
        let range = ClipRange::new(0.2, 0.5);
        assert_eq!(PreviewRules::loop_target(3.0, &range, DURATION), None);
        assert_eq!(
            PreviewRules::loop_target(5.5, &range, DURATION),
            Some(2.0 + FRAME)
        );
        assert_eq!(
            PreviewRules::loop_target(1.0, &range, DURATION),
            Some(2.0 + FRAME)
        );
    }

    #[test]
    fn test_preview_loop_start_inside_empty_range() {
        let range = ClipRange::new(0.3, 0.3);
        assert_eq!(
            PreviewRules::loop_start(&range, DURATION),
            range.start() * DURATION
        );
    }

    #[test]
    fn test_audio_policy() {
        assert!(AudioPolicy::include_audio(SaveAudio::Always, true));
        assert!(!AudioPolicy::include_audio(SaveAudio::Never, false));
        assert!(AudioPolicy::include_audio(SaveAudio::FollowEditor, false));
        assert!(!AudioPolicy::include_audio(SaveAudio::FollowEditor, true));
    }

    #[test]
    fn test_save_naming() {
        let media = MediaHandle::new("/tmp/cat.mov").unwrap();
        assert_eq!(SaveNaming::frame_hint(&media, 1.5), "cat_1.500s.png");
        assert_eq!(SaveNaming::clip_hint(&media, 1.0, 2.5), "cat_1.000s-3.500s.mp4");
        assert_eq!(SaveNaming::image_filters()[0].extensions, &["png"]);
        assert!(SaveNaming::video_filters()
            .iter()
            .any(|f| f.name == "WebM Video"));
    }
}
