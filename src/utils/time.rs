//! Time parsing, formatting and coordinate utilities

use crate::error::{ClipperError, ClipperResult};

/// Frame rate assumed by the editor for stepping and loop detection
pub const FRAMES_PER_SECOND: f64 = 60.0;

/// Duration of one assumed frame in seconds
pub const FRAME: f64 = 1.0 / FRAMES_PER_SECOND;

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Clamp `value` into `[min, max]` (inclusive)
pub fn clamp(min: f64, value: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Calibration applied when converting editor time to encoder timestamps.
///
/// The encoder's output lags the requested input timestamp by roughly two
/// frames, so timestamps are shifted back by `correction_seconds` before
/// they are sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingCalibration {
    pub correction_seconds: f64,
}

impl TimingCalibration {
    /// Calibration shifting timestamps by a whole number of frames
    pub fn from_frames(frames: f64) -> Self {
        Self {
            correction_seconds: frames * FRAME,
        }
    }

    /// No correction at all
    pub fn none() -> Self {
        Self {
            correction_seconds: 0.0,
        }
    }

    /// Convert seconds to whole microseconds with the correction applied
    pub fn to_microseconds(&self, seconds: f64) -> i64 {
        to_microseconds(seconds, self.correction_seconds)
    }
}

impl Default for TimingCalibration {
    fn default() -> Self {
        Self::from_frames(-2.0)
    }
}

/// `floor((seconds + correction) * 1e6)`, never negative
pub fn to_microseconds(seconds: f64, correction: f64) -> i64 {
    let micros = ((seconds + correction) * MICROS_PER_SECOND).floor();
    if micros.is_nan() || micros < 0.0 {
        0
    } else {
        micros as i64
    }
}

/// Uncorrected conversion, used for durations
pub fn duration_to_microseconds(seconds: f64) -> i64 {
    to_microseconds(seconds, 0.0)
}

/// Encoder wire format for a timestamp, e.g. `"1500000us"`
pub fn format_wire_micros(micros: i64) -> String {
    format!("{}us", micros)
}

/// Format seconds as `H:MM:SS.mmm`, dropping the hour when it is zero
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    // work in whole milliseconds so 59.9999 never renders as "59.1000"
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, minutes, secs, ms)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, ms)
    }
}

/// Parser for user supplied times (`SS.ms`, `MM:SS.ms`, `HH:MM:SS.ms`)
pub struct TimeParser;

impl TimeParser {
    /// Parse time string to seconds
    pub fn parse_time(time_str: &str) -> ClipperResult<f64> {
        let trimmed = time_str.trim();
        let invalid = || ClipperError::InvalidTimeFormat {
            time: trimmed.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid());
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }

        let mut total = 0.0;
        for (idx, part) in parts.iter().enumerate() {
            let is_last = idx == parts.len() - 1;
            let value: f64 = part.parse().map_err(|_| invalid())?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid());
            }
            if !is_last && value.fract() != 0.0 {
                return Err(invalid());
            }
            // every component after the first is base-60
            if idx > 0 && value >= 60.0 {
                return Err(invalid());
            }
            total = total * 60.0 + value;
        }

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00.000");
        assert_eq!(format_duration(3661.5), "1:01:01.500");
        assert_eq!(format_duration(59.9999), "01:00.000");
        assert_eq!(format_duration(75.25), "01:15.250");
        assert_eq!(format_duration(-3.0), "00:00.000");
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(0.0, -1.0, 1.0), 0.0);
        assert_eq!(clamp(0.0, 2.0, 1.0), 1.0);
        assert_eq!(clamp(0.0, 0.5, 1.0), 0.5);
    }

    #[test]
    fn test_to_microseconds_is_monotonic_integer() {
        let calibration = TimingCalibration::default();
        let mut last = i64::MIN;
        let mut t = 0.0;
        while t < 5.0 {
            let us = calibration.to_microseconds(t);
            assert!(us >= last, "{} produced {} after {}", t, us, last);
            last = us;
            t += 0.0137;
        }
    }

    #[test]
    fn test_to_microseconds_applies_correction() {
        assert_eq!(to_microseconds(1.5, 0.0), 1_500_000);
        assert_eq!(to_microseconds(1.0, -0.25), 750_000);
        assert_eq!(to_microseconds(0.01, -1.0), 0);
        assert_eq!(TimingCalibration::none().to_microseconds(2.0), 2_000_000);
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(format_wire_micros(1_500_000), "1500000us");
    }

    #[test]
    fn test_time_parser() {
        assert_eq!(TimeParser::parse_time("90.5").unwrap(), 90.5);
        assert_eq!(TimeParser::parse_time("01:30.5").unwrap(), 90.5);
        assert_eq!(TimeParser::parse_time("1:02:03.5").unwrap(), 3723.5);
        assert!(TimeParser::parse_time("").is_err());
        assert!(TimeParser::parse_time("00:60").is_err());
        assert!(TimeParser::parse_time("-3").is_err());
        assert!(TimeParser::parse_time("abc").is_err());
    }
}
