//! Timecode arithmetic for host clip durations.
//!
//! Pure functions for converting a host `HH:MM:SS:FF` duration string plus a
//! frame rate into seconds and a total frame count. Deterministic, no side
//! effects.

use thiserror::Error;

/// Errors from duration parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimecodeError {
    /// The duration string is not four colon-separated integers.
    #[error("malformed timecode {input:?}: {reason}")]
    MalformedTimecode { input: String, reason: String },

    /// The frame rate is zero, negative, or not a number.
    #[error("frame rate must be positive, got {0}")]
    NonPositiveFrameRate(f64),
}

/// A clip duration resolved against its frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipDuration {
    /// Total duration in seconds.
    pub seconds: f64,
    /// Total number of timeline frames, `floor(frame_rate * seconds)`.
    pub total_frames: u64,
}

/// Parse a host duration string in `HH:MM:SS:FF` form.
///
/// `seconds = H*3600 + M*60 + S + F/frame_rate` and
/// `total_frames = floor(frame_rate * seconds)`.
///
/// # Examples
/// ```
/// use beatmark_core::timecode::parse_duration;
///
/// let dur = parse_duration("01:02:03:04", 25.0).unwrap();
/// assert_eq!(dur.total_frames, 93079);
/// ```
pub fn parse_duration(duration: &str, frame_rate: f64) -> Result<ClipDuration, TimecodeError> {
    if !(frame_rate > 0.0) {
        return Err(TimecodeError::NonPositiveFrameRate(frame_rate));
    }

    let fields: Vec<&str> = duration.split(':').collect();
    if fields.len() != 4 {
        return Err(TimecodeError::MalformedTimecode {
            input: duration.to_string(),
            reason: format!("expected 4 fields (HH:MM:SS:FF), got {}", fields.len()),
        });
    }

    let mut parsed = [0u64; 4];
    for (i, field) in fields.iter().enumerate() {
        parsed[i] = field
            .parse::<u64>()
            .map_err(|_| TimecodeError::MalformedTimecode {
                input: duration.to_string(),
                reason: format!("field {:?} is not a non-negative integer", field),
            })?;
    }

    let [hours, minutes, secs, frames] = parsed;
    let seconds =
        (hours * 3600 + minutes * 60 + secs) as f64 + frames as f64 / frame_rate;
    let total_frames = (frame_rate * seconds).floor() as u64;

    Ok(ClipDuration {
        seconds,
        total_frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_duration() {
        let dur = parse_duration("01:02:03:04", 25.0).unwrap();
        assert!((dur.seconds - 3723.16).abs() < 1e-9);
        assert_eq!(dur.total_frames, 93079);
    }

    #[test]
    fn parses_zero_duration() {
        let dur = parse_duration("00:00:00:00", 24.0).unwrap();
        assert_eq!(dur.seconds, 0.0);
        assert_eq!(dur.total_frames, 0);
    }

    #[test]
    fn fractional_frame_rates_floor_total_frames() {
        let dur = parse_duration("00:00:01:00", 23.976).unwrap();
        assert_eq!(dur.total_frames, 23);
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = parse_duration("1:2:3", 25.0).unwrap_err();
        assert!(matches!(err, TimecodeError::MalformedTimecode { .. }));
        assert!(err.to_string().contains("got 3"));
    }

    #[test]
    fn rejects_non_integer_field() {
        let err = parse_duration("aa:00:00:00", 25.0).unwrap_err();
        assert!(matches!(err, TimecodeError::MalformedTimecode { .. }));
        assert!(err.to_string().contains("aa"));
    }

    #[test]
    fn rejects_negative_field() {
        let err = parse_duration("00:-1:00:00", 25.0).unwrap_err();
        assert!(matches!(err, TimecodeError::MalformedTimecode { .. }));
    }

    #[test]
    fn rejects_non_positive_frame_rate() {
        assert_eq!(
            parse_duration("00:00:01:00", 0.0),
            Err(TimecodeError::NonPositiveFrameRate(0.0))
        );
        assert!(parse_duration("00:00:01:00", -25.0).is_err());
        assert!(parse_duration("00:00:01:00", f64::NAN).is_err());
    }
}
