//! Beat sample-frame to timeline-frame projection.
//!
//! Pure mapping from audio sample indices at the audio's native sample rate
//! to timeline frame indices at the clip's frame rate, clipped to the clip's
//! frame range. Deterministic, no side effects.

/// Project beat sample frames onto timeline frames.
///
/// Each beat sample frame becomes a time offset `t = beat_frame / sample_rate`
/// and then a timeline frame `f = round(t * frame_rate)`. Ties round half
/// away from zero (the behavior of [`f64::round`]).
///
/// Frames at or beyond `total_frames` are dropped, never clamped to the
/// boundary; negative results cannot occur for non-negative inputs but are
/// dropped as well. Input order is preserved. Two beats can round to the same
/// frame; duplicates are kept here and de-duplicated by the caller before any
/// host mutation.
pub fn project(
    beat_frames: &[u64],
    sample_rate: u32,
    frame_rate: f64,
    total_frames: u64,
) -> Vec<u64> {
    beat_frames
        .iter()
        .filter_map(|&beat_frame| {
            let secs = beat_frame as f64 / sample_rate as f64;
            let frame = (secs * frame_rate).round();
            if frame < 0.0 || frame >= total_frames as f64 {
                None
            } else {
                Some(frame as u64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_exact_rounded_value() {
        // 22050 samples at 44.1kHz = 0.5s; at 24 fps that is frame 12.
        assert_eq!(project(&[22050], 44100, 24.0, u64::MAX), vec![12]);
        // 0.3s at 25 fps = 7.5, ties round away from zero -> 8.
        let sr = 1000;
        assert_eq!(project(&[300], sr, 25.0, u64::MAX), vec![8]);
    }

    #[test]
    fn projection_is_monotonic() {
        let sr = 44100;
        let fps = 23.976;
        let inputs: Vec<u64> = (0..500).map(|i| i * 997).collect();
        let projected = project(&inputs, sr, fps, u64::MAX);
        assert_eq!(projected.len(), inputs.len());
        for pair in projected.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn drops_frames_at_or_beyond_total() {
        let sr = 100;
        // 1000 samples = 10s = frame 100 at 10 fps.
        let projected = project(&[0, 500, 1000, 1500], sr, 10.0, 100);
        assert_eq!(projected, vec![0, 50]);
    }

    #[test]
    fn boundary_frame_is_dropped_not_clamped() {
        // Exactly total_frames must disappear from the output.
        let projected = project(&[100], 100, 10.0, 10);
        assert!(projected.is_empty());
    }

    #[test]
    fn keeps_duplicates_and_order() {
        // 98 and 102 samples at sr=100 both round to frame 10 at 10 fps.
        let projected = project(&[98, 102, 200], 100, 10.0, 1000);
        assert_eq!(projected, vec![10, 10, 20]);
    }

    #[test]
    fn output_never_longer_than_input() {
        let inputs: Vec<u64> = (0..100).map(|i| i * 44100).collect();
        let projected = project(&inputs, 44100, 25.0, 50);
        assert!(projected.len() <= inputs.len());
    }
}
