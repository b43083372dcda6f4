//! Beat estimation backed by the external `beat-detector` crate.
//!
//! The detector consumes chunked mono audio and emits beat events; this
//! module collects those events as absolute sample indices, derives a tempo
//! from the inter-beat intervals, and quantizes beat positions to the
//! analysis hop grid. The detector's internal signal processing (envelope
//! tracking, lowpass filtering) is its own responsibility.

use beat_detector::BeatDetector;

use crate::analysis::types::{AnalysisParams, AudioData, TempoValue};

/// Chunk size fed to the detector per update. Roughly 46ms at 44.1kHz,
/// matching the windowing the detector is designed around.
const DETECTOR_CHUNK: usize = 2048;

/// Run the external detector over the full audio and collect beat positions
/// as absolute sample indices.
///
/// The detector reports at most one beat per update, so the audio is fed in
/// fixed-size chunks; a beat spanning a chunk boundary is picked up by the
/// following update.
pub fn detect_beats(audio: &AudioData) -> Vec<u64> {
    let mut detector = BeatDetector::new(audio.sample_rate as f32, true);

    audio
        .samples
        .chunks(DETECTOR_CHUNK)
        .filter_map(|chunk| {
            detector
                .update_and_detect_beat(chunk.iter().copied())
                .map(|info| info.max.total_index as u64)
        })
        .collect()
}

/// Derive a tempo estimate from beat sample positions.
///
/// Uses the median inter-beat interval; intervals whose implied tempo
/// deviates from the median by more than `10 / tightness` (relative) are
/// excluded, and the mean of the remainder is reported. With fewer than two
/// beats there is nothing to measure and the `start_bpm` prior is returned.
pub fn estimate_tempo(beat_samples: &[u64], sample_rate: u32, params: &AnalysisParams) -> TempoValue {
    let bpms: Vec<f64> = beat_samples
        .windows(2)
        .filter(|w| w[1] > w[0])
        .map(|w| 60.0 * sample_rate as f64 / (w[1] - w[0]) as f64)
        .collect();

    if bpms.is_empty() {
        return TempoValue::Scalar(params.start_bpm);
    }

    let mut sorted = bpms.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = sorted[sorted.len() / 2];

    let tolerance = median * (10.0 / params.tightness.max(1.0));
    let accepted: Vec<f64> = bpms
        .iter()
        .copied()
        .filter(|bpm| (bpm - median).abs() <= tolerance)
        .collect();

    if accepted.is_empty() {
        return TempoValue::Scalar(median);
    }

    let mean = accepted.iter().sum::<f64>() / accepted.len() as f64;
    TempoValue::Scalar(mean)
}

/// Quantize beat sample indices to the analysis hop grid.
///
/// Each index snaps to the nearest multiple of `hop_length`; indices that
/// would land at or beyond the audio length are dropped. Rounding preserves
/// ordering, so the output stays non-decreasing.
pub fn quantize_to_hop(beat_samples: &[u64], hop_length: u32, sample_count: u64) -> Vec<u64> {
    let hop = hop_length.max(1) as u64;
    beat_samples
        .iter()
        .map(|&idx| (idx as f64 / hop as f64).round() as u64 * hop)
        .filter(|&idx| idx < sample_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_from_regular_beats() {
        // Beats every 0.5s at 44.1kHz -> 120 bpm.
        let sr = 44100;
        let beats: Vec<u64> = (0..10).map(|i| i * 22050).collect();
        let tempo = estimate_tempo(&beats, sr, &AnalysisParams::default());
        let bpm = tempo.normalized().unwrap();
        assert!((bpm - 120.0).abs() < 1e-6, "got {}", bpm);
    }

    #[test]
    fn tempo_falls_back_to_start_bpm_prior() {
        let params = AnalysisParams {
            start_bpm: 98.0,
            ..AnalysisParams::default()
        };
        assert_eq!(
            estimate_tempo(&[], 44100, &params),
            TempoValue::Scalar(98.0)
        );
        assert_eq!(
            estimate_tempo(&[1000], 44100, &params),
            TempoValue::Scalar(98.0)
        );
    }

    #[test]
    fn tempo_ignores_outlier_intervals() {
        // Regular 120 bpm beats with one long gap (a breakdown) in the
        // middle; the gap's implied ~30 bpm must not drag the estimate.
        let sr = 44100u32;
        let mut beats: Vec<u64> = (0..8).map(|i| i * 22050).collect();
        let resume = beats.last().copied().unwrap() + 4 * 22050;
        beats.extend((0..8).map(|i| resume + i * 22050));

        let bpm = estimate_tempo(&beats, sr, &AnalysisParams::default())
            .normalized()
            .unwrap();
        assert!((bpm - 120.0).abs() < 1e-6, "got {}", bpm);
    }

    #[test]
    fn quantize_snaps_to_hop_grid() {
        let quantized = quantize_to_hop(&[0, 100, 700, 1100], 512, 10_000);
        assert_eq!(quantized, vec![0, 0, 512, 1024]);
    }

    #[test]
    fn quantize_drops_positions_beyond_audio() {
        // 1000 rounds up to 1024 which is >= the sample count.
        let quantized = quantize_to_hop(&[200, 1000], 512, 1024);
        assert_eq!(quantized, vec![0]);
    }

    #[test]
    fn quantize_preserves_ordering() {
        let quantized = quantize_to_hop(&[100, 300, 600, 900], 512, 100_000);
        for pair in quantized.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
