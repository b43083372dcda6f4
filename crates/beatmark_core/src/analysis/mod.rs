//! Audio beat analysis.
//!
//! The analysis boundary is the [`AudioAnalyzer`] trait: callers hand it a
//! file path and get back a [`BeatAnalysis`] (tempo, beat sample frames,
//! sample rate). The shipped [`BeatAnalyzer`] decodes through ffmpeg and
//! delegates beat detection to the external `beat-detector` crate; both are
//! opaque collaborators reached only through their fixed contracts.

pub mod detector;
pub mod ffmpeg;
mod types;

use std::path::Path;

pub use types::{AnalysisError, AnalysisParams, AnalysisResult, AudioData, BeatAnalysis, TempoValue};

/// The analysis capability consumed by batch processing and marker sync.
///
/// Implementations must be deterministic for the same input file.
pub trait AudioAnalyzer {
    /// Analyze the beats of an audio file.
    fn analyze(&self, path: &Path) -> AnalysisResult<BeatAnalysis>;
}

/// Beat analyzer backed by ffmpeg decoding and the external beat detector.
#[derive(Debug, Clone, Default)]
pub struct BeatAnalyzer {
    params: AnalysisParams,
}

impl BeatAnalyzer {
    /// Create an analyzer with the given estimator parameters.
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    /// The parameters this analyzer forwards to the estimator.
    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }
}

impl AudioAnalyzer for BeatAnalyzer {
    fn analyze(&self, path: &Path) -> AnalysisResult<BeatAnalysis> {
        tracing::info!("Analyzing {}", path.display());

        let sample_rate = ffmpeg::probe_sample_rate(path)?;
        let audio = ffmpeg::decode_mono(path, sample_rate)?;

        let raw_beats = detector::detect_beats(&audio);
        let tempo = detector::estimate_tempo(&raw_beats, audio.sample_rate, &self.params);
        let tempo = tempo
            .normalized()
            .ok_or_else(|| AnalysisError::Estimator("empty tempo estimate".to_string()))?;

        let beat_frames =
            detector::quantize_to_hop(&raw_beats, self.params.hop_length, audio.len() as u64);

        tracing::info!(
            "Analysis of {} completed. Tempo: {:.2} BPM, {} beats",
            path.display(),
            tempo,
            beat_frames.len()
        );

        Ok(BeatAnalysis::new(tempo, beat_frames, audio.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzer_rejects_missing_file() {
        let analyzer = BeatAnalyzer::new(AnalysisParams::default());
        let result = analyzer.analyze(Path::new("/nonexistent/song.mp3"));
        assert!(matches!(result, Err(AnalysisError::SourceNotFound(_))));
    }
}
