//! Core types for beat analysis.

use serde::{Deserialize, Serialize};

/// Parameters forwarded to the beat estimator.
///
/// Defaults: a 120 bpm prior, tightness 100 and a 512-sample analysis hop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    /// Initial tempo guess in beats per minute, also the fallback when the
    /// estimator finds too few beats to derive a tempo.
    pub start_bpm: f64,
    /// Restricts how far inter-beat intervals may spread around the median
    /// when deriving the tempo. Higher values are stricter.
    pub tightness: f64,
    /// Number of samples between successive analysis frames. Beat positions
    /// are quantized to this grid.
    pub hop_length: u32,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            start_bpm: 120.0,
            tightness: 100.0,
            hop_length: 512,
        }
    }
}

/// Mono audio decoded from a source file.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Signed 16-bit mono samples.
    pub samples: Vec<i16>,
    /// Sample rate in Hz (the source's native rate).
    pub sample_rate: u32,
}

impl AudioData {
    /// Create new audio data from samples.
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Tempo as reported by an estimator backend.
///
/// Backends may report a single scalar or a sequence of segment estimates;
/// the adapter normalizes either to a plain scalar before it leaves the
/// analysis boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum TempoValue {
    /// A single global estimate.
    Scalar(f64),
    /// Per-segment estimates; the first entry is the global one.
    Sequence(Vec<f64>),
}

impl TempoValue {
    /// Normalize to a plain scalar.
    ///
    /// Returns `None` for an empty sequence.
    pub fn normalized(&self) -> Option<f64> {
        match self {
            TempoValue::Scalar(bpm) => Some(*bpm),
            TempoValue::Sequence(values) => values.first().copied(),
        }
    }
}

/// Result of analyzing one audio source.
///
/// `beat_frames` are audio sample indices quantized to the analysis hop
/// grid, non-decreasing and within `[0, audio length in samples)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatAnalysis {
    /// Estimated tempo in beats per minute.
    pub tempo: f64,
    /// Beat positions in audio sample frames.
    pub beat_frames: Vec<u64>,
    /// Sample rate of the analyzed audio in Hz.
    pub sample_rate: u32,
}

impl BeatAnalysis {
    /// Create a new analysis result.
    pub fn new(tempo: f64, beat_frames: Vec<u64>, sample_rate: u32) -> Self {
        debug_assert!(beat_frames.windows(2).all(|w| w[0] <= w[1]));
        Self {
            tempo,
            beat_frames,
            sample_rate,
        }
    }
}

/// Error types for analysis operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Source file not found.
    #[error("source file not found: {0}")]
    SourceNotFound(String),

    /// FFmpeg/ffprobe execution failed.
    #[error("ffmpeg error: {0}")]
    Ffmpeg(String),

    /// The file decoded to no usable audio.
    #[error("no usable audio in {0}")]
    NoAudio(String),

    /// The beat estimator produced an unusable result.
    #[error("beat estimator failed: {0}")]
    Estimator(String),

    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for analysis results.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
