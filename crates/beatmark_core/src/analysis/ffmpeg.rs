//! FFmpeg audio decoding.
//!
//! Decodes source files to mono 16-bit PCM at their native sample rate using
//! an ffmpeg subprocess, and probes the native rate with ffprobe. The host
//! toolchain owns every codec; this module only shells out and converts
//! bytes.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::analysis::types::{AnalysisError, AnalysisResult, AudioData};

/// Probe the native sample rate of the first audio stream.
pub fn probe_sample_rate(input_path: &Path) -> AnalysisResult<u32> {
    if !input_path.exists() {
        return Err(AnalysisError::SourceNotFound(
            input_path.display().to_string(),
        ));
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "a:0",
            "-show_entries",
            "stream=sample_rate",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input_path)
        .output()
        .map_err(|e| AnalysisError::Ffmpeg(format!("failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        return Err(AnalysisError::Ffmpeg(format!(
            "ffprobe exited with code {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AnalysisError::NoAudio(input_path.display().to_string()));
    }

    raw.parse::<u32>()
        .map_err(|_| AnalysisError::Ffmpeg(format!("unparseable sample rate {:?}", raw)))
}

/// Decode a source file to mono 16-bit samples at the given rate.
///
/// The audio is downmixed to one channel and emitted as raw s16le on
/// ffmpeg's stdout.
pub fn decode_mono(input_path: &Path, sample_rate: u32) -> AnalysisResult<AudioData> {
    if !input_path.exists() {
        return Err(AnalysisError::SourceNotFound(
            input_path.display().to_string(),
        ));
    }

    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-i")
        .arg(input_path)
        .arg("-vn") // No video
        .arg("-ac")
        .arg("1") // Mono
        .arg("-ar")
        .arg(sample_rate.to_string())
        .arg("-f")
        .arg("s16le") // 16-bit signed, little endian
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("pipe:1");

    cmd.stderr(Stdio::null()).stdout(Stdio::piped());

    tracing::debug!("Running FFmpeg: {:?}", cmd);

    let mut child = cmd
        .spawn()
        .map_err(|e| AnalysisError::Ffmpeg(format!("failed to spawn ffmpeg: {}", e)))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| AnalysisError::Ffmpeg("failed to capture ffmpeg stdout".to_string()))?;

    let mut buffer = Vec::new();
    stdout
        .read_to_end(&mut buffer)
        .map_err(|e| AnalysisError::Ffmpeg(format!("failed to read ffmpeg output: {}", e)))?;

    let status = child
        .wait()
        .map_err(|e| AnalysisError::Ffmpeg(format!("ffmpeg process error: {}", e)))?;

    if !status.success() {
        return Err(AnalysisError::Ffmpeg(format!(
            "ffmpeg exited with code: {:?}",
            status.code()
        )));
    }

    let samples = bytes_to_i16_samples(&buffer);
    if samples.is_empty() {
        return Err(AnalysisError::NoAudio(input_path.display().to_string()));
    }

    tracing::debug!(
        "Decoded {} samples ({:.2}s) from {}",
        samples.len(),
        samples.len() as f64 / sample_rate as f64,
        input_path.display()
    );

    Ok(AudioData::new(samples, sample_rate))
}

/// Convert raw bytes to i16 samples (little-endian).
fn bytes_to_i16_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
        .collect()
}
