//! Sidecar artifacts for analyzed files.
//!
//! Each processed input gets a `<path>.bpm.json` document holding its
//! identity plus the full `(bpm, beat_frames)` pair, so a later run can
//! reuse the analysis without redoing it. A lossy `<path>.bpm.yml` variant
//! (no beat frames, bpm as a two-decimal string) is kept for older
//! pipelines. Existing artifacts are overwritten unconditionally.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FileMarker, ImportFile};

/// Suffix appended to the source path for the JSON artifact.
pub const MARKER_SUFFIX: &str = ".bpm.json";
/// Suffix appended to the source path for the legacy YAML artifact.
pub const LEGACY_SUFFIX: &str = ".bpm.yml";

/// Errors from artifact reading and writing.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Filesystem failure, with the artifact path.
    #[error("artifact I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON (de)serialization failure.
    #[error("artifact JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Legacy YAML serialization failure.
    #[error("artifact YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Path of the JSON artifact for a source file.
pub fn marker_path(source: &Path) -> PathBuf {
    let mut os = source.as_os_str().to_os_string();
    os.push(MARKER_SUFFIX);
    PathBuf::from(os)
}

/// Path of the legacy YAML artifact for a source file.
pub fn legacy_marker_path(source: &Path) -> PathBuf {
    let mut os = source.as_os_str().to_os_string();
    os.push(LEGACY_SUFFIX);
    PathBuf::from(os)
}

/// Write the JSON artifact next to the source file, overwriting any
/// existing one. Returns the artifact path.
pub fn write_marker(marker: &FileMarker) -> ArtifactResult<PathBuf> {
    let path = marker_path(&marker.file.path);
    let json = serde_json::to_string_pretty(marker)?;
    fs::write(&path, json).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Re-read a previously written JSON artifact for a source file.
pub fn load_marker(source: &Path) -> ArtifactResult<FileMarker> {
    let path = marker_path(source);
    let json = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

/// One entry in the legacy document.
#[derive(Debug, Serialize, Deserialize)]
struct LegacyEntry {
    name: String,
    extension: String,
    /// Two-decimal bpm, stringly typed for the old consumers.
    bpm: String,
}

/// The legacy `result`-list document.
#[derive(Debug, Serialize, Deserialize)]
struct LegacyDocument {
    result: Vec<LegacyEntry>,
}

/// Write the legacy YAML artifact next to the source file.
///
/// Lossy on purpose: the beat frame list is omitted and bpm is formatted
/// with two decimals.
pub fn write_legacy_marker(file: &ImportFile, bpm: f64) -> ArtifactResult<PathBuf> {
    let path = legacy_marker_path(&file.path);
    let document = LegacyDocument {
        result: vec![LegacyEntry {
            name: file.name.clone(),
            extension: file.ext.clone(),
            bpm: format!("{:.2}", bpm),
        }],
    };
    let yaml = serde_yaml_ng::to_string(&document)?;
    fs::write(&path, yaml).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
