//! Value types for source files and their persisted beat analysis.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Immutable identity of a source media file.
///
/// Created once at input-parsing time and never mutated. `name` is the file
/// stem with path separators stripped; `ext` keeps the leading dot (empty
/// when the file has no extension).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportFile {
    /// Filesystem location as given on the command line.
    pub path: PathBuf,
    /// File stem without directories.
    pub name: String,
    /// Extension including the leading dot (e.g. ".mp3").
    pub ext: String,
}

impl ImportFile {
    /// Split a path into its identity parts.
    ///
    /// Does not touch the filesystem; existence checks happen during batch
    /// input parsing.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Self { path, name, ext }
    }

    /// The source path as a `Path`.
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

/// Persisted pairing of an input file and its beat analysis.
///
/// One `FileMarker` per processed input, written to `<path>.bpm.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMarker {
    /// Identity of the analyzed file.
    pub file: ImportFile,
    /// Estimated tempo in beats per minute.
    pub bpm: f64,
    /// Beat positions in audio sample frames.
    pub beat_frames: Vec<u64>,
}

impl FileMarker {
    /// Create a new file marker.
    pub fn new(file: ImportFile, bpm: f64, beat_frames: Vec<u64>) -> Self {
        Self {
            file,
            bpm,
            beat_frames,
        }
    }
}
