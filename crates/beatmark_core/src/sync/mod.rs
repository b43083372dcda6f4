//! Marker synchronization against the host timeline.
//!
//! Resolves a clip by name in the host's media pool, analyzes its backing
//! audio file, projects the beats onto the clip's frame range and applies
//! them as colored markers. After a sync call for a color, the markers of
//! that color on the clip equal exactly the current projected-frame set: all
//! pre-existing markers of the color are removed first and duplicates never
//! reach the host.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::analysis::{AnalysisError, AudioAnalyzer};
use crate::host::{HostClip, HostError, HostSession};
use crate::projection::project;
use crate::timecode::{parse_duration, TimecodeError};

/// Host page holding audio clips, opened before clip resolution.
const AUDIO_PAGE: &str = "fairlight";
/// Page toggled through to force the host to redraw markers.
const EDIT_PAGE: &str = "edit";

/// Errors from marker synchronization.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No project is open in the host.
    #[error("no project is loaded in the host")]
    NoProjectLoaded,

    /// The media pool root bin contains no audio-typed clips.
    #[error("no audio clip found in the media pool root bin")]
    NoAudioClips,

    /// No audio clip matched the requested name.
    #[error("no clip named {name:?} found in the host")]
    ClipNotFound { name: String },

    /// A host clip property did not convert to the expected type.
    #[error("clip {clip:?} has malformed property {key}={value:?}")]
    MalformedProperty {
        clip: String,
        key: String,
        value: String,
    },

    /// The clip duration string could not be parsed.
    #[error(transparent)]
    Timecode(#[from] TimecodeError),

    /// Beat analysis of the clip's backing file failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Host transport or protocol failure.
    #[error(transparent)]
    Host(HostError),
}

impl From<HostError> for SyncError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::NoProjectLoaded => SyncError::NoProjectLoaded,
            other => SyncError::Host(other),
        }
    }
}

/// Outcome of one attempted marker addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerOutcome {
    /// Timeline frame the marker was attempted at.
    pub frame: u64,
    /// Whether the host accepted it.
    pub added: bool,
}

/// Result of an `add_markers` call.
#[derive(Debug, Clone)]
pub struct MarkerSyncReport {
    /// Resolved clip name (as the host reports it).
    pub clip: String,
    /// Marker color that was synchronized.
    pub color: String,
    /// Tempo of the analyzed audio in beats per minute.
    pub tempo: f64,
    /// Per-marker outcomes in timeline order.
    pub markers: Vec<MarkerOutcome>,
}

impl MarkerSyncReport {
    /// Number of markers the host accepted.
    pub fn added_count(&self) -> usize {
        self.markers.iter().filter(|m| m.added).count()
    }

    /// Frames the host refused.
    pub fn failed_frames(&self) -> Vec<u64> {
        self.markers
            .iter()
            .filter(|m| !m.added)
            .map(|m| m.frame)
            .collect()
    }
}

/// An audio clip resolved in the host's media pool.
struct ResolvedClip<C> {
    handle: C,
    name: String,
    file_path: String,
}

/// Synchronizes beat markers on host clips.
///
/// Holds one host session for the duration of a command invocation and the
/// analyzer used on clip backing files.
pub struct MarkerSynchronizer<'a, S: HostSession> {
    session: &'a S,
    analyzer: &'a dyn AudioAnalyzer,
}

impl<'a, S: HostSession> MarkerSynchronizer<'a, S> {
    /// Create a synchronizer over an acquired session.
    pub fn new(session: &'a S, analyzer: &'a dyn AudioAnalyzer) -> Self {
        Self { session, analyzer }
    }

    /// Remove every marker of `color` from the named clip.
    ///
    /// Idempotent: a second call is a no-op, not an error.
    pub fn remove_all(&self, clip_name: &str, color: &str) -> Result<(), SyncError> {
        let clip = self.find_clip_by_name(clip_name)?;
        clip.handle.delete_markers_by_color(color)?;
        tracing::info!("Removed all {} markers from clip {}", color, clip_name);

        self.refresh_views()?;
        Ok(())
    }

    /// Analyze the clip's backing file and add one marker of `color` per
    /// projected beat frame.
    ///
    /// Existing markers of `color` are removed first, so the resulting
    /// marker set equals exactly the projected-frame set. Individual marker
    /// additions the host refuses are recorded in the report and logged; they
    /// do not abort the remaining markers or roll back prior additions.
    pub fn add_markers(&self, clip_name: &str, color: &str) -> Result<MarkerSyncReport, SyncError> {
        let clip = self.find_clip_by_name(clip_name)?;

        let frame_rate = self.clip_frame_rate(&clip)?;
        let duration_str = clip.handle.property("Duration")?;

        let analysis = self.analyzer.analyze(Path::new(&clip.file_path))?;
        let duration = parse_duration(&duration_str, frame_rate)?;

        let projected = project(
            &analysis.beat_frames,
            analysis.sample_rate,
            frame_rate,
            duration.total_frames,
        );
        let frames = dedup_preserving_order(&projected);

        clip.handle.delete_markers_by_color(color)?;

        let mut markers = Vec::with_capacity(frames.len());
        for frame in frames {
            let added = clip.handle.add_marker(
                frame,
                color,
                &format!("Marker at frame {}", frame),
                &format!("Auto-added marker at frame {}", frame),
                1,
            )?;
            if added {
                tracing::debug!(
                    "Added {} marker to {} at frame:{}",
                    color,
                    clip.name,
                    frame
                );
            } else {
                tracing::error!("Failed to add {} marker at frame:{}", color, frame);
            }
            markers.push(MarkerOutcome { frame, added });
        }

        tracing::info!("Done, tempo={:.2}", analysis.tempo);

        self.refresh_views()?;

        Ok(MarkerSyncReport {
            clip: clip.name,
            color: color.to_string(),
            tempo: analysis.tempo,
            markers,
        })
    }

    /// Resolve an audio clip by case-insensitive name.
    ///
    /// Enumerates the root media bin, keeps clips whose `Type` property is
    /// `"Audio"`, and returns the first name match in host enumeration order
    /// (host-dependent, not alphabetical).
    fn find_clip_by_name(&self, clip_name: &str) -> Result<ResolvedClip<S::Clip>, SyncError> {
        self.session.open_page(AUDIO_PAGE)?;

        let mut audio_clips = Vec::new();
        for handle in self.session.list_root_clips()? {
            if handle.property("Type")? != "Audio" {
                continue;
            }
            let name = handle.name();
            let file_path = handle.property("File Path")?;
            audio_clips.push(ResolvedClip {
                handle,
                name,
                file_path,
            });
        }

        if audio_clips.is_empty() {
            return Err(SyncError::NoAudioClips);
        }

        for clip in audio_clips {
            if clip.name.eq_ignore_ascii_case(clip_name) {
                tracing::debug!("Found clip by name {}: {}", clip_name, clip.name);
                return Ok(clip);
            }
        }

        Err(SyncError::ClipNotFound {
            name: clip_name.to_string(),
        })
    }

    /// Read and convert the clip's frame rate at the boundary.
    fn clip_frame_rate(&self, clip: &ResolvedClip<S::Clip>) -> Result<f64, SyncError> {
        let raw = clip.handle.property("FPS")?;
        raw.parse::<f64>()
            .map_err(|_| SyncError::MalformedProperty {
                clip: clip.name.clone(),
                key: "FPS".to_string(),
                value: raw,
            })
    }

    /// Force the host to redraw markers by toggling pages and re-asserting
    /// the current timeline.
    fn refresh_views(&self) -> Result<(), SyncError> {
        self.session.open_page(EDIT_PAGE)?;
        self.session.open_page(AUDIO_PAGE)?;

        if let Some(timeline) = self.session.current_timeline()? {
            self.session.set_current_timeline(&timeline)?;
        }
        Ok(())
    }
}

/// Drop repeated frames while keeping first-occurrence order.
fn dedup_preserving_order(frames: &[u64]) -> Vec<u64> {
    let mut seen = HashSet::new();
    frames
        .iter()
        .copied()
        .filter(|frame| seen.insert(*frame))
        .collect()
}
