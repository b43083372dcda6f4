//! The editing-host boundary.
//!
//! The timeline, media pool and clips are owned entirely by the external
//! host application; this system only calls into them. The host is modeled
//! as an injected capability - the [`HostSession`] and [`HostClip`] traits
//! expose exactly the operations the marker synchronizer needs, so it can be
//! tested against an in-memory fake without a running host.
//!
//! A session is acquired once per command invocation and never implicitly
//! re-acquired; the absence of an open project is an explicit error, not a
//! crash.

pub mod bridge;

#[cfg(test)]
pub(crate) mod fake;

use thiserror::Error;

/// Errors from host interaction.
#[derive(Error, Debug)]
pub enum HostError {
    /// No project is open in the host.
    #[error("no project is loaded in the host")]
    NoProjectLoaded,

    /// The bridge process could not be started or died mid-conversation.
    #[error("host bridge failed: {0}")]
    Bridge(String),

    /// The bridge replied with something that is not a valid response.
    #[error("host protocol error: {0}")]
    Protocol(String),

    /// The host rejected an operation.
    #[error("host rejected {operation}: {message}")]
    Rejected { operation: String, message: String },
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// A clip reference in the host's media pool.
///
/// Clips are shared mutable state owned by the host; the only contract here
/// is "read clip properties, then conditionally mutate the marker set".
pub trait HostClip {
    /// The clip's display name.
    fn name(&self) -> String;

    /// Read a string-keyed clip property ("FPS", "Duration", "Type",
    /// "File Path"). The host's property map is untyped; a property the host
    /// does not know comes back as the empty string. Callers convert and
    /// validate at the boundary.
    fn property(&self, key: &str) -> HostResult<String>;

    /// Add a marker at a timeline frame. Returns whether the host accepted
    /// it; `Ok(false)` is a per-marker refusal, not a transport failure.
    fn add_marker(
        &self,
        frame: u64,
        color: &str,
        name: &str,
        note: &str,
        duration: u64,
    ) -> HostResult<bool>;

    /// Delete every marker of the given color from the clip.
    fn delete_markers_by_color(&self, color: &str) -> HostResult<()>;
}

/// One live host session (open project, media pool, pages).
pub trait HostSession {
    /// Clip handle type.
    type Clip: HostClip;
    /// Opaque timeline handle type.
    type Timeline;

    /// Switch the host UI to a named page.
    fn open_page(&self, name: &str) -> HostResult<()>;

    /// Enumerate all clips in the root media bin, in host order.
    ///
    /// Fails with [`HostError::NoProjectLoaded`] when no project is open.
    fn list_root_clips(&self) -> HostResult<Vec<Self::Clip>>;

    /// The currently active timeline, if any.
    fn current_timeline(&self) -> HostResult<Option<Self::Timeline>>;

    /// Re-assert a timeline as current (used to force a view refresh).
    fn set_current_timeline(&self, timeline: &Self::Timeline) -> HostResult<()>;
}
