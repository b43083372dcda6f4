//! Beatmark core - beat analysis and timeline marker synchronization.
//!
//! This crate contains all business logic with zero CLI dependencies.
//! It analyzes audio files for beat positions, persists the results as
//! sidecar artifacts, and projects beats onto an external editing host's
//! timeline as colored markers.

pub mod analysis;
pub mod artifact;
pub mod batch;
pub mod config;
pub mod host;
pub mod logging;
pub mod models;
pub mod projection;
pub mod sync;
pub mod timecode;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
