//! Shared plumbing for the Beatmark binaries.

use std::path::PathBuf;

use beatmark_core::config::{ConfigManager, ConfigResult, Settings};
use beatmark_core::logging::{init_tracing, LogLevel};

/// Load settings from an optional `--config` path.
///
/// With a path the file is loaded (and created with defaults on first use);
/// without one the built-in defaults apply and nothing touches disk.
pub fn load_settings(config_path: Option<&PathBuf>) -> ConfigResult<Settings> {
    match config_path {
        Some(path) => {
            let mut manager = ConfigManager::new(path);
            manager.load_or_create()?;
            Ok(manager.settings().clone())
        }
        None => Ok(Settings::default()),
    }
}

/// Initialize tracing from the configured level.
///
/// An unknown level falls back to debug rather than aborting startup.
pub fn init_logging(settings: &Settings) {
    let level = settings
        .logging
        .level
        .parse::<LogLevel>()
        .unwrap_or(LogLevel::Debug);
    init_tracing(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn no_config_path_yields_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.markers.default_color, "Yellow");
    }

    #[test]
    fn config_path_is_created_and_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("beatmark.toml");

        let settings = load_settings(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(settings.analysis.hop_length, 512);
    }
}
