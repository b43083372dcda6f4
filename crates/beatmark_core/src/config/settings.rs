//! Settings struct with TOML-based sections.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisParams;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Beat estimator parameters.
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Marker defaults.
    #[serde(default)]
    pub markers: MarkerSettings,

    /// Host bridge configuration.
    #[serde(default)]
    pub host: HostSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Beat estimator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Initial tempo guess in beats per minute.
    #[serde(default = "default_start_bpm")]
    pub start_bpm: f64,

    /// Tightness of the tempo derivation. Higher values restrict the
    /// accepted spread of inter-beat intervals.
    #[serde(default = "default_tightness")]
    pub tightness: f64,

    /// Number of samples between successive analysis frames.
    #[serde(default = "default_hop_length")]
    pub hop_length: u32,
}

fn default_start_bpm() -> f64 {
    120.0
}

fn default_tightness() -> f64 {
    100.0
}

fn default_hop_length() -> u32 {
    512
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            start_bpm: default_start_bpm(),
            tightness: default_tightness(),
            hop_length: default_hop_length(),
        }
    }
}

impl From<&AnalysisSettings> for AnalysisParams {
    fn from(settings: &AnalysisSettings) -> Self {
        Self {
            start_bpm: settings.start_bpm,
            tightness: settings.tightness,
            hop_length: settings.hop_length,
        }
    }
}

/// Marker defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSettings {
    /// Marker color used when the command line does not name one.
    #[serde(default = "default_marker_color")]
    pub default_color: String,
}

fn default_marker_color() -> String {
    "Yellow".to_string()
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            default_color: default_marker_color(),
        }
    }
}

/// Host bridge configuration.
///
/// The editing host exposes its project model only to embedded scripting;
/// the bridge command is whatever executable speaks the line-delimited JSON
/// protocol documented in `host::bridge` against the running host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSettings {
    /// Executable to spawn for the host bridge.
    #[serde(default = "default_bridge_command")]
    pub bridge_command: String,

    /// Arguments passed to the bridge command.
    #[serde(default)]
    pub bridge_args: Vec<String>,
}

fn default_bridge_command() -> String {
    "resolve-bridge".to_string()
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            bridge_command: default_bridge_command(),
            bridge_args: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level when RUST_LOG is not set
    /// (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tool_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.analysis.start_bpm, 120.0);
        assert_eq!(settings.analysis.hop_length, 512);
        assert_eq!(settings.markers.default_color, "Yellow");
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let settings: Settings = toml::from_str("[analysis]\nstart_bpm = 90.0\n").unwrap();
        assert_eq!(settings.analysis.start_bpm, 90.0);
        assert_eq!(settings.analysis.tightness, 100.0);
        assert_eq!(settings.markers.default_color, "Yellow");
    }

    #[test]
    fn analysis_params_from_settings() {
        let settings = AnalysisSettings {
            start_bpm: 95.0,
            tightness: 200.0,
            hop_length: 256,
        };
        let params = AnalysisParams::from(&settings);
        assert_eq!(params.start_bpm, 95.0);
        assert_eq!(params.tightness, 200.0);
        assert_eq!(params.hop_length, 256);
    }
}
