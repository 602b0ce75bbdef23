//! Plot configuration
//! Canvas measurements, bubble styling and animation timing, optionally read from JSON.

use crate::animation::Strategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BUBBLE_TIMELINE_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "bubble_timeline.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Measurements for the plot and timings for both animation strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Radius for the smallest population
    pub dot_min: f64,
    /// Radius for the largest population
    pub dot_max: f64,
    /// Added below and above the life expectancy extent
    pub y_padding: f64,
    pub label_x: f64,
    pub label_y: f64,
    pub fill: [u8; 3],
    /// Strategy selected when the window opens
    pub strategy: Strategy,
    /// Length of each chained transition (strategy A)
    pub chained_duration_ms: u64,
    /// Delay between scheduled year steps (strategy B)
    pub step_delay_ms: u64,
    /// Length of the update transition per step (strategy B)
    pub transition_ms: u64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            margin: 50.0,
            dot_min: 5.0,
            dot_max: 30.0,
            y_padding: 5.0,
            label_x: 230.0,
            label_y: 40.0,
            fill: [70, 130, 180], // steelblue
            strategy: Strategy::Timed,
            chained_duration_ms: 10_000,
            step_delay_ms: 500,
            transition_ms: 500,
        }
    }
}

impl PlotConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the config from the environment, the working directory, or defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let config = Self::from_file(Path::new(&path))?;
            info!(path = %path, "config loaded from environment");
            return Ok(config);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            let config = Self::from_file(local)?;
            info!(path = %local.display(), "config loaded");
            return Ok(config);
        }

        debug!("no config file, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "width": 800, "step_delay_ms": 250, "strategy": "chained" }}"#
        )
        .expect("write");

        let config = PlotConfig::from_file(file.path()).expect("config");
        assert_eq!(config.width, 800.0);
        assert_eq!(config.step_delay_ms, 250);
        assert_eq!(config.strategy, Strategy::Chained);
        assert_eq!(config.height, 500.0);
        assert_eq!(config.fill, [70, 130, 180]);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ width: ").expect("write");

        let err = PlotConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PlotConfig::from_file(Path::new("/nonexistent/bubble.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
