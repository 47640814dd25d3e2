//! Effect configuration.
//!
//! The configuration is a JSON file.  The top-level schema uses an
//! `"aperture"` key so the file can grow further sections later without
//! breaking backward compatibility.
//!
//! # Example
//!
//! ```json
//! {
//!   "aperture": {
//!     "duration_ms": 250,
//!     "animation_speed": 1.0,
//!     "edges": ["top", "bottom"]
//!   }
//! }
//! ```

use crate::event::ScreenEdge;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aperture: ApertureConfig,
}

/// Settings of the corner effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApertureConfig {
    /// Base animation length (ms) before the global speed factor.
    pub duration_ms: u64,
    /// Global animation speed factor.  `1.0` is normal, larger values are
    /// slower, `0.0` makes the transition effectively instant.
    pub animation_speed: f64,
    /// Screen edges whose gestures drive show-desktop.
    pub edges: Vec<ScreenEdge>,
}

impl Default for ApertureConfig {
    fn default() -> Self {
        Self {
            duration_ms: 250,
            animation_speed: 1.0,
            edges: Vec::new(),
        }
    }
}

impl ApertureConfig {
    /// Effective animation length.
    pub fn duration(&self) -> Duration {
        animation_time(self.duration_ms, self.animation_speed)
    }
}

/// Scale `base_ms` by the speed factor, never going below 1 ms.
pub fn animation_time(base_ms: u64, speed: f64) -> Duration {
    let secs = base_ms as f64 * speed.max(0.0) / 1000.0;
    Duration::try_from_secs_f64(secs)
        .unwrap_or(Duration::MAX)
        .max(Duration::from_millis(1))
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "aperture": {
                "duration_ms": 400,
                "animation_speed": 0.5,
                "edges": ["top", 4]
            }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.aperture.duration_ms, 400);
        assert_eq!(cfg.aperture.animation_speed, 0.5);
        assert_eq!(cfg.aperture.edges, vec![ScreenEdge::Top, ScreenEdge::Bottom]);
        assert_eq!(cfg.aperture.duration(), Duration::from_millis(200));
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.aperture, ApertureConfig::default());
        assert_eq!(cfg.aperture.duration(), Duration::from_millis(250));
        assert!(cfg.aperture.edges.is_empty());
    }

    #[test]
    fn deserialize_partial_section() {
        let cfg: Config = serde_json::from_str(r#"{ "aperture": { "duration_ms": 300 } }"#).unwrap();
        assert_eq!(cfg.aperture.duration_ms, 300);
        assert_eq!(cfg.aperture.animation_speed, 1.0);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "aperture": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn bad_edge_is_an_error() {
        let json = r#"{ "aperture": { "edges": ["sideways"] } }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn animation_time_floor_and_scaling() {
        assert_eq!(animation_time(250, 1.0), Duration::from_millis(250));
        assert_eq!(animation_time(250, 2.0), Duration::from_millis(500));
        assert_eq!(animation_time(250, 0.0), Duration::from_millis(1));
        assert_eq!(animation_time(250, -3.0), Duration::from_millis(1));
        assert_eq!(animation_time(0, 1.0), Duration::from_millis(1));
    }

    #[test]
    fn load_missing_file_fails() {
        let path = std::env::temp_dir().join("aperture-test-does-not-exist.json");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
