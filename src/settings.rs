//! Arena configuration
//!
//! Fixed for the lifetime of a run. Loadable from JSON for the headless runner.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Arena and timing parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // === Geometry ===
    /// Arena width (x spans [0, width])
    pub width: f64,
    /// Arena height (y spans [0, height])
    pub height: f64,
    /// Radius shared by every object
    pub object_radius: f64,
    /// Starting objects per kind
    pub per_kind: u32,

    // === Generation ===
    /// Lower bound of the initial per-component speed
    pub min_speed: f64,
    /// Upper bound (exclusive) of the initial per-component speed
    pub max_speed: f64,

    // === Timing ===
    /// Nominal frame duration in seconds
    pub frame_dt: f64,
    /// Frame delta cap as a multiple of `frame_dt`
    pub max_dt_factor: f64,
    /// Elapsed time at which the run times out
    pub time_ceiling: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            object_radius: OBJECT_RADIUS,
            per_kind: PER_KIND,

            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,

            frame_dt: FRAME_DT,
            max_dt_factor: MAX_DT_FACTOR,
            time_ceiling: TIME_CEILING,
        }
    }
}

impl ArenaConfig {
    /// Config with custom geometry and default timing/speeds
    pub fn with_geometry(width: f64, height: f64, object_radius: f64, per_kind: u32) -> Self {
        Self {
            width,
            height,
            object_radius,
            per_kind,
            ..Self::default()
        }
    }

    /// Largest frame delta a single step may integrate
    pub fn max_dt(&self) -> f64 {
        self.frame_dt * self.max_dt_factor
    }

    /// Total objects in a run
    pub fn population(&self) -> usize {
        self.per_kind as usize * 3
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("object_radius", self.object_radius),
            ("frame_dt", self.frame_dt),
            ("max_dt_factor", self.max_dt_factor),
            ("time_ceiling", self.time_ceiling),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }
        if self.width < 2.0 * self.object_radius || self.height < 2.0 * self.object_radius {
            return Err(Error::InvalidConfig(
                "arena must be at least 2 * object_radius in each dimension".into(),
            ));
        }
        if !self.min_speed.is_finite() || !self.max_speed.is_finite() || self.min_speed < 0.0 {
            return Err(Error::InvalidConfig(
                "speed bounds must be finite and non-negative".into(),
            ));
        }
        if self.min_speed > self.max_speed {
            return Err(Error::InvalidConfig(format!(
                "min_speed {} exceeds max_speed {}",
                self.min_speed, self.max_speed
            )));
        }
        if self.per_kind == 0 {
            return Err(Error::InvalidConfig("per_kind must be > 0".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded arena config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Arena config saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ArenaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population(), 30);
        assert!((config.max_dt() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let config = ArenaConfig::with_geometry(20.0, 600.0, 15.0, 5);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = ArenaConfig::with_geometry(800.0, 600.0, 0.0, 5);
        assert!(config.validate().is_err());

        let config = ArenaConfig::with_geometry(800.0, 600.0, 15.0, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_speeds() {
        let config = ArenaConfig {
            min_speed: 200.0,
            max_speed: 100.0,
            ..ArenaConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_speed"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ArenaConfig::from_json_str(r#"{ "per_kind": 4, "width": 400.0 }"#).unwrap();
        assert_eq!(config.per_kind, 4);
        assert_eq!(config.width, 400.0);
        assert_eq!(config.height, ARENA_HEIGHT);
        assert_eq!(config.time_ceiling, TIME_CEILING);
    }

    #[test]
    fn test_json_validation_applies() {
        let err = ArenaConfig::from_json_str(r#"{ "object_radius": -1.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("triad-arena-config-{}.json", std::process::id()));
        let config = ArenaConfig::with_geometry(640.0, 480.0, 12.0, 7);
        config.save(&path).unwrap();
        let loaded = ArenaConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
