//! Application configuration loaded from environment variables.
//!
//! `Config` drives the walk-log server; `TrackerConfig` holds the tunable
//! thresholds of the GPS tracking pipeline.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: parse_var("PORT", 8080)?,
        })
    }
}

/// Thresholds for sample filtering, speed estimation and fix requests.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Reject samples less precise than this (None disables the gate)
    pub max_accuracy_meters: Option<f64>,
    /// Reject samples closer than this to the last accepted point
    pub min_distance_meters: f64,
    /// Number of instantaneous speeds in the rolling average
    pub speed_window: usize,
    /// Gaps longer than this produce no speed value
    pub max_speed_gap_seconds: f64,
    /// Deadline for a single high-accuracy fix
    pub fix_timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_accuracy_meters: Some(100.0),
            min_distance_meters: 1.5,
            speed_window: 100,
            max_speed_gap_seconds: 60.0,
            fix_timeout: Duration::from_millis(15_000),
        }
    }
}

impl TrackerConfig {
    /// Load tracker thresholds from `PAWTRAIL_*` variables, falling back to
    /// the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let max_accuracy_meters = match env::var("PAWTRAIL_MAX_ACCURACY_M") {
            Ok(raw) if raw.trim().eq_ignore_ascii_case("none") => None,
            Ok(raw) => Some(raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PAWTRAIL_MAX_ACCURACY_M",
                value: raw.clone(),
            })?),
            Err(_) => defaults.max_accuracy_meters,
        };

        let config = Self {
            max_accuracy_meters,
            min_distance_meters: parse_var("PAWTRAIL_MIN_DISTANCE_M", defaults.min_distance_meters)?,
            speed_window: parse_var("PAWTRAIL_SPEED_WINDOW", defaults.speed_window)?,
            max_speed_gap_seconds: parse_var(
                "PAWTRAIL_MAX_SPEED_GAP_S",
                defaults.max_speed_gap_seconds,
            )?,
            fix_timeout: Duration::from_millis(parse_var(
                "PAWTRAIL_FIX_TIMEOUT_MS",
                defaults.fix_timeout.as_millis() as u64,
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(max) = self.max_accuracy_meters {
            if !(max > 0.0) {
                return Err(ConfigError::OutOfRange("max_accuracy_meters"));
            }
        }
        if !(self.min_distance_meters >= 0.0) {
            return Err(ConfigError::OutOfRange("min_distance_meters"));
        }
        if self.speed_window == 0 {
            return Err(ConfigError::OutOfRange("speed_window"));
        }
        if !(self.max_speed_gap_seconds > 0.0) {
            return Err(ConfigError::OutOfRange("max_speed_gap_seconds"));
        }
        if self.fix_timeout.is_zero() {
            return Err(ConfigError::OutOfRange("fix_timeout"));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Configuration value out of range: {0}")]
    OutOfRange(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_config_from_env() {
        env::set_var("PAWTRAIL_MIN_DISTANCE_M", "5");
        env::set_var("PAWTRAIL_MAX_ACCURACY_M", "none");
        env::set_var("PAWTRAIL_SPEED_WINDOW", "20");

        let config = TrackerConfig::from_env().expect("Config should load");

        env::remove_var("PAWTRAIL_MIN_DISTANCE_M");
        env::remove_var("PAWTRAIL_MAX_ACCURACY_M");
        env::remove_var("PAWTRAIL_SPEED_WINDOW");

        assert_eq!(config.min_distance_meters, 5.0);
        assert_eq!(config.max_accuracy_meters, None);
        assert_eq!(config.speed_window, 20);
        assert_eq!(config.max_speed_gap_seconds, 60.0);
        assert_eq!(config.fix_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_default_tracker_config_is_valid() {
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_speed_window_rejected() {
        let config = TrackerConfig {
            speed_window: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange("speed_window"))
        ));
    }

    #[test]
    fn test_negative_min_distance_rejected() {
        let config = TrackerConfig {
            min_distance_meters: -1.0,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
