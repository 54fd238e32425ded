//! TOML-based configuration.
//!
//! Holds the countdown and breath cadence settings plus the ring geometry the
//! presentation layer draws into. Configuration is read from
//! `~/.config/breathring/config.toml` when present; nothing is ever written
//! back, timer state is not persisted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Slowest allowed dot speed: one lap in a little over four days.
pub const MIN_DEG_PER_SECOND: f64 = 0.001;
/// Fastest allowed dot speed: a hundred laps per second.
pub const MAX_DEG_PER_SECOND: f64 = 36_000.0;

/// Countdown and breath cadence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_total_duration_ms")]
    pub total_duration_ms: u64,
    #[serde(default = "default_breath_leg_ms")]
    pub inhale_ms: u64,
    #[serde(default = "default_breath_leg_ms")]
    pub exhale_ms: u64,
    /// Smallest breath radius as a fraction of the progress ring radius.
    #[serde(default = "default_min_radius_ratio")]
    pub min_radius_ratio: f64,
    /// Largest breath radius as a fraction of the progress ring radius.
    #[serde(default = "default_max_radius_ratio")]
    pub max_radius_ratio: f64,
    /// Angular speed of the progress dot. 18 means one lap every 20 seconds.
    #[serde(default = "default_deg_per_second")]
    pub deg_per_second: f64,
}

/// Geometry of the progress ring, in the adapter's drawing units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingConfig {
    /// Outer size of the square canvas.
    #[serde(default = "default_ring_size")]
    pub size: f64,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Diameter of the track including its stroke.
    #[serde(default = "default_inner_size")]
    pub inner_size: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/breathring/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub ring: RingConfig,
}

// Default functions
fn default_total_duration_ms() -> u64 {
    60_000
}
fn default_breath_leg_ms() -> u64 {
    5_000
}
fn default_min_radius_ratio() -> f64 {
    0.6
}
fn default_max_radius_ratio() -> f64 {
    0.9
}
fn default_deg_per_second() -> f64 {
    18.0
}
fn default_ring_size() -> f64 {
    244.0
}
fn default_stroke_width() -> f64 {
    10.0
}
fn default_inner_size() -> f64 {
    230.0
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            total_duration_ms: default_total_duration_ms(),
            inhale_ms: default_breath_leg_ms(),
            exhale_ms: default_breath_leg_ms(),
            min_radius_ratio: default_min_radius_ratio(),
            max_radius_ratio: default_max_radius_ratio(),
            deg_per_second: default_deg_per_second(),
        }
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            size: default_ring_size(),
            stroke_width: default_stroke_width(),
            inner_size: default_inner_size(),
        }
    }
}

impl TimerConfig {
    /// Build and validate a timer configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if any duration is zero or the
    /// radius ratios do not describe a non-empty range.
    pub fn new(
        total_duration_ms: u64,
        inhale_ms: u64,
        exhale_ms: u64,
        min_radius_ratio: f64,
        max_radius_ratio: f64,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            total_duration_ms,
            inhale_ms,
            exhale_ms,
            min_radius_ratio,
            max_radius_ratio,
            deg_per_second: default_deg_per_second(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.total_duration_ms)
    }

    pub fn inhale(&self) -> Duration {
        Duration::from_millis(self.inhale_ms)
    }

    pub fn exhale(&self) -> Duration {
        Duration::from_millis(self.exhale_ms)
    }

    /// # Errors
    ///
    /// Returns the first offending key as [`ConfigError::InvalidValue`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_duration_ms == 0 {
            return Err(ConfigError::invalid(
                "timer.total_duration_ms",
                "must be greater than zero",
            ));
        }
        if self.inhale_ms == 0 {
            return Err(ConfigError::invalid("timer.inhale_ms", "must be greater than zero"));
        }
        if self.exhale_ms == 0 {
            return Err(ConfigError::invalid("timer.exhale_ms", "must be greater than zero"));
        }
        if !self.min_radius_ratio.is_finite() || self.min_radius_ratio < 0.0 {
            return Err(ConfigError::invalid(
                "timer.min_radius_ratio",
                format!("must be a non-negative number, got {}", self.min_radius_ratio),
            ));
        }
        if !self.max_radius_ratio.is_finite() {
            return Err(ConfigError::invalid(
                "timer.max_radius_ratio",
                format!("must be a finite number, got {}", self.max_radius_ratio),
            ));
        }
        if self.min_radius_ratio >= self.max_radius_ratio {
            return Err(ConfigError::invalid(
                "timer.min_radius_ratio",
                format!(
                    "must be smaller than max_radius_ratio ({} >= {})",
                    self.min_radius_ratio, self.max_radius_ratio
                ),
            ));
        }
        if !(MIN_DEG_PER_SECOND..=MAX_DEG_PER_SECOND).contains(&self.deg_per_second) {
            return Err(ConfigError::invalid(
                "timer.deg_per_second",
                format!(
                    "must be between {MIN_DEG_PER_SECOND} and {MAX_DEG_PER_SECOND}, got {}",
                    self.deg_per_second
                ),
            ));
        }
        Ok(())
    }
}

impl RingConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the track would have no radius
    /// or would not fit on the canvas.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("ring.size", self.size),
            ("ring.stroke_width", self.stroke_width),
            ("ring.inner_size", self.inner_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    key,
                    format!("must be a positive number, got {value}"),
                ));
            }
        }
        if self.inner_size <= self.stroke_width {
            return Err(ConfigError::invalid(
                "ring.inner_size",
                "must be larger than stroke_width",
            ));
        }
        if self.inner_size > self.size {
            return Err(ConfigError::invalid(
                "ring.inner_size",
                "must not exceed the canvas size",
            ));
        }
        Ok(())
    }
}

impl From<TimerConfig> for Config {
    fn from(timer: TimerConfig) -> Self {
        Self {
            timer,
            ring: RingConfig::default(),
        }
    }
}

/// Returns `~/.config/breathring[-dev]/` based on BREATHRING_ENV.
///
/// Set BREATHRING_ENV=dev to use the development directory.
pub fn config_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BREATHRING_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("breathring-dev")
    } else {
        base_dir.join("breathring")
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// # Errors
    ///
    /// Returns the first invalid value found in either section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timer.validate()?;
        self.ring.validate()
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for malformed TOML and
    /// [`ConfigError::InvalidValue`] for out-of-range settings.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from the default location, or return defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::LoadFailed {
                path,
                message: err.to_string(),
            }),
        }
    }

    /// Load from an explicit path. The file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadFailed`] if the file cannot be read, plus
    /// any parse or validation error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|err| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Serialize to pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::ParseFailed(err.to_string()))
    }
}
