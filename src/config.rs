//! Viewport tuning parsed from JSON or environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{HIT_RADIUS, TAP_SLOP_PX, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT, ZOOM_MAX, ZOOM_MIN};
use crate::viewport::ZoomRange;

/// Error returned when a configuration is unusable.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed as a number.
    #[error("{var} is not a number: {value:?}")]
    Parse { var: &'static str, value: String },
    /// The JSON does not deserialize into a config object.
    #[error("config JSON rejected: {0}")]
    Json(String),
    /// A field holds a value the viewport cannot work with.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Tunables for zoom, wheel steps, tap detection, and hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Multiplier for one zoom-in wheel tick; must be greater than 1.
    pub wheel_zoom_in: f64,
    /// Multiplier for one zoom-out wheel tick; must be in `(0, 1)`.
    pub wheel_zoom_out: f64,
    /// Hit radius in normalized units.
    pub hit_radius: f64,
    /// Mouse travel in screen pixels beyond which a press no longer counts as a click.
    pub tap_slop_px: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            wheel_zoom_in: WHEEL_ZOOM_IN,
            wheel_zoom_out: WHEEL_ZOOM_OUT,
            hit_radius: HIT_RADIUS,
            tap_slop_px: TAP_SLOP_PX,
        }
    }
}

impl ViewportConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `DROPMAP_ZOOM_MIN`: default 1.0
    /// - `DROPMAP_ZOOM_MAX`: default 3.0
    /// - `DROPMAP_WHEEL_ZOOM_IN`: default 1.1
    /// - `DROPMAP_WHEEL_ZOOM_OUT`: default 0.9
    /// - `DROPMAP_HIT_RADIUS`: default 2.0
    /// - `DROPMAP_TAP_SLOP_PX`: default 3.0
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but not numeric, or the
    /// resulting config fails [`ViewportConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup (used by [`Self::from_env`]).
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            zoom_min: parse_f64(&lookup, "DROPMAP_ZOOM_MIN", defaults.zoom_min)?,
            zoom_max: parse_f64(&lookup, "DROPMAP_ZOOM_MAX", defaults.zoom_max)?,
            wheel_zoom_in: parse_f64(&lookup, "DROPMAP_WHEEL_ZOOM_IN", defaults.wheel_zoom_in)?,
            wheel_zoom_out: parse_f64(&lookup, "DROPMAP_WHEEL_ZOOM_OUT", defaults.wheel_zoom_out)?,
            hit_radius: parse_f64(&lookup, "DROPMAP_HIT_RADIUS", defaults.hit_radius)?,
            tap_slop_px: parse_f64(&lookup, "DROPMAP_TAP_SLOP_PX", defaults.tap_slop_px)?,
        };
        let config = config.validate()?;
        tracing::debug!(?config, "viewport config loaded");
        Ok(config)
    }

    /// Parse config from a (possibly partial) JSON object; missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] with serde's message if the JSON does not
    /// describe a config object, or [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value).map_err(|e| {
            tracing::warn!(error = %e, "viewport config JSON rejected");
            ConfigError::Json(e.to_string())
        })?;
        config.validate()
    }

    /// Check that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let fields = [
            ("zoom_min", self.zoom_min),
            ("zoom_max", self.zoom_max),
            ("wheel_zoom_in", self.wheel_zoom_in),
            ("wheel_zoom_out", self.wheel_zoom_out),
            ("hit_radius", self.hit_radius),
            ("tap_slop_px", self.tap_slop_px),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::Invalid { field, reason: "must be finite" });
            }
        }
        if self.zoom_min <= 0.0 {
            return Err(ConfigError::Invalid { field: "zoom_min", reason: "must be positive" });
        }
        if self.zoom_min > self.zoom_max {
            return Err(ConfigError::Invalid { field: "zoom_max", reason: "must not be below zoom_min" });
        }
        if self.wheel_zoom_in <= 1.0 {
            return Err(ConfigError::Invalid { field: "wheel_zoom_in", reason: "must be greater than 1" });
        }
        if self.wheel_zoom_out <= 0.0 || self.wheel_zoom_out >= 1.0 {
            return Err(ConfigError::Invalid { field: "wheel_zoom_out", reason: "must be between 0 and 1" });
        }
        if self.hit_radius < 0.0 {
            return Err(ConfigError::Invalid { field: "hit_radius", reason: "must not be negative" });
        }
        if self.tap_slop_px < 0.0 {
            return Err(ConfigError::Invalid { field: "tap_slop_px", reason: "must not be negative" });
        }
        Ok(self)
    }

    /// Zoom bounds as a [`ZoomRange`].
    #[must_use]
    pub fn zoom_range(&self) -> ZoomRange {
        ZoomRange { min: self.zoom_min, max: self.zoom_max }
    }
}

fn parse_f64(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: f64) -> Result<f64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::Parse { var, value: raw }),
    }
}
