//! Tunable settings for ribbon styling, interaction and playback.
//!
//! Every field has a default from [`crate::consts`]; a host may override any
//! subset by passing a JSON object to [`TrailConfig::from_json`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DRAG_THRESHOLD_PX, INITIAL_LINE_WIDTH, INITIAL_POINT_BUFFER, LINE_WIDTH_REDUCTION_FACTOR, MARKER_COLOR,
    MARKER_RADIUS_PX, MAX_ZOOM, MIN_LINE_WIDTH, RIBBON_RGB, SEEK_STEP_SECS, ZOOM_STEP,
};
use crate::ribbon::{GradientPolicy, RibbonStyle};

/// Error returned by [`TrailConfig::from_json`] and [`TrailConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input was not a valid JSON config object.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the engine cannot work with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// How playback frames are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedrawMode {
    /// Each playback tick schedules the next one until playback stops.
    #[default]
    Continuous,
    /// Each playback request draws one frame and does not reschedule.
    Single,
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub initial_line_width: f64,
    pub min_line_width: f64,
    pub line_width_reduction_factor: f64,
    pub initial_point_buffer: f64,
    pub drag_threshold_px: f64,
    pub zoom_step: f64,
    pub seek_step_secs: f64,
    pub marker_radius_px: f64,
    pub marker_color: String,
    pub ribbon_rgb: [u8; 3],
    pub gradient: GradientPolicy,
    pub redraw: RedrawMode,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            initial_line_width: INITIAL_LINE_WIDTH,
            min_line_width: MIN_LINE_WIDTH,
            line_width_reduction_factor: LINE_WIDTH_REDUCTION_FACTOR,
            initial_point_buffer: INITIAL_POINT_BUFFER,
            drag_threshold_px: DRAG_THRESHOLD_PX,
            zoom_step: ZOOM_STEP,
            seek_step_secs: SEEK_STEP_SECS,
            marker_radius_px: MARKER_RADIUS_PX,
            marker_color: MARKER_COLOR.to_string(),
            ribbon_rgb: RIBBON_RGB,
            gradient: GradientPolicy::default(),
            redraw: RedrawMode::default(),
        }
    }
}

impl TrailConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or wrongly typed
    /// fields and [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every numeric field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_line_width", self.initial_line_width)?;
        positive("min_line_width", self.min_line_width)?;
        if self.min_line_width > self.initial_line_width {
            return Err(ConfigError::Invalid { field: "min_line_width", reason: "exceeds initial_line_width" });
        }
        if !(self.line_width_reduction_factor.is_finite() && self.line_width_reduction_factor > 1.0) {
            return Err(ConfigError::Invalid {
                field: "line_width_reduction_factor",
                reason: "must be finite and greater than 1",
            });
        }
        non_negative("initial_point_buffer", self.initial_point_buffer)?;
        non_negative("drag_threshold_px", self.drag_threshold_px)?;
        if !(self.zoom_step > 1.0 && self.zoom_step <= MAX_ZOOM) {
            return Err(ConfigError::Invalid { field: "zoom_step", reason: "must be greater than 1 and at most MAX_ZOOM" });
        }
        positive("seek_step_secs", self.seek_step_secs)?;
        positive("marker_radius_px", self.marker_radius_px)?;
        Ok(())
    }

    /// The ribbon-building subset of the config.
    #[must_use]
    pub fn ribbon_style(&self) -> RibbonStyle {
        RibbonStyle {
            initial_line_width: self.initial_line_width,
            min_line_width: self.min_line_width,
            reduction_factor: self.line_width_reduction_factor,
            rgb: self.ribbon_rgb,
            gradient: self.gradient,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be finite and positive" })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be finite and non-negative" })
    }
}
