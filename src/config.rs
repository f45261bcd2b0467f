//! Board configuration: zoom limits, card sizing rules and wire styling.
//!
//! The host usually keeps these alongside its own settings and hands them to
//! the engine as JSON. Every field is optional in the JSON form; missing
//! fields fall back to the defaults in [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    AUTO_CARD_HEIGHT, BUTTON_ZOOM_DECIMALS, CLICK_SLOP_PX, LABEL_FONT_PX, LABEL_OFFSET_PX,
    MAX_ZOOM, MIN_CARD_HEIGHT, MIN_CARD_WIDTH, MIN_ZOOM, RESIZE_HANDLE_PX, WHEEL_ZOOM_DECIMALS, WHEEL_ZOOM_STEP,
    WIRE_STROKE_PX, ZOOM_STEP,
};

/// Error returned by [`BoardConfig::from_json`] and [`BoardConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse board config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid zoom range: min {min} must not exceed max {max}")]
    InvalidZoomRange { min: f64, max: f64 },
    #[error("config field `{field}` must be a positive number")]
    NonPositive { field: &'static str },
    #[error("config field `{field}` must be between 0 and {max}, got {value}", max = MAX_ZOOM_DECIMALS)]
    DecimalsOutOfRange { field: &'static str, value: i32 },
}

/// Most decimal places a zoom step may be rounded to.
pub const MAX_ZOOM_DECIMALS: i32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Step used by the zoom buttons.
    pub zoom_step: f64,
    /// Step used per wheel notch.
    pub wheel_zoom_step: f64,
    pub button_zoom_decimals: i32,
    pub wheel_zoom_decimals: i32,
    /// Logical height standing in for an auto-sized card.
    pub auto_card_height: f64,
    pub min_card_width: f64,
    pub min_card_height: f64,
    pub resize_handle_px: f64,
    pub click_slop_px: f64,
    pub wire_stroke_px: f64,
    pub label_font_px: f64,
    pub label_offset_px: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            wheel_zoom_step: WHEEL_ZOOM_STEP,
            button_zoom_decimals: BUTTON_ZOOM_DECIMALS,
            wheel_zoom_decimals: WHEEL_ZOOM_DECIMALS,
            auto_card_height: AUTO_CARD_HEIGHT,
            min_card_width: MIN_CARD_WIDTH,
            min_card_height: MIN_CARD_HEIGHT,
            resize_handle_px: RESIZE_HANDLE_PX,
            click_slop_px: CLICK_SLOP_PX,
            wire_stroke_px: WIRE_STROKE_PX,
            label_font_px: LABEL_FONT_PX,
            label_offset_px: LABEL_OFFSET_PX,
        }
    }
}

impl BoardConfig {
    /// Parse a config from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the validation
    /// errors of [`BoardConfig::validate`] otherwise.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] when a size, step or zoom limit
    /// is zero, negative or not finite, [`ConfigError::DecimalsOutOfRange`]
    /// when a zoom rounding precision is outside `0..=MAX_ZOOM_DECIMALS`, and
    /// [`ConfigError::InvalidZoomRange`] when `min_zoom > max_zoom`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("zoom_step", self.zoom_step),
            ("wheel_zoom_step", self.wheel_zoom_step),
            ("auto_card_height", self.auto_card_height),
            ("min_card_width", self.min_card_width),
            ("min_card_height", self.min_card_height),
            ("resize_handle_px", self.resize_handle_px),
            ("wire_stroke_px", self.wire_stroke_px),
            ("label_font_px", self.label_font_px),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        for (field, value) in
            [("button_zoom_decimals", self.button_zoom_decimals), ("wheel_zoom_decimals", self.wheel_zoom_decimals)]
        {
            if !(0..=MAX_ZOOM_DECIMALS).contains(&value) {
                return Err(ConfigError::DecimalsOutOfRange { field, value });
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvalidZoomRange { min: self.min_zoom, max: self.max_zoom });
        }
        Ok(())
    }
}
