//! Viewport controller: the only owner of a mutable [`Camera`].
//!
//! Button zoom steps, wheel zoom toward the cursor, reset, and anchor-based
//! panning all live here. Other components read the camera by value through
//! [`ViewportController::camera`].

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::camera::{Camera, Point};
use crate::config::BoardConfig;
use crate::input::WheelDelta;

/// Round `value` to `decimals` decimal places.
///
/// Applied after each zoom step so repeated steps land on the same values
/// instead of accumulating binary drift.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Pan/zoom state machine for the whole board.
#[derive(Debug, Clone)]
pub struct ViewportController {
    camera: Camera,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
    wheel_zoom_step: f64,
    button_decimals: i32,
    wheel_decimals: i32,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl ViewportController {
    /// Create a controller at the identity transform.
    #[must_use]
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            camera: Camera::IDENTITY,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            wheel_zoom_step: config.wheel_zoom_step,
            button_decimals: config.button_zoom_decimals,
            wheel_decimals: config.wheel_zoom_decimals,
        }
    }

    /// The current transform.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    /// Zoom as a whole percentage, for the zoom control label.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn zoom_percent(&self) -> i64 {
        (self.camera.zoom * 100.0).round() as i64
    }

    #[must_use]
    pub fn can_zoom_in(&self) -> bool {
        self.camera.zoom < self.max_zoom
    }

    #[must_use]
    pub fn can_zoom_out(&self) -> bool {
        self.camera.zoom > self.min_zoom
    }

    /// Step zoom up by the button increment. Pan is unchanged.
    ///
    /// Returns `true` when the zoom changed.
    pub fn zoom_in(&mut self) -> bool {
        let next = round_to(self.camera.zoom + self.zoom_step, self.button_decimals).min(self.max_zoom);
        self.set_zoom(next)
    }

    /// Step zoom down by the button increment. Pan is unchanged.
    ///
    /// Returns `true` when the zoom changed.
    pub fn zoom_out(&mut self) -> bool {
        let next = round_to(self.camera.zoom - self.zoom_step, self.button_decimals).max(self.min_zoom);
        self.set_zoom(next)
    }

    /// Apply `delta` to the zoom while keeping the logical point under
    /// `screen` fixed on screen.
    ///
    /// Returns `true` when the zoom changed.
    pub fn zoom_at(&mut self, screen: Point, delta: f64) -> bool {
        let under_cursor = self.camera.screen_to_logical(screen);
        let zoom = round_to(self.camera.zoom + delta, self.wheel_decimals).clamp(self.min_zoom, self.max_zoom);
        if !self.set_zoom(zoom) {
            return false;
        }
        // Solve logical_to_screen(under_cursor) == screen for the new pan.
        self.camera.pan = screen - under_cursor * zoom;
        true
    }

    /// Wheel-driven zoom: scrolling down zooms out, up zooms in, by one wheel
    /// step toward `screen`. Purely horizontal scrolls do nothing.
    pub fn zoom_wheel(&mut self, screen: Point, delta: WheelDelta) -> bool {
        if delta.dy == 0.0 {
            return false;
        }
        let step = if delta.dy > 0.0 { -self.wheel_zoom_step } else { self.wheel_zoom_step };
        self.zoom_at(screen, step)
    }

    /// Back to zoom 1, no pan.
    pub fn reset_view(&mut self) {
        self.camera = Camera::IDENTITY;
    }

    /// Begin a pan at `screen`, returning the anchor to hand back to
    /// [`ViewportController::update_pan`].
    #[must_use]
    pub fn start_pan(&self, screen: Point) -> Point {
        screen - self.camera.pan
    }

    /// Move the pan so the anchor sits under `screen`.
    ///
    /// Depends only on the anchor and the latest pointer position, so dropped
    /// intermediate moves do not accumulate error.
    pub fn update_pan(&mut self, anchor: Point, screen: Point) {
        self.camera.pan = screen - anchor;
    }

    fn set_zoom(&mut self, zoom: f64) -> bool {
        if (zoom - self.camera.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.camera.zoom = zoom;
        true
    }
}
