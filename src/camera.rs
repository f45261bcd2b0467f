//! Viewport transform: the pan offset and zoom factor mapping logical board
//! space to screen space.
//!
//! Every conversion between the two spaces goes through
//! [`Camera::screen_to_logical`] and [`Camera::logical_to_screen`]. Drag,
//! resize, wire placement and zoom-toward-cursor all share them so the spaces
//! never drift apart.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Div, Mul, Sub};

/// A point in either screen or logical space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        (self + other) / 2.0
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Camera state for pan/zoom on the board.
///
/// `pan` is in screen pixels. `zoom` is a scale factor (1.0 = no zoom).
/// The camera is `Copy`: only the viewport controller holds a mutable one,
/// everything else receives a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan: Point,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Camera {
    /// Zoom 1, no pan.
    pub const IDENTITY: Self = Self { pan: Point::ORIGIN, zoom: 1.0 };

    #[must_use]
    pub fn new(pan: Point, zoom: f64) -> Self {
        Self { pan, zoom }
    }

    /// Convert a screen-space point to logical board coordinates.
    #[must_use]
    pub fn screen_to_logical(&self, screen: Point) -> Point {
        (screen - self.pan) / self.zoom
    }

    /// Convert a logical board point to screen coordinates.
    #[must_use]
    pub fn logical_to_screen(&self, logical: Point) -> Point {
        logical * self.zoom + self.pan
    }

    /// Convert a screen-space distance (pixels) to a logical distance.
    #[must_use]
    pub fn screen_dist_to_logical(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Convert a logical distance to screen pixels.
    #[must_use]
    pub fn logical_dist_to_screen(&self, logical_dist: f64) -> f64 {
        logical_dist * self.zoom
    }

    /// CSS `transform` for a DOM layer positioned in logical space, with
    /// `transform-origin: 0 0`.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.pan.x, self.pan.y, self.zoom)
    }
}
