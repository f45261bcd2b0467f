//! Card gesture math: turning pointer positions into card positions and sizes.
//!
//! Everything here is a pure function of the state captured at press time,
//! the latest pointer position, and the current [`Camera`]. The engine owns
//! the state machine; this module owns the arithmetic.

#[cfg(test)]
#[path = "card_test.rs"]
mod card_test;

use crate::camera::{Camera, Point};
use crate::config::BoardConfig;
use crate::consts::DRAG_BOUND_CARD_MULTIPLE;
use crate::doc::Entity;

/// Press position relative to the card's top-left corner, in screen pixels.
#[must_use]
pub fn pointer_offset(entity: &Entity, press_screen: Point, camera: &Camera) -> Point {
    press_screen - camera.logical_to_screen(Point::new(entity.x, entity.y))
}

/// Region a dragged card's top-left corner may occupy, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBounds {
    pub min: Point,
    pub max: Point,
}

impl DragBounds {
    /// Bounds for a card of `card_size` on a viewport of `viewport_size`
    /// screen pixels: up to two card-sizes past the top/left edge and one
    /// card-size past the visible far edge.
    ///
    /// Returns `None` until the viewport has a size.
    #[must_use]
    pub fn around_viewport(card_size: Point, viewport_size: Point, camera: &Camera) -> Option<Self> {
        if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 {
            return None;
        }
        let visible = viewport_size / camera.zoom;
        Some(Self { min: card_size * -DRAG_BOUND_CARD_MULTIPLE, max: visible + card_size })
    }

    #[must_use]
    pub fn clamp(&self, pt: Point) -> Point {
        Point::new(pt.x.clamp(self.min.x, self.max.x), pt.y.clamp(self.min.y, self.max.y))
    }
}

/// New logical top-left for a dragged card.
///
/// `pointer_offset` was captured in screen pixels, so it is scaled back to
/// logical units before it is subtracted.
#[must_use]
pub fn drag_position(pointer_screen: Point, pointer_offset: Point, camera: &Camera, bounds: Option<DragBounds>) -> Point {
    let board_pt = camera.screen_to_logical(pointer_screen);
    let offset = Point::new(camera.screen_dist_to_logical(pointer_offset.x), camera.screen_dist_to_logical(pointer_offset.y));
    let pos = board_pt - offset;
    bounds.map_or(pos, |b| b.clamp(pos))
}

/// Logical anchor for a resize starting at `press_screen`.
#[must_use]
pub fn resize_anchor(press_screen: Point, camera: &Camera) -> Point {
    camera.screen_to_logical(press_screen)
}

/// Card size at the start of a resize, with auto height resolved.
#[must_use]
pub fn resize_start_size(entity: &Entity, config: &BoardConfig) -> (f64, f64) {
    (entity.width, entity.height.resolve(config.auto_card_height))
}

/// New logical `(width, height)` for a card being resized, floored at the
/// configured minimums.
#[must_use]
pub fn resized(
    pointer_screen: Point,
    anchor: Point,
    start_width: f64,
    start_height: f64,
    camera: &Camera,
    config: &BoardConfig,
) -> (f64, f64) {
    let delta = camera.screen_to_logical(pointer_screen) - anchor;
    (
        (start_width + delta.x).max(config.min_card_width),
        (start_height + delta.y).max(config.min_card_height),
    )
}
