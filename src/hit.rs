#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::config::BoardConfig;
use crate::doc::{Entity, EntityId};

/// Which part of a card was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// The bottom-right resize affordance (only present on the selected card).
    ResizeHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub entity_id: EntityId,
    pub part: HitPart,
}

/// Axis-aligned rectangle. Space (screen or logical) depends on the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }
}

/// Logical bounds of a card, with auto height resolved to
/// `config.auto_card_height`.
#[must_use]
pub fn card_bounds(entity: &Entity, config: &BoardConfig) -> Rect {
    Rect::new(entity.x, entity.y, entity.width, entity.height.resolve(config.auto_card_height))
}

/// Logical bounds of a card's resize affordance: a square of
/// `config.resize_handle_px` screen pixels tucked into the bottom-right corner.
#[must_use]
pub fn resize_handle_bounds(entity: &Entity, camera: &Camera, config: &BoardConfig) -> Rect {
    let card = card_bounds(entity, config);
    let side = camera.screen_dist_to_logical(config.resize_handle_px);
    Rect::new(card.x + card.width - side, card.y + card.height - side, side, side)
}

/// Test which card (if any) is under `logical_pt`.
///
/// The selected card's resize affordance is checked first, then card bodies
/// from the top of the render order down.
#[must_use]
pub fn hit_test(
    logical_pt: Point,
    entities: &[Entity],
    camera: &Camera,
    selected_id: Option<EntityId>,
    config: &BoardConfig,
) -> Option<Hit> {
    if let Some(selected) = selected_id.and_then(|id| entities.iter().find(|e| e.id == id)) {
        if resize_handle_bounds(selected, camera, config).contains(logical_pt) {
            return Some(Hit { entity_id: selected.id, part: HitPart::ResizeHandle });
        }
    }

    entities
        .iter()
        .rev()
        .find(|e| card_bounds(e, config).contains(logical_pt))
        .map(|e| Hit { entity_id: e.id, part: HitPart::Body })
}
