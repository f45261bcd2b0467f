//! Wire derivation: relationship lines between card pins, in screen space.
//!
//! Wires are rebuilt from scratch on every render from the current entity
//! positions, the relationship list and the camera. Nothing is cached, so a
//! card moved a moment ago is already wired at its new position.

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use std::collections::HashMap;

use crate::camera::{Camera, Point};
use crate::config::BoardConfig;
use crate::doc::{Entity, EntityId, Relationship, RelationshipId};

/// Text drawn above a wire's midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct WireLabel {
    pub text: String,
    /// Screen-space anchor for centred text.
    pub position: Point,
    pub font_px: f64,
}

/// One straight wire between two card pins.
#[derive(Debug, Clone, PartialEq)]
pub struct WireSegment {
    pub relationship_id: RelationshipId,
    pub from: Point,
    pub to: Point,
    pub stroke_width: f64,
    pub label: Option<WireLabel>,
}

/// The pin at the top centre of a card, in logical space.
#[must_use]
pub fn pin_point(entity: &Entity) -> Point {
    Point::new(entity.x + entity.width / 2.0, entity.y)
}

/// Build the wire list for the current snapshot.
///
/// Relationships whose endpoints are missing from `entities` are skipped.
/// Empty labels draw no text.
#[must_use]
pub fn wires(entities: &[Entity], relationships: &[Relationship], camera: &Camera, config: &BoardConfig) -> Vec<WireSegment> {
    let by_id: HashMap<EntityId, &Entity> = entities.iter().map(|e| (e.id, e)).collect();
    let stroke_width = camera.logical_dist_to_screen(config.wire_stroke_px);

    relationships
        .iter()
        .filter_map(|rel| {
            let from = by_id.get(&rel.from_id)?;
            let to = by_id.get(&rel.to_id)?;
            let from = camera.logical_to_screen(pin_point(from));
            let to = camera.logical_to_screen(pin_point(to));

            let label = rel.label.as_deref().filter(|t| !t.is_empty()).map(|text| {
                let mid = from.midpoint(to);
                WireLabel {
                    text: text.to_string(),
                    position: Point::new(mid.x, mid.y - camera.logical_dist_to_screen(config.label_offset_px)),
                    font_px: camera.logical_dist_to_screen(config.label_font_px),
                }
            });

            Some(WireSegment { relationship_id: rel.id, from, to, stroke_width, label })
        })
        .collect()
}
