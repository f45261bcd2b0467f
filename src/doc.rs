//! Document model: entity cards, relationships, and the store contract.
//!
//! The engine does not own entities or relationships. It reads them from an
//! [`EntityStore`] and asks for mutations through the same trait (usually by
//! way of [`apply_actions`]). [`BoardStore`] is an in-memory store that
//! enforces the relationship rules and round-trips the minimal persisted
//! fields through JSON.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::consts::DEFAULT_CARD_WIDTH;
use crate::engine::Action;

/// Unique identifier for an entity card.
pub type EntityId = Uuid;

/// Unique identifier for a relationship.
pub type RelationshipId = Uuid;

/// Error returned by [`BoardStore`] mutations and snapshot parsing.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entity {0} cannot be related to itself")]
    SelfRelationship(EntityId),
    #[error("entities {from} and {to} are already related")]
    DuplicateRelationship { from: EntityId, to: EntityId },
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    #[error("board snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Logical card height: sized to content, or pinned to an explicit value.
///
/// Serialized as an optional number (absent or `null` = auto).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum CardHeight {
    #[default]
    Auto,
    Fixed(f64),
}

impl CardHeight {
    /// A fixed height, or `Auto` when `height` is not a positive finite number.
    #[must_use]
    pub fn fixed(height: f64) -> Self {
        if height.is_finite() && height > 0.0 { Self::Fixed(height) } else { Self::Auto }
    }

    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Fixed(h) => Some(h),
        }
    }

    /// The logical height to use in geometry, with `auto` standing in for
    /// an auto-sized card.
    #[must_use]
    pub fn resolve(self, auto: f64) -> f64 {
        self.value().unwrap_or(auto)
    }

    #[must_use]
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<Option<f64>> for CardHeight {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Auto, Self::fixed)
    }
}

impl From<CardHeight> for Option<f64> {
    fn from(value: CardHeight) -> Self {
        value.value()
    }
}

fn default_width() -> f64 {
    DEFAULT_CARD_WIDTH
}

fn is_usable_width(width: f64) -> bool {
    width.is_finite() && width > 0.0
}

/// Missing, `null`, non-finite and non-positive widths load as
/// [`DEFAULT_CARD_WIDTH`].
fn deserialize_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let width = Option::<f64>::deserialize(deserializer)?;
    Ok(width.filter(|w| is_usable_width(*w)).unwrap_or(DEFAULT_CARD_WIDTH))
}

/// A positioned, resizable card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Left edge in logical coordinates.
    pub x: f64,
    /// Top edge in logical coordinates.
    pub y: f64,
    /// Logical width. Boards saved before cards were resizable have none
    /// (or `null`, or 0); those load at the default width.
    #[serde(default = "default_width", deserialize_with = "deserialize_width")]
    pub width: f64,
    #[serde(default)]
    pub height: CardHeight,
}

impl Entity {
    /// A default-width, auto-height card at `(x, y)`.
    #[must_use]
    pub fn new(id: EntityId, x: f64, y: f64) -> Self {
        Self { id, x, y, width: DEFAULT_CARD_WIDTH, height: CardHeight::Auto }
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: CardHeight) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn has_finite_position(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An undirected, optionally labelled edge between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub from_id: EntityId,
    pub to_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Relationship {
    /// Whether this relationship joins `a` and `b`, in either direction.
    #[must_use]
    pub fn connects(&self, a: EntityId, b: EntityId) -> bool {
        (self.from_id == a && self.to_id == b) || (self.from_id == b && self.to_id == a)
    }

    /// Whether `id` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, id: EntityId) -> bool {
        self.from_id == id || self.to_id == id
    }
}

/// The store-facing interface of the board engine.
///
/// Mutations are fire-and-forget requests; the store echoes the resulting
/// state back through the next snapshot.
pub trait EntityStore {
    /// Entities in render order (later entries draw on top).
    fn entities(&self) -> &[Entity];
    fn relationships(&self) -> &[Relationship];
    fn move_entity(&mut self, id: EntityId, x: f64, y: f64);
    fn resize_entity(&mut self, id: EntityId, width: f64, height: CardHeight);
    fn select_entity(&mut self, id: Option<EntityId>);
}

/// Forward engine actions to a store. Host-only actions are skipped.
pub fn apply_actions<S: EntityStore + ?Sized>(store: &mut S, actions: &[Action]) {
    for action in actions {
        match action {
            Action::EntityMoved { id, x, y } => store.move_entity(*id, *x, *y),
            Action::EntityResized { id, width, height } => store.resize_entity(*id, *width, *height),
            Action::EntitySelected(id) => store.select_entity(*id),
            Action::SetCursor(_) | Action::RenderNeeded => {}
        }
    }
}

/// The persisted subset of a board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl BoardSnapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if the JSON is malformed or a required
    /// field is missing.
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// In-memory entity and relationship store.
///
/// Entities keep insertion order, which is also their render order.
#[derive(Debug, Clone, Default)]
pub struct BoardStore {
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
    selected: Option<EntityId>,
}

impl BoardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, replacing any existing entity with the same id in
    /// place.
    pub fn insert_entity(&mut self, entity: Entity) {
        match self.index_of(entity.id) {
            Some(i) => self.entities[i] = entity,
            None => self.entities.push(entity),
        }
    }

    /// Create a default-sized card at `(x, y)` and return its id.
    pub fn add_entity_at(&mut self, x: f64, y: f64) -> EntityId {
        let id = Uuid::new_v4();
        self.entities.push(Entity::new(id, x, y));
        id
    }

    /// Remove an entity, every relationship touching it, and its selection.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        let removed = self.entities.remove(index);
        self.relationships.retain(|r| !r.touches(id));
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(removed)
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Relate `from` and `to`.
    ///
    /// # Errors
    ///
    /// Rejects self-relationships, endpoints not in the store, and a second
    /// relationship between the same pair in either direction.
    pub fn add_relationship(
        &mut self,
        from: EntityId,
        to: EntityId,
        label: Option<String>,
    ) -> Result<RelationshipId, StoreError> {
        if from == to {
            return Err(StoreError::SelfRelationship(from));
        }
        for id in [from, to] {
            if self.index_of(id).is_none() {
                return Err(StoreError::UnknownEntity(id));
            }
        }
        if self.relationships.iter().any(|r| r.connects(from, to)) {
            return Err(StoreError::DuplicateRelationship { from, to });
        }
        let id = Uuid::new_v4();
        let label = label.filter(|l| !l.trim().is_empty());
        self.relationships.push(Relationship { id, from_id: from, to_id: to, label });
        Ok(id)
    }

    pub fn remove_relationship(&mut self, id: RelationshipId) -> Option<Relationship> {
        let index = self.relationships.iter().position(|r| r.id == id)?;
        Some(self.relationships.remove(index))
    }

    /// Number of relationships joining `a` and `b` (0 or 1 while the store
    /// rules hold).
    #[must_use]
    pub fn relationships_between(&self, a: EntityId, b: EntityId) -> usize {
        self.relationships.iter().filter(|r| r.connects(a, b)).count()
    }

    /// Copy out the persisted subset.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot { entities: self.entities.clone(), relationships: self.relationships.clone() }
    }

    /// Replace all contents with a snapshot.
    ///
    /// Entities with a non-finite position or a repeated id, and
    /// relationships that would break the store rules (self-loops,
    /// duplicates, unknown endpoints), are dropped with a warning. Unusable
    /// widths are reset to the default. Returns the number of dropped entries.
    pub fn load_snapshot(&mut self, snapshot: BoardSnapshot) -> usize {
        self.entities.clear();
        self.relationships.clear();
        self.selected = None;
        let mut dropped = 0;

        for mut entity in snapshot.entities {
            if !entity.has_finite_position() {
                warn!(id = %entity.id, "dropping entity with non-finite position");
                dropped += 1;
                continue;
            }
            if self.index_of(entity.id).is_some() {
                warn!(id = %entity.id, "dropping entity with duplicate id");
                dropped += 1;
                continue;
            }
            if !is_usable_width(entity.width) {
                debug!(id = %entity.id, width = entity.width, "unusable width reset to default");
                entity.width = DEFAULT_CARD_WIDTH;
            }
            self.entities.push(entity);
        }

        for rel in snapshot.relationships {
            let (from, to) = (rel.from_id, rel.to_id);
            let reason = if from == to {
                Some("self-relationship")
            } else if self.index_of(from).is_none() || self.index_of(to).is_none() {
                Some("unknown endpoint")
            } else if self.relationships.iter().any(|r| r.connects(from, to)) {
                Some("duplicate pair")
            } else {
                None
            };
            if let Some(reason) = reason {
                warn!(id = %rel.id, %from, %to, reason, "dropping relationship from snapshot");
                dropped += 1;
                continue;
            }
            self.relationships.push(rel);
        }

        debug!(entities = self.entities.len(), relationships = self.relationships.len(), dropped, "snapshot loaded");
        dropped
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }
}

impl EntityStore for BoardStore {
    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    fn move_entity(&mut self, id: EntityId, x: f64, y: f64) {
        match self.entity_mut(id) {
            Some(entity) => {
                entity.x = x;
                entity.y = y;
            }
            None => debug!(%id, "move for unknown entity ignored"),
        }
    }

    fn resize_entity(&mut self, id: EntityId, width: f64, height: CardHeight) {
        match self.entity_mut(id) {
            Some(entity) => {
                entity.width = width;
                entity.height = height;
            }
            None => debug!(%id, "resize for unknown entity ignored"),
        }
    }

    fn select_entity(&mut self, id: Option<EntityId>) {
        self.selected = id.filter(|id| self.index_of(*id).is_some());
    }
}
