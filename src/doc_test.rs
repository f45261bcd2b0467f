#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;

fn store_with(n: usize) -> (BoardStore, Vec<EntityId>) {
    let mut store = BoardStore::new();
    let ids = (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64 * 300.0;
            store.add_entity_at(x, 0.0)
        })
        .collect();
    (store, ids)
}

// =============================================================
// CardHeight
// =============================================================

#[test]
fn card_height_fixed_rejects_non_positive_and_non_finite() {
    assert_eq!(CardHeight::fixed(120.0), CardHeight::Fixed(120.0));
    assert_eq!(CardHeight::fixed(0.0), CardHeight::Auto);
    assert_eq!(CardHeight::fixed(-5.0), CardHeight::Auto);
    assert_eq!(CardHeight::fixed(f64::NAN), CardHeight::Auto);
    assert_eq!(CardHeight::fixed(f64::INFINITY), CardHeight::Auto);
}

#[test]
fn card_height_resolve_and_value() {
    assert_eq!(CardHeight::Auto.resolve(120.0), 120.0);
    assert_eq!(CardHeight::Fixed(90.0).resolve(120.0), 90.0);
    assert_eq!(CardHeight::Auto.value(), None);
    assert_eq!(CardHeight::Fixed(90.0).value(), Some(90.0));
    assert!(CardHeight::default().is_auto());
}

#[test]
fn card_height_serializes_as_optional_number() {
    assert_eq!(serde_json::to_value(CardHeight::Fixed(42.0)).unwrap(), json!(42.0));
    assert_eq!(serde_json::to_value(CardHeight::Auto).unwrap(), json!(null));
    assert_eq!(serde_json::from_value::<CardHeight>(json!(null)).unwrap(), CardHeight::Auto);
    assert_eq!(serde_json::from_value::<CardHeight>(json!(0)).unwrap(), CardHeight::Auto);
    assert_eq!(serde_json::from_value::<CardHeight>(json!(75.5)).unwrap(), CardHeight::Fixed(75.5));
}

// =============================================================
// Entity serde
// =============================================================

#[test]
fn entity_defaults_missing_width_and_height() {
    let id = Uuid::new_v4();
    let e: Entity = serde_json::from_value(json!({ "id": id, "x": 10.0, "y": 20.0 })).unwrap();
    assert_eq!(e, Entity::new(id, 10.0, 20.0));
    assert_eq!(e.width, 180.0);
    assert!(e.height.is_auto());
}

#[test]
fn entity_unusable_width_loads_as_default() {
    let id = Uuid::new_v4();
    for width in [json!(null), json!(0), json!(-40.0)] {
        let e: Entity = serde_json::from_value(json!({ "id": id, "x": 0.0, "y": 0.0, "width": width.clone() })).unwrap();
        assert_eq!(e.width, 180.0, "width {width}");
    }
}

#[test]
fn entity_ignores_unknown_fields() {
    let id = Uuid::new_v4();
    let e: Entity = serde_json::from_value(json!({
        "id": id, "x": 1.0, "y": 2.0, "width": 200.0, "height": 150.0,
        "name": "Colonel Mustard", "role": "suspect"
    }))
    .unwrap();
    assert_eq!(e.height, CardHeight::Fixed(150.0));
}

#[test]
fn entity_requires_position() {
    let id = Uuid::new_v4();
    assert!(serde_json::from_value::<Entity>(json!({ "id": id, "x": 1.0 })).is_err());
}

// =============================================================
// Relationship
// =============================================================

#[test]
fn relationship_connects_is_symmetric() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let r = Relationship { id: Uuid::new_v4(), from_id: a, to_id: b, label: None };
    assert!(r.connects(a, b));
    assert!(r.connects(b, a));
    assert!(!r.connects(a, c));
    assert!(r.touches(a) && r.touches(b) && !r.touches(c));
}

// =============================================================
// BoardStore: relationships
// =============================================================

#[test]
fn add_relationship_then_reverse_is_rejected() {
    let (mut store, ids) = store_with(2);
    let (a, b) = (ids[0], ids[1]);
    store.add_relationship(a, b, Some("alibi".into())).unwrap();

    let err = store.add_relationship(b, a, None).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateRelationship { .. }));
    let err = store.add_relationship(a, b, Some("again".into())).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateRelationship { .. }));

    assert_eq!(store.relationships_between(a, b), 1);
    assert_eq!(store.relationships().len(), 1);
}

#[test]
fn add_self_relationship_is_rejected() {
    let (mut store, ids) = store_with(1);
    let err = store.add_relationship(ids[0], ids[0], None).unwrap_err();
    assert!(matches!(err, StoreError::SelfRelationship(id) if id == ids[0]));
    assert!(store.relationships().is_empty());
}

#[test]
fn add_relationship_to_unknown_entity_is_rejected() {
    let (mut store, ids) = store_with(1);
    let ghost = Uuid::new_v4();
    let err = store.add_relationship(ids[0], ghost, None).unwrap_err();
    assert!(matches!(err, StoreError::UnknownEntity(id) if id == ghost));
}

#[test]
fn blank_label_is_stored_as_none() {
    let (mut store, ids) = store_with(2);
    store.add_relationship(ids[0], ids[1], Some("   ".into())).unwrap();
    assert_eq!(store.relationships()[0].label, None);
}

#[test]
fn remove_relationship_allows_re_adding_pair() {
    let (mut store, ids) = store_with(2);
    let rid = store.add_relationship(ids[0], ids[1], None).unwrap();
    assert!(store.remove_relationship(rid).is_some());
    assert!(store.remove_relationship(rid).is_none());
    assert!(store.add_relationship(ids[1], ids[0], None).is_ok());
}

// =============================================================
// BoardStore: entities
// =============================================================

#[test]
fn entities_keep_insertion_order() {
    let (store, ids) = store_with(3);
    let order: Vec<EntityId> = store.entities().iter().map(|e| e.id).collect();
    assert_eq!(order, ids);
}

#[test]
fn insert_entity_replaces_in_place() {
    let (mut store, ids) = store_with(3);
    store.insert_entity(Entity::new(ids[1], -5.0, -5.0));
    assert_eq!(store.entities().len(), 3);
    assert_eq!(store.entities()[1].x, -5.0);
}

#[test]
fn remove_entity_cascades_relationships_and_selection() {
    let (mut store, ids) = store_with(3);
    store.add_relationship(ids[0], ids[1], None).unwrap();
    store.add_relationship(ids[1], ids[2], None).unwrap();
    store.add_relationship(ids[0], ids[2], None).unwrap();
    store.select_entity(Some(ids[1]));

    let removed = store.remove_entity(ids[1]).unwrap();
    assert_eq!(removed.id, ids[1]);
    assert_eq!(store.relationships().len(), 1);
    assert!(store.relationships()[0].connects(ids[0], ids[2]));
    assert_eq!(store.selected(), None);
    assert!(store.remove_entity(ids[1]).is_none());
}

#[test]
fn move_and_resize_update_entity() {
    let (mut store, ids) = store_with(1);
    store.move_entity(ids[0], 42.0, -7.0);
    store.resize_entity(ids[0], 250.0, CardHeight::Fixed(140.0));
    let e = store.entity(ids[0]).unwrap();
    assert_eq!((e.x, e.y), (42.0, -7.0));
    assert_eq!(e.width, 250.0);
    assert_eq!(e.height, CardHeight::Fixed(140.0));
}

#[test]
fn mutations_for_unknown_entities_are_ignored() {
    let (mut store, _) = store_with(1);
    let before = store.snapshot();
    let ghost = Uuid::new_v4();
    store.move_entity(ghost, 1.0, 1.0);
    store.resize_entity(ghost, 300.0, CardHeight::Auto);
    store.select_entity(Some(ghost));
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.selected(), None);
}

#[test]
fn apply_actions_forwards_mutations() {
    let (mut store, ids) = store_with(1);
    let id = ids[0];
    apply_actions(
        &mut store,
        &[
            Action::EntitySelected(Some(id)),
            Action::EntityMoved { id, x: 5.0, y: 6.0 },
            Action::EntityResized { id, width: 200.0, height: CardHeight::Fixed(100.0) },
            Action::SetCursor("grab".into()),
            Action::RenderNeeded,
        ],
    );
    assert_eq!(store.selected(), Some(id));
    let e = store.entity(id).unwrap();
    assert_eq!((e.x, e.y, e.width), (5.0, 6.0, 200.0));
    assert_eq!(e.height, CardHeight::Fixed(100.0));
}

// =============================================================
// Snapshots
// =============================================================

#[test]
fn snapshot_round_trips_through_json() {
    let (mut store, ids) = store_with(2);
    store.resize_entity(ids[1], 240.0, CardHeight::Fixed(130.0));
    store.add_relationship(ids[0], ids[1], Some("saw".into())).unwrap();

    let raw = store.snapshot().to_json().unwrap();
    let parsed = BoardSnapshot::from_json(&raw).unwrap();
    assert_eq!(parsed, store.snapshot());

    let mut other = BoardStore::new();
    assert_eq!(other.load_snapshot(parsed), 0);
    assert_eq!(other.snapshot(), store.snapshot());
}

#[test]
fn load_snapshot_drops_invalid_relationships() {
    let (a, b, ghost) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let raw = json!({
        "entities": [
            { "id": a, "x": 0.0, "y": 0.0 },
            { "id": b, "x": 300.0, "y": 0.0, "width": 200.0 }
        ],
        "relationships": [
            { "id": Uuid::new_v4(), "from_id": a, "to_id": b, "label": "alibi" },
            { "id": Uuid::new_v4(), "from_id": b, "to_id": a },
            { "id": Uuid::new_v4(), "from_id": a, "to_id": a },
            { "id": Uuid::new_v4(), "from_id": a, "to_id": ghost }
        ]
    });
    let snapshot = BoardSnapshot::from_json(&raw.to_string()).unwrap();

    let mut store = BoardStore::new();
    assert_eq!(store.load_snapshot(snapshot), 3);
    assert_eq!(store.entities().len(), 2);
    assert_eq!(store.relationships().len(), 1);
    assert_eq!(store.relationships()[0].label.as_deref(), Some("alibi"));
    assert_eq!(store.entity(a).unwrap().width, 180.0);
}

#[test]
fn load_snapshot_keeps_null_and_zero_width_cards_and_their_wires() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let raw = json!({
        "entities": [
            { "id": a, "x": 0.0, "y": 0.0, "width": 0 },
            { "id": b, "x": 300.0, "y": 0.0, "width": null }
        ],
        "relationships": [
            { "id": Uuid::new_v4(), "from_id": a, "to_id": b, "label": "alibi" }
        ]
    });
    let snapshot = BoardSnapshot::from_json(&raw.to_string()).unwrap();

    let mut store = BoardStore::new();
    assert_eq!(store.load_snapshot(snapshot), 0);
    assert_eq!(store.entity(a).unwrap().width, 180.0);
    assert_eq!(store.entity(b).unwrap().width, 180.0);
    assert_eq!(store.relationships().len(), 1);
}

#[test]
fn load_snapshot_resets_unusable_in_memory_width() {
    let id = Uuid::new_v4();
    let snapshot = BoardSnapshot {
        entities: vec![Entity::new(id, 0.0, 0.0).with_size(f64::NAN, CardHeight::Auto)],
        relationships: Vec::new(),
    };
    let mut store = BoardStore::new();
    assert_eq!(store.load_snapshot(snapshot), 0);
    assert_eq!(store.entity(id).unwrap().width, 180.0);
}

#[test]
fn load_snapshot_drops_non_finite_positions_and_duplicate_ids() {
    let id = Uuid::new_v4();
    let snapshot = BoardSnapshot {
        entities: vec![
            Entity::new(id, 10.0, 20.0),
            Entity::new(id, 500.0, 500.0),
            Entity::new(Uuid::new_v4(), f64::INFINITY, 0.0),
        ],
        relationships: Vec::new(),
    };
    let mut store = BoardStore::new();
    assert_eq!(store.load_snapshot(snapshot), 2);
    assert_eq!(store.entities().len(), 1);
    let kept = store.entity(id).unwrap();
    assert_eq!((kept.x, kept.y), (10.0, 20.0));
}

#[test]
fn load_snapshot_replaces_previous_contents() {
    let (mut store, _) = store_with(3);
    store.select_entity(Some(store.entities()[0].id));
    assert_eq!(store.load_snapshot(BoardSnapshot::default()), 0);
    assert!(store.entities().is_empty());
    assert_eq!(store.selected(), None);
}

#[test]
fn snapshot_from_malformed_json_is_an_error() {
    let err = BoardSnapshot::from_json("[1, 2").unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
}

#[test]
fn empty_object_is_an_empty_snapshot() {
    assert_eq!(BoardSnapshot::from_json("{}").unwrap(), BoardSnapshot::default());
}
