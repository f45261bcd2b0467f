//! Spatial board engine for an investigation board.
//!
//! Entity cards sit on a pannable, zoomable board and are joined by labelled
//! relationship wires. This crate owns the interactive part: the viewport
//! transform, dragging and resizing cards, and deriving the wires. It is
//! compiled to WebAssembly and runs in the browser; the host owns the entity
//! store, the editing forms and persistence, wires DOM events to the engine,
//! and applies the resulting [`engine::Action`]s to its store.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Entity/relationship types, the store trait, and an in-memory store |
//! | [`camera`] | Viewport transform and screen/logical conversions |
//! | [`viewport`] | Pan and zoom controller, the sole owner of the camera |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`card`] | Drag and resize arithmetic for cards |
//! | [`hit`] | Hit-testing cards and the resize affordance |
//! | [`wire`] | Relationship wire derivation in screen space |
//! | [`render`] | Painting wires to the canvas |
//! | [`config`] | Board configuration |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod card;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod render;
pub mod viewport;
pub mod wire;
