//! Shared numeric constants for the board engine.
//!
//! Most of these are the defaults behind [`crate::config::BoardConfig`] and
//! are read through the config. The rest are fixed: the default card width
//! (part of the snapshot format), the drag-bound multiple and the wire
//! colours.

// ── Zoom ────────────────────────────────────────────────────────

/// Lowest zoom factor the viewport will accept.
pub const MIN_ZOOM: f64 = 0.5;

/// Highest zoom factor the viewport will accept.
pub const MAX_ZOOM: f64 = 2.0;

/// Zoom increment applied by the zoom-in / zoom-out buttons.
pub const ZOOM_STEP: f64 = 0.1;

/// Zoom increment applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.05;

/// Decimal places kept after a button zoom step.
pub const BUTTON_ZOOM_DECIMALS: i32 = 1;

/// Decimal places kept after a wheel zoom step.
pub const WHEEL_ZOOM_DECIMALS: i32 = 2;

// ── Cards ───────────────────────────────────────────────────────

/// Logical width of a card that never had one set.
pub const DEFAULT_CARD_WIDTH: f64 = 180.0;

/// Logical height assumed for an auto-sized card in hit-testing, drag bounds
/// and the start of a resize.
pub const AUTO_CARD_HEIGHT: f64 = 120.0;

/// Resize never shrinks a card below this logical width.
pub const MIN_CARD_WIDTH: f64 = 120.0;

/// Resize never shrinks a card below this logical height.
pub const MIN_CARD_HEIGHT: f64 = 80.0;

/// Cards may be dragged this many card-sizes past the top/left edge.
pub const DRAG_BOUND_CARD_MULTIPLE: f64 = 2.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side of the square resize affordance at a selected card's bottom-right
/// corner, in screen pixels.
pub const RESIZE_HANDLE_PX: f64 = 16.0;

/// Pointer travel (screen pixels) below which a background press-release is
/// still a click rather than a pan.
pub const CLICK_SLOP_PX: f64 = 3.0;

// ── Wires ───────────────────────────────────────────────────────

/// Wire thickness at zoom 1, in screen pixels.
pub const WIRE_STROKE_PX: f64 = 3.0;

/// Label font size at zoom 1, in screen pixels.
pub const LABEL_FONT_PX: f64 = 12.0;

/// Distance a wire label sits above the wire midpoint at zoom 1.
pub const LABEL_OFFSET_PX: f64 = 10.0;

/// Wire stroke colour.
pub const WIRE_COLOR: &str = "#dc2626";

/// Wire label fill colour.
pub const LABEL_COLOR: &str = "#1f2937";
