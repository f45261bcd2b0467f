//! Input model: mouse buttons, wheel deltas, and the gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each active variant carries the context captured at press time
//! so that every move can be computed from the press plus the latest pointer
//! position alone.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::EntityId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// The active gesture. Exactly one variant holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the board background.
    Panning {
        /// `press - pan` at pan start; pan is always `pointer - anchor`.
        anchor: Point,
        /// Screen position of the press.
        origin: Point,
        /// Whether the pointer has left the click slop around `origin`.
        moved: bool,
    },
    /// Moving a card.
    DraggingCard {
        id: EntityId,
        /// Press position relative to the card's top-left corner, in screen pixels.
        pointer_offset: Point,
    },
    /// Resizing a card from its bottom-right affordance.
    ResizingCard {
        id: EntityId,
        /// Logical position of the press.
        anchor: Point,
        start_width: f64,
        start_height: f64,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The card this gesture targets, if it targets one.
    #[must_use]
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Self::DraggingCard { id, .. } | Self::ResizingCard { id, .. } => Some(*id),
            Self::Idle | Self::Panning { .. } => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::DraggingCard { .. } => "dragging",
            Self::ResizingCard { .. } => "resizing",
        }
    }
}
