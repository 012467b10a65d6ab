//! Input model: mouse buttons, wheel deltas, touch samples, and mode flags.
//!
//! These are the plain values the gesture controller consumes. Browser events
//! are converted into them by [`crate::dom`], which keeps the controller
//! testable without a rendering surface.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::viewport::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button; opens the context menu and never taps.
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = away from the user, zoom out).
    pub dy: f64,
}

/// Zoom direction implied by a wheel tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    In,
    Out,
}

impl WheelDelta {
    /// Direction of the tick, or `None` when there is no vertical component.
    #[must_use]
    pub fn direction(self) -> Option<WheelDirection> {
        if self.dy > 0.0 {
            Some(WheelDirection::Out)
        } else if self.dy < 0.0 {
            Some(WheelDirection::In)
        } else {
            None
        }
    }
}

/// One active touch point in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Browser-assigned identifier, stable for the lifetime of the touch.
    pub id: i32,
    pub client: Point,
}

impl Touch {
    #[must_use]
    pub fn new(id: i32, x: f64, y: f64) -> Self {
        Self { id, client: Point::new(x, y) }
    }
}

/// Mode toggles supplied by the operator's page.
///
/// The flags are not mutually exclusive; when several are set, add wins over
/// draw, and draw wins over select (see [`ModeFlags::effective`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeFlags {
    /// Taps place new spots.
    pub add_spot: bool,
    /// Taps draw the flight path (start, then end).
    pub draw_path: bool,
    /// Taps toggle roster spot selection.
    pub select_spots: bool,
}

/// Which tap semantics currently apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// Inspection only: taps activate a spot's detail view.
    Idle,
    AddingSpot,
    DrawingPath,
    SelectingSpot,
}

impl ModeFlags {
    /// Resolve the active mode by priority: add, then draw, then select.
    #[must_use]
    pub fn effective(self) -> InteractionMode {
        if self.add_spot {
            InteractionMode::AddingSpot
        } else if self.draw_path {
            InteractionMode::DrawingPath
        } else if self.select_spots {
            InteractionMode::SelectingSpot
        } else {
            InteractionMode::Idle
        }
    }
}
