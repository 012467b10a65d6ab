//! Tap dispatch and the flight-path drawing state machine.
//!
//! A classified tap means something different in each [`InteractionMode`]:
//!
//! | Mode | Tap effect |
//! |------|------------|
//! | `AddingSpot` | [`Action::SpotAdd`]; the mode stays on for repeated placement |
//! | `DrawingPath` | first tap records the start ([`Action::PathStart`]), second emits [`Action::PathEnd`] and turns drawing off |
//! | `SelectingSpot` | hit-test; roster spots toggle via [`Action::AlternateSelected`], free-form spots emit [`Action::SpotClicked`] |
//! | `Idle` | read-only hit-test emitting [`Action::SpotActivated`] |
//!
//! Nothing here mutates annotations. The host applies the authoritative change
//! in response to the emitted action.

#[cfg(test)]
#[path = "interaction_test.rs"]
mod interaction_test;

use tracing::debug;

use crate::annotation::{Spot, SpotKind};
use crate::engine::Action;
use crate::hit::hit_test;
use crate::input::{InteractionMode, ModeFlags};
use crate::viewport::Point;

/// Drawing progress that outlives a single tap.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    /// Start of the flight path being drawn, once the first tap landed.
    pub pending_start: Option<Point>,
}

impl InteractionState {
    /// Apply new mode flags, discarding a pending start if drawing is no longer in effect.
    pub fn set_modes(&mut self, modes: &mut ModeFlags, next: ModeFlags) {
        *modes = next;
        if next.effective() != InteractionMode::DrawingPath && self.pending_start.take().is_some() {
            debug!("pending flight path discarded by mode change");
        }
    }

    /// Segment from the pending start to `cursor`, while a path is being drawn.
    #[must_use]
    pub fn preview(&self, cursor: Option<Point>) -> Option<(Point, Point)> {
        Some((self.pending_start?, cursor?))
    }

    /// Interpret one tap at normalized point `at`.
    pub fn dispatch_tap(&mut self, modes: &mut ModeFlags, at: Point, spots: &[Spot], radius: f64) -> Option<Action> {
        let mode = modes.effective();
        debug!(?mode, x = at.x, y = at.y, "tap");
        match mode {
            InteractionMode::AddingSpot => Some(Action::SpotAdd(at)),
            InteractionMode::DrawingPath => match self.pending_start.take() {
                None => {
                    self.pending_start = Some(at);
                    Some(Action::PathStart(at))
                }
                Some(start) => {
                    modes.draw_path = false;
                    debug!(?start, end = ?at, "flight path completed");
                    Some(Action::PathEnd(at))
                }
            },
            InteractionMode::SelectingSpot => {
                let hit = hit_test(at, spots, radius)?;
                match hit.spot.kind {
                    SpotKind::Roster { owner_id, slot } => Some(Action::AlternateSelected { owner_id, slot }),
                    SpotKind::FreeForm { .. } => Some(Action::SpotClicked(hit.spot.identity())),
                }
            }
            InteractionMode::Idle => {
                let hit = hit_test(at, spots, radius)?;
                Some(Action::SpotActivated(hit.spot.identity()))
            }
        }
    }
}
