//! Gesture controller: turns raw mouse, wheel, and touch events into viewport
//! mutations and at most one tap per discrete interaction.
//!
//! All state lives in [`GestureState`], a plain value owned by the engine. The
//! [`Controller`] borrows that state together with the [`ViewportState`] for
//! the duration of one event, so every handler is a pure function of its
//! inputs and can be driven from tests without a browser.
//!
//! Only one of mouse panning, touch panning, or pinching is active at a time.
//! Any change in the number of touches goes through [`GesturePhase::Idle`]
//! rather than carrying state from one gesture shape into another.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use tracing::debug;

use crate::config::ViewportConfig;
use crate::input::{Button, Touch, WheelDelta, WheelDirection};
use crate::viewport::{Point, Rect, ViewportState};

/// Minimum finger separation, in pixels, for a pinch to have a usable baseline.
const MIN_PINCH_DISTANCE_PX: f64 = 1.0;

/// Where a tap came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapSource {
    Mouse,
    Touch,
}

/// A classified tap: one discrete click or touch that did not pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Position in client pixels.
    pub client: Point,
    /// Position in normalized map space (unclamped).
    pub at: Point,
    pub source: TapSource,
}

/// The gesture currently being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Primary mouse button is held and the map follows the pointer.
    MousePanning {
        /// Client position of the previous mouse event.
        last: Point,
        /// Total pointer travel since the button went down, in pixels.
        travel: f64,
    },
    /// A single finger drags the map.
    TouchPanning {
        /// Identifier of the finger being tracked.
        touch_id: i32,
        /// Client position of the previous touch sample.
        last: Point,
        /// Total finger travel since the touch began, in pixels.
        travel: f64,
    },
    /// Two fingers rescale the map.
    Pinching {
        /// Finger separation when the pinch began.
        start_distance: f64,
        /// Zoom when the pinch began.
        start_zoom: f64,
    },
}

/// Transient interaction state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    pub phase: GesturePhase,
    /// Travel of the last completed mouse press, consumed by the click that follows it.
    pub press_travel: f64,
    /// Last pointer position in normalized space, if the pointer is over the surface.
    pub hover: Option<Point>,
}

impl GestureState {
    /// Drop any in-progress gesture.
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == GesturePhase::Idle
    }

    fn is_touch(&self) -> bool {
        matches!(self.phase, GesturePhase::TouchPanning { .. } | GesturePhase::Pinching { .. })
    }
}

/// What one input event did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureOutcome {
    /// Zoom or offset changed; the scene must be redrawn.
    pub view_changed: bool,
    /// The event completed a tap.
    pub tap: Option<Tap>,
    /// The hover position changed to this normalized point.
    pub hover: Option<Point>,
}

impl GestureOutcome {
    fn view_changed(changed: bool) -> Self {
        Self { view_changed: changed, ..Self::default() }
    }

    fn tap(tap: Option<Tap>) -> Self {
        Self { tap, ..Self::default() }
    }
}

/// Borrowed view over the state one event needs.
#[derive(Debug)]
pub struct Controller<'a> {
    pub viewport: &'a mut ViewportState,
    pub state: &'a mut GestureState,
    pub rect: Rect,
    pub config: &'a ViewportConfig,
}

impl Controller<'_> {
    // --- Wheel ---

    /// Zoom one tick around the cursor.
    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta) -> GestureOutcome {
        let factor = match delta.direction() {
            Some(WheelDirection::In) => self.config.wheel_zoom_in,
            Some(WheelDirection::Out) => self.config.wheel_zoom_out,
            None => return GestureOutcome::default(),
        };
        let anchor = self.rect.to_local(client);
        let changed = self
            .viewport
            .zoom_at(anchor, factor, self.config.zoom_range());
        GestureOutcome::view_changed(changed)
    }

    // --- Mouse ---

    /// Primary button starts a pan; other buttons are ignored.
    pub fn on_mouse_down(&mut self, client: Point, button: Button) -> GestureOutcome {
        if button != Button::Primary {
            return GestureOutcome::default();
        }
        self.state.phase = GesturePhase::MousePanning { last: client, travel: 0.0 };
        self.state.press_travel = 0.0;
        GestureOutcome::default()
    }

    /// Track hover and, while panning, move the map by the delta since the last event.
    pub fn on_mouse_move(&mut self, client: Point) -> GestureOutcome {
        let mut outcome = GestureOutcome::default();
        if let GesturePhase::MousePanning { last, travel } = self.state.phase {
            let dx = client.x - last.x;
            let dy = client.y - last.y;
            self.viewport.pan_by(dx, dy);
            self.state.phase = GesturePhase::MousePanning { last: client, travel: travel + dx.hypot(dy) };
            outcome.view_changed = dx != 0.0 || dy != 0.0;
        }
        if !self.rect.is_degenerate() {
            let hover = self.viewport.screen_to_normalized(client, &self.rect);
            self.state.hover = Some(hover);
            outcome.hover = Some(hover);
        }
        outcome
    }

    /// End a mouse pan, remembering how far it travelled for the upcoming click.
    pub fn on_mouse_up(&mut self) -> GestureOutcome {
        self.finish_mouse_pan();
        GestureOutcome::default()
    }

    /// Leaving the surface ends a mouse pan and clears the hover point.
    pub fn on_mouse_leave(&mut self) -> GestureOutcome {
        self.finish_mouse_pan();
        self.state.hover = None;
        GestureOutcome::default()
    }

    /// A click is a tap unless it was secondary or the press before it panned.
    pub fn on_click(&mut self, client: Point, button: Button) -> GestureOutcome {
        let travel = std::mem::take(&mut self.state.press_travel);
        if button != Button::Primary {
            return GestureOutcome::default();
        }
        if travel > self.config.tap_slop_px {
            debug!(travel, "click after pan suppressed");
            return GestureOutcome::default();
        }
        GestureOutcome::tap(self.make_tap(client, TapSource::Mouse))
    }

    fn finish_mouse_pan(&mut self) {
        if let GesturePhase::MousePanning { travel, .. } = self.state.phase {
            self.state.press_travel = travel;
            self.state.phase = GesturePhase::Idle;
        }
    }

    // --- Touch ---

    /// `touches` is the full set of fingers currently down.
    ///
    /// One finger taps immediately when `add_mode` is on. Otherwise it pans,
    /// and taps on lift if it barely moved (see [`Controller::on_touch_end`]).
    /// Two fingers start a pinch; anything else leaves the controller idle.
    pub fn on_touch_start(&mut self, touches: &[Touch], add_mode: bool) -> GestureOutcome {
        self.state.reset();
        match touches {
            [touch] => {
                if add_mode {
                    return GestureOutcome::tap(self.make_tap(touch.client, TapSource::Touch));
                }
                self.state.phase = GesturePhase::TouchPanning { touch_id: touch.id, last: touch.client, travel: 0.0 };
            }
            [a, b] => {
                let start_distance = a.client.distance(b.client);
                if start_distance < MIN_PINCH_DISTANCE_PX {
                    debug!(start_distance, "pinch baseline too small; staying idle");
                } else {
                    self.state.phase = GesturePhase::Pinching { start_distance, start_zoom: self.viewport.zoom };
                }
            }
            _ => {}
        }
        GestureOutcome::default()
    }

    /// Continue a touch pan or pinch. A finger count that does not match the
    /// active gesture drops it.
    pub fn on_touch_move(&mut self, touches: &[Touch]) -> GestureOutcome {
        match (self.state.phase, touches) {
            (GesturePhase::Idle, _) => GestureOutcome::default(),
            (GesturePhase::TouchPanning { touch_id, last, travel }, [touch]) if touch.id == touch_id => {
                let dx = touch.client.x - last.x;
                let dy = touch.client.y - last.y;
                self.viewport.pan_by(dx, dy);
                self.state.phase = GesturePhase::TouchPanning { touch_id, last: touch.client, travel: travel + dx.hypot(dy) };
                GestureOutcome::view_changed(dx != 0.0 || dy != 0.0)
            }
            (GesturePhase::Pinching { start_distance, start_zoom }, [a, b]) => {
                let scale = a.client.distance(b.client) / start_distance;
                let changed = self
                    .viewport
                    .set_zoom(start_zoom * scale, self.config.zoom_range());
                GestureOutcome::view_changed(changed)
            }
            (phase, touches) => {
                debug!(?phase, fingers = touches.len(), "touch gesture out of sync; resetting");
                self.state.reset();
                GestureOutcome::default()
            }
        }
    }

    /// Any finger lifting ends the current touch gesture, whatever remains down.
    ///
    /// A single-finger touch that lifts with no other finger down and stayed
    /// within the tap slop is a tap at the lift point.
    pub fn on_touch_end(&mut self, remaining: &[Touch]) -> GestureOutcome {
        if !self.state.is_touch() {
            return GestureOutcome::default();
        }
        let tap = match self.state.phase {
            GesturePhase::TouchPanning { last, travel, .. } if remaining.is_empty() => {
                if travel > self.config.tap_slop_px {
                    debug!(travel, "touch tap after pan suppressed");
                    None
                } else {
                    self.make_tap(last, TapSource::Touch)
                }
            }
            _ => None,
        };
        debug!(remaining = remaining.len(), tapped = tap.is_some(), "touch gesture ended");
        self.state.reset();
        GestureOutcome::tap(tap)
    }

    fn make_tap(&self, client: Point, source: TapSource) -> Option<Tap> {
        if self.rect.is_degenerate() {
            debug!(?client, "tap ignored: container has no area");
            return None;
        }
        let at = self.viewport.screen_to_normalized(client, &self.rect);
        Some(Tap { client, at, source })
    }
}
