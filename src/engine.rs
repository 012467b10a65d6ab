use serde::Serialize;
use tracing::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent, TouchEvent, WheelEvent};

use crate::annotation::{AnnotationStore, FlightPath, LoadReport, MapId, OwnerId, Slot, Spot, SpotIdentity};
use crate::config::{ConfigError, ViewportConfig};
use crate::dom;
use crate::gesture::{Controller, GestureOutcome, GestureState};
use crate::input::{Button, ModeFlags, Touch, WheelDelta};
use crate::interaction::InteractionState;
use crate::render;
use crate::scene::{self, Palette, Scene};
use crate::viewport::{Point, Rect, ViewportState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Events returned from input handlers for the host to process.
///
/// Coordinates are in normalized map space. The engine never applies the
/// annotation change itself; the host persists it and calls the matching
/// `apply_*` method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Action {
    SpotAdd(Point),
    SpotRemove(SpotIdentity),
    /// A free-form spot was tapped in select mode.
    SpotClicked(SpotIdentity),
    /// A roster spot was tapped in select mode; toggle its pair.
    #[serde(rename_all = "camelCase")]
    AlternateSelected { owner_id: OwnerId, slot: Slot },
    /// A spot was tapped with no mode active; open its detail view.
    SpotActivated(SpotIdentity),
    PathStart(Point),
    PathEnd(Point),
    /// Zoom or pan changed.
    ViewChanged,
    /// The in-progress flight path preview moved or disappeared.
    PreviewChanged,
}

/// Core engine state: everything that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub annotations: AnnotationStore,
    pub viewport: ViewportState,
    pub gesture: GestureState,
    pub interaction: InteractionState,
    pub modes: ModeFlags,
    pub palette: Palette,
    /// Container bounds in client pixels.
    pub rect: Rect,
    config: ViewportConfig,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a core with custom tuning. The initial zoom is clamped into the configured range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails [`ViewportConfig::validate`].
    pub fn with_config(config: ViewportConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let mut viewport = ViewportState::default();
        viewport.zoom = config.zoom_range().clamp(viewport.zoom);
        Ok(Self { viewport, config, ..Self::default() })
    }

    // --- Layout / modes ---

    /// Record the container's bounds; call on every layout pass.
    pub fn set_container(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Replace the mode flags. Discards a pending path start when drawing stops.
    pub fn set_modes(&mut self, modes: ModeFlags) -> Vec<Action> {
        let had_pending = self.interaction.pending_start.is_some();
        self.interaction.set_modes(&mut self.modes, modes);
        if had_pending && self.interaction.pending_start.is_none() {
            vec![Action::PreviewChanged]
        } else {
            Vec::new()
        }
    }

    // --- Data inputs ---

    /// Swap in the annotations for `map` from persisted records.
    pub fn switch_map(&mut self, map: MapId, spots: &[serde_json::Value], paths: &[serde_json::Value]) -> LoadReport {
        self.interaction.pending_start = None;
        self.gesture.reset();
        self.annotations.switch_map(map, spots, paths)
    }

    /// Replace the live annotations with an already-built store.
    pub fn load_annotations(&mut self, annotations: AnnotationStore) {
        info!(map = %annotations.map(), spots = annotations.spots().len(), "annotations replaced");
        self.interaction.pending_start = None;
        self.annotations = annotations;
    }

    /// Host confirmed a spot was added. An existing spot with the same identity is replaced.
    pub fn apply_spot_added(&mut self, spot: Spot) {
        self.annotations.upsert_spot(spot);
    }

    /// Host confirmed a spot was removed.
    pub fn apply_spot_removed(&mut self, identity: &SpotIdentity) -> Option<Spot> {
        self.annotations.remove_spot(identity)
    }

    /// Host confirmed an alternate selection toggle.
    pub fn apply_select_alternate(&mut self, owner_id: OwnerId, slot: Slot) -> bool {
        self.annotations.select_alternate(owner_id, slot)
    }

    /// Host confirmed a completed flight path; it replaces any existing one.
    pub fn apply_path(&mut self, path: FlightPath) -> Option<FlightPath> {
        self.annotations.replace_path(path)
    }

    /// Clear the path, show all spots, and drop any drawing in progress.
    pub fn reset_all(&mut self) {
        self.interaction.pending_start = None;
        self.modes.draw_path = false;
        self.annotations.reset_all();
    }

    /// The always-available remove action. Does not mutate; the host applies it.
    #[must_use]
    pub fn request_remove(&self, identity: SpotIdentity) -> Action {
        Action::SpotRemove(identity)
    }

    // --- Input events ---

    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta) -> Vec<Action> {
        let outcome = self.controller().on_wheel(client, delta);
        self.finish(outcome)
    }

    pub fn on_mouse_down(&mut self, client: Point, button: Button) -> Vec<Action> {
        let outcome = self.controller().on_mouse_down(client, button);
        self.finish(outcome)
    }

    pub fn on_mouse_move(&mut self, client: Point) -> Vec<Action> {
        let outcome = self.controller().on_mouse_move(client);
        self.finish(outcome)
    }

    pub fn on_mouse_up(&mut self) -> Vec<Action> {
        let outcome = self.controller().on_mouse_up();
        self.finish(outcome)
    }

    pub fn on_mouse_leave(&mut self) -> Vec<Action> {
        let had_preview = self.preview_segment().is_some();
        let outcome = self.controller().on_mouse_leave();
        let mut actions = self.finish(outcome);
        if had_preview {
            actions.push(Action::PreviewChanged);
        }
        actions
    }

    pub fn on_click(&mut self, client: Point, button: Button) -> Vec<Action> {
        let outcome = self.controller().on_click(client, button);
        self.finish(outcome)
    }

    /// `touches` is every finger currently down.
    pub fn on_touch_start(&mut self, touches: &[Touch]) -> Vec<Action> {
        let add_mode = self.modes.add_spot;
        let outcome = self.controller().on_touch_start(touches, add_mode);
        self.finish(outcome)
    }

    pub fn on_touch_move(&mut self, touches: &[Touch]) -> Vec<Action> {
        let outcome = self.controller().on_touch_move(touches);
        self.finish(outcome)
    }

    /// `remaining` is every finger still down after the lift.
    pub fn on_touch_end(&mut self, remaining: &[Touch]) -> Vec<Action> {
        let outcome = self.controller().on_touch_end(remaining);
        self.finish(outcome)
    }

    fn controller(&mut self) -> Controller<'_> {
        Controller { viewport: &mut self.viewport, state: &mut self.gesture, rect: self.rect, config: &self.config }
    }

    /// Turn a gesture outcome into host actions, dispatching any tap.
    fn finish(&mut self, outcome: GestureOutcome) -> Vec<Action> {
        let mut actions = Vec::new();
        if outcome.view_changed {
            actions.push(Action::ViewChanged);
        }
        if outcome.hover.is_some() && self.interaction.pending_start.is_some() {
            actions.push(Action::PreviewChanged);
        }
        if let Some(tap) = outcome.tap {
            debug!(source = ?tap.source, "tap classified");
            let radius = self.config.hit_radius;
            if let Some(action) = self
                .interaction
                .dispatch_tap(&mut self.modes, tap.at, self.annotations.spots(), radius)
            {
                if matches!(action, Action::PathStart(_) | Action::PathEnd(_)) {
                    actions.push(Action::PreviewChanged);
                }
                actions.push(action);
            }
        }
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    #[must_use]
    pub fn pending_path_start(&self) -> Option<Point> {
        self.interaction.pending_start
    }

    /// Pending start to current hover point, both normalized.
    #[must_use]
    pub fn preview_segment(&self) -> Option<(Point, Point)> {
        self.interaction.preview(self.gesture.hover)
    }

    /// Normalized coordinate under a client-space point, if the container has area.
    #[must_use]
    pub fn normalized_at(&self, client: Point) -> Option<Point> {
        (!self.rect.is_degenerate()).then(|| self.viewport.screen_to_normalized(client, &self.rect))
    }

    /// Screen-space draw list for the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        scene::build(
            &self.annotations,
            &self.viewport,
            self.rect.width,
            self.rect.height,
            &self.palette,
            self.preview_segment(),
        )
    }
}

/// The full map engine. Wraps `EngineCore` and owns the browser canvas element.
#[derive(Debug)]
pub struct Engine {
    canvas: HtmlCanvasElement,
    map_image: Option<HtmlImageElement>,
    dpr: f64,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn new(canvas: HtmlCanvasElement, config: ViewportConfig) -> Result<Self, ConfigError> {
        let core = EngineCore::with_config(config)?;
        Ok(Self { canvas, map_image: None, dpr: 1.0, core })
    }

    /// Set the background image for the active map.
    pub fn set_map_image(&mut self, image: Option<HtmlImageElement>) {
        self.map_image = image;
    }

    /// Re-read the canvas bounds and device pixel ratio, resizing the backing store.
    pub fn sync_layout(&mut self) {
        let rect = dom::element_rect(&self.canvas);
        self.dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio().max(1.0));
        self.canvas.set_width(backing_px(rect.width, self.dpr));
        self.canvas.set_height(backing_px(rect.height, self.dpr));
        self.core.set_container(rect);
    }

    // --- Browser events ---

    pub fn on_wheel(&mut self, ev: &WheelEvent) -> Vec<Action> {
        ev.prevent_default();
        self.core.on_wheel(dom::mouse_point(ev), dom::wheel_delta(ev))
    }

    pub fn on_mouse_down(&mut self, ev: &MouseEvent) -> Vec<Action> {
        self.core.on_mouse_down(dom::mouse_point(ev), dom::map_button(ev.button()))
    }

    pub fn on_mouse_move(&mut self, ev: &MouseEvent) -> Vec<Action> {
        self.core.on_mouse_move(dom::mouse_point(ev))
    }

    pub fn on_mouse_up(&mut self) -> Vec<Action> {
        self.core.on_mouse_up()
    }

    pub fn on_mouse_leave(&mut self) -> Vec<Action> {
        self.core.on_mouse_leave()
    }

    pub fn on_click(&mut self, ev: &MouseEvent) -> Vec<Action> {
        self.core.on_click(dom::mouse_point(ev), dom::map_button(ev.button()))
    }

    /// Suppresses the browser's synthesized mouse events for the touch.
    pub fn on_touch_start(&mut self, ev: &TouchEvent) -> Vec<Action> {
        ev.prevent_default();
        self.core.on_touch_start(&dom::touches(ev))
    }

    pub fn on_touch_move(&mut self, ev: &TouchEvent) -> Vec<Action> {
        ev.prevent_default();
        self.core.on_touch_move(&dom::touches(ev))
    }

    /// Handles both `touchend` and `touchcancel`.
    pub fn on_touch_end(&mut self, ev: &TouchEvent) -> Vec<Action> {
        ev.prevent_default();
        self.core.on_touch_end(&dom::touches(ev))
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a drawing call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx: CanvasRenderingContext2d = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas 2d context unavailable"))?
            .dyn_into()?;
        let scene = self.core.scene();
        render::draw(&ctx, &scene, self.map_image.as_ref(), self.core.rect.width, self.core.rect.height, self.dpr)
    }
}

/// Backing-store size for a CSS length, never zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_px(css: f64, dpr: f64) -> u32 {
    (css * dpr).round().clamp(1.0, f64::from(u32::MAX)) as u32
}
