#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::annotation::SpotKind;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// A 1000x1000 container at the client origin: 10 client px per normalized unit.
fn core() -> EngineCore {
    let mut core = EngineCore::new();
    core.set_container(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    core
}

fn modes(add_spot: bool, draw_path: bool, select_spots: bool) -> ModeFlags {
    ModeFlags { add_spot, draw_path, select_spots }
}

fn click(core: &mut EngineCore, x: f64, y: f64) -> Vec<Action> {
    core.on_click(pt(x, y), Button::Primary)
}

fn point_of(actions: &[Action]) -> Option<Point> {
    actions.iter().find_map(|a| match a {
        Action::SpotAdd(p) | Action::PathStart(p) | Action::PathEnd(p) => Some(*p),
        _ => None,
    })
}

fn assert_near(actual: Option<Point>, expected: Point) {
    let actual = actual.expect("expected a point-carrying action");
    assert!(
        (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
        "{actual:?} != {expected:?}"
    );
}

// =============================================================
// Adding spots
// =============================================================

#[test]
fn add_mode_click_emits_normalized_spot_add() {
    let mut core = core();
    core.set_modes(modes(true, false, false));
    let actions = click(&mut core, 500.0, 500.0);
    assert!(matches!(actions.as_slice(), [Action::SpotAdd(_)]));
    assert_near(point_of(&actions), pt(50.0, 50.0));
}

#[test]
fn add_mode_touch_start_taps_immediately() {
    let mut core = core();
    core.set_modes(modes(true, false, false));
    let actions = core.on_touch_start(&[Touch::new(1, 250.0, 750.0)]);
    assert!(matches!(actions.as_slice(), [Action::SpotAdd(_)]));
    assert_near(point_of(&actions), pt(25.0, 75.0));
}

#[test]
fn click_after_drag_does_not_tap() {
    let mut core = core();
    core.set_modes(modes(true, false, false));
    core.on_mouse_down(pt(100.0, 100.0), Button::Primary);
    let moved = core.on_mouse_move(pt(200.0, 100.0));
    assert_eq!(moved, vec![Action::ViewChanged]);
    core.on_mouse_up();
    assert!(click(&mut core, 200.0, 100.0).is_empty());
}

#[test]
fn click_without_container_is_ignored() {
    let mut core = EngineCore::new();
    core.set_modes(modes(true, false, false));
    assert!(click(&mut core, 10.0, 10.0).is_empty());
}

#[test]
fn apply_spot_added_replaces_same_identity() {
    let mut core = core();
    core.apply_spot_added(Spot::roster(9, Slot::Main, pt(10.0, 10.0)));
    core.apply_spot_added(Spot::roster(9, Slot::Main, pt(20.0, 20.0)));
    assert_eq!(core.annotations.spots().len(), 1);
    assert_eq!(core.annotations.spots()[0].position, pt(20.0, 20.0));
}

// =============================================================
// Drawing a flight path
// =============================================================

#[test]
fn draw_mode_two_taps_emit_start_then_end_and_clear_mode() {
    let mut core = core();
    core.set_modes(modes(false, true, false));

    let first = click(&mut core, 100.0, 100.0);
    assert!(first.contains(&Action::PreviewChanged));
    assert_near(point_of(&first), pt(10.0, 10.0));
    assert!(matches!(first.last(), Some(Action::PathStart(_))));

    let second = click(&mut core, 900.0, 200.0);
    assert!(matches!(second.last(), Some(Action::PathEnd(_))));
    assert_near(point_of(&second), pt(90.0, 20.0));
    assert!(!core.modes.draw_path);
    assert_eq!(core.pending_path_start(), None);

    assert!(click(&mut core, 500.0, 500.0).is_empty());
}

#[test]
fn hover_while_drawing_moves_preview() {
    let mut core = core();
    core.set_modes(modes(false, true, false));
    click(&mut core, 100.0, 100.0);

    let actions = core.on_mouse_move(pt(400.0, 300.0));
    assert_eq!(actions, vec![Action::PreviewChanged]);
    let (start, cursor) = core.preview_segment().expect("preview");
    assert_near(Some(start), pt(10.0, 10.0));
    assert_near(Some(cursor), pt(40.0, 30.0));
    assert!(core.scene().preview.is_some());

    let left = core.on_mouse_leave();
    assert_eq!(left, vec![Action::PreviewChanged]);
    assert!(core.preview_segment().is_none());
}

#[test]
fn hover_outside_drawing_is_silent() {
    let mut core = core();
    assert!(core.on_mouse_move(pt(400.0, 300.0)).is_empty());
}

#[test]
fn cancelling_draw_mode_discards_pending_start() {
    let mut core = core();
    core.set_modes(modes(false, true, false));
    click(&mut core, 100.0, 100.0);

    let actions = core.set_modes(modes(false, false, true));
    assert_eq!(actions, vec![Action::PreviewChanged]);
    assert_eq!(core.pending_path_start(), None);

    core.set_modes(modes(false, true, false));
    let restarted = click(&mut core, 300.0, 300.0);
    assert!(matches!(restarted.last(), Some(Action::PathStart(_))));
}

#[test]
fn switch_map_discards_pending_start() {
    let mut core = core();
    core.set_modes(modes(false, true, false));
    click(&mut core, 100.0, 100.0);
    core.switch_map(MapId::Miramar, &[], &[]);
    assert_eq!(core.pending_path_start(), None);
    assert_eq!(core.annotations.map(), MapId::Miramar);
}

#[test]
fn apply_path_keeps_at_most_one() {
    let mut core = core();
    assert!(core.apply_path(FlightPath::new(pt(1.0, 1.0), pt(2.0, 2.0))).is_none());
    let replaced = core.apply_path(FlightPath::new(pt(3.0, 3.0), pt(4.0, 4.0)));
    assert_eq!(replaced.map(|p| p.start), Some(pt(1.0, 1.0)));
    assert_eq!(core.annotations.path().map(|p| p.end), Some(pt(4.0, 4.0)));
}

#[test]
fn draw_mode_touch_taps_draw_a_path() {
    let mut core = core();
    core.set_modes(modes(false, true, false));

    core.on_touch_start(&[Touch::new(1, 100.0, 100.0)]);
    let first = core.on_touch_end(&[]);
    assert!(matches!(first.last(), Some(Action::PathStart(_))));
    assert_near(core.pending_path_start(), pt(10.0, 10.0));

    core.on_touch_start(&[Touch::new(2, 900.0, 200.0)]);
    let second = core.on_touch_end(&[]);
    assert!(matches!(second.last(), Some(Action::PathEnd(_))));
    assert_near(point_of(&second), pt(90.0, 20.0));
    assert!(!core.modes.draw_path);
}

#[test]
fn touch_pan_between_path_taps_keeps_pending_start() {
    let mut core = core();
    core.set_modes(modes(false, true, false));
    core.on_touch_start(&[Touch::new(1, 100.0, 100.0)]);
    core.on_touch_end(&[]);

    core.on_touch_start(&[Touch::new(2, 500.0, 500.0)]);
    core.on_touch_move(&[Touch::new(2, 600.0, 500.0)]);
    assert!(core.on_touch_end(&[]).iter().all(|a| !matches!(a, Action::PathEnd(_))));
    assert!(core.pending_path_start().is_some());
}

// =============================================================
// Selecting and activating
// =============================================================

fn with_roster_pair() -> EngineCore {
    let mut core = core();
    core.apply_spot_added(Spot::roster(9, Slot::Main, pt(30.0, 40.0)));
    core.apply_spot_added(Spot::roster(9, Slot::Alt, pt(60.0, 70.0)));
    core
}

#[test]
fn select_mode_tap_on_roster_spot_toggles_pair() {
    let mut core = with_roster_pair();
    core.set_modes(modes(false, false, true));

    let actions = click(&mut core, 300.0, 400.0);
    assert_eq!(actions, vec![Action::AlternateSelected { owner_id: 9, slot: Slot::Main }]);

    assert!(core.apply_select_alternate(9, Slot::Main));
    let scene = core.scene();
    assert_eq!(scene.markers.len(), 1);
    assert!(scene.markers[0].selected);
}

#[test]
fn select_mode_touch_tap_on_roster_spot_toggles_pair() {
    let mut core = with_roster_pair();
    core.set_modes(modes(false, false, true));
    core.on_touch_start(&[Touch::new(1, 300.0, 400.0)]);
    let actions = core.on_touch_end(&[]);
    assert_eq!(actions, vec![Action::AlternateSelected { owner_id: 9, slot: Slot::Main }]);
}

#[test]
fn idle_touch_tap_on_spot_activates_it() {
    let mut core = with_roster_pair();
    core.on_touch_start(&[Touch::new(1, 600.0, 700.0)]);
    let actions = core.on_touch_end(&[]);
    assert_eq!(
        actions,
        vec![Action::SpotActivated(SpotIdentity::OwnerCategory { owner_id: 9, slot: Slot::Alt })]
    );
}

#[test]
fn idle_tap_on_spot_activates_it() {
    let mut core = with_roster_pair();
    let actions = click(&mut core, 600.0, 700.0);
    assert_eq!(
        actions,
        vec![Action::SpotActivated(SpotIdentity::OwnerCategory { owner_id: 9, slot: Slot::Alt })]
    );
}

#[test]
fn idle_tap_on_empty_map_does_nothing() {
    let mut core = with_roster_pair();
    assert!(click(&mut core, 950.0, 50.0).is_empty());
}

#[test]
fn request_remove_does_not_mutate_until_applied() {
    let mut core = with_roster_pair();
    let identity = SpotIdentity::OwnerCategory { owner_id: 9, slot: Slot::Alt };
    assert_eq!(core.request_remove(identity.clone()), Action::SpotRemove(identity.clone()));
    assert_eq!(core.annotations.spots().len(), 2);
    let removed = core.apply_spot_removed(&identity);
    assert!(matches!(removed.map(|s| s.kind), Some(SpotKind::Roster { owner_id: 9, slot: Slot::Alt })));
    assert_eq!(core.annotations.spots().len(), 1);
}

#[test]
fn reset_all_is_idempotent() {
    let mut core = with_roster_pair();
    core.apply_select_alternate(9, Slot::Main);
    core.apply_path(FlightPath::new(pt(1.0, 1.0), pt(2.0, 2.0)));

    core.reset_all();
    let once: Vec<_> = core.annotations.spots().to_vec();
    core.reset_all();

    assert_eq!(core.annotations.spots(), once.as_slice());
    assert!(core.annotations.path().is_none());
    assert!(once.iter().all(|s| !s.selected && !s.hidden));
}

// =============================================================
// Viewport gestures
// =============================================================

#[test]
fn wheel_zooms_and_reports_view_change() {
    let mut core = core();
    let actions = core.on_wheel(pt(500.0, 500.0), WheelDelta { dx: 0.0, dy: -100.0 });
    assert_eq!(actions, vec![Action::ViewChanged]);
    assert!(core.viewport.zoom > 1.0);
}

#[test]
fn wheel_at_min_zoom_is_a_no_op() {
    let mut core = core();
    let actions = core.on_wheel(pt(500.0, 500.0), WheelDelta { dx: 0.0, dy: 100.0 });
    assert!(actions.is_empty());
    assert_eq!(core.viewport.zoom, 1.0);
}

#[test]
fn pinch_doubling_distance_doubles_zoom() {
    let mut core = core();
    core.on_touch_start(&[Touch::new(1, 400.0, 500.0), Touch::new(2, 500.0, 500.0)]);
    let actions = core.on_touch_move(&[Touch::new(1, 350.0, 500.0), Touch::new(2, 550.0, 500.0)]);
    assert_eq!(actions, vec![Action::ViewChanged]);
    assert_eq!(core.viewport.zoom, 2.0);

    core.on_touch_end(&[Touch::new(2, 550.0, 500.0)]);
    assert!(core.gesture.is_idle());
}

#[test]
fn tap_after_zoom_maps_through_transform() {
    let mut core = core();
    core.viewport.zoom = 2.0;
    core.viewport.offset = pt(-500.0, -500.0);
    core.set_modes(modes(true, false, false));
    let actions = click(&mut core, 500.0, 500.0);
    assert_near(point_of(&actions), pt(50.0, 50.0));
}

// =============================================================
// Configuration
// =============================================================

#[test]
fn with_config_rejects_inverted_zoom_bounds() {
    let config = ViewportConfig { zoom_min: 3.0, zoom_max: 1.0, ..ViewportConfig::default() };
    let err = EngineCore::with_config(config).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "zoom_max", .. }));
}

#[test]
fn with_config_rejects_nan_bounds() {
    let config = ViewportConfig { zoom_max: f64::NAN, ..ViewportConfig::default() };
    assert!(EngineCore::with_config(config).is_err());
}

#[test]
fn with_config_clamps_initial_zoom_into_range() {
    let config = ViewportConfig { zoom_min: 1.5, zoom_max: 4.0, ..ViewportConfig::default() };
    let mut core = EngineCore::with_config(config).unwrap();
    assert_eq!(core.viewport.zoom, 1.5);

    core.set_container(Rect::new(0.0, 0.0, 1000.0, 1000.0));
    core.on_wheel(pt(500.0, 500.0), WheelDelta { dx: 0.0, dy: 100.0 });
    assert_eq!(core.viewport.zoom, 1.5);
    let actions = core.on_wheel(pt(500.0, 500.0), WheelDelta { dx: 0.0, dy: -100.0 });
    assert_eq!(actions, vec![Action::ViewChanged]);
    assert!(core.viewport.zoom > 1.5);
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn actions_serialize_tagged() {
    let add = serde_json::to_value(Action::SpotAdd(pt(50.0, 25.0))).expect("serialize");
    assert_eq!(add, json!({ "type": "spotAdd", "data": { "x": 50.0, "y": 25.0 } }));

    let alt = serde_json::to_value(Action::AlternateSelected { owner_id: 9, slot: Slot::Alt }).expect("serialize");
    assert_eq!(alt, json!({ "type": "alternateSelected", "data": { "ownerId": 9, "slot": "alt" } }));

    let view = serde_json::to_value(Action::ViewChanged).expect("serialize");
    assert_eq!(view, json!({ "type": "viewChanged" }));
}
