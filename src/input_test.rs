use super::*;

// =============================================================
// WheelDelta
// =============================================================

#[test]
fn wheel_positive_dy_zooms_out() {
    assert_eq!(WheelDelta { dx: 0.0, dy: 120.0 }.direction(), Some(WheelDirection::Out));
}

#[test]
fn wheel_negative_dy_zooms_in() {
    assert_eq!(WheelDelta { dx: 0.0, dy: -3.0 }.direction(), Some(WheelDirection::In));
}

#[test]
fn wheel_horizontal_only_has_no_direction() {
    assert_eq!(WheelDelta { dx: 40.0, dy: 0.0 }.direction(), None);
}

// =============================================================
// Touch
// =============================================================

#[test]
fn touch_new_sets_client_point() {
    let t = Touch::new(7, 1.5, 2.5);
    assert_eq!(t.id, 7);
    assert_eq!(t.client, Point::new(1.5, 2.5));
}

// =============================================================
// ModeFlags
// =============================================================

#[test]
fn mode_flags_default_is_idle() {
    assert_eq!(ModeFlags::default().effective(), InteractionMode::Idle);
}

#[test]
fn mode_flags_single_flags() {
    let add = ModeFlags { add_spot: true, ..Default::default() };
    let draw = ModeFlags { draw_path: true, ..Default::default() };
    let select = ModeFlags { select_spots: true, ..Default::default() };
    assert_eq!(add.effective(), InteractionMode::AddingSpot);
    assert_eq!(draw.effective(), InteractionMode::DrawingPath);
    assert_eq!(select.effective(), InteractionMode::SelectingSpot);
}

#[test]
fn mode_flags_add_beats_draw_and_select() {
    let all = ModeFlags { add_spot: true, draw_path: true, select_spots: true };
    assert_eq!(all.effective(), InteractionMode::AddingSpot);
}

#[test]
fn mode_flags_draw_beats_select() {
    let flags = ModeFlags { add_spot: false, draw_path: true, select_spots: true };
    assert_eq!(flags.effective(), InteractionMode::DrawingPath);
}

#[test]
fn mode_flags_deserialize_camel_case() {
    let flags: ModeFlags = serde_json::from_value(serde_json::json!({
        "addSpot": false,
        "drawPath": true,
        "selectSpots": false,
    }))
    .unwrap();
    assert_eq!(flags.effective(), InteractionMode::DrawingPath);
}

#[test]
fn mode_flags_deserialize_requires_fields() {
    let result: Result<ModeFlags, _> = serde_json::from_value(serde_json::json!({ "addSpot": true }));
    assert!(result.is_err());
}
