#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use serde_json::json;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn default_matches_constants() {
    let config = ViewportConfig::default();
    assert_eq!(config.zoom_min, 1.0);
    assert_eq!(config.zoom_max, 3.0);
    assert_eq!(config.wheel_zoom_in, 1.1);
    assert_eq!(config.wheel_zoom_out, 0.9);
    assert_eq!(config.hit_radius, 2.0);
    assert_eq!(config.tap_slop_px, 3.0);
}

#[test]
fn default_validates() {
    assert!(ViewportConfig::default().validate().is_ok());
}

#[test]
fn lookup_with_nothing_set_uses_defaults() {
    let config = ViewportConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, ViewportConfig::default());
}

#[test]
fn lookup_overrides_fields() {
    let config = ViewportConfig::from_lookup(lookup_from(&[
        ("DROPMAP_ZOOM_MAX", "4"),
        ("DROPMAP_HIT_RADIUS", " 3.5 "),
    ]))
    .unwrap();
    assert_eq!(config.zoom_max, 4.0);
    assert_eq!(config.hit_radius, 3.5);
    assert_eq!(config.zoom_min, 1.0);
}

#[test]
fn lookup_rejects_non_numeric() {
    let err = ViewportConfig::from_lookup(lookup_from(&[("DROPMAP_TAP_SLOP_PX", "lots")])).unwrap_err();
    assert_eq!(err, ConfigError::Parse { var: "DROPMAP_TAP_SLOP_PX", value: "lots".into() });
}

#[test]
fn lookup_rejects_inverted_zoom_bounds() {
    let err = ViewportConfig::from_lookup(lookup_from(&[("DROPMAP_ZOOM_MIN", "5")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "zoom_max", .. }));
}

#[test]
fn validate_rejects_bad_wheel_factors() {
    let zoom_in = ViewportConfig { wheel_zoom_in: 0.95, ..Default::default() };
    assert!(matches!(zoom_in.validate(), Err(ConfigError::Invalid { field: "wheel_zoom_in", .. })));
    let zoom_out = ViewportConfig { wheel_zoom_out: 1.2, ..Default::default() };
    assert!(matches!(zoom_out.validate(), Err(ConfigError::Invalid { field: "wheel_zoom_out", .. })));
}

#[test]
fn validate_rejects_non_finite() {
    let config = ViewportConfig { hit_radius: f64::NAN, ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "hit_radius", .. })));
}

#[test]
fn validate_rejects_non_positive_zoom_min() {
    let config = ViewportConfig { zoom_min: 0.0, ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "zoom_min", .. })));
}

#[test]
fn validate_rejects_negative_slop() {
    let config = ViewportConfig { tap_slop_px: -1.0, ..Default::default() };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "tap_slop_px", .. })));
}

#[test]
fn from_json_partial_object_fills_defaults() {
    let config = ViewportConfig::from_json(json!({ "zoomMax": 2.0, "tapSlopPx": 0.0 })).unwrap();
    assert_eq!(config.zoom_max, 2.0);
    assert_eq!(config.tap_slop_px, 0.0);
    assert_eq!(config.wheel_zoom_in, 1.1);
}

#[test]
fn from_json_rejects_wrong_shape() {
    assert!(matches!(ViewportConfig::from_json(json!("fast")), Err(ConfigError::Json(_))));
}

#[test]
fn from_json_error_keeps_serde_message() {
    let err = ViewportConfig::from_json(json!({ "zoomMax": "big" })).unwrap_err();
    let ConfigError::Json(message) = &err else {
        panic!("expected a JSON error, got {err:?}");
    };
    assert!(message.contains("invalid type"), "{message}");
    assert!(message.contains("big"), "{message}");
    assert!(err.to_string().starts_with("config JSON rejected"));
}

#[test]
fn from_json_still_validates_values() {
    let err = ViewportConfig::from_json(json!({ "zoomMin": 2.0, "zoomMax": 1.0 })).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "zoom_max", .. }));
}

#[test]
fn zoom_range_mirrors_bounds() {
    let config = ViewportConfig { zoom_min: 1.0, zoom_max: 2.0, ..Default::default() };
    let range = config.zoom_range();
    assert_eq!(range.min, 1.0);
    assert_eq!(range.max, 2.0);
}

#[test]
fn config_error_display() {
    let err = ConfigError::Invalid { field: "zoom_min", reason: "must be positive" };
    assert_eq!(err.to_string(), "invalid zoom_min: must be positive");
}
