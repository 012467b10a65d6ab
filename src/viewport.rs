//! Viewport transform: zoom level, pan offset, and the mapping between screen
//! pixels and normalized map coordinates.
//!
//! Three coordinate spaces meet here:
//!
//! - **client** pixels, as reported by the browser for pointer and touch events;
//! - **container** pixels, client pixels relative to the container's top-left corner;
//! - **normalized** map space, `[0, 100]` on each axis regardless of image resolution.
//!
//! The map layer is drawn translated by `offset` and then scaled by `zoom`, so a
//! normalized point `n` lands at `rect.left + offset + n / 100 * rect.size * zoom`.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{NORMALIZED_EXTENT, ZOOM_MAX, ZOOM_MIN};

/// A point in client, container, or normalized space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The container's bounding box in client pixels, read on every layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// A rect with zero or negative area cannot map into normalized space.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Convert a client-space point to container-relative pixels.
    #[must_use]
    pub fn to_local(&self, client: Point) -> Point {
        Point { x: client.x - self.left, y: client.y - self.top }
    }

    /// Center of the rect in container-relative pixels.
    #[must_use]
    pub fn local_center(&self) -> Point {
        Point { x: self.width * 0.5, y: self.height * 0.5 }
    }
}

/// Inclusive zoom bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: ZOOM_MIN, max: ZOOM_MAX }
    }
}

impl ZoomRange {
    #[must_use]
    pub fn clamp(self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

/// Zoom and pan for one viewport instance.
///
/// `zoom` is always within the active [`ZoomRange`]; `offset` is in container
/// pixels and deliberately unbounded, so the map may be panned out of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub zoom: f64,
    pub offset: Point,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { zoom: 1.0, offset: Point::new(0.0, 0.0) }
    }
}

impl ViewportState {
    /// Convert a client-space point to normalized map coordinates.
    ///
    /// No clamping to `[0, 100]` is applied; taps just outside the image still
    /// produce a coordinate and callers decide whether to reject them.
    #[must_use]
    pub fn screen_to_normalized(&self, client: Point, rect: &Rect) -> Point {
        Point {
            x: ((client.x - rect.left - self.offset.x) / (rect.width * self.zoom)) * NORMALIZED_EXTENT,
            y: ((client.y - rect.top - self.offset.y) / (rect.height * self.zoom)) * NORMALIZED_EXTENT,
        }
    }

    /// Convert a normalized map point to client-space pixels.
    #[must_use]
    pub fn normalized_to_screen(&self, map: Point, rect: &Rect) -> Point {
        Point {
            x: rect.left + self.offset.x + (map.x / NORMALIZED_EXTENT) * rect.width * self.zoom,
            y: rect.top + self.offset.y + (map.y / NORMALIZED_EXTENT) * rect.height * self.zoom,
        }
    }

    /// The client-space rect covered by the full map image at the current transform.
    #[must_use]
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        Rect {
            left: rect.left + self.offset.x,
            top: rect.top + self.offset.y,
            width: rect.width * self.zoom,
            height: rect.height * self.zoom,
        }
    }

    /// Scale by `factor` around `anchor` (container-relative pixels).
    ///
    /// The offset moves by the factor actually applied after clamping, so the
    /// map point under the anchor stays put even when the zoom hits a bound.
    /// Returns `true` if the transform changed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64, range: ZoomRange) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let next = range.clamp(self.zoom * factor);
        let applied = next / self.zoom;
        if (applied - 1.0).abs() < f64::EPSILON {
            return false;
        }
        self.offset.x -= (anchor.x - self.offset.x) * (applied - 1.0);
        self.offset.y -= (anchor.y - self.offset.y) * (applied - 1.0);
        self.zoom = next;
        true
    }

    /// Set the zoom directly without moving the offset (pinch rescale).
    pub fn set_zoom(&mut self, zoom: f64, range: ZoomRange) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let next = range.clamp(zoom);
        let changed = (next - self.zoom).abs() > f64::EPSILON;
        self.zoom = next;
        changed
    }

    /// Translate the map by a screen-space delta. Unclamped.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
    }
}
