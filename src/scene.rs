//! Render model: a screen-space draw list derived from the viewport and annotations.
//!
//! [`build`] is pure so marker placement and styling can be tested without a
//! canvas; [`crate::render`] paints the result. All coordinates in a [`Scene`]
//! are container-relative CSS pixels.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::annotation::{AnnotationStore, OwnerId, SpotIdentity, SpotKind};
use crate::consts::{
    FLIGHT_PATH_COLOR, MARKER_IDLE_OPACITY, MARKER_SIZE_PX, MARKER_SIZE_SELECTED_PX, ROSTER_COLOR,
    ROSTER_SELECTED_COLOR, UNKNOWN_CATEGORY_COLOR,
};
use crate::viewport::{Point, Rect, ViewportState};

/// Color and label for one free-form category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryStyle {
    pub color: String,
    pub label: String,
}

impl CategoryStyle {
    #[must_use]
    pub fn new(color: &str, label: &str) -> Self {
        Self { color: color.to_owned(), label: label.to_owned() }
    }
}

/// Category-to-style mapping for free-form spots.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    styles: BTreeMap<String, CategoryStyle>,
}

impl Default for Palette {
    fn default() -> Self {
        let styles = [
            ("type1", CategoryStyle::new("#FF0000", "Type 1")),
            ("type2", CategoryStyle::new("#00FF00", "Type 2")),
            ("type3", CategoryStyle::new("#0000FF", "Type 3")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
        Self { styles }
    }
}

impl Palette {
    #[must_use]
    pub fn style(&self, category: &str) -> Option<&CategoryStyle> {
        self.styles.get(category)
    }

    pub fn insert(&mut self, category: impl Into<String>, style: CategoryStyle) {
        self.styles.insert(category.into(), style);
    }

    /// Categories and styles in key order, for a legend.
    pub fn legend(&self) -> impl Iterator<Item = (&str, &CategoryStyle)> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// How a marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Roster marker; the host may draw the owner's logo in place of the disc.
    Logo { owner_id: OwnerId },
    /// Free-form map pin.
    Pin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub identity: SpotIdentity,
    pub shape: MarkerShape,
    pub center: Point,
    /// Edge length in pixels; does not scale with zoom.
    pub size: f64,
    pub color: String,
    /// Caption drawn under roster markers.
    pub label: Option<&'static str>,
    pub opacity: f64,
    pub selected: bool,
}

/// A dashed, arrow-tipped segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentView {
    pub from: Point,
    pub to: Point,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Where the map image lands.
    pub map: Rect,
    /// Visible markers in insertion order.
    pub markers: Vec<MarkerView>,
    pub path: Option<SegmentView>,
    /// Rubber-band segment while a path is being drawn.
    pub preview: Option<SegmentView>,
}

/// Lay out the scene for a container of `width` x `height` CSS pixels.
///
/// `preview` is the pending start and current cursor, both normalized.
#[must_use]
pub fn build(
    annotations: &AnnotationStore,
    viewport: &ViewportState,
    width: f64,
    height: f64,
    palette: &Palette,
    preview: Option<(Point, Point)>,
) -> Scene {
    let local = Rect::new(0.0, 0.0, width, height);
    let to_screen = |p: Point| viewport.normalized_to_screen(p, &local);

    let markers = annotations
        .visible_spots()
        .map(|spot| {
            let (size, opacity) = if spot.selected {
                (MARKER_SIZE_SELECTED_PX, 1.0)
            } else {
                (MARKER_SIZE_PX, MARKER_IDLE_OPACITY)
            };
            let (shape, color, label) = match &spot.kind {
                SpotKind::Roster { owner_id, slot } => {
                    let color = if spot.selected { ROSTER_SELECTED_COLOR } else { ROSTER_COLOR };
                    (MarkerShape::Logo { owner_id: *owner_id }, color.to_owned(), Some(slot.label()))
                }
                SpotKind::FreeForm { category, .. } => {
                    let color = palette
                        .style(category)
                        .map_or(UNKNOWN_CATEGORY_COLOR, |s| s.color.as_str());
                    (MarkerShape::Pin, color.to_owned(), None)
                }
            };
            MarkerView {
                identity: spot.identity(),
                shape,
                center: to_screen(spot.position),
                size,
                color,
                label,
                opacity,
                selected: spot.selected,
            }
        })
        .collect();

    let segment = |from: Point, to: Point| SegmentView { from: to_screen(from), to: to_screen(to), color: FLIGHT_PATH_COLOR };

    Scene {
        map: viewport.map_rect(&local),
        markers,
        path: annotations.path().map(|p| segment(p.start, p.end)),
        preview: preview.map(|(from, to)| segment(from, to)),
    }
}
