//! Browser event conversion into the plain input model.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use web_sys::{Element, MouseEvent, TouchEvent, WheelEvent};

use crate::input::{Button, Touch, WheelDelta};
use crate::viewport::{Point, Rect};

/// Map a DOM `MouseEvent.button` code.
#[must_use]
pub fn map_button(button: i16) -> Button {
    match button {
        1 => Button::Middle,
        2 => Button::Secondary,
        _ => Button::Primary,
    }
}

#[must_use]
pub fn mouse_point(ev: &MouseEvent) -> Point {
    Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

#[must_use]
pub fn wheel_delta(ev: &WheelEvent) -> WheelDelta {
    WheelDelta { dx: ev.delta_x(), dy: ev.delta_y() }
}

/// Every finger currently on the surface, in list order.
#[must_use]
pub fn touches(ev: &TouchEvent) -> Vec<Touch> {
    let list = ev.touches();
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Touch::new(t.identifier(), f64::from(t.client_x()), f64::from(t.client_y())))
        .collect()
}

/// Bounding box of `element` in client pixels.
#[must_use]
pub fn element_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}
