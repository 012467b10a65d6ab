//! Rendering: paints a [`Scene`] to a 2D context.
//!
//! This is the only module that draws with [`web_sys::CanvasRenderingContext2d`].
//! Layout is already resolved to container pixels by [`crate::scene::build`],
//! so nothing here knows about zoom or normalized coordinates.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::annotation::Slot;
use crate::scene::{MarkerShape, MarkerView, Scene, SegmentView};

/// Arrowhead length in pixels.
const ARROW_SIZE: f64 = 12.0;

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Dash segment length for flight paths.
const PATH_DASH_PX: f64 = 8.0;

const PATH_LINE_WIDTH: f64 = 2.0;
const PREVIEW_ALPHA: f64 = 0.6;
const LABEL_FONT: &str = "bold 11px sans-serif";
const MAP_BACKDROP: &str = "#111827";

/// Draw the full scene.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    image: Option<&HtmlImageElement>,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear and map image.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.set_fill_style_str(MAP_BACKDROP);
    ctx.fill_rect(scene.map.left, scene.map.top, scene.map.width, scene.map.height);
    if let Some(img) = image.filter(|img| img.complete() && img.natural_width() > 0) {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            scene.map.left,
            scene.map.top,
            scene.map.width,
            scene.map.height,
        )?;
    }

    // Layer 2: committed path, then the rubber band.
    if let Some(path) = &scene.path {
        draw_segment(ctx, path, 1.0)?;
    }
    if let Some(preview) = &scene.preview {
        draw_segment(ctx, preview, PREVIEW_ALPHA)?;
    }

    // Layer 3: markers in insertion order.
    for marker in &scene.markers {
        draw_marker(ctx, marker)?;
    }

    Ok(())
}

// =============================================================
// Segments
// =============================================================

fn draw_segment(ctx: &CanvasRenderingContext2d, seg: &SegmentView, alpha: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(alpha);
    ctx.set_stroke_style_str(seg.color);
    ctx.set_fill_style_str(seg.color);
    ctx.set_line_width(PATH_LINE_WIDTH);

    let dash_array = js_sys::Array::new();
    dash_array.push(&PATH_DASH_PX.into());
    dash_array.push(&PATH_DASH_PX.into());
    ctx.set_line_dash(&dash_array)?;

    ctx.begin_path();
    ctx.move_to(seg.from.x, seg.from.y);
    ctx.line_to(seg.to.x, seg.to.y);
    ctx.stroke();
    ctx.set_line_dash(&js_sys::Array::new())?;

    if seg.from != seg.to {
        let angle = (seg.to.y - seg.from.y).atan2(seg.to.x - seg.from.x);
        draw_arrowhead(ctx, seg.to.x, seg.to.y, angle);
    }

    ctx.restore();
    Ok(())
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip_x: f64, tip_y: f64, angle: f64) {
    let x1 = tip_x - ARROW_SIZE * (angle - ARROW_ANGLE).cos();
    let y1 = tip_y - ARROW_SIZE * (angle - ARROW_ANGLE).sin();
    let x2 = tip_x - ARROW_SIZE * (angle + ARROW_ANGLE).cos();
    let y2 = tip_y - ARROW_SIZE * (angle + ARROW_ANGLE).sin();

    ctx.begin_path();
    ctx.move_to(tip_x, tip_y);
    ctx.line_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.close_path();
    ctx.fill();
}

// =============================================================
// Markers
// =============================================================

fn draw_marker(ctx: &CanvasRenderingContext2d, marker: &MarkerView) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(marker.opacity);
    match marker.shape {
        MarkerShape::Logo { .. } => draw_logo_disc(ctx, marker)?,
        MarkerShape::Pin => draw_pin(ctx, marker)?,
    }
    if let Some(label) = marker.label {
        draw_label(ctx, marker, label)?;
    }
    ctx.restore();
    Ok(())
}

fn draw_logo_disc(ctx: &CanvasRenderingContext2d, marker: &MarkerView) -> Result<(), JsValue> {
    let r = marker.size / 2.0;
    ctx.begin_path();
    ctx.arc(marker.center.x, marker.center.y, r, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.6)");
    ctx.fill();
    ctx.set_stroke_style_str(&marker.color);
    ctx.set_line_width(if marker.selected { 3.0 } else { 2.0 });
    ctx.stroke();
    Ok(())
}

/// Teardrop pin whose tip sits on the marker's center.
fn draw_pin(ctx: &CanvasRenderingContext2d, marker: &MarkerView) -> Result<(), JsValue> {
    let r = marker.size * 0.3;
    let tip = marker.center;
    let head_y = tip.y - marker.size * 0.6;

    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.arc(tip.x, head_y, r, PI * 0.75, PI * 0.25)?;
    ctx.close_path();
    ctx.set_fill_style_str(&marker.color);
    ctx.fill();
    ctx.set_stroke_style_str("#000");
    ctx.set_line_width(1.0);
    ctx.stroke();

    ctx.begin_path();
    ctx.arc(tip.x, head_y, r * 0.4, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str("#fff");
    ctx.fill();
    Ok(())
}

fn draw_label(ctx: &CanvasRenderingContext2d, marker: &MarkerView, label: &str) -> Result<(), JsValue> {
    let y = marker.center.y + marker.size / 2.0 + 2.0;
    ctx.set_font(LABEL_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    ctx.set_fill_style_str(&marker.color);
    ctx.fill_text(label, marker.center.x, y)?;
    if label == Slot::Alt.label() {
        // Underline the alternate so the pair reads apart at a glance.
        let w = ctx.measure_text(label)?.width();
        ctx.set_stroke_style_str(&marker.color);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(marker.center.x - w / 2.0, y + 13.0);
        ctx.line_to(marker.center.x + w / 2.0, y + 13.0);
        ctx.stroke();
    }
    Ok(())
}
