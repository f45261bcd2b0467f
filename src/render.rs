//! Rendering: paints relationship wires onto the board's 2D canvas.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives wires already converted to screen space and produces pixels;
//! it does not mutate any engine state. Cards are DOM elements owned by the
//! host and are positioned with [`crate::camera::Camera::css_transform`].
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{LABEL_COLOR, WIRE_COLOR};
use crate::wire::{WireLabel, WireSegment};

/// Clear the canvas and draw every wire.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    wires: &[WireSegment],
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);

    // Lines first so labels sit on top of crossing wires.
    for wire in wires {
        draw_wire(ctx, wire);
    }
    for label in wires.iter().filter_map(|w| w.label.as_ref()) {
        draw_label(ctx, label)?;
    }
    Ok(())
}

fn draw_wire(ctx: &CanvasRenderingContext2d, wire: &WireSegment) {
    ctx.set_stroke_style_str(WIRE_COLOR);
    ctx.set_line_width(wire.stroke_width);
    ctx.begin_path();
    ctx.move_to(wire.from.x, wire.from.y);
    ctx.line_to(wire.to.x, wire.to.y);
    ctx.stroke();
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &WireLabel) -> Result<(), JsValue> {
    ctx.set_fill_style_str(LABEL_COLOR);
    ctx.set_font(&format!("{}px sans-serif", label.font_px));
    ctx.set_text_align("center");
    ctx.fill_text(&label.text, label.position.x, label.position.y)
}
