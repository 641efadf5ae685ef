//! Canvas rendering of the wheel graphic.
//!
//! The wheel is always drawn in its own unrotated frame (slice 0 starting at
//! the canvas's 0-degree axis, 3 o'clock); the spin is applied as a CSS
//! rotation transform on the canvas element by the frame loop. Redrawn on
//! every list mutation, never cached, since the slice count changes.

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::WHEEL_COLORS;

pub const WHEEL_RADIUS: f64 = 180.0;
const LABEL_RADIUS: f64 = 160.0;
const LABEL_FONT: &str = "bold 18px Arial";

/// Draw `items` as equal wedges. An empty list clears the canvas and draws
/// nothing (the caller hides the pointer); a single item fills the whole
/// circle with one unstroked wedge.
pub fn draw_wheel(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, items: &[String]) {
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);

    if items.is_empty() {
        return;
    }

    let slice = TAU / items.len() as f64;
    let center_x = width / 2.0;
    let center_y = height / 2.0;

    for (i, label) in items.iter().enumerate() {
        ctx.begin_path();
        ctx.move_to(center_x, center_y);
        ctx.arc(
            center_x,
            center_y,
            WHEEL_RADIUS,
            i as f64 * slice,
            (i + 1) as f64 * slice,
        )
        .ok();
        ctx.close_path();

        ctx.set_global_alpha(0.6);
        ctx.set_fill_style_str(WHEEL_COLORS[i % WHEEL_COLORS.len()]);
        ctx.fill();

        // A lone wedge is a full disc; stroking its seam would draw a stray
        // radius line.
        if items.len() > 1 {
            ctx.set_global_alpha(1.0);
            ctx.set_line_width(2.0);
            ctx.set_stroke_style_str("white");
            ctx.stroke();
        }

        // Label drawn radially, anchored near the rim of its slice.
        ctx.save();
        ctx.translate(center_x, center_y).ok();
        ctx.rotate(i as f64 * slice + slice / 2.0).ok();
        ctx.set_global_alpha(1.0);
        ctx.set_text_align("right");
        ctx.set_fill_style_str("white");
        ctx.set_font(LABEL_FONT);
        ctx.fill_text(label, LABEL_RADIUS, 5.0).ok();
        ctx.restore();
    }

    ctx.set_global_alpha(1.0);
}
