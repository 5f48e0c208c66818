//! Rendering: draws a [`Scene`] to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a fully computed scene and produces pixels. It does not
//! mutate any engine state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlVideoElement};

use crate::engine::{Layer, Scene};
use crate::geometry::Point;
use crate::ribbon::{PathSegment, RibbonPath};

/// Draw the full scene: video frame, then markers or ribbon.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. the video is not decodable yet).
pub fn draw(ctx: &CanvasRenderingContext2d, frame: &HtmlVideoElement, scene: &Scene) -> Result<(), JsValue> {
    // Layer 1: clear the whole backing store, then enter logical space.
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, scene.bitmap_width, scene.bitmap_height);
    let [a, b, c, d, e, f] = scene.transform.to_array();
    ctx.set_transform(a, b, c, d, e, f)?;

    // Layer 2: the current video frame stretched over the display box.
    draw_frame(ctx, frame, scene.display_width, scene.display_height)?;

    // Layer 3: annotations.
    match &scene.layer {
        Layer::FrameOnly => Ok(()),
        Layer::Markers { centers, radius, color } => draw_markers(ctx, centers, *radius, color),
        Layer::Ribbon(path) => draw_ribbon(ctx, path),
    }
}

fn draw_frame(ctx: &CanvasRenderingContext2d, frame: &HtmlVideoElement, width: f64, height: f64) -> Result<(), JsValue> {
    let src_w = f64::from(frame.video_width());
    let src_h = f64::from(frame.video_height());
    if src_w <= 0.0 || src_h <= 0.0 {
        return Ok(());
    }
    ctx.draw_image_with_html_video_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        frame, 0.0, 0.0, src_w, src_h, 0.0, 0.0, width, height,
    )
}

fn draw_markers(ctx: &CanvasRenderingContext2d, centers: &[Point], radius: f64, color: &str) -> Result<(), JsValue> {
    ctx.set_fill_style_str(color);
    for c in centers {
        ctx.begin_path();
        ctx.arc(c.x, c.y, radius, 0.0, 2.0 * PI)?;
        ctx.fill();
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn draw_ribbon(ctx: &CanvasRenderingContext2d, path: &RibbonPath) -> Result<(), JsValue> {
    let g = &path.gradient;
    let gradient = ctx.create_linear_gradient(g.from.x, g.from.y, g.to.x, g.to.y);
    for stop in &g.stops {
        gradient.add_color_stop(stop.offset as f32, &g.css_color(*stop))?;
    }
    ctx.set_fill_style_canvas_gradient(&gradient);

    ctx.begin_path();
    for segment in &path.segments {
        match *segment {
            PathSegment::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathSegment::LineTo(p) => ctx.line_to(p.x, p.y),
            PathSegment::QuadTo { ctrl, to } => ctx.quadratic_curve_to(ctrl.x, ctrl.y, to.x, to.y),
            PathSegment::Close => ctx.close_path(),
        }
    }
    ctx.fill();
    Ok(())
}
