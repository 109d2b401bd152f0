//! Rendering: draws the visible scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads engine state and produces pixels. It never mutates the scene.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::binding::{self, ArrowEnd, Attachment};
use crate::camera::Point;
use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{CurveElement, ElementStore, FontProps, ShapeElement, ShapeKind, Style};
use crate::engine::EngineCore;
use crate::input::Tool;

/// Arrowhead length in world units.
const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Marker drawn on an endpoint attached to a shape.
const ATTACHED_ANCHOR_RADIUS_WORLD: f64 = 3.0;

const SELECTION_COLOR: &str = "#1E90FF";
const HOVER_COLOR: &str = "rgba(30, 144, 255, 0.5)";

/// Fill used for highlights saved without one.
const HIGHLIGHT_FILL: &str = "rgba(255, 214, 0, 0.35)";

/// Fetch the 2D context of `canvas` and draw the engine's scene into it.
///
/// # Errors
///
/// Returns `Err` if the context is unavailable or any `Canvas2D` call fails.
pub fn draw_to_canvas(canvas: &HtmlCanvasElement, core: &EngineCore) -> Result<(), JsValue> {
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    draw(&ctx, core)
}

/// Draw the full scene: visible elements, the arrow draft, hover and
/// selection chrome.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let camera = core.camera;

    // Layer 1: clear and set up transforms.
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, core.viewport_width, core.viewport_height);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: shapes in insertion order, then arrows on top.
    for shape in core.visible_shapes() {
        draw_shape(ctx, shape)?;
    }
    for arrow in core.visible_arrows() {
        draw_arrow(ctx, arrow, &core.store)?;
    }
    if let Some(draft) = core.draft() {
        draw_arrow(ctx, draft, &core.store)?;
    }

    // Layer 3: binding target under the pointer.
    let binding_active = core.ui.tool == Tool::Arrow || core.draft().is_some();
    if binding_active {
        if let Some(item) = core.hover.latest() {
            outline_points(ctx, &item.points, HOVER_COLOR, camera.zoom, false)?;
        }
    }

    // Layer 4: selection UI.
    for id in &core.ui.selected_ids {
        if let Some(shape) = core.store.shape(id) {
            outline_points(ctx, &shape.points, SELECTION_COLOR, camera.zoom, true)?;
        } else if let Some(arrow) = core.store.arrow(id) {
            draw_arrow_handles(ctx, arrow, camera.zoom)?;
        }
    }

    Ok(())
}

// =============================================================
// Shapes
// =============================================================

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &ShapeElement) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(shape.style.opacity);
    let result = match &shape.kind {
        ShapeKind::Rectangle { .. } => draw_rectangle(ctx, shape),
        ShapeKind::Circle { .. } => draw_circle(ctx, shape),
        ShapeKind::Text { text, font } => draw_text(ctx, shape, text, font),
        ShapeKind::BookTextHighlight { rects, .. } => {
            ctx.set_fill_style_str(highlight_fill(&shape.style));
            for r in rects {
                ctx.fill_rect(r.x, r.y, r.width, r.height);
            }
            Ok(())
        }
    };
    ctx.restore();
    result
}

fn draw_rectangle(ctx: &CanvasRenderingContext2d, shape: &ShapeElement) -> Result<(), JsValue> {
    translate_and_rotate(ctx, shape)?;
    ctx.set_fill_style_str(&shape.style.fill);
    ctx.fill_rect(0.0, 0.0, shape.width, shape.height);
    apply_stroke_style(ctx, &shape.style);
    ctx.stroke_rect(0.0, 0.0, shape.width, shape.height);
    Ok(())
}

fn draw_circle(ctx: &CanvasRenderingContext2d, shape: &ShapeElement) -> Result<(), JsValue> {
    if shape.width <= 0.0 || shape.height <= 0.0 {
        return Ok(());
    }
    let center = shape.frame().center();
    ctx.begin_path();
    ctx.ellipse(
        center.x,
        center.y,
        shape.width / 2.0,
        shape.height / 2.0,
        shape.rotation.to_radians(),
        0.0,
        2.0 * PI,
    )?;
    ctx.set_fill_style_str(&shape.style.fill);
    ctx.fill();
    apply_stroke_style(ctx, &shape.style);
    ctx.stroke();
    Ok(())
}

fn draw_text(ctx: &CanvasRenderingContext2d, shape: &ShapeElement, text: &str, font: &FontProps) -> Result<(), JsValue> {
    if text.is_empty() {
        return Ok(());
    }
    translate_and_rotate(ctx, shape)?;
    let fill = if shape.style.fill == "transparent" { &shape.style.stroke_color } else { &shape.style.fill };
    ctx.set_fill_style_str(fill);
    ctx.set_font(&format!("{} {}px {}", font.font_style, font.font_size, font.font_family));
    ctx.set_text_baseline("top");
    ctx.set_text_align(&font.align);
    let x = match font.align.as_str() {
        "center" => shape.width / 2.0,
        "right" => shape.width,
        _ => 0.0,
    };
    let line_height = font.font_size * 1.25;
    let mut y = 0.0;
    for line in text.lines() {
        ctx.fill_text_with_max_width(line, x, y, shape.width.max(1.0))?;
        y += line_height;
    }
    Ok(())
}

fn highlight_fill(style: &Style) -> &str {
    if style.fill == "transparent" { HIGHLIGHT_FILL } else { &style.fill }
}

// =============================================================
// Arrows
// =============================================================

fn draw_arrow(ctx: &CanvasRenderingContext2d, arrow: &CurveElement, store: &ElementStore) -> Result<(), JsValue> {
    // Malformed arrows are reported by the store on insert; nothing to draw.
    let Some((a, b)) = arrow.endpoints() else {
        return Ok(());
    };

    ctx.save();
    ctx.set_global_alpha(arrow.style.opacity);
    apply_stroke_style(ctx, &arrow.style);
    ctx.set_fill_style_str(&arrow.style.stroke_color);

    ctx.begin_path();
    ctx.move_to(a.x, a.y);
    ctx.line_to(b.x, b.y);
    ctx.stroke();

    let angle = (b.y - a.y).atan2(b.x - a.x);
    draw_arrowhead(ctx, b, angle);

    // Dangling ends draw at their stored point with no marker.
    ctx.set_fill_style_str("#fff");
    for (end, pt) in [(ArrowEnd::Start, a), (ArrowEnd::End, b)] {
        if binding::attachment(arrow, end, store) != Attachment::Attached {
            continue;
        }
        ctx.begin_path();
        ctx.arc(pt.x, pt.y, ATTACHED_ANCHOR_RADIUS_WORLD, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.stroke();
    }

    ctx.restore();
    Ok(())
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip: Point, angle: f64) {
    let x1 = tip.x - ARROW_SIZE * (angle - ARROW_ANGLE).cos();
    let y1 = tip.y - ARROW_SIZE * (angle - ARROW_ANGLE).sin();
    let x2 = tip.x - ARROW_SIZE * (angle + ARROW_ANGLE).cos();
    let y2 = tip.y - ARROW_SIZE * (angle + ARROW_ANGLE).sin();

    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.close_path();
    ctx.fill();
}

fn draw_arrow_handles(ctx: &CanvasRenderingContext2d, arrow: &CurveElement, zoom: f64) -> Result<(), JsValue> {
    let Some((a, b)) = arrow.endpoints() else {
        return Ok(());
    };
    let radius = HANDLE_RADIUS_PX / zoom;

    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    for pt in [a, b] {
        ctx.begin_path();
        ctx.arc(pt.x, pt.y, radius, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Chrome
// =============================================================

/// Stroke a closed outline at constant screen width, optionally dashed.
fn outline_points(
    ctx: &CanvasRenderingContext2d,
    points: &[Point],
    color: &str,
    zoom: f64,
    dashed: bool,
) -> Result<(), JsValue> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };

    ctx.save();
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.0 / zoom);
    if dashed {
        let dash_world = SELECTION_DASH_PX / zoom;
        let dash_array = js_sys::Array::new();
        dash_array.push(&dash_world.into());
        dash_array.push(&dash_world.into());
        ctx.set_line_dash(&dash_array)?;
    }

    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
    ctx.stroke();

    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

/// Translate to the shape's top-left corner and rotate about it.
fn translate_and_rotate(ctx: &CanvasRenderingContext2d, shape: &ShapeElement) -> Result<(), JsValue> {
    ctx.translate(shape.x, shape.y)?;
    ctx.rotate(shape.rotation.to_radians())?;
    Ok(())
}

fn apply_stroke_style(ctx: &CanvasRenderingContext2d, style: &Style) {
    ctx.set_stroke_style_str(&style.stroke_color);
    ctx.set_line_width(style.stroke_width);
}
