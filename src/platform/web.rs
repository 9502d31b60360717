use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::sprite_fallback;
use crate::draw::{DrawCmd, DrawList};
use crate::router::RouteSink;

/// Publishes the route to `location.hash`
pub struct HashSink;

impl RouteSink for HashSink {
    fn publish(&mut self, route: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if window.location().set_hash(route).is_err() {
            log::warn!("Could not set location hash to '{}'", route);
        }
    }
}

/// The route the page was opened with
pub fn initial_route() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// 2D context of a canvas
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

fn rotated(
    g: &CanvasRenderingContext2d,
    cx: f64,
    cy: f64,
    angle: f64,
    paint: impl FnOnce(&CanvasRenderingContext2d),
) -> Result<(), JsValue> {
    g.save();
    g.translate(cx, cy)?;
    g.rotate(angle)?;
    paint(g);
    g.restore();
    Ok(())
}

/// Replay a frame's commands onto the canvas
pub fn paint(g: &CanvasRenderingContext2d, list: &DrawList) -> Result<(), JsValue> {
    let (w, h) = g
        .canvas()
        .map(|c| (c.width() as f64, c.height() as f64))
        .unwrap_or_default();
    g.clear_rect(0.0, 0.0, w, h);

    for cmd in list.iter() {
        match cmd {
            DrawCmd::Sprite {
                name,
                center,
                size,
                angle,
            } => {
                let (color, round) = sprite_fallback(name);
                g.set_fill_style_str(color);
                let (sw, sh) = (size.x as f64, size.y as f64);
                rotated(g, center.x as f64, center.y as f64, *angle as f64, |g| {
                    if round {
                        g.begin_path();
                        let _ = g.arc(0.0, 0.0, sw.min(sh) / 2.0, 0.0, TAU);
                        g.fill();
                    } else {
                        g.fill_rect(-sw / 2.0, -sh / 2.0, sw, sh);
                    }
                })?;
            }
            DrawCmd::Rect {
                min,
                size,
                color,
                angle,
            } => {
                g.set_fill_style_str(color);
                let c = *min + *size / 2.0;
                let (sw, sh) = (size.x as f64, size.y as f64);
                rotated(g, c.x as f64, c.y as f64, *angle as f64, |g| {
                    g.fill_rect(-sw / 2.0, -sh / 2.0, sw, sh);
                })?;
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => {
                g.set_fill_style_str(color);
                g.begin_path();
                g.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                g.fill();
            }
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => {
                g.set_stroke_style_str(color);
                g.set_line_width(*width as f64);
                g.begin_path();
                g.move_to(from.x as f64, from.y as f64);
                g.line_to(to.x as f64, to.y as f64);
                g.stroke();
            }
            DrawCmd::Text {
                pos,
                text,
                size,
                color,
            } => {
                g.set_fill_style_str(color);
                g.set_font(&format!("bold {}px sans-serif", size));
                g.set_text_align("center");
                g.set_text_baseline("middle");
                g.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
            DrawCmd::Overlay { color, alpha } => {
                g.save();
                g.set_global_alpha(*alpha as f64);
                g.set_fill_style_str(color);
                g.fill_rect(0.0, 0.0, w, h);
                g.restore();
            }
        }
    }
    Ok(())
}
