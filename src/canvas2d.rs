//! Canvas2D [`Surface`]: paints the retained scene graph onto `#scene-canvas`.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys as web;
use wobble_core::graph::{Node, Visitor};
use wobble_core::{HostConfig, NodeKind, Rgba, SceneGraph, Style, Surface, SurfaceError};

use crate::constants::STAGE_FONT_FAMILY;

pub struct Canvas2dSurface {
    canvas: web::HtmlCanvasElement,
    ctx: Option<web::CanvasRenderingContext2d>,
}

impl Canvas2dSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> Self {
        Self { canvas, ctx: None }
    }
}

fn js_err(what: &str, e: wasm_bindgen::JsValue) -> SurfaceError {
    SurfaceError(format!("{}: {:?}", what, e))
}

impl Surface for Canvas2dSurface {
    fn init(&mut self, _config: &HostConfig) -> Result<(), SurfaceError> {
        let ctx = self
            .canvas
            .get_context("2d")
            .map_err(|e| js_err("getContext", e))?
            .ok_or_else(|| SurfaceError("2d context unavailable".into()))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| js_err("2d context", e.into()))?;
        self.ctx = Some(ctx);
        Ok(())
    }

    fn draw(&mut self, graph: &SceneGraph, config: &HostConfig) -> Result<(), SurfaceError> {
        let ctx = self
            .ctx
            .as_ref()
            .ok_or_else(|| SurfaceError("surface not initialized".into()))?;
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        if w <= 0.0 || h <= 0.0 {
            return Ok(());
        }
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            .map_err(|e| js_err("setTransform", e))?;
        ctx.clear_rect(0.0, 0.0, w, h);
        if config.clear_color.a > 0.0 {
            ctx.set_fill_style_str(&config.clear_color.to_css());
            ctx.fill_rect(0.0, 0.0, w, h);
        }

        // letterbox the stage into the backing store
        let sw = config.stage_width as f64;
        let sh = config.stage_height as f64;
        let scale = (w / sw).min(h / sh);
        let ox = (w - sw * scale) * 0.5;
        let oy = (h - sh * scale) * 0.5;
        ctx.set_transform(scale, 0.0, 0.0, scale, ox, oy)
            .map_err(|e| js_err("setTransform", e))?;

        let mut painter = Painter { ctx, error: None };
        graph.walk(&mut painter);
        match painter.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn release(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
            ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        }
    }
}

struct Painter<'a> {
    ctx: &'a web::CanvasRenderingContext2d,
    error: Option<SurfaceError>,
}

impl Painter<'_> {
    fn fail(&mut self, what: &str, e: wasm_bindgen::JsValue) {
        if self.error.is_none() {
            self.error = Some(js_err(what, e));
        }
    }

    fn apply_style(&self, style: &Style) {
        if style.glow > 0.0 {
            let glow_color = style.fill.or(style.stroke).unwrap_or(Rgba::WHITE);
            self.ctx.set_shadow_color(&glow_color.to_css());
            self.ctx.set_shadow_blur(style.glow as f64);
        } else {
            self.ctx.set_shadow_blur(0.0);
        }
        if let Some(fill) = style.fill {
            self.ctx.set_fill_style_str(&fill.to_css());
        }
        if let Some(stroke) = style.stroke {
            self.ctx.set_stroke_style_str(&stroke.to_css());
            self.ctx.set_line_width(style.stroke_width.max(0.0) as f64);
        }
    }

    fn fill_and_stroke(&self, style: &Style) {
        if style.fill.is_some() {
            self.ctx.fill();
        }
        if style.stroke.is_some() && style.stroke_width > 0.0 {
            self.ctx.stroke();
        }
    }

    fn paint(&mut self, node: &Node) {
        let ctx = self.ctx;
        let style = &node.style;
        self.apply_style(style);
        match &node.kind {
            NodeKind::Group => {}
            NodeKind::Circle { radius } => {
                ctx.begin_path();
                if let Err(e) = ctx.arc(0.0, 0.0, radius.max(0.0) as f64, 0.0, TAU) {
                    self.fail("arc", e);
                    return;
                }
                self.fill_and_stroke(style);
            }
            NodeKind::Ellipse { rx, ry } => {
                ctx.begin_path();
                if let Err(e) =
                    ctx.ellipse(0.0, 0.0, rx.max(0.0) as f64, ry.max(0.0) as f64, 0.0, 0.0, TAU)
                {
                    self.fail("ellipse", e);
                    return;
                }
                self.fill_and_stroke(style);
            }
            NodeKind::Rect { width, height } => {
                let (w, h) = (*width as f64, *height as f64);
                if style.fill.is_some() {
                    ctx.fill_rect(-w * 0.5, -h * 0.5, w, h);
                }
                if style.stroke.is_some() {
                    ctx.stroke_rect(-w * 0.5, -h * 0.5, w, h);
                }
            }
            NodeKind::Line { to } => {
                ctx.begin_path();
                ctx.move_to(0.0, 0.0);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            NodeKind::Polyline { points } => {
                let mut iter = points.iter();
                if let Some(first) = iter.next() {
                    ctx.begin_path();
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in iter {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.stroke();
                }
            }
            NodeKind::Text { text, size } => {
                ctx.set_font(&format!("{}px {}", size, STAGE_FONT_FAMILY));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                if let Err(e) = ctx.fill_text(text, 0.0, 0.0) {
                    self.fail("fillText", e);
                }
            }
        }
    }
}

impl Visitor for Painter<'_> {
    fn enter(&mut self, node: &Node) -> bool {
        let ctx = self.ctx;
        // balanced by `leave`, which runs even when children are skipped
        ctx.save();
        if node.alpha <= 0.0 || self.error.is_some() {
            return false;
        }
        let t = &node.transform;
        let placed = ctx
            .translate(t.position.x as f64, t.position.y as f64)
            .and_then(|_| ctx.rotate(t.rotation as f64))
            .and_then(|_| ctx.scale(t.scale.x as f64, t.scale.y as f64));
        if let Err(e) = placed {
            self.fail("transform", e);
        }
        ctx.set_global_alpha(ctx.global_alpha() * node.alpha.clamp(0.0, 1.0) as f64);
        self.paint(node);
        true
    }

    fn leave(&mut self, _node: &Node) {
        self.ctx.restore();
    }
}
