use crate::core::{Rgba, Surface};
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// [`Surface`] backed by a canvas 2D context.
pub struct CanvasSurface {
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: &web::HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    #[allow(deprecated)]
    fn fill(&self, style: &str) {
        self.ctx.set_fill_style(&JsValue::from_str(style));
    }

    #[allow(deprecated)]
    fn stroke(&self, style: &str) {
        self.ctx.set_stroke_style(&JsValue::from_str(style));
    }

    fn arc(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fade(&mut self, width: f32, height: f32, alpha: f32) {
        self.fill(&Rgba::new(0, 0, 0, alpha).css());
        self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.fill(&color.css());
        self.arc(center, radius);
        self.ctx.fill();
    }

    #[allow(deprecated)]
    fn radial_glow(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius as f64) else {
            return;
        };
        _ = gradient.add_color_stop(0.0, &color.css());
        _ = gradient.add_color_stop(1.0, &color.with_alpha(0.0).css());
        self.ctx.set_fill_style(&gradient);
        self.arc(center, radius);
        self.ctx.fill();
    }

    #[allow(deprecated)]
    fn gradient_line(&mut self, head: Vec2, tail: Vec2, width: f32, stops: &[(f32, Rgba)]) {
        let gradient = self.ctx.create_linear_gradient(
            head.x as f64,
            head.y as f64,
            tail.x as f64,
            tail.y as f64,
        );
        for (offset, color) in stops {
            _ = gradient.add_color_stop(*offset, &color.css());
        }
        self.ctx.set_stroke_style(&gradient);
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(head.x as f64, head.y as f64);
        self.ctx.line_to(tail.x as f64, tail.y as f64);
        self.ctx.stroke();
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.stroke(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn glow_point(&mut self, center: Vec2, radius: f32, fill: Rgba, halo: Rgba, blur: f32) {
        self.ctx.save();
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(&halo.css());
        self.fill_circle(center, radius, fill);
        self.ctx.restore();
    }

    #[allow(deprecated)]
    fn tint(&mut self, width: f32, height: f32, stops: &[(f32, Rgba)]) {
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, height as f64);
        for (offset, color) in stops {
            _ = gradient.add_color_stop(*offset, &color.css());
        }
        self.ctx.set_fill_style(&gradient);
        self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn glyph(&mut self, text: &str, center: Vec2, size: f32, angle: f32, alpha: f32) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        _ = self.ctx.translate(center.x as f64, center.y as f64);
        _ = self.ctx.rotate(angle as f64);
        self.ctx.set_font(&format!("{}px sans-serif", size));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.fill(&Rgba::white(1.0).css());
        _ = self.ctx.fill_text(text, 0.0, 0.0);
        self.ctx.restore();
    }
}
