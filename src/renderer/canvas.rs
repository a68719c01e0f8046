//! Canvas 2D fallback renderer (wasm only)
//!
//! Maps every `Renderer` call onto the matching `CanvasRenderingContext2d`
//! call. Context errors are kept until `present` reports them.

use std::f32::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Renderer};
use crate::error::RenderError;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    stroke: Option<Color>,
    fill: Option<Color>,
    stroke_stack: Vec<(Option<Color>, Option<Color>)>,
    error: Option<RenderError>,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RenderError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| RenderError::Unavailable("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::Unavailable("not a 2d context".into()))?;

        log::info!("Canvas 2D renderer ready");
        Ok(Self {
            canvas,
            ctx,
            stroke: None,
            fill: None,
            stroke_stack: Vec::new(),
            error: None,
        })
    }

    fn check(&mut self, result: Result<(), JsValue>) {
        if let Err(e) = result {
            if self.error.is_none() {
                self.error = Some(js_error(e));
            }
        }
    }

    fn paint(&self) {
        if let Some(color) = self.fill {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
        if let Some(color) = self.stroke {
            self.ctx.set_stroke_style_str(&color.to_css());
            self.ctx.stroke();
        }
    }
}

fn js_error(value: JsValue) -> RenderError {
    RenderError::Canvas(format!("{:?}", value))
}

impl Renderer for CanvasRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.stroke_stack.clear();
    }

    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn save(&mut self) {
        self.ctx.save();
        self.stroke_stack.push((self.stroke, self.fill));
    }

    fn restore(&mut self) {
        self.ctx.restore();
        if let Some((stroke, fill)) = self.stroke_stack.pop() {
            self.stroke = stroke;
            self.fill = fill;
        }
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        let result = self.ctx.scale(sx as f64, sy as f64);
        self.check(result);
    }

    fn translate(&mut self, x: f32, y: f32) {
        let result = self.ctx.translate(x as f64, y as f64);
        self.check(result);
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_stroke_color(&mut self, color: Option<Color>) {
        self.stroke = color;
    }

    fn set_fill_color(&mut self, color: Option<Color>) {
        self.fill = color;
    }

    fn draw_polygon(&mut self, x: f32, y: f32, radius: f32, sides: u32, angle: f32) {
        if sides < 2 {
            return;
        }
        self.ctx.begin_path();
        for i in 0..sides {
            let theta = angle + i as f32 * TAU / sides as f32;
            let px = (x + radius * theta.cos()) as f64;
            let py = (y + radius * theta.sin()) as f64;
            if i == 0 {
                self.ctx.move_to(px, py);
            } else {
                self.ctx.line_to(px, py);
            }
        }
        self.ctx.close_path();
        self.paint();
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.begin_path();
        self.ctx.rect(x as f64, y as f64, w as f64, h as f64);
        self.paint();
    }

    fn present(&mut self) -> Result<(), RenderError> {
        // The browser composites the canvas on its own
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
