//! CPU shape batch
//!
//! Implements the canvas-style `Renderer` calls by tessellating every shape
//! into colored triangles in pixel space. The GPU renderer uploads the result
//! each frame; headless runs and tests inspect it directly.

use glam::{Affine2, Vec2};

use super::shapes;
use super::vertex::Vertex;
use super::{Color, Renderer};
use crate::error::RenderError;

/// Drawing state saved and restored as a unit, like a canvas context
#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawState {
    transform: Affine2,
    stroke: Option<Color>,
    fill: Option<Color>,
    line_width: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            stroke: None,
            fill: None,
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShapeBatch {
    size: (u32, u32),
    clear_color: Color,
    state: DrawState,
    stack: Vec<DrawState>,
    vertices: Vec<Vertex>,
    frames: u64,
    last_frame_vertices: usize,
}

impl ShapeBatch {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            clear_color: Color::BLACK,
            state: DrawState::default(),
            stack: Vec::new(),
            vertices: Vec::new(),
            frames: 0,
            last_frame_vertices: 0,
        }
    }

    /// Target size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Triangles queued for the current frame
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn transform(&self) -> Affine2 {
        self.state.transform
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Triangle vertices in the most recently presented frame
    pub fn last_frame_vertices(&self) -> usize {
        self.last_frame_vertices
    }

    fn push_shape(&mut self, points: &[Vec2]) {
        let DrawState {
            transform,
            stroke,
            fill,
            line_width,
        } = self.state;

        let start = self.vertices.len();
        if let Some(color) = fill {
            self.vertices.extend(shapes::fill(points, color));
        }
        if let Some(color) = stroke {
            self.vertices
                .extend(shapes::outline(points, line_width, color));
        }
        for v in &mut self.vertices[start..] {
            v.position = transform.transform_point2(v.position()).to_array();
        }
    }
}

impl Renderer for ShapeBatch {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        // Resizing a canvas resets its context
        self.state = DrawState::default();
        self.stack.clear();
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = color;
        self.vertices.clear();
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform * Affine2::from_scale(Vec2::new(sx, sy));
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform =
            self.state.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn set_stroke_color(&mut self, color: Option<Color>) {
        self.state.stroke = color;
    }

    fn set_fill_color(&mut self, color: Option<Color>) {
        self.state.fill = color;
    }

    fn draw_polygon(&mut self, x: f32, y: f32, radius: f32, sides: u32, angle: f32) {
        let points = shapes::polygon_points(Vec2::new(x, y), radius, sides, angle);
        self.push_shape(&points);
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.push_shape(&shapes::rect_points(x, y, w, h));
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.frames += 1;
        self.last_frame_vertices = self.vertices.len();
        self.vertices.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_drawn_without_colors() {
        let mut batch = ShapeBatch::new(100, 100);
        batch.draw_rect(0.0, 0.0, 10.0, 10.0);
        assert!(batch.vertices().is_empty());

        batch.set_fill_color(Some(Color::WHITE));
        batch.draw_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(batch.vertices().len(), 6);

        batch.set_stroke_color(Some(Color::BLACK));
        batch.draw_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(batch.vertices().len(), 6 + 6 + 24);
    }

    #[test]
    fn test_transform_applies_scale_then_translate() {
        let mut batch = ShapeBatch::new(100, 100);
        batch.set_fill_color(Some(Color::WHITE));
        batch.scale(2.0, 2.0);
        batch.translate(5.0, -1.0);
        batch.draw_rect(0.0, 0.0, 1.0, 1.0);

        let first = batch.vertices()[0].position();
        assert_eq!(first, Vec2::new(10.0, -2.0));
    }

    #[test]
    fn test_save_restore_covers_colors_and_transform() {
        let mut batch = ShapeBatch::new(100, 100);
        batch.save();
        batch.set_stroke_color(Some(Color::WHITE));
        batch.set_line_width(3.0);
        batch.scale(4.0, 4.0);
        batch.restore();

        assert_eq!(batch.transform(), Affine2::IDENTITY);
        batch.draw_polygon(0.0, 0.0, 5.0, 3, 0.0);
        assert!(batch.vertices().is_empty());

        // Unbalanced restore is ignored
        batch.restore();
        assert_eq!(batch.transform(), Affine2::IDENTITY);
    }

    #[test]
    fn test_clear_and_present() {
        let mut batch = ShapeBatch::new(100, 100);
        batch.set_fill_color(Some(Color::WHITE));
        batch.draw_rect(0.0, 0.0, 1.0, 1.0);
        batch.clear(Color::rgba(0.1, 0.2, 0.3, 1.0));
        assert!(batch.vertices().is_empty());
        assert_eq!(batch.clear_color(), Color::rgba(0.1, 0.2, 0.3, 1.0));

        batch.draw_rect(0.0, 0.0, 1.0, 1.0);
        batch.present().unwrap();
        assert_eq!(batch.frames(), 1);
        assert_eq!(batch.last_frame_vertices(), 6);
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn test_resize_resets_state() {
        let mut batch = ShapeBatch::new(100, 100);
        batch.save();
        batch.translate(3.0, 3.0);
        batch.resize(640, 480);
        assert_eq!(batch.size(), (640, 480));
        assert_eq!(batch.transform(), Affine2::IDENTITY);
    }
}
