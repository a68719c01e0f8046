//! Rendering module
//!
//! The scene only talks to the `Renderer` trait, a canvas-style immediate
//! drawing interface with a save/restore transform stack. Two backends
//! implement it: `GpuRenderer` (wgpu, WebGPU or WebGL2) and, in the browser,
//! `CanvasRenderer` (Canvas 2D). `ShapeBatch` is the CPU tessellator behind
//! the GPU backend and doubles as a headless renderer.

pub mod batch;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod color;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use batch::ShapeBatch;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use color::Color;
pub use pipeline::GpuRenderer;
pub use scene::render_session;

use crate::error::RenderError;

/// Immediate-mode 2D drawing surface.
///
/// Coordinates are pixels with +y down until `scale`/`translate` change the
/// current transform. `save`/`restore` push and pop the transform together
/// with the colors and line width. A `None` color disables that part of a
/// shape (no fill, or no outline).
pub trait Renderer {
    /// New target size in pixels; resets the drawing state
    fn resize(&mut self, width: u32, height: u32);
    /// Fill the whole target, ignoring the current transform
    fn clear(&mut self, color: Color);
    fn save(&mut self);
    fn restore(&mut self);
    fn scale(&mut self, sx: f32, sy: f32);
    fn translate(&mut self, x: f32, y: f32);
    fn set_line_width(&mut self, width: f32);
    fn set_stroke_color(&mut self, color: Option<Color>);
    fn set_fill_color(&mut self, color: Option<Color>);
    /// Regular polygon centered at `(x, y)` with its first corner at `angle`
    fn draw_polygon(&mut self, x: f32, y: f32, radius: f32, sides: u32, angle: f32);
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    /// Finish the frame
    fn present(&mut self) -> Result<(), RenderError>;
}
