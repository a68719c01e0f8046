//! Error types
//!
//! The simulation itself never fails; errors only arise from bad
//! configuration and from the drawing surface.

/// Rejected game configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("collision sub-step count must be at least 1")]
    ZeroCollisionSteps,
    #[error("gate height band is inverted: min {min} > max {max}")]
    GateHeightRange { min: f32, max: f32 },
    #[error("zoom band is inverted: min {min} > max {max}")]
    ZoomRange { min: f32, max: f32 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("max frame time {max_frame} is shorter than the fixed step {step}")]
    FrameBudget { step: f32, max_frame: f32 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by a renderer backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("drawing surface lost")]
    SurfaceLost,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("surface error: {0}")]
    Surface(String),
    #[error("canvas error: {0}")]
    Canvas(String),
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Surface(other.to_string()),
        }
    }
}
