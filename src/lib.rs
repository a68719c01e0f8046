//! Flapgate - a flappy side-scroller
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor, gates, collisions, camera, phases)
//! - `renderer`: Drawing backends behind a single `Renderer` trait
//! - `platform`: Clocks and the fixed-step scheduler
//! - `persistence`: High score storage
//! - `config`: Data-driven game tuning

pub mod config;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod theme;

pub use config::{GameConfig, InputProfile};
pub use error::{ConfigError, RenderError};
pub use game::Game;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest wall-clock gap a single frame may catch up on (seconds)
    pub const MAX_FRAME_TIME: f32 = 5.0;
    /// Display scale applied to every world-space length
    pub const DEFAULT_SCALE: f32 = 0.8;

    /// Fraction of the remaining distance covered per tick by eased values
    /// (actor tilt, camera follow)
    pub const EASE_FACTOR: f32 = 0.1;

    /// Scroll speed gained per tick while speeding up (fraction of world speed)
    pub const SPEEDUP_RATE: f32 = 0.02;
    /// Scroll speed lost per tick while stopped (fraction of world speed)
    pub const SLOWDOWN_RATE: f32 = 0.01;
    /// Relative zoom growth per tick while stopped
    pub const ZOOM_OUT_RATE: f32 = 0.05;
    /// Absolute zoom shrink per tick after a restart
    pub const ZOOM_IN_STEP: f32 = 0.05;

    /// Horizontal view offset of the actor (fraction of view width)
    pub const VIEW_OFFSET_X: f32 = 0.2;
    /// Vertical view center (fraction of view height)
    pub const VIEW_CENTER_Y: f32 = 0.5;
}

/// Move `current` toward `target` by `factor` of the remaining distance
#[inline]
pub fn ease_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}
