//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (gates newest to oldest)
//! - No rendering or platform dependencies

pub mod actor;
pub mod camera;
pub mod collision;
pub mod gate;
pub mod state;
pub mod tick;

pub use actor::Actor;
pub use camera::Camera;
pub use collision::{Rect, circle_intersects_rect, collides, straddles_gap};
pub use gate::{Gate, GateGenerator, SmoothRandom};
pub use state::{GameEvent, GamePhase, GameSession, Hud};
pub use tick::{TickInput, tick};
