//! The flier: vertical kinematics and tilt
//!
//! Horizontal position is fixed; the world scrolls past instead. Positive `y`
//! points down, so gravity is stored negative and subtracted.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::EASE_FACTOR;
use crate::ease_toward;

/// The controllable actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Fixed horizontal position in world space
    pub x: f32,
    pub y: f32,
    /// Vertical displacement per tick (signed, +y is down)
    pub speed: f32,
    /// Visual tilt (radians)
    pub angle: f32,
    pub radius: f32,
    /// Upward speed bound (negative)
    pub top_speed: f32,
    /// Upward impulse of a jump
    pub lift: f32,
    pub gravity: f32,
}

impl Actor {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            speed: 0.0,
            angle: 0.0,
            radius: config.actor_radius,
            top_speed: config.top_speed,
            lift: config.lift,
            gravity: config.gravity,
        }
    }

    /// Largest speed magnitude allowed for a tick of length `dt`.
    ///
    /// Recomputed from `dt` every call, so the effective terminal velocity
    /// depends on the tick length.
    #[inline]
    pub fn speed_bound(&self, dt: f32) -> f32 {
        (self.top_speed * dt).abs()
    }

    /// Accelerate by gravity, clamped to the speed bound
    pub fn apply_gravity(&mut self, dt: f32) {
        let bound = self.speed_bound(dt);
        self.speed = (self.speed - self.gravity * dt).clamp(-bound, bound);
    }

    /// Upward kick, clamped to the same bound as gravity
    pub fn jump(&mut self, dt: f32) {
        let bound = self.speed_bound(dt);
        self.speed = (self.speed - self.lift * dt).clamp(-bound, bound);
    }

    /// Ease the tilt toward the direction of travel
    pub fn update_tilt(&mut self, dt: f32, world_speed: f32) {
        let target = self.speed.atan2(world_speed * dt);
        self.angle = ease_toward(self.angle, target, EASE_FACTOR);
    }

    /// Back to the start line
    pub fn restore(&mut self) {
        self.y = 0.0;
        self.speed = 0.0;
    }

    /// Vertical extent (top, bottom)
    #[inline]
    pub fn vertical_extent(&self) -> (f32, f32) {
        (self.y - self.radius, self.y + self.radius)
    }
}
