//! Gate geometry and the smoothed gate generator
//!
//! A gate is a pair of arms sharing one horizontal span `[x, x + width]`:
//! the top arm ends at `gap_top`, the bottom arm starts at `gap_bottom`.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// A gate entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    /// Set once the actor cleared this gate (scored exactly once)
    pub passed: bool,
}

impl Gate {
    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_height(&self) -> f32 {
        self.gap_bottom - self.gap_top
    }

    #[inline]
    pub fn gap_center(&self) -> f32 {
        (self.gap_top + self.gap_bottom) * 0.5
    }

    /// Narrow the gap from both sides by `amount`, never inverting it
    pub fn close(&mut self, amount: f32) {
        if self.gap_top != self.gap_bottom {
            self.gap_top = (self.gap_top + amount).min(self.gap_bottom);
            self.gap_bottom = (self.gap_bottom - amount).max(self.gap_top);
        }
    }
}

/// Running value moved by bounded random increments
#[derive(Debug, Clone)]
pub struct SmoothRandom {
    pub last: f32,
    pub step: f32,
}

impl SmoothRandom {
    pub fn new(step: f32) -> Self {
        Self { last: 0.0, step }
    }

    pub fn reset(&mut self) {
        self.last = 0.0;
    }

    pub fn next(&mut self, rng: &mut Pcg32) -> f32 {
        if self.step > 0.0 {
            self.last += rng.random_range(-self.step..=self.step);
        }
        self.last
    }
}

/// Produces gates with a seeded RNG
#[derive(Debug, Clone)]
pub struct GateGenerator {
    rng: Pcg32,
    walk: SmoothRandom,
    width: f32,
    min_height: f32,
    max_height: f32,
    first_offset: f32,
    next_id: u32,
}

impl GateGenerator {
    pub fn new(config: &GameConfig, rng: Pcg32) -> Self {
        Self {
            rng,
            walk: SmoothRandom::new(config.gate_step),
            width: config.gate_width,
            min_height: config.min_gate_height,
            max_height: config.max_gate_height,
            first_offset: config.gate_spacing * 2.0,
            next_id: 1,
        }
    }

    /// Build the next gate.
    ///
    /// With no predecessor (`None`) the gate opens a fresh run: fixed offset,
    /// widest gap, centered on a reset random walk. Otherwise the gate is
    /// placed at `x` with a random height and a center that drifts from the
    /// previous one by at most the walk step.
    pub fn next_gate(&mut self, x: Option<f32>) -> Gate {
        let (x, height, center) = match x {
            None => {
                self.walk.reset();
                (self.first_offset, self.max_height, 0.0)
            }
            Some(x) => {
                let height = if self.max_height > self.min_height {
                    self.rng.random_range(self.min_height..=self.max_height)
                } else {
                    self.min_height
                };
                (x, height, self.walk.next(&mut self.rng))
            }
        };

        let id = self.next_id;
        self.next_id += 1;

        let gap_top = center - height / 2.0;
        Gate {
            id,
            x,
            width: self.width,
            gap_top,
            gap_bottom: gap_top + height,
            passed: false,
        }
    }

    /// Center of the most recent gap
    pub fn last_center(&self) -> f32 {
        self.walk.last
    }
}
