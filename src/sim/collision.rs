//! Collision detection between the round actor and a gate
//!
//! Cheap interval tests settle most cases; only when the actor straddles a gap
//! edge do we fall back to exact circle-vs-rectangle distance checks against
//! the two arms.

use glam::Vec2;

use super::actor::Actor;
use super::gate::Gate;

/// Axis-aligned rectangle (origin at the top-left corner, +y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Point of the rectangle nearest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        )
    }
}

/// Squared distance from `p` to the nearest point of `rect`
#[inline]
pub fn distance_sq_to_rect(p: Vec2, rect: &Rect) -> f32 {
    p.distance_squared(rect.closest_point(p))
}

/// Circle vs axis-aligned rectangle (touching counts)
#[inline]
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    distance_sq_to_rect(center, rect) <= radius * radius
}

/// The two arms of a gate near its gap, each one actor-diameter tall.
///
/// Only used once the actor straddles a gap edge, so arms of that height
/// cover every point the actor can reach.
pub fn gate_arms(gate: &Gate, actor_radius: f32) -> [Rect; 2] {
    let depth = actor_radius * 2.0;
    [
        Rect::new(gate.x, gate.gap_top - depth, gate.width, depth),
        Rect::new(gate.x, gate.gap_bottom, gate.width, depth),
    ]
}

/// Whether the actor overlaps either arm of the gate
pub fn collides(actor: &Actor, gate: &Gate) -> bool {
    let r = actor.radius;
    let (top, bottom) = actor.vertical_extent();

    let overlaps_x = actor.x + r >= gate.x && actor.x - r <= gate.right();
    if !overlaps_x || (top > gate.gap_top && bottom < gate.gap_bottom) {
        return false;
    }

    // Entirely beside the gap: solid arm overlap
    if bottom < gate.gap_top || top > gate.gap_bottom {
        return true;
    }

    let center = Vec2::new(actor.x, actor.y);
    gate_arms(gate, r)
        .iter()
        .any(|arm| circle_intersects_rect(center, r, arm))
}

/// Whether the actor's vertical extent reaches into the gap band.
///
/// A collision in that state came from a gap edge (vertical hit); otherwise
/// the actor ran into the face of an arm.
#[inline]
pub fn straddles_gap(actor: &Actor, gate: &Gate) -> bool {
    let (top, bottom) = actor.vertical_extent();
    bottom > gate.gap_top && top < gate.gap_bottom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use proptest::prelude::*;

    fn actor_at(x: f32, y: f32, radius: f32) -> Actor {
        let mut actor = Actor::new(&GameConfig::default());
        actor.x = x;
        actor.y = y;
        actor.radius = radius;
        actor
    }

    fn gate(x: f32, width: f32, top: f32, bottom: f32) -> Gate {
        Gate {
            id: 1,
            x,
            width,
            gap_top: top,
            gap_bottom: bottom,
            passed: false,
        }
    }

    #[test]
    fn test_mid_gap_is_clear() {
        let g = gate(0.0, 96.0, 100.0, 300.0);
        assert!(!collides(&actor_at(0.0, 200.0, 24.0), &g));
    }

    #[test]
    fn test_inside_top_arm_collides() {
        let g = gate(0.0, 96.0, 100.0, 300.0);
        assert!(collides(&actor_at(0.0, 50.0, 24.0), &g));
        assert!(collides(&actor_at(0.0, 350.0, 24.0), &g));
    }

    #[test]
    fn test_grazing_top_arm() {
        let g = gate(0.0, 96.0, 100.0, 300.0);
        // Center at y=95 lies on the arm's left face: distance 0
        assert!(collides(&actor_at(0.0, 95.0, 24.0), &g));
    }

    #[test]
    fn test_corner_distance_decides() {
        // Corner of the top arm at (0, 100); actor to the left and below it
        let g = gate(0.0, 96.0, 100.0, 300.0);
        // dx = 15, dy = 15 -> distance ~21.2 <= 24
        assert!(collides(&actor_at(-15.0, 115.0, 24.0), &g));
        // dx = 20, dy = 20 -> distance ~28.3 > 24
        assert!(!collides(&actor_at(-20.0, 120.0, 24.0), &g));
    }

    #[test]
    fn test_no_horizontal_overlap() {
        let g = gate(100.0, 96.0, 100.0, 300.0);
        assert!(!collides(&actor_at(0.0, 0.0, 24.0), &g));
        let behind = gate(-200.0, 96.0, 100.0, 300.0);
        assert!(!collides(&actor_at(0.0, 0.0, 24.0), &behind));
    }

    #[test]
    fn test_straddles_gap() {
        let g = gate(0.0, 96.0, 100.0, 300.0);
        assert!(straddles_gap(&actor_at(0.0, 95.0, 24.0), &g));
        assert!(!straddles_gap(&actor_at(0.0, 50.0, 24.0), &g));
    }

    #[test]
    fn test_closest_point() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.closest_point(Vec2::new(5.0, 5.0)), Vec2::new(5.0, 5.0));
        assert_eq!(rect.closest_point(Vec2::new(-3.0, 20.0)), Vec2::new(0.0, 10.0));
        assert_eq!(distance_sq_to_rect(Vec2::new(13.0, 14.0), &rect), 25.0);
    }

    /// Brute force: the actor overlaps an arm when any arm point is within
    /// the radius. Arms here extend far enough to be "infinite".
    fn reference(actor: &Actor, g: &Gate) -> bool {
        let c = Vec2::new(actor.x, actor.y);
        let far = 1.0e5;
        let top = Rect::new(g.x, g.gap_top - far, g.width, far);
        let bottom = Rect::new(g.x, g.gap_bottom, g.width, far);
        circle_intersects_rect(c, actor.radius, &top)
            || circle_intersects_rect(c, actor.radius, &bottom)
    }

    proptest! {
        #[test]
        fn prop_matches_reference(
            ax in -150.0f32..150.0,
            ay in -100.0f32..500.0,
            gx in -100.0f32..100.0,
        ) {
            let g = gate(gx, 96.0, 100.0, 300.0);
            let actor = actor_at(ax, ay, 24.0);
            prop_assert_eq!(collides(&actor, &g), reference(&actor, &g));
        }
    }
}
