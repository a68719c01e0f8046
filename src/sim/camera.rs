//! Camera follow: vertical smoothing and view geometry
//!
//! The camera owns no entities. It tracks the actor's `y` with the same
//! first-order filter used for tilt, and knows the view size in world units.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{EASE_FACTOR, VIEW_CENTER_Y, VIEW_OFFSET_X};
use crate::ease_toward;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// View size in world units (viewport × display scale)
    pub view: Vec2,
    /// Horizontal screen position of the actor
    pub offset_x: f32,
    /// Vertical screen position the actor is centered on
    pub center_y: f32,
    /// Smoothed vertical translation
    pub current_y: f32,
    /// Translation that would center the actor exactly
    pub target_y: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        let mut camera = Self {
            view: Vec2::ZERO,
            offset_x: 0.0,
            center_y: 0.0,
            current_y: 0.0,
            target_y: 0.0,
        };
        camera.resize(width, height);
        camera
    }

    /// New view size; snaps the smoothed offset back to the view center
    pub fn resize(&mut self, width: f32, height: f32) {
        self.view = Vec2::new(width, height);
        self.offset_x = width * VIEW_OFFSET_X;
        self.center_y = height * VIEW_CENTER_Y;
        self.current_y = self.center_y;
    }

    #[inline]
    pub fn target_for(&self, actor_y: f32, zoom: f32) -> f32 {
        -actor_y + self.center_y / zoom
    }

    /// Jump straight to the target (used on restart)
    pub fn snap(&mut self, actor_y: f32, zoom: f32) {
        self.target_y = self.target_for(actor_y, zoom);
        self.current_y = self.target_y;
    }

    /// Recompute the target and ease toward it
    pub fn follow(&mut self, actor_y: f32, zoom: f32) {
        self.target_y = self.target_for(actor_y, zoom);
        self.current_y = ease_toward(self.current_y, self.target_y, EASE_FACTOR);
    }

    /// Topmost visible world `y`
    #[inline]
    pub fn visible_top(&self) -> f32 {
        -self.current_y
    }

    /// Bottommost visible world `y`
    #[inline]
    pub fn visible_bottom(&self, zoom: f32) -> f32 {
        self.view.y / zoom - self.current_y
    }

    /// Leftmost visible world `x`
    #[inline]
    pub fn visible_left(&self, zoom: f32) -> f32 {
        -self.offset_x / zoom
    }

    /// Rightmost visible world `x` (the actor sits at `x = 0`)
    #[inline]
    pub fn visible_right(&self, zoom: f32) -> f32 {
        self.view.x / zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_sets_view_geometry() {
        let cam = Camera::new(800.0, 600.0);
        assert_eq!(cam.offset_x, 160.0);
        assert_eq!(cam.center_y, 300.0);
        assert_eq!(cam.current_y, 300.0);
        assert_eq!(cam.visible_left(1.0), -160.0);
        assert_eq!(cam.visible_right(2.0), 400.0);
    }

    #[test]
    fn test_follow_eases_ten_percent() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.snap(0.0, 1.0);
        assert_eq!(cam.current_y, 300.0);
        cam.follow(100.0, 1.0);
        assert_eq!(cam.target_y, 200.0);
        assert!((cam.current_y - 290.0).abs() < 1e-4);
    }

    #[test]
    fn test_target_accounts_for_zoom() {
        let cam = Camera::new(800.0, 600.0);
        assert_eq!(cam.target_for(0.0, 1.5), 200.0);
        assert_eq!(cam.target_for(50.0, 1.0), 250.0);
    }

    #[test]
    fn test_visible_band_contains_actor_when_settled() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.snap(-75.0, 1.0);
        assert!(cam.visible_top() < -75.0);
        assert!(cam.visible_bottom(1.0) > -75.0);
    }
}
