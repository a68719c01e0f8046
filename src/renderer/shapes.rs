//! Shape tessellation for the 2D primitives the scene draws
//!
//! Everything works in local (untransformed) coordinates; the batch applies
//! its transform afterwards so line widths scale with it, as on a canvas.

use glam::Vec2;
use std::f32::consts::TAU;

use super::Color;
use super::vertex::Vertex;

/// Corners of a regular polygon, the first one at `angle`
pub fn polygon_points(center: Vec2, radius: f32, sides: u32, angle: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let theta = angle + i as f32 * TAU / sides as f32;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Corners of an axis-aligned rectangle, clockwise from the top-left (+y down)
pub fn rect_points(x: f32, y: f32, w: f32, h: f32) -> [Vec2; 4] {
    [
        Vec2::new(x, y),
        Vec2::new(x + w, y),
        Vec2::new(x + w, y + h),
        Vec2::new(x, y + h),
    ]
}

/// Triangle fan covering a convex outline
pub fn fill(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(points[0], color));
        vertices.push(Vertex::new(pair[0], color));
        vertices.push(Vertex::new(pair[1], color));
    }
    vertices
}

/// Closed outline of `width`, one quad per edge.
///
/// Each quad is extended by half the width along its edge so neighbouring
/// edges overlap at the corners.
pub fn outline(points: &[Vec2], width: f32, color: Color) -> Vec<Vertex> {
    if points.len() < 2 || width <= 0.0 {
        return Vec::new();
    }

    let half = width * 0.5;
    let mut vertices = Vec::with_capacity(points.len() * 6);

    for (i, &start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        let dir = (end - start).normalize_or_zero();
        if dir == Vec2::ZERO {
            continue;
        }
        let normal = dir.perp() * half;
        let a = start - dir * half;
        let b = end + dir * half;

        let (a1, a2, b1, b2) = (a + normal, a - normal, b + normal, b - normal);
        vertices.push(Vertex::new(a1, color));
        vertices.push(Vertex::new(a2, color));
        vertices.push(Vertex::new(b1, color));

        vertices.push(Vertex::new(b1, color));
        vertices.push(Vertex::new(a2, color));
        vertices.push(Vertex::new(b2, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_points_on_circle() {
        let points = polygon_points(Vec2::new(10.0, 5.0), 3.0, 5, 0.4);
        assert_eq!(points.len(), 5);
        for p in &points {
            assert!((p.distance(Vec2::new(10.0, 5.0)) - 3.0).abs() < 1e-4);
        }
        let first = points[0] - Vec2::new(10.0, 5.0);
        assert!((first.y.atan2(first.x) - 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_fill_is_a_fan() {
        let square = rect_points(0.0, 0.0, 2.0, 2.0);
        assert_eq!(fill(&square, Color::WHITE).len(), 6);
        assert!(fill(&square[..2], Color::WHITE).is_empty());
    }

    #[test]
    fn test_outline_quads() {
        let tri = polygon_points(Vec2::ZERO, 10.0, 3, 0.0);
        let vertices = outline(&tri, 2.0, Color::BLACK);
        assert_eq!(vertices.len(), 18);
        // Every vertex sits within half a line width of the triangle's circumcircle band
        for v in &vertices {
            assert!(v.position().length() <= 10.0 + 2.0);
        }
        assert!(outline(&tri, 0.0, Color::BLACK).is_empty());
    }
}
