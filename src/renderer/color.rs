//! RGBA colors and HSL conversion

use serde::{Deserialize, Serialize};

/// Linear-ish RGBA color, each channel in 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Build a color from hue (degrees), saturation and lightness (percent)
    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            return Self([l, l, l, alpha]);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self([
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            alpha,
        ])
    }

    pub fn r(&self) -> f32 {
        self.0[0]
    }

    pub fn g(&self) -> f32 {
        self.0[1]
    }

    pub fn b(&self) -> f32 {
        self.0[2]
    }

    pub fn a(&self) -> f32 {
        self.0[3]
    }

    /// CSS `rgba(...)` string for Canvas 2D
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r() * 255.0).round() as u8,
            (self.g() * 255.0).round() as u8,
            (self.b() * 255.0).round() as u8,
            self.a()
        )
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: [f32; 4]) -> bool {
        a.0.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-3)
    }

    #[test]
    fn test_primary_hues() {
        assert!(close(Color::hsla(0.0, 100.0, 50.0, 1.0), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(Color::hsla(120.0, 100.0, 50.0, 1.0), [0.0, 1.0, 0.0, 1.0]));
        assert!(close(Color::hsla(240.0, 100.0, 50.0, 1.0), [0.0, 0.0, 1.0, 1.0]));
        // Hue wraps
        assert!(close(Color::hsla(480.0, 100.0, 50.0, 0.5), [0.0, 1.0, 0.0, 0.5]));
    }

    #[test]
    fn test_grey_and_css() {
        assert!(close(Color::hsla(77.0, 0.0, 30.0, 1.0), [0.3, 0.3, 0.3, 1.0]));
        assert_eq!(Color::WHITE.to_css(), "rgba(255, 255, 255, 1)");
    }
}
