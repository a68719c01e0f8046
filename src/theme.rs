//! Cosmetic color theme, re-rolled on every restart

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::renderer::Color;

/// Colors and actor shape for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: Color,
    pub actor: Color,
    pub gate: Color,
    /// Side count of the actor polygon
    pub actor_sides: u32,
}

impl Default for Theme {
    fn default() -> Self {
        let red = Color::hsla(0.0, 70.0, 60.0, 1.0);
        Self {
            background: Color::hsla(255.0, 35.0, 30.0, 1.0),
            actor: red,
            gate: red,
            actor_sides: 4,
        }
    }
}

impl Theme {
    /// Roll a theme around a random blue-violet base hue
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let base = rng.random_range(240..=270) as f32;
        Self {
            background: Color::hsla(base, 35.0, 30.0, 1.0),
            actor: Color::hsla(base + 150.0, 100.0, 70.0, 1.0),
            gate: Color::hsla(base + 210.0, 90.0, 80.0, 1.0),
            actor_sides: rng.random_range(3..=5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_theme_is_seeded() {
        let a = Theme::random(&mut Pcg32::seed_from_u64(7));
        let b = Theme::random(&mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_sides_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let theme = Theme::random(&mut rng);
            assert!((3..=5).contains(&theme.actor_sides));
        }
    }
}
