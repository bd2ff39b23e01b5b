//! Seeded random source for gameplay rolls

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::direction;

/// Deterministic RNG wrapper
///
/// Percentage rolls are uniform integers in `[0, 100]`; a roll succeeds
/// against a threshold when `roll <= threshold`.
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[0, 100]`
    pub fn roll_percent(&mut self) -> u32 {
        self.rng.random_range(0..=100)
    }

    /// Roll against a percentage threshold
    pub fn chance(&mut self, threshold: u32) -> bool {
        roll_succeeds(self.roll_percent(), threshold)
    }

    /// Uniform float in `[lo, hi]`; collapses to `lo` on an empty range
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    /// Uniform float in `[-half, half]`
    pub fn symmetric(&mut self, half: f32) -> f32 {
        self.range(-half, half)
    }

    /// Uniform angle in `[0, 2π)`
    pub fn angle(&mut self) -> f32 {
        self.rng.random_range(0.0..std::f32::consts::TAU)
    }

    /// Random unit direction scaled to `speed`
    pub fn heading_vec(&mut self, speed: f32) -> glam::Vec2 {
        direction(self.angle()) * speed
    }
}

/// Ties favor the hit
#[inline]
pub fn roll_succeeds(roll: u32, threshold: u32) -> bool {
    roll <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_boundary() {
        assert!(roll_succeeds(5, 5));
        assert!(!roll_succeeds(6, 5));
        assert!(roll_succeeds(0, 0));
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let mut rng = SimRng::new(7);
        for _ in 0..1000 {
            assert!(rng.roll_percent() <= 100);
            let v = rng.symmetric(200.0);
            assert!((-200.0..=200.0).contains(&v));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..32 {
            assert_eq!(a.roll_percent(), b.roll_percent());
        }
    }

    #[test]
    fn test_empty_range_collapses() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.range(3.0, 3.0), 3.0);
        assert_eq!(rng.range(5.0, 1.0), 5.0);
    }
}
