//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or scripted
//! implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;
}

/// Production RNG backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRng(StdRng);

impl SeededRng {
    /// Creates a reproducible RNG from a seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Creates an RNG seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl DeterministicRng for SeededRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Uniform sample in `[min, max)`; collapses to `min` for empty ranges.
pub fn uniform(rng: &mut dyn DeterministicRng, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    min + rng.next_f64() * (max - min)
}

/// Fisher–Yates shuffle driven by the injected RNG.
#[allow(clippy::cast_possible_truncation)]
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn DeterministicRng) {
    for i in (1..items.len()).rev() {
        let j = rng.next_u32_range(0, i as u32) as usize;
        items.swap(i, j.min(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = SeededRng::from_seed(7);
        let mut b = SeededRng::from_seed(7);

        let xs: Vec<u32> = (0..8).map(|_| a.next_u32_range(0, 100)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.next_u32_range(0, 100)).collect();

        assert_eq!(xs, ys);
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = SeededRng::from_seed(3);
        for _ in 0..100 {
            let v = uniform(&mut rng, 10.0, 20.0);
            assert!((10.0..20.0).contains(&v));
        }
        assert!((uniform(&mut rng, 5.0, 5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shuffle_preserves_multiset() {
        let mut rng = SeededRng::from_seed(11);
        let mut items = vec![1, 2, 3, 4, 5, 6, 7];

        shuffle(&mut items, &mut rng);
        items.sort_unstable();

        assert_eq!(items, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
