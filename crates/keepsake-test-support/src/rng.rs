//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use keepsake_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min` for `next_u32_range` and `0.0` for
/// `next_f64`. Suitable for tests that do not depend on specific random values.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that replays predetermined fractions. `next_f64` cycles through
/// `fractions`; `next_u32_range` maps the next fraction onto the requested
/// range. Used in tests that need specific, repeatable placements.
#[derive(Debug)]
pub struct SequenceRng {
    fractions: Vec<f64>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` replaying `fractions` in `[0.0, 1.0)`.
    ///
    /// # Panics
    ///
    /// Panics if `fractions` is empty.
    #[must_use]
    pub fn new(fractions: Vec<f64>) -> Self {
        assert!(!fractions.is_empty(), "SequenceRng needs at least one value");
        Self {
            fractions,
            index: 0,
        }
    }
}

impl DeterministicRng for SequenceRng {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let span = f64::from(max - min) + 1.0;
        let offset = (self.next_f64() * span) as u32;
        (min + offset).min(max)
    }

    fn next_f64(&mut self) -> f64 {
        let val = self.fractions[self.index % self.fractions.len()];
        self.index += 1;
        val
    }
}
