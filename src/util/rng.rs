//! Injectable randomness for execution dwell draws.
//!
//! The engine's only non-deterministic input is the per-task execution dwell.
//! It is drawn through the [`DelaySource`] trait so tests can substitute a
//! seeded source and replay a run exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of integer dwell draws over an inclusive range of time units.
///
/// Implementations must draw `floor(U * (max - min + 1)) + min` for `U`
/// uniform in `[0, 1)`, so every integer in `[min, max]` is equally likely.
pub trait DelaySource: Send {
    /// Draw an integer in `[min, max]`, both bounds inclusive.
    ///
    /// Callers guarantee `min <= max`.
    fn draw_units(&mut self, min: u64, max: u64) -> u64;
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_unit_interval(u: f64, min: u64, max: u64) -> u64 {
    let span = max - min + 1;
    // u < 1.0, so the scaled value floors to at most span - 1.
    let offset = ((u * span as f64) as u64).min(span - 1);
    min + offset
}

/// Thread-local RNG source for live runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngDelay;

impl DelaySource for ThreadRngDelay {
    fn draw_units(&mut self, min: u64, max: u64) -> u64 {
        scale_unit_interval(rand::rng().random::<f64>(), min, max)
    }
}

/// Seeded RNG source for reproducible runs and statistical tests.
#[derive(Debug, Clone)]
pub struct SeededDelay {
    rng: StdRng,
}

impl SeededDelay {
    /// Create a source seeded from a `u64`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DelaySource for SeededDelay {
    fn draw_units(&mut self, min: u64, max: u64) -> u64 {
        scale_unit_interval(self.rng.random::<f64>(), min, max)
    }
}

/// Fixed source that always returns its configured value, for tests that
/// need exact timings.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub u64);

impl DelaySource for FixedDelay {
    fn draw_units(&mut self, min: u64, max: u64) -> u64 {
        self.0.clamp(min, max)
    }
}
