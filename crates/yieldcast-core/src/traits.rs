//! Core traits for the yieldcast pipeline.
//!
//! - [`JitterSource`]: multiplicative perturbation applied to raw estimates.
//!
//! Implementations: [`RandomJitter`] (uniform draws from a `rand` generator)
//! and [`FixedJitter`] (a constant factor, for deterministic callers).

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the multiplicative jitter applied to a raw estimate.
///
/// # Contract
///
/// - `factor(min, max)` returns a finite value in `[min, max]`.
/// - When `max <= min` the band is degenerate and `min` is returned.
pub trait JitterSource: Send {
    /// Draw one factor from the band `[min, max]`.
    fn factor(&mut self, min: f64, max: f64) -> f64;
}

impl<J: JitterSource + ?Sized> JitterSource for Box<J> {
    fn factor(&mut self, min: f64, max: f64) -> f64 {
        (**self).factor(min, max)
    }
}

/// Uniform jitter drawn from a `rand` generator.
pub struct RandomJitter<R = StdRng> {
    rng: R,
}

impl RandomJitter<StdRng> {
    /// Generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generator with a fixed seed; the sequence of factors is reproducible.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomJitter<R> {
    /// Wrap an arbitrary generator.
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> fmt::Debug for RandomJitter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomJitter").finish_non_exhaustive()
    }
}

impl<R: Rng + Send> JitterSource for RandomJitter<R> {
    fn factor(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Constant jitter factor, clamped into the requested band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl FixedJitter {
    /// Factor of exactly `1.0`: the estimate equals the raw weighted average.
    #[must_use]
    pub const fn identity() -> Self {
        Self(1.0)
    }
}

impl JitterSource for FixedJitter {
    fn factor(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.0.clamp(min, max)
    }
}
