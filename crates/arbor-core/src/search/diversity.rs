//! Diversity bonuses for beam scoring.
//!
//! The adjusted score of a child is
//!
//! `(1 - λ) * score + λ * bonus(child, beam)`
//!
//! where `λ` is the beam's diversity weight and `bonus` rewards children that
//! differ from the states already in the beam. How two states differ depends
//! entirely on what a state is, so the measure is supplied by the caller.
//!
//! | Diversity | Bonus | Use Case |
//! |-----------|-------|----------|
//! | [`NoDiversity`] | none, weight forced to `0` | Pure score ranking |
//! | [`MetricDiversity`] | `min distance to beam`, clamped to `[0, 1]` | Embedding or edit distance |
//! | [`JitterDiversity`] | seeded uniform in `[0.5, 1.0)` | Stand-in until a metric exists |

use crate::error::{ArborError, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::marker::PhantomData;

/// Trait for diversity bonus strategies.
pub trait Diversity<S>: Send + Sync {
    /// Bonus for `state` given the states of the beam it was expanded from.
    ///
    /// Should return a value in `[0, 1]`.
    fn bonus(&self, state: &S, beam: &[&S]) -> f64;

    /// Whether the bonus takes part in scoring. When false the engine
    /// ranks by the raw score whatever the configured weight.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Called at the start of every search so repeated runs see the same
    /// sequence of bonuses.
    fn reset(&self) {}
}

impl<S, D: Diversity<S> + ?Sized> Diversity<S> for Box<D> {
    fn bonus(&self, state: &S, beam: &[&S]) -> f64 {
        (**self).bonus(state, beam)
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn reset(&self) {
        (**self).reset()
    }
}

/// No bonus. Disables the diversity term, so children keep their raw score.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiversity;

impl<S> Diversity<S> for NoDiversity {
    fn bonus(&self, _state: &S, _beam: &[&S]) -> f64 {
        0.0
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Bonus from a caller-defined distance between states.
///
/// The bonus is the distance to the nearest beam member, clamped to
/// `[0, 1]`. A child far from everything already in the beam scores 1.
pub struct MetricDiversity<S, F> {
    /// Distance between two states.
    distance: F,
    _state: PhantomData<fn(&S)>,
}

impl<S, F> MetricDiversity<S, F>
where
    F: Fn(&S, &S) -> f64 + Send + Sync,
{
    /// Create from a distance function.
    pub fn new(distance: F) -> Self {
        Self {
            distance,
            _state: PhantomData,
        }
    }
}

impl<S, F> Diversity<S> for MetricDiversity<S, F>
where
    F: Fn(&S, &S) -> f64 + Send + Sync,
{
    fn bonus(&self, state: &S, beam: &[&S]) -> f64 {
        let nearest = beam
            .iter()
            .map(|other| (self.distance)(state, other))
            .fold(f64::INFINITY, f64::min);

        if nearest.is_nan() {
            0.0
        } else {
            nearest.clamp(0.0, 1.0)
        }
    }
}

/// Seeded random bonus in a fixed range.
///
/// Ignores the states entirely. The generator is reseeded on every
/// [`reset`](Diversity::reset), so a search is reproducible for a given seed.
#[derive(Debug)]
pub struct JitterDiversity {
    /// Seed restored on reset.
    seed: u64,
    /// Lower bound (inclusive).
    low: f64,
    /// Upper bound (exclusive).
    high: f64,
    /// Generator state.
    rng: Mutex<StdRng>,
}

impl JitterDiversity {
    /// Default range, `[0.5, 1.0)`.
    pub const DEFAULT_RANGE: (f64, f64) = (0.5, 1.0);

    /// Create with the default range.
    pub fn new(seed: u64) -> Self {
        let (low, high) = Self::DEFAULT_RANGE;
        Self {
            seed,
            low,
            high,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create with a custom range. An empty or inverted range yields `low`.
    ///
    /// Fails with `InvalidConfig` if either bound is not finite.
    pub fn with_range(seed: u64, low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() {
            return Err(ArborError::InvalidConfig(format!(
                "jitter range must be finite, got [{low}, {high})"
            )));
        }
        Ok(Self {
            seed,
            low,
            high,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }
}

impl<S> Diversity<S> for JitterDiversity {
    fn bonus(&self, _state: &S, _beam: &[&S]) -> f64 {
        if !(self.high > self.low) {
            return self.low;
        }
        self.rng.lock().gen_range(self.low..self.high)
    }

    fn reset(&self) {
        *self.rng.lock() = StdRng::seed_from_u64(self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_diversity_is_zero() {
        assert_eq!(NoDiversity.bonus(&1.0, &[&0.0]), 0.0);
    }

    #[test]
    fn metric_diversity_uses_nearest_member() {
        let diversity = MetricDiversity::new(|a: &f64, b: &f64| (a - b).abs());

        assert!((diversity.bonus(&0.5, &[&0.0, &0.4]) - 0.1).abs() < 1e-12);
        // Far from everything clamps to 1.
        assert_eq!(diversity.bonus(&10.0, &[&0.0]), 1.0);
        // Nothing to compare against counts as fully novel.
        assert_eq!(diversity.bonus(&0.0, &[]), 1.0);
    }

    #[test]
    fn metric_diversity_clamps_negative() {
        let diversity = MetricDiversity::new(|_: &u8, _: &u8| -3.0);
        assert_eq!(diversity.bonus(&1, &[&2]), 0.0);
    }

    #[test]
    fn jitter_stays_in_range() {
        let diversity = JitterDiversity::new(7);
        for _ in 0..100 {
            let bonus = Diversity::<u8>::bonus(&diversity, &0, &[]);
            assert!((0.5..1.0).contains(&bonus));
        }
    }

    #[test]
    fn jitter_reset_replays_sequence() {
        let diversity = JitterDiversity::new(42);
        let first: Vec<f64> = (0..5).map(|_| Diversity::<u8>::bonus(&diversity, &0, &[])).collect();

        Diversity::<u8>::reset(&diversity);
        let second: Vec<f64> = (0..5).map(|_| Diversity::<u8>::bonus(&diversity, &0, &[])).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn jitter_degenerate_range() {
        let diversity = JitterDiversity::with_range(1, 0.3, 0.3).unwrap();
        assert_eq!(Diversity::<u8>::bonus(&diversity, &0, &[]), 0.3);

        let inverted = JitterDiversity::with_range(1, 0.8, 0.2).unwrap();
        assert_eq!(Diversity::<u8>::bonus(&inverted, &0, &[]), 0.8);
    }

    #[test]
    fn jitter_rejects_non_finite_range() {
        for (low, high) in [(f64::NAN, 1.0), (0.0, f64::NAN), (f64::NAN, f64::NAN), (0.0, f64::INFINITY)] {
            let err = JitterDiversity::with_range(1, low, high).unwrap_err();
            assert!(matches!(err, ArborError::InvalidConfig(_)));
        }
    }

    #[test]
    fn only_no_diversity_is_disabled() {
        assert!(!Diversity::<u8>::is_enabled(&NoDiversity));
        assert!(Diversity::<u8>::is_enabled(&JitterDiversity::new(3)));

        let boxed: Box<dyn Diversity<u8>> = Box::new(NoDiversity);
        assert!(!boxed.is_enabled());
    }

    #[test]
    fn boxed_diversity_delegates() {
        let boxed: Box<dyn Diversity<f64>> = Box::new(NoDiversity);
        assert_eq!(boxed.bonus(&1.0, &[]), 0.0);
    }
}
