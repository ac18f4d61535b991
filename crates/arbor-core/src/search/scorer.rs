//! State scoring for search.
//!
//! A scorer is an external collaborator: a model judging a reasoning step,
//! a heuristic, or a test fixture. The engines only require that it map a
//! state to a number, conventionally in `[0, 1]`.

use crate::error::Result;

/// Trait for state scoring.
pub trait Scorer<S>: Send + Sync {
    /// Score a state. Higher is better.
    ///
    /// Errors are returned to the caller of the search unchanged.
    fn score(&self, state: &S) -> Result<f64>;

    /// Score several states, stopping at the first failure.
    fn score_all(&self, states: &[S]) -> Result<Vec<f64>> {
        states.iter().map(|s| self.score(s)).collect()
    }
}

impl<S, F> Scorer<S> for F
where
    F: Fn(&S) -> Result<f64> + Send + Sync,
{
    fn score(&self, state: &S) -> Result<f64> {
        self(state)
    }
}

/// Scorer that gives every state the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantScorer(pub f64);

impl<S> Scorer<S> for ConstantScorer {
    fn score(&self, _state: &S) -> Result<f64> {
        Ok(self.0)
    }
}
