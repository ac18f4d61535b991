//! Candidate expansion.
//!
//! Expanders turn a reasoning state into follow-up states. In a real
//! deployment that is an LLM call; the search engines never look inside.
//!
//! - [`Expander`] yields bare child states (beam mode scores them separately)
//! - [`ThoughtGenerator`] yields scored [`Thought`]s (tree mode)
//! - [`ScoredExpander`] joins an expander and a scorer into a generator

use super::scorer::Scorer;
use crate::error::Result;
use crate::tree::Candidate;
use std::sync::Arc;

/// Trait for state expansion.
pub trait Expander<S>: Send + Sync {
    /// Produce the child states of `state`. An empty vector is a dead end,
    /// not an error.
    fn expand(&self, state: &S) -> Result<Vec<S>>;
}

impl<S, F> Expander<S> for F
where
    F: Fn(&S) -> Result<Vec<S>> + Send + Sync,
{
    fn expand(&self, state: &S) -> Result<Vec<S>> {
        self(state)
    }
}

/// A generated child state with its base score.
#[derive(Debug, Clone, PartialEq)]
pub struct Thought<S> {
    /// Reasoning content.
    pub state: S,
    /// Base quality estimate.
    pub score: f64,
}

impl<S> Thought<S> {
    /// Create a thought.
    pub fn new(state: S, score: f64) -> Self {
        Self { state, score }
    }
}

/// Trait for tree-mode expansion.
pub trait ThoughtGenerator<S>: Send + Sync {
    /// Generate up to `max_branches` scored children of `parent`.
    ///
    /// Returning more is allowed; the explorer keeps the first
    /// `max_branches`.
    fn generate(&self, parent: &Candidate<S>, max_branches: usize) -> Result<Vec<Thought<S>>>;
}

impl<S, F> ThoughtGenerator<S> for F
where
    F: Fn(&Candidate<S>, usize) -> Result<Vec<Thought<S>>> + Send + Sync,
{
    fn generate(&self, parent: &Candidate<S>, max_branches: usize) -> Result<Vec<Thought<S>>> {
        self(parent, max_branches)
    }
}

/// Generator built from an [`Expander`] and a [`Scorer`].
///
/// Each child state is scored as it is produced; expansion stops after
/// `max_branches` states so the scorer is never asked about discarded ones.
pub struct ScoredExpander<S> {
    /// Child state source.
    expander: Arc<dyn Expander<S>>,
    /// Base scorer.
    scorer: Arc<dyn Scorer<S>>,
}

impl<S> ScoredExpander<S> {
    /// Join an expander and a scorer.
    pub fn new<X, C>(expander: X, scorer: C) -> Self
    where
        X: Expander<S> + 'static,
        C: Scorer<S> + 'static,
    {
        Self {
            expander: Arc::new(expander),
            scorer: Arc::new(scorer),
        }
    }

    /// Join collaborators that are shared with other engines.
    pub fn from_shared(expander: Arc<dyn Expander<S>>, scorer: Arc<dyn Scorer<S>>) -> Self {
        Self { expander, scorer }
    }
}

impl<S> ThoughtGenerator<S> for ScoredExpander<S> {
    fn generate(&self, parent: &Candidate<S>, max_branches: usize) -> Result<Vec<Thought<S>>> {
        self.expander
            .expand(parent.state())?
            .into_iter()
            .take(max_branches)
            .map(|state| {
                let score = self.scorer.score(&state)?;
                Ok(Thought::new(state, score))
            })
            .collect()
    }
}

/// Expander returning the same children for every state.
///
/// Useful for testing or when the options are predetermined.
#[derive(Debug, Clone)]
pub struct FixedExpander<S> {
    /// Children handed out on every call.
    children: Vec<S>,
}

impl<S: Clone> FixedExpander<S> {
    /// Create with fixed children.
    pub fn new(children: Vec<S>) -> Self {
        Self { children }
    }
}

impl<S: Clone + Send + Sync> Expander<S> for FixedExpander<S> {
    fn expand(&self, _state: &S) -> Result<Vec<S>> {
        Ok(self.children.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArborError;
    use crate::tree::CandidateArena;

    #[test]
    fn closure_expander() {
        let expander = |s: &f64| -> Result<Vec<f64>> { Ok(vec![s + 0.1, s + 0.2]) };
        assert_eq!(expander.expand(&0.0).unwrap(), vec![0.1, 0.2]);
    }

    #[test]
    fn fixed_expander_ignores_state() {
        let expander = FixedExpander::new(vec!["a", "b"]);
        assert_eq!(expander.expand(&"x").unwrap(), vec!["a", "b"]);
        assert_eq!(expander.expand(&"y").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn scored_expander_truncates_before_scoring() {
        let generator: ScoredExpander<u32> = ScoredExpander::new(
            |s: &u32| -> Result<Vec<u32>> { Ok(vec![s + 1, s + 2, s + 3]) },
            |s: &u32| -> Result<f64> {
                if *s == 3 {
                    Err(ArborError::Scoring("should not be scored".into()))
                } else {
                    Ok(*s as f64 / 10.0)
                }
            },
        );
        let arena = CandidateArena::with_root(0u32, 1.0);

        let thoughts = generator.generate(arena.root(), 2).unwrap();
        assert_eq!(thoughts, vec![Thought::new(1, 0.1), Thought::new(2, 0.2)]);

        assert!(generator.generate(arena.root(), 3).is_err());
    }

    #[test]
    fn closure_generator_sees_parent() {
        let generator = |parent: &Candidate<String>, n: usize| -> Result<Vec<Thought<String>>> {
            Ok((0..n)
                .map(|i| Thought::new(format!("{}/{}", parent.state(), i), 0.9 - 0.1 * i as f64))
                .collect())
        };
        let arena = CandidateArena::with_root("root".to_string(), 1.0);

        let thoughts = generator.generate(arena.root(), 2).unwrap();
        assert_eq!(thoughts[0].state, "root/0");
        assert_eq!(thoughts[1].state, "root/1");
    }
}
