//! Breadth-first thought exploration.
//!
//! The explorer grows a full tree of thoughts one level at a time: every
//! current leaf is handed to the generator, each returned thought becomes a
//! child, and the optional feedback scorer annotates it. After the last
//! level the highest-scoring leaf wins and its root-to-leaf path is the
//! reasoning behind the answer.
//!
//! # Example
//!
//! ```
//! use arbor_core::search::{Thought, ThoughtExplorer};
//! use arbor_core::tree::Candidate;
//! use arbor_core::Result;
//!
//! let generator = |parent: &Candidate<String>, branches: usize| -> Result<Vec<Thought<String>>> {
//!     Ok((0..branches)
//!         .map(|i| Thought::new(format!("{} -> idea {}", parent.state(), i), 0.9 - 0.1 * i as f64))
//!         .collect())
//! };
//!
//! let mut explorer = ThoughtExplorer::builder()
//!     .max_branches(2)
//!     .max_depth(2)
//!     .generator(generator)
//!     .build()
//!     .unwrap();
//!
//! let solution = explorer.solve("Plan a trip".to_string()).unwrap();
//! assert_eq!(solution.reasoning_path.len(), 3);
//! assert_eq!(explorer.tree().unwrap().len(), 7);
//! ```

use super::expander::{Expander, ScoredExpander, ThoughtGenerator};
use super::scorer::Scorer;
use crate::error::{ArborError, Result};
use crate::feedback::FeedbackScorer;
use crate::tree::{CandidateArena, CandidateId, FEEDBACK};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Score given to the root thought.
pub const ROOT_SCORE: f64 = 1.0;

/// Configuration for thought exploration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Children kept per expanded leaf.
    pub max_branches: usize,
    /// Number of levels below the root.
    pub max_depth: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            max_branches: 5,
            max_depth: 3,
        }
    }
}

impl ExplorerConfig {
    /// Check ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_branches == 0 {
            return Err(ArborError::InvalidConfig("max_branches must be at least 1".into()));
        }
        if self.max_depth == 0 {
            return Err(ArborError::InvalidConfig("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

/// Best answer found by an exploration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution<S> {
    /// State of the winning leaf.
    pub solution: S,
    /// States from the root to the winning leaf.
    pub reasoning_path: Vec<S>,
    /// Score of the winning leaf.
    pub confidence: f64,
}

/// Builder for [`ThoughtExplorer`].
pub struct ExplorerBuilder<S> {
    config: ExplorerConfig,
    generator: Option<Arc<dyn ThoughtGenerator<S>>>,
    feedback: Option<Arc<dyn FeedbackScorer<S>>>,
}

impl<S> ExplorerBuilder<S> {
    /// Create a builder with the default configuration and no collaborators.
    pub fn new() -> Self {
        Self {
            config: ExplorerConfig::default(),
            generator: None,
            feedback: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ExplorerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set children kept per leaf.
    pub fn max_branches(mut self, max_branches: usize) -> Self {
        self.config.max_branches = max_branches;
        self
    }

    /// Set the number of levels.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the thought generator.
    pub fn generator<G>(mut self, generator: G) -> Self
    where
        G: ThoughtGenerator<S> + 'static,
    {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Set a generator that is shared with other owners.
    pub fn shared_generator(mut self, generator: Arc<dyn ThoughtGenerator<S>>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the generator from an expander and a scorer.
    pub fn expander<X, C>(self, expander: X, scorer: C) -> Self
    where
        S: 'static,
        X: Expander<S> + 'static,
        C: Scorer<S> + 'static,
    {
        self.generator(ScoredExpander::new(expander, scorer))
    }

    /// Set the feedback scorer.
    pub fn feedback<F>(mut self, feedback: F) -> Self
    where
        F: FeedbackScorer<S> + 'static,
    {
        self.feedback = Some(Arc::new(feedback));
        self
    }

    /// Set a feedback scorer that is shared with other owners, e.g. to read
    /// its statistics after a run.
    pub fn shared_feedback(mut self, feedback: Arc<dyn FeedbackScorer<S>>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Validate and build.
    ///
    /// Fails with `MissingCollaborator("expander")` if no generator was set.
    pub fn build(self) -> Result<ThoughtExplorer<S>> {
        self.config.validate()?;
        let generator = self.generator.ok_or(ArborError::MissingCollaborator("expander"))?;

        Ok(ThoughtExplorer {
            config: self.config,
            generator,
            feedback: self.feedback,
            tree: None,
        })
    }
}

impl<S> Default for ExplorerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Breadth-first tree-of-thought explorer.
///
/// The tree built by the latest [`solve`](Self::solve) stays available via
/// [`tree`](Self::tree) until the next call.
pub struct ThoughtExplorer<S> {
    /// Configuration.
    config: ExplorerConfig,
    /// Child thought source.
    generator: Arc<dyn ThoughtGenerator<S>>,
    /// Optional annotation source.
    feedback: Option<Arc<dyn FeedbackScorer<S>>>,
    /// Tree of the latest successful run.
    tree: Option<CandidateArena<S>>,
}

impl<S> ThoughtExplorer<S> {
    /// Create a new explorer builder.
    pub fn builder() -> ExplorerBuilder<S> {
        ExplorerBuilder::new()
    }

    /// Get configuration.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Whether a feedback scorer is attached.
    pub fn has_feedback(&self) -> bool {
        self.feedback.is_some()
    }

    /// Tree of the latest successful run.
    pub fn tree(&self) -> Option<&CandidateArena<S>> {
        self.tree.as_ref()
    }

    /// Explore to the configured depth.
    pub fn solve(&mut self, prompt: S) -> Result<Solution<S>>
    where
        S: Clone,
    {
        let max_depth = self.config.max_depth;
        self.solve_to_depth(prompt, max_depth)
    }

    /// Explore `max_depth` levels below the root.
    ///
    /// A depth of 0 returns the prompt itself with the root score.
    /// Generator and feedback errors abort the run and are returned
    /// unchanged; no partial tree is kept.
    pub fn solve_to_depth(&mut self, prompt: S, max_depth: usize) -> Result<Solution<S>>
    where
        S: Clone,
    {
        self.tree = None;
        let mut arena = CandidateArena::with_root(prompt, ROOT_SCORE);

        for level in 0..max_depth {
            let leaves = arena.leaves();
            let mut created = 0;
            for &leaf in &leaves {
                created += self.expand_leaf(&mut arena, leaf)?;
            }
            tracing::debug!(
                level,
                leaves = leaves.len(),
                created,
                total = arena.len(),
                "explored level"
            );
        }

        let solution = extract_solution(&arena)?;
        tracing::info!(
            candidates = arena.len(),
            depth = solution.reasoning_path.len() - 1,
            confidence = solution.confidence,
            "exploration finished"
        );
        self.tree = Some(arena);
        Ok(solution)
    }

    /// Attach generated thoughts under `leaf`. Returns how many were added.
    fn expand_leaf(&self, arena: &mut CandidateArena<S>, leaf: CandidateId) -> Result<usize> {
        let max_branches = self.config.max_branches;
        let thoughts = self.generator.generate(arena.try_get(leaf)?, max_branches)?;

        let mut added = 0;
        for thought in thoughts.into_iter().take(max_branches) {
            let child = arena.insert_child(leaf, thought.state, thought.score)?;
            added += 1;

            if let Some(feedback) = &self.feedback {
                let review = feedback.evaluate(arena.try_get(child)?)?;
                arena.annotate(child, FEEDBACK, serde_json::to_value(&review)?)?;
            }
        }
        Ok(added)
    }
}

/// Highest-scoring leaf and its path. The first leaf in creation order wins
/// ties.
fn extract_solution<S: Clone>(arena: &CandidateArena<S>) -> Result<Solution<S>> {
    let mut best = arena.root();
    let mut best_score = f64::NEG_INFINITY;
    for id in arena.leaves() {
        let leaf = arena.try_get(id)?;
        if leaf.score() > best_score {
            best = leaf;
            best_score = leaf.score();
        }
    }

    Ok(Solution {
        solution: best.state().clone(),
        reasoning_path: arena.path_states(best.id())?,
        confidence: best.score(),
    })
}
