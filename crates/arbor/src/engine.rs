//! High-level reasoning engine.

use arbor_core::{
    config::ArborConfig,
    error::{ArborError, Result},
    feedback::FeedbackScorer,
    search::{
        AdaptiveBeamSearch, BeamSnapshot, Diversity, Expander, NoDiversity, ScoredExpander, Scorer,
        SearchStatistics, ThoughtExplorer,
    },
    tree::{CandidateArena, StateKey},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which engine a [`Reasoner`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningMode {
    /// Breadth-first tree of thoughts.
    #[default]
    Tree,
    /// Adaptive beam search.
    Beam,
}

/// Answer of a reasoning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningResult<S> {
    /// Final state, `None` if the run produced no path.
    pub solution: Option<S>,
    /// States from the prompt to the solution.
    pub reasoning_path: Vec<S>,
    /// Score of the solution.
    pub confidence: f64,
    /// Engine that produced it.
    pub mode: ReasoningMode,
}

impl<S> ReasoningResult<S> {
    /// Number of reasoning steps after the prompt.
    pub fn num_steps(&self) -> usize {
        self.reasoning_path.len().saturating_sub(1)
    }
}

/// Builder for creating a Reasoner.
pub struct ReasonerBuilder<S> {
    config: ArborConfig,
    expander: Option<Arc<dyn Expander<S>>>,
    scorer: Option<Arc<dyn Scorer<S>>>,
    feedback: Option<Arc<dyn FeedbackScorer<S>>>,
    diversity: Option<Box<dyn Diversity<S>>>,
}

impl<S: 'static> ReasonerBuilder<S> {
    /// Create a new reasoner builder.
    pub fn new() -> Self {
        Self {
            config: ArborConfig::default(),
            expander: None,
            scorer: None,
            feedback: None,
            diversity: None,
        }
    }

    /// Set the configuration.
    pub fn config(mut self, config: ArborConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the expander.
    pub fn expander<X>(mut self, expander: X) -> Self
    where
        X: Expander<S> + 'static,
    {
        self.expander = Some(Arc::new(expander));
        self
    }

    /// Set the scorer.
    pub fn scorer<C>(mut self, scorer: C) -> Self
    where
        C: Scorer<S> + 'static,
    {
        self.scorer = Some(Arc::new(scorer));
        self
    }

    /// Set the feedback scorer used in tree mode.
    pub fn feedback<F>(mut self, feedback: F) -> Self
    where
        F: FeedbackScorer<S> + 'static,
    {
        self.feedback = Some(Arc::new(feedback));
        self
    }

    /// Set a feedback scorer that the caller keeps a handle to.
    pub fn shared_feedback(mut self, feedback: Arc<dyn FeedbackScorer<S>>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// Set the diversity bonus used in beam mode.
    ///
    /// Without one, beam mode ranks children by their raw score and
    /// `beam.diversity_weight` has no effect.
    pub fn diversity<D>(mut self, diversity: D) -> Self
    where
        D: Diversity<S> + 'static,
    {
        self.diversity = Some(Box::new(diversity));
        self
    }

    /// Build the reasoner.
    pub fn build(self) -> Result<Reasoner<S>> {
        self.config.validate()?;
        let expander = self.expander.ok_or(ArborError::MissingCollaborator("expander"))?;
        let scorer = self.scorer.ok_or(ArborError::MissingCollaborator("scorer"))?;

        let diversity = self
            .diversity
            .unwrap_or_else(|| Box::new(NoDiversity) as Box<dyn Diversity<S>>);
        let beam = AdaptiveBeamSearch::with_diversity(self.config.beam.clone(), diversity)?;

        let mut explorer = ThoughtExplorer::builder()
            .config(self.config.explorer.clone())
            .shared_generator(Arc::new(ScoredExpander::from_shared(expander.clone(), scorer.clone())));
        if let Some(feedback) = self.feedback {
            explorer = explorer.shared_feedback(feedback);
        }
        let explorer = explorer.build()?;

        tracing::debug!(
            beam_width = self.config.beam.initial_width,
            max_branches = self.config.explorer.max_branches,
            max_depth = self.config.explorer.max_depth,
            feedback = explorer.has_feedback(),
            "reasoner ready"
        );

        Ok(Reasoner {
            config: self.config,
            expander,
            scorer,
            beam,
            explorer,
        })
    }
}

impl<S: 'static> Default for ReasonerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reasoning engine over one expander/scorer pair.
///
/// Both engines are owned for the reasoner's lifetime, so the statistics
/// and tree of the latest run in each mode stay readable between calls.
pub struct Reasoner<S> {
    config: ArborConfig,
    expander: Arc<dyn Expander<S>>,
    scorer: Arc<dyn Scorer<S>>,
    beam: AdaptiveBeamSearch<Box<dyn Diversity<S>>>,
    explorer: ThoughtExplorer<S>,
}

impl<S: 'static> Reasoner<S> {
    /// Create a new reasoner builder.
    pub fn builder() -> ReasonerBuilder<S> {
        ReasonerBuilder::new()
    }
}

impl<S> Reasoner<S> {
    /// Get configuration.
    pub fn config(&self) -> &ArborConfig {
        &self.config
    }

    /// Solve `prompt` with the chosen engine.
    pub fn reason(&mut self, prompt: S, mode: ReasoningMode) -> Result<ReasoningResult<S>>
    where
        S: Clone + StateKey,
    {
        let result = match mode {
            ReasoningMode::Tree => {
                let solution = self.explorer.solve(prompt)?;
                ReasoningResult {
                    solution: Some(solution.solution),
                    reasoning_path: solution.reasoning_path,
                    confidence: solution.confidence,
                    mode,
                }
            }
            ReasoningMode::Beam => {
                let outcome = self.beam.search(prompt, &*self.scorer, &*self.expander)?;
                ReasoningResult {
                    solution: outcome.best().cloned(),
                    reasoning_path: outcome.path,
                    confidence: outcome.score,
                    mode,
                }
            }
        };

        tracing::info!(
            mode = ?mode,
            steps = result.num_steps(),
            confidence = result.confidence,
            "reasoning finished"
        );
        Ok(result)
    }

    /// Summary of the latest beam run.
    pub fn beam_statistics(&self) -> Option<SearchStatistics> {
        self.beam.statistics()
    }

    /// Beams retained by the latest beam run.
    pub fn beam_history(&self) -> &[BeamSnapshot] {
        self.beam.history()
    }

    /// Tree of the latest tree run.
    pub fn tree(&self) -> Option<&CandidateArena<S>> {
        self.explorer.tree()
    }
}
