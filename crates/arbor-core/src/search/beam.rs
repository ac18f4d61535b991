//! Adaptive beam search.
//!
//! Beam search keeps a bounded set of the best candidates and expands all
//! of them at each step. The adaptive variant resizes that set as it goes:
//! when the beam is improving quickly it widens to explore more, when
//! progress stalls it narrows to save expansions.
//!
//! # Algorithm
//!
//! 1. Score the initial state; the beam is that single root candidate
//! 2. For each step:
//!    a. Expand every beam member
//!    b. Score each child: `(1 - λ) * score + λ * diversity_bonus`
//!       (`λ = 0` under [`NoDiversity`](super::NoDiversity))
//!    c. Rank children by that score, drop duplicate states, keep `ceil(w)`
//!    d. Widen `w` if the mean gain over parents beats `growth_threshold`,
//!       narrow it if the gain is under `shrink_threshold`
//! 3. Return the root-to-best path of the final beam
//!
//! A step that produces no children ends the search early; the previous
//! beam is then the final one.
//!
//! # Example
//!
//! ```
//! use arbor_core::search::{AdaptiveBeamSearch, BeamConfig};
//! use arbor_core::Result;
//!
//! let config = BeamConfig {
//!     initial_width: 3,
//!     min_width: 1,
//!     max_width: 5,
//!     max_steps: 5,
//!     ..Default::default()
//! };
//! let mut search = AdaptiveBeamSearch::new(config).unwrap();
//!
//! let score = |s: &f64| -> Result<f64> { Ok(*s) };
//! let expand = |s: &f64| -> Result<Vec<f64>> { Ok(vec![s + 0.1, s + 0.2]) };
//!
//! let outcome = search.search(0.0, &score, &expand).unwrap();
//! assert_eq!(outcome.path.len(), 6);
//! ```

use super::diversity::{Diversity, NoDiversity};
use super::expander::Expander;
use super::scorer::Scorer;
use crate::error::{ArborError, Result};
use crate::tree::{Candidate, CandidateArena, CandidateId, StateKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for adaptive beam search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Beam width at the start of every search.
    pub initial_width: usize,
    /// Lower bound for the adapted width.
    pub min_width: usize,
    /// Upper bound for the adapted width.
    pub max_width: usize,
    /// Amount the width moves per adaptation.
    pub adaptation_rate: f64,
    /// Weight of the diversity bonus in `[0, 1]`. Ignored when the search
    /// has no diversity strategy.
    pub diversity_weight: f64,
    /// Number of expansion steps.
    pub max_steps: usize,
    /// Mean gain above which the beam widens.
    pub growth_threshold: f64,
    /// Mean gain below which the beam narrows.
    pub shrink_threshold: f64,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            initial_width: 5,
            min_width: 2,
            max_width: 10,
            adaptation_rate: 0.1,
            diversity_weight: 0.3,
            max_steps: 10,
            growth_threshold: 0.1,
            shrink_threshold: 0.01,
        }
    }
}

impl BeamConfig {
    /// Check ranges.
    pub fn validate(&self) -> Result<()> {
        if self.min_width == 0 {
            return Err(ArborError::InvalidConfig("min_width must be at least 1".into()));
        }
        if self.min_width > self.max_width {
            return Err(ArborError::InvalidConfig(format!(
                "min_width {} exceeds max_width {}",
                self.min_width, self.max_width
            )));
        }
        if !(self.min_width..=self.max_width).contains(&self.initial_width) {
            return Err(ArborError::InvalidConfig(format!(
                "initial_width {} outside [{}, {}]",
                self.initial_width, self.min_width, self.max_width
            )));
        }
        if !self.adaptation_rate.is_finite() || self.adaptation_rate < 0.0 {
            return Err(ArborError::InvalidConfig(format!(
                "adaptation_rate must be finite and non-negative, got {}",
                self.adaptation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.diversity_weight) {
            return Err(ArborError::InvalidConfig(format!(
                "diversity_weight must be in [0, 1], got {}",
                self.diversity_weight
            )));
        }
        if self.max_steps == 0 {
            return Err(ArborError::InvalidConfig("max_steps must be at least 1".into()));
        }
        if !self.growth_threshold.is_finite()
            || !self.shrink_threshold.is_finite()
            || self.shrink_threshold > self.growth_threshold
        {
            return Err(ArborError::InvalidConfig(format!(
                "thresholds must be finite with shrink <= growth, got shrink {} growth {}",
                self.shrink_threshold, self.growth_threshold
            )));
        }
        Ok(())
    }
}

/// The beam retained after one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSnapshot {
    /// Step number, starting at 1.
    pub step: usize,
    /// Width after adapting to this beam.
    pub beam_width: f64,
    /// Scores of the retained candidates, best first.
    pub scores: Vec<f64>,
    /// Mean score gain over parents.
    pub mean_improvement: Option<f64>,
}

/// Summary of the most recent search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Width when the search ended.
    pub final_beam_width: f64,
    /// Completed steps.
    pub num_steps: usize,
    /// Mean score over every retained candidate of every step.
    pub avg_beam_score: f64,
    /// Best score retained at any step.
    pub max_score_achieved: f64,
}

/// Result of a beam search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<S> {
    /// States from the root to the best candidate. Empty if nothing survived.
    pub path: Vec<S>,
    /// Score of the best candidate, 0 for an empty path.
    pub score: f64,
    /// Completed steps.
    pub steps: usize,
}

impl<S> SearchOutcome<S> {
    /// Outcome with no path.
    pub fn empty(steps: usize) -> Self {
        Self {
            path: Vec::new(),
            score: 0.0,
            steps,
        }
    }

    /// True if no path was found.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Final state of the path.
    pub fn best(&self) -> Option<&S> {
        self.path.last()
    }
}

/// A scored child waiting for beam selection.
#[derive(Debug)]
struct Pending<S> {
    /// Beam member it was expanded from.
    parent: CandidateId,
    /// Child state.
    state: S,
    /// Diversity-adjusted score.
    score: f64,
}

/// Adaptive-width beam search.
///
/// Each call to [`search`](Self::search) starts again from
/// `initial_width` with an empty history. The width and the history of
/// the latest run stay readable on the engine until the next call.
pub struct AdaptiveBeamSearch<D = NoDiversity> {
    /// Configuration.
    config: BeamConfig,
    /// Current (real-valued) width.
    beam_width: f64,
    /// Diversity bonus strategy.
    diversity: D,
    /// Beams retained by the latest run.
    history: Vec<BeamSnapshot>,
}

impl AdaptiveBeamSearch<NoDiversity> {
    /// Create a beam search without a diversity bonus.
    pub fn new(config: BeamConfig) -> Result<Self> {
        Self::with_diversity(config, NoDiversity)
    }
}

impl<D> AdaptiveBeamSearch<D> {
    /// Create a beam search with a diversity bonus strategy.
    pub fn with_diversity(config: BeamConfig, diversity: D) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            beam_width: config.initial_width as f64,
            config,
            diversity,
            history: Vec::new(),
        })
    }

    /// Get configuration.
    pub fn config(&self) -> &BeamConfig {
        &self.config
    }

    /// Current width.
    pub fn beam_width(&self) -> f64 {
        self.beam_width
    }

    /// Number of candidates the next step may keep.
    pub fn slots(&self) -> usize {
        (self.beam_width.ceil() as usize).max(1)
    }

    /// Weight actually applied to the diversity bonus: the configured
    /// weight, or 0 when the strategy is disabled.
    fn effective_weight<S>(&self) -> f64
    where
        D: Diversity<S>,
    {
        if self.diversity.is_enabled() {
            self.config.diversity_weight
        } else {
            0.0
        }
    }

    /// Beams retained by the latest run, one per completed step.
    pub fn history(&self) -> &[BeamSnapshot] {
        &self.history
    }

    /// Summary of the latest run, `None` if it completed no step.
    pub fn statistics(&self) -> Option<SearchStatistics> {
        if self.history.is_empty() {
            return None;
        }

        let scores: Vec<f64> = self
            .history
            .iter()
            .flat_map(|snapshot| snapshot.scores.iter().copied())
            .collect();
        let avg_beam_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        let max_score_achieved = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(SearchStatistics {
            final_beam_width: self.beam_width,
            num_steps: self.history.len(),
            avg_beam_score,
            max_score_achieved,
        })
    }

    /// Run the search for the configured number of steps.
    pub fn search<S, C, X>(&mut self, initial_state: S, scorer: &C, expander: &X) -> Result<SearchOutcome<S>>
    where
        S: Clone + StateKey,
        C: Scorer<S> + ?Sized,
        X: Expander<S> + ?Sized,
        D: Diversity<S>,
    {
        let max_steps = self.config.max_steps;
        self.search_with_budget(initial_state, scorer, expander, max_steps)
    }

    /// Run the search for `max_steps` steps.
    ///
    /// A budget of 0 returns the root alone. Expander and scorer errors
    /// abort the run and are returned unchanged.
    pub fn search_with_budget<S, C, X>(
        &mut self,
        initial_state: S,
        scorer: &C,
        expander: &X,
        max_steps: usize,
    ) -> Result<SearchOutcome<S>>
    where
        S: Clone + StateKey,
        C: Scorer<S> + ?Sized,
        X: Expander<S> + ?Sized,
        D: Diversity<S>,
    {
        self.run(initial_state, scorer, expander, max_steps)
            .map(|(outcome, _)| outcome)
    }

    /// Search body. Also hands back the arena as it stands at the end of
    /// the run: the final beam and every ancestor still reachable from it.
    fn run<S, C, X>(
        &mut self,
        initial_state: S,
        scorer: &C,
        expander: &X,
        max_steps: usize,
    ) -> Result<(SearchOutcome<S>, CandidateArena<S>)>
    where
        S: Clone + StateKey,
        C: Scorer<S> + ?Sized,
        X: Expander<S> + ?Sized,
        D: Diversity<S>,
    {
        self.beam_width = self.config.initial_width as f64;
        self.history.clear();
        self.diversity.reset();

        let root_score = scorer.score(&initial_state)?;
        let mut arena = CandidateArena::with_root(initial_state, root_score);
        let mut beam = vec![CandidateId::ROOT];
        let mut steps = 0;

        for step in 1..=max_steps {
            let pending = self.expand_beam(&arena, &beam, scorer, expander)?;
            let generated = pending.len();
            let selected = select_beam(pending, self.slots());

            if selected.is_empty() {
                tracing::debug!(step, "beam produced no children, stopping");
                break;
            }

            let mut next = Vec::with_capacity(selected.len());
            for child in selected {
                next.push(arena.insert_child(child.parent, child.state, child.score)?);
            }
            for &id in &beam {
                arena.release(id);
            }

            let mean_improvement = mean_improvement(&arena, &next);
            self.adapt_width(mean_improvement);

            let scores: Vec<f64> = next
                .iter()
                .filter_map(|&id| arena.get(id))
                .map(Candidate::score)
                .collect();
            tracing::debug!(
                step,
                generated,
                retained = next.len(),
                live = arena.len(),
                width = self.beam_width,
                best = scores.first().copied().unwrap_or_default(),
                "beam step"
            );
            self.history.push(BeamSnapshot {
                step,
                beam_width: self.beam_width,
                scores,
                mean_improvement,
            });

            beam = next;
            steps = step;
        }

        // Beam is in ranked order; the first maximum wins ties.
        let best = beam
            .iter()
            .filter_map(|&id| arena.get(id))
            .fold(None::<&Candidate<S>>, |best, candidate| match best {
                Some(b) if !(candidate.score() > b.score()) => Some(b),
                _ => Some(candidate),
            });

        let Some(best) = best else {
            return Ok((SearchOutcome::empty(steps), arena));
        };

        let depth = best.depth();
        let outcome = SearchOutcome {
            path: arena.path_states(best.id())?,
            score: best.score(),
            steps,
        };
        tracing::info!(
            steps,
            score = outcome.score,
            depth,
            width = self.beam_width,
            created = arena.total_created(),
            "beam search finished"
        );
        Ok((outcome, arena))
    }

    /// Expand and score every beam member, in beam order.
    fn expand_beam<S, C, X>(
        &self,
        arena: &CandidateArena<S>,
        beam: &[CandidateId],
        scorer: &C,
        expander: &X,
    ) -> Result<Vec<Pending<S>>>
    where
        C: Scorer<S> + ?Sized,
        X: Expander<S> + ?Sized,
        D: Diversity<S>,
    {
        let members = beam
            .iter()
            .map(|&id| arena.try_get(id))
            .collect::<Result<Vec<_>>>()?;
        let beam_states: Vec<&S> = members.iter().map(|c| c.state()).collect();
        let weight = self.effective_weight::<S>();

        let mut pending = Vec::new();
        for member in &members {
            for state in expander.expand(member.state())? {
                let base = scorer.score(&state)?;
                let bonus = if weight > 0.0 {
                    self.diversity.bonus(&state, &beam_states)
                } else {
                    0.0
                };
                pending.push(Pending {
                    parent: member.id(),
                    state,
                    score: (1.0 - weight) * base + weight * bonus,
                });
            }
        }
        Ok(pending)
    }

    /// Move the width one step toward growth or shrinkage.
    fn adapt_width(&mut self, mean_improvement: Option<f64>) {
        let Some(gain) = mean_improvement else {
            return;
        };

        if gain > self.config.growth_threshold {
            self.beam_width =
                (self.beam_width + self.config.adaptation_rate).min(self.config.max_width as f64);
        } else if gain < self.config.shrink_threshold {
            self.beam_width =
                (self.beam_width - self.config.adaptation_rate).max(self.config.min_width as f64);
        }
    }
}

/// Rank children best first and keep up to `slots` distinct states.
///
/// The sort is stable, so equal scores keep expansion order.
fn select_beam<S: StateKey>(mut pending: Vec<Pending<S>>, slots: usize) -> Vec<Pending<S>> {
    pending.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen = HashSet::new();
    pending
        .into_iter()
        .filter(|child| seen.insert(child.state.state_key()))
        .take(slots)
        .collect()
}

/// Mean of `score - parent_score` over the beam. A NaN gain makes the mean
/// NaN, which leaves the width unchanged.
fn mean_improvement<S>(arena: &CandidateArena<S>, beam: &[CandidateId]) -> Option<f64> {
    let gains: Vec<f64> = beam
        .iter()
        .filter_map(|&id| arena.get(id))
        .filter_map(Candidate::improvement)
        .collect();

    if gains.is_empty() {
        None
    } else {
        Some(gains.iter().sum::<f64>() / gains.len() as f64)
    }
}
