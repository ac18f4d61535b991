//! Expert feedback: automated evaluation with optional review.

use super::{Feedback, FeedbackScorer, FeedbackSource, Reviewer};
use crate::error::{ArborError, Result};
use crate::search::Scorer;
use crate::tree::Candidate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// When the reviewer is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStrategy {
    /// Review every candidate.
    #[default]
    Active,
    /// Never review; automated scores only.
    Passive,
    /// Review only when the automated score is below the threshold.
    Hybrid,
}

impl FeedbackStrategy {
    /// Whether this strategy can consult a reviewer.
    pub fn needs_reviewer(&self) -> bool {
        !matches!(self, Self::Passive)
    }
}

/// Configuration for expert feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Review policy.
    pub strategy: FeedbackStrategy,
    /// Automated score under which `Hybrid` asks for review.
    pub threshold: f64,
    /// Weight of the reviewer's score when blending.
    pub human_weight: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            strategy: FeedbackStrategy::Active,
            threshold: 0.7,
            human_weight: 0.7,
        }
    }
}

impl FeedbackConfig {
    /// Check ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(ArborError::InvalidConfig(format!(
                "feedback threshold must be finite, got {}",
                self.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.human_weight) {
            return Err(ArborError::InvalidConfig(format!(
                "human_weight must be in [0, 1], got {}",
                self.human_weight
            )));
        }
        Ok(())
    }
}

/// Summary of recorded feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStatistics {
    /// Mean score.
    pub mean_score: f64,
    /// Population standard deviation of the scores.
    pub std_score: f64,
    /// Number of evaluations.
    pub num_feedback: usize,
    /// Share of evaluations that involved the reviewer.
    pub human_feedback_ratio: f64,
}

/// Feedback that blends an automated evaluator with a reviewer.
///
/// With a reviewer involved the final score is
/// `(1 - human_weight) * automated + human_weight * reviewed`, and the
/// reviewer's comments and suggestions are kept. Every evaluation is
/// recorded; the history is shared by all callers of the same instance.
pub struct ExpertFeedback<S> {
    /// Configuration.
    config: FeedbackConfig,
    /// Automated evaluator.
    evaluator: Box<dyn Scorer<S>>,
    /// Reviewer for `Active` and `Hybrid`.
    reviewer: Option<Box<dyn Reviewer<S>>>,
    /// Every feedback produced so far.
    history: Mutex<Vec<Feedback>>,
}

impl<S> ExpertFeedback<S> {
    /// Automated-only feedback.
    pub fn automated<E>(evaluator: E) -> Self
    where
        E: Scorer<S> + 'static,
    {
        Self {
            config: FeedbackConfig {
                strategy: FeedbackStrategy::Passive,
                ..Default::default()
            },
            evaluator: Box::new(evaluator),
            reviewer: None,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Create without a reviewer. Fails unless the strategy is `Passive`.
    pub fn new<E>(config: FeedbackConfig, evaluator: E) -> Result<Self>
    where
        E: Scorer<S> + 'static,
    {
        config.validate()?;
        if config.strategy.needs_reviewer() {
            return Err(ArborError::MissingCollaborator("reviewer"));
        }

        Ok(Self {
            config,
            evaluator: Box::new(evaluator),
            reviewer: None,
            history: Mutex::new(Vec::new()),
        })
    }

    /// Create with a reviewer.
    pub fn with_reviewer<E, R>(config: FeedbackConfig, evaluator: E, reviewer: R) -> Result<Self>
    where
        E: Scorer<S> + 'static,
        R: Reviewer<S> + 'static,
    {
        config.validate()?;

        Ok(Self {
            config,
            evaluator: Box::new(evaluator),
            reviewer: Some(Box::new(reviewer)),
            history: Mutex::new(Vec::new()),
        })
    }

    /// Get configuration.
    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// Whether an automated score calls for review under the strategy.
    pub fn needs_review(&self, automated_score: f64) -> bool {
        match self.config.strategy {
            FeedbackStrategy::Active => true,
            FeedbackStrategy::Passive => false,
            FeedbackStrategy::Hybrid => automated_score < self.config.threshold,
        }
    }

    /// Blend an automated and a reviewed score.
    pub fn combine(&self, automated_score: f64, reviewed_score: f64) -> f64 {
        let weight = self.config.human_weight;
        (1.0 - weight) * automated_score + weight * reviewed_score
    }

    /// Copy of the recorded feedback, oldest first.
    pub fn history(&self) -> Vec<Feedback> {
        self.history.lock().clone()
    }

    /// Number of evaluations recorded.
    pub fn len(&self) -> usize {
        self.history.lock().len()
    }

    /// True if nothing has been evaluated.
    pub fn is_empty(&self) -> bool {
        self.history.lock().is_empty()
    }

    /// Forget recorded feedback.
    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    /// Summary of recorded feedback, `None` if nothing was evaluated.
    pub fn statistics(&self) -> Option<FeedbackStatistics> {
        let history = self.history.lock();
        if history.is_empty() {
            return None;
        }

        let n = history.len() as f64;
        let mean_score = history.iter().map(|f| f.score).sum::<f64>() / n;
        let variance = history
            .iter()
            .map(|f| (f.score - mean_score).powi(2))
            .sum::<f64>()
            / n;
        let human = history.iter().filter(|f| f.is_human()).count();

        Some(FeedbackStatistics {
            mean_score,
            std_score: variance.sqrt(),
            num_feedback: history.len(),
            human_feedback_ratio: human as f64 / n,
        })
    }
}

impl<S> FeedbackScorer<S> for ExpertFeedback<S> {
    fn evaluate(&self, candidate: &Candidate<S>) -> Result<Feedback> {
        let automated = self.evaluator.score(candidate.state())?;

        let feedback = match &self.reviewer {
            Some(reviewer) if self.needs_review(automated) => {
                let reviewed = reviewer.review(candidate)?;
                Feedback {
                    score: self.combine(automated, reviewed.score),
                    source: FeedbackSource::Human,
                    ..reviewed
                }
            }
            _ => Feedback::automated(automated),
        };

        tracing::trace!(
            candidate = %candidate.id(),
            score = feedback.score,
            source = ?feedback.source,
            "recorded feedback"
        );
        self.history.lock().push(feedback.clone());
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::CandidateArena;

    fn arena() -> CandidateArena<&'static str> {
        let mut arena = CandidateArena::with_root("problem", 1.0);
        arena.insert_child(crate::tree::CandidateId::ROOT, "weak step", 0.5).unwrap();
        arena.insert_child(crate::tree::CandidateId::ROOT, "strong step", 0.5).unwrap();
        arena
    }

    fn evaluator(state: &&'static str) -> Result<f64> {
        Ok(if state.starts_with("strong") { 0.9 } else { 0.4 })
    }

    fn reviewer(_: &Candidate<&'static str>) -> Result<Feedback> {
        Ok(Feedback::human(0.8, "Placeholder review", vec!["Consider alternative approach".into()]))
    }

    fn config(strategy: FeedbackStrategy) -> FeedbackConfig {
        FeedbackConfig {
            strategy,
            ..Default::default()
        }
    }

    #[test]
    fn passive_uses_automated_score() {
        let expert = ExpertFeedback::automated(evaluator);
        let tree = arena();

        let feedback = expert.evaluate(tree.get(crate::tree::CandidateId(1)).unwrap()).unwrap();
        assert_eq!(feedback.source, FeedbackSource::Automated);
        assert_eq!(feedback.score, 0.4);
    }

    #[test]
    fn active_always_reviews() {
        let expert = ExpertFeedback::with_reviewer(config(FeedbackStrategy::Active), evaluator, reviewer).unwrap();
        let tree = arena();

        let strong = expert.evaluate(tree.get(crate::tree::CandidateId(2)).unwrap()).unwrap();
        assert!(strong.is_human());
        assert!((strong.score - (0.3 * 0.9 + 0.7 * 0.8)).abs() < 1e-12);
        assert_eq!(strong.comments, "Placeholder review");
    }

    #[test]
    fn hybrid_reviews_below_threshold() {
        let expert = ExpertFeedback::with_reviewer(config(FeedbackStrategy::Hybrid), evaluator, reviewer).unwrap();
        let tree = arena();

        let weak = expert.evaluate(tree.get(crate::tree::CandidateId(1)).unwrap()).unwrap();
        let strong = expert.evaluate(tree.get(crate::tree::CandidateId(2)).unwrap()).unwrap();

        assert!(weak.is_human());
        assert!((weak.score - (0.3 * 0.4 + 0.7 * 0.8)).abs() < 1e-12);
        assert!(!strong.is_human());
        assert_eq!(strong.score, 0.9);
    }

    #[test]
    fn reviewer_required_for_active_and_hybrid() {
        for strategy in [FeedbackStrategy::Active, FeedbackStrategy::Hybrid] {
            let err = ExpertFeedback::new(config(strategy), evaluator).err().unwrap();
            assert!(matches!(err, ArborError::MissingCollaborator("reviewer")));
        }
        assert!(ExpertFeedback::new(config(FeedbackStrategy::Passive), evaluator).is_ok());
    }

    #[test]
    fn invalid_weight_rejected() {
        let bad = FeedbackConfig {
            human_weight: 1.2,
            ..Default::default()
        };
        assert!(ExpertFeedback::with_reviewer(bad, evaluator, reviewer).is_err());
    }

    #[test]
    fn statistics_track_history() {
        let expert = ExpertFeedback::with_reviewer(config(FeedbackStrategy::Hybrid), evaluator, reviewer).unwrap();
        let tree = arena();
        assert!(expert.statistics().is_none());

        for candidate in tree.iter() {
            expert.evaluate(candidate).unwrap();
        }

        // "problem" and "weak step" are reviewed, "strong step" is not.
        let stats = expert.statistics().unwrap();
        assert_eq!(stats.num_feedback, 3);
        assert!((stats.human_feedback_ratio - 2.0 / 3.0).abs() < 1e-12);

        let scores: Vec<f64> = expert.history().iter().map(|f| f.score).collect();
        let mean = scores.iter().sum::<f64>() / 3.0;
        assert!((stats.mean_score - mean).abs() < 1e-12);
        assert!(stats.std_score > 0.0);

        expert.clear_history();
        assert!(expert.is_empty());
    }

    #[test]
    fn reviewer_error_propagates() {
        let failing = |_: &Candidate<&'static str>| -> Result<Feedback> {
            Err(ArborError::Feedback("reviewer unavailable".into()))
        };
        let expert = ExpertFeedback::with_reviewer(config(FeedbackStrategy::Active), evaluator, failing).unwrap();
        let tree = arena();

        let err = expert.evaluate(tree.root()).unwrap_err();
        assert!(err.is_collaborator());
        assert!(expert.is_empty());
    }
}
