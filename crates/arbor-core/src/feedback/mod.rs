//! Quality feedback on generated thoughts.
//!
//! Feedback is an annotation: the explorer stores it under the
//! [`FEEDBACK`](crate::tree::FEEDBACK) metadata key of each new candidate and
//! leaves the candidate's own score alone.
//!
//! - [`FeedbackScorer`] is the interface the explorer calls
//! - [`ExpertFeedback`] blends an automated evaluator with an optional
//!   [`Reviewer`] (a human or a stronger model)

mod expert;

pub use expert::{ExpertFeedback, FeedbackConfig, FeedbackStatistics, FeedbackStrategy};

use crate::error::Result;
use crate::tree::Candidate;
use serde::{Deserialize, Serialize};

/// Where a feedback score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    /// Automated evaluator only.
    Automated,
    /// A reviewer was consulted.
    Human,
}

/// Evaluation of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Quality score, conventionally in `[0, 1]`.
    pub score: f64,
    /// Free-form remarks.
    pub comments: String,
    /// Suggested follow-ups.
    pub suggestions: Vec<String>,
    /// Origin of the score.
    pub source: FeedbackSource,
}

impl Feedback {
    /// Feedback from the automated evaluator.
    pub fn automated(score: f64) -> Self {
        Self {
            score,
            comments: "Automated evaluation".to_string(),
            suggestions: Vec::new(),
            source: FeedbackSource::Automated,
        }
    }

    /// Feedback from a reviewer.
    pub fn human(score: f64, comments: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            score,
            comments: comments.into(),
            suggestions,
            source: FeedbackSource::Human,
        }
    }

    /// Whether a reviewer produced this feedback.
    pub fn is_human(&self) -> bool {
        self.source == FeedbackSource::Human
    }
}

/// Trait for candidate feedback.
pub trait FeedbackScorer<S>: Send + Sync {
    /// Evaluate a freshly created candidate.
    fn evaluate(&self, candidate: &Candidate<S>) -> Result<Feedback>;
}

impl<S, F> FeedbackScorer<S> for F
where
    F: Fn(&Candidate<S>) -> Result<Feedback> + Send + Sync,
{
    fn evaluate(&self, candidate: &Candidate<S>) -> Result<Feedback> {
        self(candidate)
    }
}

/// Trait for the reviewer consulted by [`ExpertFeedback`].
pub trait Reviewer<S>: Send + Sync {
    /// Review a candidate. The returned score is blended with the
    /// automated one.
    fn review(&self, candidate: &Candidate<S>) -> Result<Feedback>;
}

impl<S, F> Reviewer<S> for F
where
    F: Fn(&Candidate<S>) -> Result<Feedback> + Send + Sync,
{
    fn review(&self, candidate: &Candidate<S>) -> Result<Feedback> {
        self(candidate)
    }
}
