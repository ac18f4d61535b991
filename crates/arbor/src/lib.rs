//! # Arbor
//!
//! Tree-structured reasoning search for LLM-driven problem solving.
//!
//! Arbor explores multi-step reasoning by growing a tree of candidate
//! thoughts from a prompt:
//! - **Tree-of-Thought**: expand every leaf level by level, return the best leaf
//! - **Adaptive Beam Search**: keep a frontier whose width follows progress
//! - **Expert Feedback**: annotate thoughts with automated or reviewed scores
//!
//! ## Quick Start
//!
//! ```rust
//! use arbor::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut reasoner = Reasoner::builder()
//!         .expander(|s: &String| -> arbor::Result<Vec<String>> {
//!             Ok(vec![format!("{s} then a"), format!("{s} then b")])
//!         })
//!         .scorer(|s: &String| -> arbor::Result<f64> { Ok(s.matches('a').count() as f64) })
//!         .build()?;
//!
//!     let result = reasoner.reason("start".to_string(), ReasoningMode::Tree)?;
//!     println!("{:?}", result.solution);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Re-export core crate
pub use arbor_core::*;

mod engine;

pub use engine::{Reasoner, ReasonerBuilder, ReasoningMode, ReasoningResult};

/// Commonly used types.
pub mod prelude {
    pub use crate::engine::{Reasoner, ReasonerBuilder, ReasoningMode, ReasoningResult};
    pub use crate::{
        config::ArborConfig,
        error::{ArborError, Result},
        feedback::{ExpertFeedback, Feedback, FeedbackConfig, FeedbackScorer, FeedbackStrategy, Reviewer},
        search::{
            AdaptiveBeamSearch, BeamConfig, Diversity, Expander, ExplorerConfig, MetricDiversity,
            Scorer, Solution, Thought, ThoughtExplorer, ThoughtGenerator,
        },
        tree::{Candidate, CandidateArena, CandidateId, StateKey},
    };

    // Re-export useful external types
    pub use anyhow;
    pub use tracing;
}
