//! # Arbor Core
//!
//! Search engines for multi-step reasoning.
//!
//! A reasoning run grows a tree of candidates from a single prompt. The
//! states are opaque to this crate: callers supply how to expand a state
//! and how to score it, usually by calling out to a language model.
//!
//! This crate provides:
//! - **Adaptive beam search** whose width follows the score improvement
//! - **Tree-of-thought exploration** with best-leaf extraction
//! - **Candidate arena** with index parent links and O(depth) path rebuild
//! - **Expert feedback** blending automated scores with a reviewer

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod feedback;
pub mod search;
pub mod tree;

pub use error::{ArborError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ArborConfig;
    pub use crate::error::{ArborError, Result};
    pub use crate::feedback::{ExpertFeedback, Feedback, FeedbackScorer, FeedbackStrategy, Reviewer};
    pub use crate::search::{
        AdaptiveBeamSearch, BeamConfig, Diversity, Expander, ExplorerConfig, Scorer, SearchOutcome,
        Solution, Thought, ThoughtExplorer, ThoughtGenerator,
    };
    pub use crate::tree::{Candidate, CandidateArena, CandidateId, StateKey};
}
