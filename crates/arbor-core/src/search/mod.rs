//! Search engines over reasoning states.
//!
//! Two engines share one candidate tree and the same collaborator traits:
//! - **Adaptive beam search** keeps a width-limited frontier and resizes it
//!   from the observed score improvement
//! - **Thought exploration** expands every leaf breadth-first and returns
//!   the best leaf with its reasoning path
//!
//! # Architecture
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`Scorer`] | Scores a state (higher is better) |
//! | [`Expander`] | Produces child states of a state |
//! | [`ThoughtGenerator`] | Produces scored children of a candidate |
//! | [`Diversity`] | Bonus for children unlike the current beam |
//! | [`AdaptiveBeamSearch`] | Beam search with adaptive width |
//! | [`ThoughtExplorer`] | Breadth-first tree-of-thought search |
//!
//! Collaborators are plain closures as often as not:
//!
//! ```
//! use arbor_core::search::{AdaptiveBeamSearch, BeamConfig, Expander, Scorer};
//! use arbor_core::Result;
//!
//! let expander = |s: &i64| -> Result<Vec<i64>> { Ok(vec![s + 1, s * 2]) };
//! let scorer = |s: &i64| -> Result<f64> { Ok(-((s - 12).abs() as f64)) };
//! assert_eq!(expander.expand(&3).unwrap(), vec![4, 6]);
//! assert_eq!(scorer.score(&12).unwrap(), 0.0);
//!
//! let mut search = AdaptiveBeamSearch::new(BeamConfig::default()).unwrap();
//! let outcome = search.search(1i64, &scorer, &expander).unwrap();
//! assert_eq!(outcome.path[0], 1);
//! ```

mod beam;
mod diversity;
mod expander;
mod explore;
mod scorer;

pub use beam::{AdaptiveBeamSearch, BeamConfig, BeamSnapshot, SearchOutcome, SearchStatistics};
pub use diversity::{Diversity, JitterDiversity, MetricDiversity, NoDiversity};
pub use expander::{Expander, FixedExpander, ScoredExpander, Thought, ThoughtGenerator};
pub use explore::{ExplorerBuilder, ExplorerConfig, Solution, ThoughtExplorer, ROOT_SCORE};
pub use scorer::{ConstantScorer, Scorer};
