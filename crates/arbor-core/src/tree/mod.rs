//! Candidate storage for tree-structured reasoning.
//!
//! This module provides:
//! - [`Candidate`] nodes holding one reasoning step each
//! - [`CandidateArena`], the per-run owner of every candidate
//! - Root-to-candidate path reconstruction
//! - [`StateKey`], the identity used to deduplicate beam slots
//!
//! # Parent links
//!
//! A candidate refers to its parent by [`CandidateId`], an index into the
//! arena, never by an owning pointer. Children are only ever created by
//! expanding an existing candidate, so every parent chain ends at the root
//! and depth decreases by exactly one per link.
//!
//! # Example
//!
//! ```rust
//! use arbor_core::tree::{CandidateArena, CandidateId};
//!
//! let mut arena = CandidateArena::with_root("What is 2 + 2?", 1.0);
//!
//! let step = arena.insert_child(CandidateId::ROOT, "2 + 2 means adding two twos", 0.8).unwrap();
//! let answer = arena.insert_child(step, "The answer is 4", 0.95).unwrap();
//!
//! let path = arena.path_states(answer).unwrap();
//! assert_eq!(path.len(), 3);
//! assert_eq!(path[0], "What is 2 + 2?");
//!
//! // Only the answer is freed; `step` is still active.
//! assert_eq!(arena.release(answer), 1);
//! assert_eq!(arena.len(), 2);
//! ```

mod arena;
mod key;
mod node;

pub use arena::CandidateArena;
pub use key::StateKey;
pub use node::{Candidate, CandidateId, Metadata, FEEDBACK, PARENT_SCORE};
