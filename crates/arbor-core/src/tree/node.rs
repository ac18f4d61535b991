//! Candidate representation.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key mirroring the score of the candidate a child was expanded
/// from. JSON has no infinities or NaN, so a non-finite score shows up here
/// as `null`; [`Candidate::parent_score`] keeps the exact value.
pub const PARENT_SCORE: &str = "parent_score";

/// Metadata key holding a feedback annotation.
pub const FEEDBACK: &str = "feedback";

/// Open key/value annotations attached to a candidate.
pub type Metadata = BTreeMap<String, Value>;

/// Index of a candidate inside a [`CandidateArena`](super::CandidateArena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId(pub usize);

impl CandidateId {
    /// Root candidate ID.
    pub const ROOT: CandidateId = CandidateId(0);

    /// Slot index of this candidate.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One reasoning step.
///
/// The state and score are fixed once the candidate exists; only metadata
/// may be added afterwards. The parent is an arena index, so the chain back
/// to the root can never form a cycle: a child is always created after its
/// parent and at exactly one level deeper.
#[derive(Debug, Clone)]
pub struct Candidate<S> {
    /// Arena slot.
    id: CandidateId,
    /// Reasoning content.
    state: S,
    /// Quality estimate.
    score: f64,
    /// Distance from the root.
    depth: usize,
    /// Candidate this one was expanded from (None for root).
    parent: Option<CandidateId>,
    /// Score of the parent at expansion time (None for root).
    parent_score: Option<f64>,
    /// Additive annotations.
    metadata: Metadata,
    /// Live children, in creation order.
    children: Vec<CandidateId>,
    /// Whether the search still holds this candidate.
    is_active: bool,
}

impl<S> Candidate<S> {
    /// Create the root candidate.
    pub(crate) fn root(state: S, score: f64) -> Self {
        Self {
            id: CandidateId::ROOT,
            state,
            score,
            depth: 0,
            parent: None,
            parent_score: None,
            metadata: Metadata::new(),
            children: Vec::new(),
            is_active: true,
        }
    }

    /// Create a child one level below this candidate.
    pub(crate) fn child(&self, id: CandidateId, state: S, score: f64) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(PARENT_SCORE.to_string(), Value::from(self.score));

        Self {
            id,
            state,
            score,
            depth: self.depth + 1,
            parent: Some(self.id),
            parent_score: Some(self.score),
            metadata,
            children: Vec::new(),
            is_active: true,
        }
    }

    /// Get candidate ID.
    pub fn id(&self) -> CandidateId {
        self.id
    }

    /// Get the reasoning content.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get the score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Get the depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Get parent candidate ID.
    pub fn parent(&self) -> Option<CandidateId> {
        self.parent
    }

    /// Whether this is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// All metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Look up one metadata entry.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Score of the parent at expansion time. `None` only for the root.
    pub fn parent_score(&self) -> Option<f64> {
        self.parent_score
    }

    /// Score gained over the parent. `None` only for the root; non-finite
    /// scores give a non-finite gain.
    pub fn improvement(&self) -> Option<f64> {
        self.parent_score().map(|parent| self.score - parent)
    }

    /// Attach an annotation. Existing keys are overwritten, nothing is removed.
    pub(crate) fn annotate(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    /// Live children.
    pub fn children(&self) -> &[CandidateId] {
        &self.children
    }

    /// Get number of live children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// True when no children are attached.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn add_child(&mut self, child: CandidateId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: CandidateId) {
        self.children.retain(|&c| c != child);
    }

    /// Check if candidate is active.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub(crate) fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Check if candidate can be collected.
    pub fn can_gc(&self) -> bool {
        !self.is_active && self.children.is_empty() && !self.is_root()
    }

    /// Consume the candidate, returning its state.
    pub fn into_state(self) -> S {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent() {
        let root = Candidate::root("problem", 1.0);
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.parent_score(), None);
        assert!(!root.can_gc());
    }

    #[test]
    fn child_records_parent_score() {
        let root = Candidate::root("problem", 0.4);
        let child = root.child(CandidateId(1), "step", 0.7);

        assert_eq!(child.parent(), Some(CandidateId::ROOT));
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent_score(), Some(0.4));
        assert!((child.improvement().unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn inactive_leaf_is_collectable() {
        let root = Candidate::root(0u32, 0.0);
        let mut child = root.child(CandidateId(1), 1, 0.0);
        assert!(!child.can_gc());

        child.add_child(CandidateId(2));
        child.deactivate();
        assert!(!child.can_gc());

        child.remove_child(CandidateId(2));
        assert!(child.can_gc());
    }

    #[test]
    fn annotate_is_additive() {
        let root = Candidate::root(0u32, 0.5);
        let mut child = root.child(CandidateId(1), 1, 0.6);
        child.annotate(FEEDBACK, Value::from(0.9));

        assert_eq!(child.meta(FEEDBACK), Some(&Value::from(0.9)));
        assert_eq!(child.parent_score(), Some(0.5));
        assert_eq!(child.metadata().len(), 2);
    }

    #[test]
    fn non_finite_parent_score_is_kept() {
        let root = Candidate::root(0u32, f64::NEG_INFINITY);
        let child = root.child(CandidateId(1), 1, 0.2);
        assert_eq!(child.parent_score(), Some(f64::NEG_INFINITY));
        assert_eq!(child.improvement(), Some(f64::INFINITY));
        assert_eq!(child.meta(PARENT_SCORE), Some(&Value::Null));

        let nan_root = Candidate::root(0u32, f64::NAN);
        let nan_child = nan_root.child(CandidateId(1), 1, 0.2);
        assert!(nan_child.parent_score().unwrap().is_nan());
        assert!(nan_child.improvement().unwrap().is_nan());
    }
}
