//! Candidate arena for one search run.

use super::node::{Candidate, CandidateId};
use crate::error::{ArborError, Result};
use serde_json::Value;

/// Owns every candidate created during a single `search`/`solve` call.
///
/// Slots are never reused, so a [`CandidateId`] stays unambiguous for the
/// whole run. Released candidates leave an empty slot behind.
#[derive(Debug, Clone)]
pub struct CandidateArena<S> {
    /// Candidate slots, indexed by `CandidateId`.
    slots: Vec<Option<Candidate<S>>>,
    /// Number of occupied slots.
    live: usize,
}

impl<S> CandidateArena<S> {
    /// Create an arena holding only the root.
    pub fn with_root(state: S, score: f64) -> Self {
        Self {
            slots: vec![Some(Candidate::root(state, score))],
            live: 1,
        }
    }

    /// Root candidate.
    pub fn root(&self) -> &Candidate<S> {
        match self.slots.first() {
            Some(Some(root)) => root,
            _ => unreachable!("root slot is never released"),
        }
    }

    /// Attach a new child under `parent`.
    pub fn insert_child(&mut self, parent: CandidateId, state: S, score: f64) -> Result<CandidateId> {
        let id = CandidateId(self.slots.len());
        let parent_node = self
            .slots
            .get_mut(parent.0)
            .and_then(Option::as_mut)
            .ok_or(ArborError::InvalidCandidate(parent.0))?;

        let child = parent_node.child(id, state, score);
        parent_node.add_child(id);

        self.slots.push(Some(child));
        self.live += 1;
        Ok(id)
    }

    /// Get a candidate.
    pub fn get(&self, id: CandidateId) -> Option<&Candidate<S>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Get a candidate or fail with `InvalidCandidate`.
    pub fn try_get(&self, id: CandidateId) -> Result<&Candidate<S>> {
        self.get(id).ok_or(ArborError::InvalidCandidate(id.0))
    }

    /// Attach metadata to a candidate.
    pub fn annotate(&mut self, id: CandidateId, key: &str, value: Value) -> Result<()> {
        let node = self
            .slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(ArborError::InvalidCandidate(id.0))?;
        node.annotate(key, value);
        Ok(())
    }

    /// Live candidates in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate<S>> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Live candidates without children, in creation order.
    pub fn leaves(&self) -> Vec<CandidateId> {
        self.iter().filter(|c| c.is_leaf()).map(Candidate::id).collect()
    }

    /// IDs from the root down to `id`.
    ///
    /// Depth drops by exactly one per parent link, so this takes
    /// `depth + 1` steps.
    pub fn path(&self, id: CandidateId) -> Result<Vec<CandidateId>> {
        let mut current = self.try_get(id)?;
        let mut path = Vec::with_capacity(current.depth() + 1);
        path.push(current.id());

        while let Some(parent_id) = current.parent() {
            let parent = self.try_get(parent_id)?;
            debug_assert_eq!(parent.depth() + 1, current.depth());
            path.push(parent_id);
            current = parent;
        }

        path.reverse();
        Ok(path)
    }

    /// States from the root down to `id`.
    pub fn path_states(&self, id: CandidateId) -> Result<Vec<S>>
    where
        S: Clone,
    {
        self.path(id)?
            .into_iter()
            .map(|step| self.try_get(step).map(|c| c.state().clone()))
            .collect()
    }

    /// Mark a candidate as no longer held by the search and collect it,
    /// along with any ancestors left inactive and childless.
    ///
    /// Candidates that still have children stay in place until their last
    /// child goes. Returns the number of slots freed.
    pub fn release(&mut self, id: CandidateId) -> usize {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node.deactivate(),
            None => return 0,
        }

        let mut freed = 0;
        let mut current = id;
        loop {
            let collectable = self.get(current).map_or(false, Candidate::can_gc);
            if !collectable {
                break;
            }

            let Some(node) = self.slots[current.0].take() else {
                break;
            };
            self.live -= 1;
            freed += 1;
            tracing::trace!(candidate = %current, depth = node.depth(), "released candidate");

            let Some(parent_id) = node.parent() else {
                break;
            };
            match self.slots.get_mut(parent_id.0).and_then(Option::as_mut) {
                Some(parent) => parent.remove_child(current),
                None => break,
            }
            current = parent_id;
        }

        freed
    }

    /// Number of live candidates.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Always false: the root is never collected.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of candidates ever created in this arena.
    pub fn total_created(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(depth: usize) -> (CandidateArena<usize>, CandidateId) {
        let mut arena = CandidateArena::with_root(0, 0.0);
        let mut last = CandidateId::ROOT;
        for d in 1..=depth {
            last = arena.insert_child(last, d, d as f64).unwrap();
        }
        (arena, last)
    }

    #[test]
    fn with_root_creates_root() {
        let arena = CandidateArena::with_root("q", 1.0);
        assert_eq!(arena.len(), 1);
        assert!(arena.root().is_root());
        assert_eq!(arena.leaves(), vec![CandidateId::ROOT]);
    }

    #[test]
    fn insert_child_sets_depth_and_parent() {
        let mut arena = CandidateArena::with_root("q", 1.0);
        let a = arena.insert_child(CandidateId::ROOT, "a", 0.5).unwrap();
        let b = arena.insert_child(a, "b", 0.6).unwrap();

        let b_node = arena.get(b).unwrap();
        assert_eq!(b_node.depth(), 2);
        assert_eq!(b_node.parent(), Some(a));
        assert_eq!(arena.get(a).unwrap().children(), &[b]);
        assert_eq!(arena.leaves(), vec![b]);
    }

    #[test]
    fn insert_child_rejects_unknown_parent() {
        let mut arena = CandidateArena::with_root(0u8, 0.0);
        let err = arena.insert_child(CandidateId(7), 1, 0.0).unwrap_err();
        assert!(matches!(err, ArborError::InvalidCandidate(7)));
    }

    #[test]
    fn path_length_is_depth_plus_one() {
        for depth in 0..6 {
            let (arena, last) = chain(depth);
            let path = arena.path(last).unwrap();
            assert_eq!(path.len(), arena.get(last).unwrap().depth() + 1);
            assert_eq!(path[0], CandidateId::ROOT);
        }
    }

    #[test]
    fn path_states_run_root_to_leaf() {
        let (arena, last) = chain(3);
        assert_eq!(arena.path_states(last).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn release_collects_dead_branch() {
        let mut arena = CandidateArena::with_root(0, 0.0);
        let a = arena.insert_child(CandidateId::ROOT, 1, 0.0).unwrap();
        let b = arena.insert_child(CandidateId::ROOT, 2, 0.0).unwrap();
        let a1 = arena.insert_child(a, 3, 0.0).unwrap();
        assert_eq!(arena.len(), 4);

        // `a` leaves the beam but its child survives.
        assert_eq!(arena.release(a), 0);
        assert!(arena.get(a).is_some());

        // Dropping the last child takes the inactive parent with it.
        assert_eq!(arena.release(a1), 2);
        assert!(arena.get(a).is_none());
        assert!(arena.get(b).is_some());
        assert_eq!(arena.root().children(), &[b]);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.total_created(), 4);
    }

    #[test]
    fn release_never_collects_root() {
        let mut arena = CandidateArena::with_root(0, 0.0);
        let a = arena.insert_child(CandidateId::ROOT, 1, 0.0).unwrap();
        arena.release(CandidateId::ROOT);
        assert_eq!(arena.release(a), 1);
        assert_eq!(arena.len(), 1);
        assert!(!arena.is_empty());
    }

    #[test]
    fn annotate_unknown_candidate_fails() {
        let mut arena = CandidateArena::with_root(0, 0.0);
        assert!(arena.annotate(CandidateId(3), "k", Value::Null).is_err());
        arena.annotate(CandidateId::ROOT, "k", Value::Bool(true)).unwrap();
        assert_eq!(arena.root().meta("k"), Some(&Value::Bool(true)));
    }
}
