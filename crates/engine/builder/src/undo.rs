//! Undo snapshots and per-requester history
//!
//! A snapshot is the first-observed pre-write state of every cell a batch
//! task touched, in touch order. Replaying it as a write-list restores the
//! world, overlapping regions included, because later writes to an already
//! recorded cell never update the record.

use glam::IVec3;
use std::collections::HashMap;
use structure::{BlockState, Placement};

use crate::RequesterId;

/// Ordered pre-write states of one completed build
#[derive(Debug, Clone, Default)]
pub struct UndoSnapshot {
    entries: Vec<(IVec3, BlockState)>,
}

impl UndoSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pos: IVec3, state: BlockState) {
        self.entries.push((pos, state));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(IVec3, BlockState)] {
        &self.entries
    }

    /// Convert into the write-list of a restore task
    pub fn into_placements(self) -> Vec<Placement> {
        self.entries
            .into_iter()
            .map(|(position, state)| Placement { position, state })
            .collect()
    }
}

/// Pending undo snapshots keyed by requester
///
/// One slot per requester: a new completed build supersedes the previous
/// snapshot, and retrieval pops it, so undo is one-shot.
#[derive(Debug, Default)]
pub struct UndoHistory {
    history: HashMap<RequesterId, UndoSnapshot>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, requester: RequesterId, snapshot: UndoSnapshot) {
        self.history.insert(requester, snapshot);
    }

    /// Retrieve and discard the pending snapshot
    pub fn pop(&mut self, requester: &RequesterId) -> Option<UndoSnapshot> {
        self.history.remove(requester)
    }

    pub fn contains(&self, requester: &RequesterId) -> bool {
        self.history.contains_key(requester)
    }

    pub fn get(&self, requester: &RequesterId) -> Option<&UndoSnapshot> {
        self.history.get(requester)
    }

    /// Disconnect cleanup
    pub fn remove(&mut self, requester: &RequesterId) {
        self.history.remove(requester);
    }
}
