//! Cursor-based batch placement task

use std::collections::HashSet;

use glam::IVec3;
use structure::Placement;

use crate::undo::UndoSnapshot;
use crate::world::VoxelWorld;

/// A build or restore in progress: a write-list, a cursor, and the undo
/// snapshot being captured along the way.
///
/// Lifecycle: created at cursor 0, advanced by the tick driver until the
/// cursor reaches the end, then removed. A task that is dropped earlier is
/// simply abandoned; already applied writes stay in the world.
#[derive(Debug)]
pub struct BatchTask {
    placements: Vec<Placement>,
    cursor: usize,
    undo: UndoSnapshot,
    recorded: HashSet<IVec3>,
    is_undo: bool,
    last_reported_percent: i32,
    failed_writes: usize,
}

impl BatchTask {
    /// A normal build task; captures an undo snapshot as it writes.
    pub fn new(placements: Vec<Placement>) -> Self {
        Self {
            placements,
            cursor: 0,
            undo: UndoSnapshot::new(),
            recorded: HashSet::new(),
            is_undo: false,
            last_reported_percent: -1,
            failed_writes: 0,
        }
    }

    /// A restore task replaying a snapshot. Does not capture a snapshot of
    /// its own: undo is one-shot.
    pub fn undo_replay(snapshot: UndoSnapshot) -> Self {
        let mut task = Self::new(snapshot.into_placements());
        task.is_undo = true;
        task
    }

    pub fn is_undo(&self) -> bool {
        self.is_undo
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.placements.len()
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    /// Process up to `budget` placements. Returns true once the task is
    /// complete.
    ///
    /// The pre-write state of a position is captured only the first time
    /// this task writes it, so overlapping regions cannot clobber the
    /// original record. A rejected write is counted and skipped; the rest
    /// of the slice proceeds.
    pub fn advance(&mut self, world: &mut dyn VoxelWorld, budget: usize) -> bool {
        let end = (self.cursor + budget).min(self.placements.len());

        for i in self.cursor..end {
            let placement = &self.placements[i];
            if !self.is_undo && self.recorded.insert(placement.position) {
                let before = world.read_cell(placement.position);
                self.undo.record(placement.position, before);
            }
            if let Err(err) = world.write_cell(placement.position, placement.state.clone()) {
                tracing::warn!(%err, material = %placement.state.material, "cell write rejected");
                self.failed_writes += 1;
            }
        }

        self.cursor = end;
        self.cursor >= self.placements.len()
    }

    /// Integer completion percentage; an empty task is complete
    pub fn progress_percent(&self) -> u8 {
        if self.placements.is_empty() {
            return 100;
        }
        (self.cursor as u64 * 100 / self.placements.len() as u64) as u8
    }

    /// The percentage, but only when it changed since the last call.
    /// Bounds reporting overhead on long tasks.
    pub fn take_progress_report(&mut self) -> Option<u8> {
        let percent = self.progress_percent();
        if i32::from(percent) == self.last_reported_percent {
            return None;
        }
        self.last_reported_percent = i32::from(percent);
        Some(percent)
    }

    /// Consume the task and yield the captured snapshot
    pub fn into_undo(self) -> UndoSnapshot {
        self.undo
    }
}
