//! Per-requester build orchestration

use std::collections::HashMap;
use std::time::Duration;

use structure::Placement;
use thiserror::Error;

use crate::progress::{ProgressSink, TaskOutcome};
use crate::rate_limit::RateLimiter;
use crate::settings::BuildSettings;
use crate::task::BatchTask;
use crate::undo::{UndoHistory, UndoSnapshot};
use crate::world::VoxelWorld;
use crate::RequesterId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("a build is already in progress for this requester")]
    AlreadyActive,
    #[error("nothing to place")]
    Empty,
    #[error("structure needs {required} cells, limit is {limit}")]
    TooLarge { required: usize, limit: usize },
    #[error("no build to undo")]
    NoUndoHistory,
}

/// Owns every in-flight task and the undo slot per requester.
///
/// Single-threaded by construction: one external driver calls [`tick`]
/// with mutable access to the world, so tasks never race each other.
///
/// [`tick`]: BuildService::tick
#[derive(Debug)]
pub struct BuildService {
    active: HashMap<RequesterId, BatchTask>,
    undo: UndoHistory,
    limiter: RateLimiter,
    max_blocks: usize,
}

impl BuildService {
    pub fn new(settings: &BuildSettings) -> Self {
        Self {
            active: HashMap::new(),
            undo: UndoHistory::new(),
            limiter: RateLimiter::new(
                settings.rate_limit_tokens,
                Duration::from_secs(settings.rate_limit_refill_seconds),
            ),
            max_blocks: settings.max_blocks as usize,
        }
    }

    /// Queue a build. Returns the number of placements accepted.
    ///
    /// One task per requester; a second request while the first is still
    /// running is rejected rather than queued.
    pub fn start_build(
        &mut self,
        requester: RequesterId,
        placements: Vec<Placement>,
    ) -> Result<usize, StartError> {
        if self.active.contains_key(&requester) {
            return Err(StartError::AlreadyActive);
        }
        if placements.is_empty() {
            return Err(StartError::Empty);
        }
        if placements.len() > self.max_blocks {
            return Err(StartError::TooLarge {
                required: placements.len(),
                limit: self.max_blocks,
            });
        }
        let total = placements.len();
        tracing::info!(%requester, total, "build started");
        self.active.insert(requester, BatchTask::new(placements));
        Ok(total)
    }

    /// Queue a replay of the requester's most recent snapshot. The snapshot
    /// is consumed; undoing twice needs a new build in between.
    pub fn start_undo(&mut self, requester: RequesterId) -> Result<usize, StartError> {
        if self.active.contains_key(&requester) {
            return Err(StartError::AlreadyActive);
        }
        let snapshot = self.undo.pop(&requester).ok_or(StartError::NoUndoHistory)?;
        let total = snapshot.len();
        tracing::info!(%requester, total, "undo started");
        self.active
            .insert(requester, BatchTask::undo_replay(snapshot));
        Ok(total)
    }

    /// Advance every active task by up to `budget` placements each,
    /// reporting progress on integer-percent changes and finishing tasks
    /// whose cursor reached the end. Finished builds park their snapshot
    /// in the undo slot.
    pub fn tick(
        &mut self,
        world: &mut dyn VoxelWorld,
        budget: usize,
        sink: &mut dyn ProgressSink,
    ) {
        let mut finished = Vec::new();

        for (requester, task) in self.active.iter_mut() {
            let done = task.advance(world, budget);
            if let Some(percent) = task.take_progress_report() {
                sink.progress(requester, percent, task.cursor(), task.total(), task.is_undo());
            }
            if done {
                finished.push(requester.clone());
            }
        }

        for requester in finished {
            let Some(task) = self.active.remove(&requester) else {
                continue;
            };
            let failed_writes = task.failed_writes();
            let placed = task.cursor() - failed_writes;
            if task.is_undo() {
                sink.completed(
                    &requester,
                    TaskOutcome::Restored {
                        restored: placed,
                        failed_writes,
                    },
                );
            } else {
                self.undo.record(requester.clone(), task.into_undo());
                sink.completed(
                    &requester,
                    TaskOutcome::Built {
                        placed,
                        failed_writes,
                    },
                );
            }
        }
    }

    pub fn has_active(&self, requester: &RequesterId) -> bool {
        self.active.contains_key(requester)
    }

    pub fn has_undo(&self, requester: &RequesterId) -> bool {
        self.undo.contains(requester)
    }

    /// Gate a generation request against the requester's token bucket.
    pub fn try_consume_token(&mut self, requester: &RequesterId) -> bool {
        self.limiter.try_consume(requester)
    }

    /// Peek at the snapshot that an undo for this requester would replay.
    pub fn undo_snapshot(&self, requester: &RequesterId) -> Option<&UndoSnapshot> {
        self.undo.get(requester)
    }

    /// Forget everything tied to a requester that disconnected. The active
    /// task, if any, is abandoned mid-write.
    pub fn remove_requester(&mut self, requester: &RequesterId) {
        if self.active.remove(requester).is_some() {
            tracing::warn!(%requester, "task abandoned, requester removed");
        }
        self.undo.remove(requester);
        self.limiter.remove(requester);
    }

    /// Drop all state at shutdown, logging any task cut short.
    pub fn shutdown(&mut self) {
        for (requester, task) in self.active.drain() {
            tracing::warn!(
                %requester,
                cursor = task.cursor(),
                total = task.total(),
                "shutdown with task in progress"
            );
        }
    }
}
