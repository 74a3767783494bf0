//! Incremental world mutation
//!
//! Applies a compiled placement list against a voxel world over many
//! discrete ticks with a fixed per-tick budget, recording pre-write state
//! for undo. [`BuildService`] owns the per-requester task and undo slots
//! and is driven by a single external tick driver; nothing here blocks.

pub mod progress;
pub mod rate_limit;
pub mod service;
pub mod settings;
pub mod task;
pub mod undo;
pub mod world;

pub use progress::{ProgressSink, TaskOutcome};
pub use rate_limit::{RateLimiter, TokenBucket};
pub use service::{BuildService, StartError};
pub use settings::BuildSettings;
pub use task::BatchTask;
pub use undo::{UndoHistory, UndoSnapshot};
pub use world::{MemoryWorld, VoxelWorld, WorldWriteError};

/// Identity of the party a build belongs to. Each requester has at most
/// one active task and at most one pending undo snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequesterId(String);

impl RequesterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequesterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for RequesterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
