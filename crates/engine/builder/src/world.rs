//! Voxel world access
//!
//! The executor only knows "read cell" and "write cell"; the host's actual
//! storage sits behind [`VoxelWorld`]. Writes can fail (the backing store
//! may have hard bounds) and the executor decides what to do about it.

use glam::IVec3;
use std::collections::HashMap;
use structure::BlockState;

/// A cell write was rejected by the backing store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldWriteError {
    #[error("position ({0}, {1}, {2}) is outside the writable world bounds")]
    OutOfBounds(i32, i32, i32),
}

/// Mutable voxel storage, driven from a single thread
pub trait VoxelWorld {
    /// Current state at a position. Unset cells read as air.
    fn read_cell(&self, pos: IVec3) -> BlockState;

    /// Write a state at a position
    fn write_cell(&mut self, pos: IVec3, state: BlockState) -> Result<(), WorldWriteError>;
}

/// Map-backed world used by tests and the offline tool
///
/// An optional coordinate bound makes writes outside it fail, which is how
/// the tests exercise the executor's write-failure policy.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    cells: HashMap<IVec3, BlockState>,
    bound: Option<i32>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict writes to positions with every component in `[-bound, bound]`
    pub fn with_bound(bound: i32) -> Self {
        Self {
            cells: HashMap::new(),
            bound: Some(bound),
        }
    }

    /// Number of cells holding a non-air state
    pub fn occupied(&self) -> usize {
        self.cells.values().filter(|s| !s.is_clearing()).count()
    }
}

impl VoxelWorld for MemoryWorld {
    fn read_cell(&self, pos: IVec3) -> BlockState {
        self.cells.get(&pos).cloned().unwrap_or_else(BlockState::air)
    }

    fn write_cell(&mut self, pos: IVec3, state: BlockState) -> Result<(), WorldWriteError> {
        if let Some(bound) = self.bound {
            if pos.abs().cmpgt(IVec3::splat(bound)).any() {
                return Err(WorldWriteError::OutOfBounds(pos.x, pos.y, pos.z));
            }
        }
        self.cells.insert(pos, state);
        Ok(())
    }
}
