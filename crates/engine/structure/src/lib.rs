//! Declarative voxel structure model and compiler
//!
//! A [`Structure`] is a set of rectangular [`model::Region`]s plus
//! individually placed [`model::OverrideBlock`]s, as produced by an external
//! generator. This crate turns one into a flat, deduplicated, ordered list of
//! [`compile::Placement`]s ready to write into a voxel world:
//!
//! validate -> detect entrance / rotate -> compute anchor -> compile

pub mod compile;
pub mod facing;
pub mod material;
pub mod model;
pub mod offset;
pub mod properties;
pub mod rotate;
pub mod validate;

pub use compile::{compile, Placement};
pub use facing::{BlockAxis, Facing};
pub use material::{BuiltinCatalog, Material, MaterialCatalog, PlacementClass};
pub use model::{BoundingBox, OverrideBlock, Region, Structure};
pub use offset::compute_anchor;
pub use properties::{BlockState, PropertyKey, PropertyValue};
pub use rotate::{detect_entrance_wall, rotate_structure, rotation_count};
pub use validate::{validate, ValidationReport};

/// Coordinate and volume bounds applied to regions and overrides.
///
/// Both the pre-build [`validate`] gate and the [`compile`] pass enforce
/// these; compilation skips offending fragments instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum absolute value of any relative coordinate component
    pub max_coordinate: i32,
    /// Maximum cell count of a single region (before hollow/exclude)
    pub max_region_volume: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_coordinate: 200,
            max_region_volume: 100_000,
        }
    }
}
