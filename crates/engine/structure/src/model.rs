//! Raw structure description as emitted by the generator
//!
//! Deserialization is deliberately loose: coordinates arrive as untyped
//! arrays and the `exclude` field appears in two encodings in the wild.
//! Normalization happens here, at the model boundary, so the geometry code
//! only ever sees well-formed `(corner, corner)` pairs.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// A declarative structure: rectangular regions plus individually placed
/// override cells. Overrides win over regions at shared coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default, alias = "blocks")]
    pub overrides: Vec<OverrideBlock>,
}

/// A rectangular volume of one material with shape modifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    #[serde(alias = "block")]
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<i32>>,
    #[serde(default)]
    pub hollow: bool,
    /// Legacy single-facing encoding; `properties` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, String>>,
    /// Raw exclude field; see [`normalize_exclude`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Value>,
}

/// A single explicitly placed cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideBlock {
    #[serde(alias = "block")]
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, String>>,
}

fn corner(raw: &Option<Vec<i32>>) -> Option<IVec3> {
    match raw.as_deref() {
        Some([x, y, z]) => Some(IVec3::new(*x, *y, *z)),
        _ => None,
    }
}

impl Region {
    /// Both corners, unordered, if present and well-formed
    pub fn corners(&self) -> Option<(IVec3, IVec3)> {
        Some((corner(&self.from)?, corner(&self.to)?))
    }

    /// Cell count of the full cuboid, before hollow/exclude.
    ///
    /// Corners come straight from generated input and can sit anywhere in
    /// the `i32` range, so the extents are computed in wide arithmetic;
    /// a count past `u64` saturates rather than wrapping.
    pub fn volume(&self) -> Option<u64> {
        let (from, to) = self.corners()?;
        let extent = |a: i32, b: i32| u128::from((i64::from(a) - i64::from(b)).unsigned_abs()) + 1;
        let cells = extent(to.x, from.x) * extent(to.y, from.y) * extent(to.z, from.z);
        Some(u64::try_from(cells).unwrap_or(u64::MAX))
    }

    /// Normalized exclude cutouts, malformed entries dropped
    pub fn excludes(&self) -> Vec<(IVec3, IVec3)> {
        match &self.exclude {
            Some(raw) => normalize_exclude(raw),
            None => Vec::new(),
        }
    }

    /// Replace the exclude field with the canonical nested encoding
    /// (used after rotating cutout corners)
    pub fn set_excludes(&mut self, cutouts: &[(IVec3, IVec3)]) {
        if cutouts.is_empty() {
            self.exclude = None;
            return;
        }
        let groups: Vec<Value> = cutouts
            .iter()
            .map(|(a, b)| json!([[a.x, a.y, a.z], [b.x, b.y, b.z]]))
            .collect();
        self.exclude = Some(Value::Array(groups));
    }
}

impl OverrideBlock {
    pub fn position(&self) -> Option<IVec3> {
        corner(&self.pos)
    }
}

/// Parse the `exclude` field, tolerating both encodings the generator
/// produces:
///
/// - nested (canonical): `[[[x,y,z],[x,y,z]], ...]` — a list of corner pairs
/// - flat (common mistake): `[[x,y,z],[x,y,z]]` — a single pair, wrapped
///   into a one-element list
///
/// Malformed groups are dropped rather than failing the region.
pub fn normalize_exclude(raw: &Value) -> Vec<(IVec3, IVec3)> {
    let Value::Array(outer) = raw else {
        return Vec::new();
    };
    let Some(Value::Array(first)) = outer.first() else {
        return Vec::new();
    };

    // Flat pair: the first element's first element is a number.
    if matches!(first.first(), Some(Value::Number(_))) {
        if outer.len() >= 2 {
            if let (Some(a), Some(b)) = (coord_value(&outer[0]), coord_value(&outer[1])) {
                return vec![(a, b)];
            }
        }
        return Vec::new();
    }

    outer
        .iter()
        .filter_map(|group| {
            let Value::Array(pair) = group else {
                return None;
            };
            if pair.len() < 2 {
                return None;
            }
            Some((coord_value(&pair[0])?, coord_value(&pair[1])?))
        })
        .collect()
}

fn coord_value(value: &Value) -> Option<IVec3> {
    let Value::Array(items) = value else {
        return None;
    };
    if items.len() != 3 {
        return None;
    }
    let mut out = [0i32; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_i64()?.try_into().ok()?;
    }
    Some(IVec3::from_array(out))
}

/// Inclusive axis-aligned bounds of a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: IVec3,
    pub max: IVec3,
}

impl BoundingBox {
    /// Bounds over all region corners and override positions.
    /// An empty structure yields the degenerate zero box.
    pub fn of(structure: &Structure) -> Self {
        Self::build(structure, true)
    }

    /// Bounds over regions only. Entrance detection uses this so that
    /// decorative exterior overrides cannot skew the walls.
    pub fn of_regions(structure: &Structure) -> Self {
        Self::build(structure, false)
    }

    fn build(structure: &Structure, include_overrides: bool) -> Self {
        let mut min = IVec3::MAX;
        let mut max = IVec3::MIN;
        let mut any = false;

        for region in &structure.regions {
            if let Some((from, to)) = region.corners() {
                min = min.min(from.min(to));
                max = max.max(from.max(to));
                any = true;
            }
        }

        if include_overrides {
            for block in &structure.overrides {
                if let Some(pos) = block.position() {
                    min = min.min(pos);
                    max = max.max(pos);
                    any = true;
                }
            }
        }

        if !any {
            return Self {
                min: IVec3::ZERO,
                max: IVec3::ZERO,
            };
        }
        Self { min, max }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    pub fn depth(&self) -> i32 {
        self.max.z - self.min.z + 1
    }
}
