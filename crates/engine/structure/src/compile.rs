//! Placement compilation
//!
//! Flattens a [`Structure`] into an ordered write-list. Regions expand
//! first (in declaration order), then overrides; positions deduplicate
//! last-write-wins; finally the list is reordered into priority bands so
//! that support-dependent cells are written after the cells they attach to.

use glam::IVec3;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::material::MaterialCatalog;
use crate::model::{Region, Structure};
use crate::properties::{resolve_legacy_facing, resolve_state, BlockState};
use crate::Limits;

/// One compiled cell write: world position plus resolved state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub position: IVec3,
    pub state: BlockState,
}

/// Compile a structure into the flat write-list, offset by `anchor`.
///
/// Malformed or out-of-bounds fragments are skipped with a warning; the
/// compiler never fails the whole structure over one bad piece.
pub fn compile(
    anchor: IVec3,
    structure: &Structure,
    catalog: &dyn MaterialCatalog,
    limits: &Limits,
) -> Vec<Placement> {
    let mut raw = Vec::new();

    for region in &structure.regions {
        let Some(material) = catalog.get(&region.material) else {
            tracing::warn!(material = %region.material, "skipping region with unknown material");
            continue;
        };

        let state = match &region.properties {
            Some(props) if !props.is_empty() => resolve_state(material, props),
            _ => resolve_legacy_facing(material, region.facing.as_deref()),
        };

        collect_region(anchor, region, state, limits, &mut raw);
    }

    for block in &structure.overrides {
        let Some(material) = catalog.get(&block.material) else {
            tracing::warn!(material = %block.material, "skipping override with unknown material");
            continue;
        };
        let Some(pos) = block.position() else {
            tracing::warn!(material = %block.material, "skipping override with malformed position");
            continue;
        };
        if !within_limit(pos, limits.max_coordinate) {
            tracing::warn!(material = %block.material, %pos, "skipping out-of-bounds override");
            continue;
        }

        let state = match &block.properties {
            Some(props) => resolve_state(material, props),
            None => BlockState::of(material),
        };
        raw.push(Placement {
            position: anchor + pos,
            state,
        });
    }

    let mut placements = dedup(raw);
    // Stable sort keeps declaration order within each band.
    placements.sort_by_key(|p| p.state.class.band());
    placements
}

/// Deduplicate by position, order-preserving: the slot of the first write
/// to a position is kept, its value replaced by the last write. Overrides
/// come after regions in the raw list, so they win.
fn dedup(raw: Vec<Placement>) -> Vec<Placement> {
    let mut index: HashMap<IVec3, usize> = HashMap::with_capacity(raw.len());
    let mut ordered: Vec<Placement> = Vec::with_capacity(raw.len());
    for placement in raw {
        match index.entry(placement.position) {
            Entry::Occupied(slot) => ordered[*slot.get()] = placement,
            Entry::Vacant(slot) => {
                slot.insert(ordered.len());
                ordered.push(placement);
            }
        }
    }
    ordered
}

fn collect_region(
    anchor: IVec3,
    region: &Region,
    state: BlockState,
    limits: &Limits,
    output: &mut Vec<Placement>,
) {
    let Some((from, to)) = region.corners() else {
        tracing::warn!(material = %region.material, "skipping region with malformed corners");
        return;
    };
    if !within_limit(from, limits.max_coordinate) || !within_limit(to, limits.max_coordinate) {
        tracing::warn!(
            material = %region.material,
            max = limits.max_coordinate,
            "skipping region exceeding coordinate limit"
        );
        return;
    }
    let volume = region.volume().unwrap_or(0);
    if volume > limits.max_region_volume {
        tracing::warn!(
            material = %region.material,
            volume,
            max = limits.max_region_volume,
            "skipping region exceeding volume limit"
        );
        return;
    }

    let min = from.min(to);
    let max = from.max(to);
    let cutouts = region.excludes();

    for x in min.x..=max.x {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                let cell = IVec3::new(x, y, z);
                if region.hollow && !on_shell(cell, min, max) {
                    continue;
                }
                // Cutouts share the region's coordinate space.
                if cutouts.iter().any(|(a, b)| contains(cell, *a, *b)) {
                    continue;
                }
                output.push(Placement {
                    position: anchor + cell,
                    state: state.clone(),
                });
            }
        }
    }
}

/// A cell is on the shell when any coordinate sits on its axis min or max.
fn on_shell(cell: IVec3, min: IVec3, max: IVec3) -> bool {
    cell.x == min.x
        || cell.x == max.x
        || cell.y == min.y
        || cell.y == max.y
        || cell.z == min.z
        || cell.z == max.z
}

fn contains(cell: IVec3, a: IVec3, b: IVec3) -> bool {
    let min = a.min(b);
    let max = a.max(b);
    cell.cmpge(min).all() && cell.cmple(max).all()
}

fn within_limit(pos: IVec3, max: i32) -> bool {
    pos.abs().cmple(IVec3::splat(max)).all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::BuiltinCatalog;

    fn parse(json: &str) -> Structure {
        serde_json::from_str(json).unwrap()
    }

    fn compile_default(structure: &Structure) -> Vec<Placement> {
        compile(
            IVec3::ZERO,
            structure,
            &BuiltinCatalog::default(),
            &Limits::default(),
        )
    }

    #[test]
    fn test_solid_region_expands_full_cuboid() {
        let s = parse(r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [2,0,2]}]}"#);
        let placements = compile_default(&s);
        assert_eq!(placements.len(), 9);
        assert!(placements.iter().all(|p| p.state.material == "stone"));
        assert!(placements.iter().all(|p| p.position.y == 0));
    }

    #[test]
    fn test_hollow_flat_region_keeps_all_cells() {
        // Height 1: every cell sits on the top and bottom face, so the
        // shell rule keeps all 9 cells.
        let s = parse(
            r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [2,0,2], "hollow": true}]}"#,
        );
        assert_eq!(compile_default(&s).len(), 9);
    }

    #[test]
    fn test_hollow_cube_drops_interior() {
        let s = parse(
            r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [2,2,2], "hollow": true}]}"#,
        );
        let placements = compile_default(&s);
        assert_eq!(placements.len(), 26);
        assert!(!placements.iter().any(|p| p.position == IVec3::ONE));
    }

    #[test]
    fn test_exclude_cutout_in_region_space() {
        let s = parse(
            r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [2,0,2],
                "exclude": [[[1,0,1],[1,0,1]]]}]}"#,
        );
        let placements = compile_default(&s);
        assert_eq!(placements.len(), 8);
        assert!(!placements.iter().any(|p| p.position == IVec3::new(1, 0, 1)));
    }

    #[test]
    fn test_anchor_offset_applied() {
        let s = parse(r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [0,0,0]}]}"#);
        let placements = compile(
            IVec3::new(10, 64, -5),
            &s,
            &BuiltinCatalog::default(),
            &Limits::default(),
        );
        assert_eq!(placements[0].position, IVec3::new(10, 64, -5));
    }

    #[test]
    fn test_override_wins_over_region() {
        let s = parse(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [2,0,2]}],
                "overrides": [{"material": "glowstone", "pos": [1,0,1]}]
            }"#,
        );
        let placements = compile_default(&s);
        assert_eq!(placements.len(), 9);
        let at = placements
            .iter()
            .find(|p| p.position == IVec3::new(1, 0, 1))
            .unwrap();
        assert_eq!(at.state.material, "glowstone");
    }

    #[test]
    fn test_later_override_wins() {
        let s = parse(
            r#"{"overrides": [
                {"material": "stone", "pos": [0,0,0]},
                {"material": "glowstone", "pos": [0,0,0]}
            ]}"#,
        );
        let placements = compile_default(&s);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].state.material, "glowstone");
    }

    #[test]
    fn test_unknown_material_region_skipped() {
        let s = parse(
            r#"{
                "regions": [
                    {"material": "unobtainium", "from": [0,0,0], "to": [5,5,5]},
                    {"material": "stone", "from": [0,0,0], "to": [0,0,0]}
                ]
            }"#,
        );
        assert_eq!(compile_default(&s).len(), 1);
    }

    #[test]
    fn test_out_of_bounds_region_skipped() {
        let s = parse(r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [500,0,0]}]}"#);
        assert!(compile_default(&s).is_empty());
    }

    #[test]
    fn test_oversized_volume_skipped() {
        let s = parse(r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [99,99,99]}]}"#);
        // 100^3 = 1_000_000 > default 100_000
        assert!(compile_default(&s).is_empty());
    }

    #[test]
    fn test_priority_bands_order() {
        let s = parse(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [1,0,0]}],
                "overrides": [
                    {"material": "ladder", "pos": [0,1,0]},
                    {"material": "oak_door", "pos": [0,2,0]},
                    {"material": "air", "pos": [0,3,0]},
                    {"material": "white_carpet", "pos": [0,4,0]}
                ]
            }"#,
        );
        let compiled = compile_default(&s);
        let bands: Vec<u8> = compiled.iter().map(|p| p.state.class.band()).collect();
        assert_eq!(bands, vec![0, 0, 1, 2, 3, 3]);
        // Structural first, then clearing, multi-part, attached/decor;
        // attached before decor because declaration order is stable.
        let materials: Vec<&str> = compiled.iter().map(|p| p.state.material.as_str()).collect();
        assert_eq!(materials[2], "air");
        assert_eq!(materials[3], "oak_door");
        assert_eq!(materials[4], "ladder");
        assert_eq!(materials[5], "white_carpet");
    }

    #[test]
    fn test_empty_structure_compiles_empty() {
        assert!(compile_default(&Structure::default()).is_empty());
    }
}
