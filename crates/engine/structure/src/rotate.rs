//! Entrance detection and 90-degree structure rotation
//!
//! Rotation is always clockwise around Y in quarter turns, using the
//! normalize form `(x, y, z) -> (maxZ - z, y, x)` so rotated coordinates
//! stay in the structure's own positive-quadrant frame. The full bounding
//! box is recomputed before every individual quarter turn because the box
//! itself changes shape between turns.

use glam::IVec3;
use std::collections::HashMap;

use crate::facing::Facing;
use crate::material::MaterialCatalog;
use crate::model::{BoundingBox, Structure};
use crate::properties::PropertyKey;

/// Locate the wall an entrance-bearing structure opens through.
///
/// Every entrance-class override (doors, at their base half only) casts
/// one vote for its nearest wall, measured against the regions-only
/// bounding box. The wall with the most votes wins; a wide double door
/// casts two votes and outweighs a lone side door. Vote ties fall back to
/// the doors' average position. Returns `None` when the structure has no
/// entrance cells at all.
pub fn detect_entrance_wall(
    structure: &Structure,
    catalog: &dyn MaterialCatalog,
) -> Option<Facing> {
    let doors = collect_entrance_positions(structure, catalog);
    if doors.is_empty() {
        return None;
    }

    let bbox = BoundingBox::of_regions(structure);

    // Vote slots in fixed precedence: North, South, West, East. Per-door
    // distance ties resolve to the first matching wall in this order.
    const WALLS: [Facing; 4] = [Facing::North, Facing::South, Facing::West, Facing::East];
    let mut votes = [0u32; 4];
    for pos in &doors {
        let dist = [
            (pos.z - bbox.min.z).abs(),
            (pos.z - bbox.max.z).abs(),
            (pos.x - bbox.min.x).abs(),
            (pos.x - bbox.max.x).abs(),
        ];
        let nearest = *dist.iter().min().expect("four walls");
        let wall = dist.iter().position(|d| *d == nearest).expect("four walls");
        votes[wall] += 1;
    }

    let top = *votes.iter().max().expect("four walls");
    let candidates: Vec<usize> = (0..4).filter(|i| votes[*i] == top).collect();

    let winner = if candidates.len() == 1 {
        candidates[0]
    } else {
        // Vote tie: pick the wall nearest the doors' average position.
        let n = doors.len() as f64;
        let avg_x = doors.iter().map(|p| p.x as f64).sum::<f64>() / n;
        let avg_z = doors.iter().map(|p| p.z as f64).sum::<f64>() / n;
        let dist_to = |i: usize| match i {
            0 => (avg_z - bbox.min.z as f64).abs(),
            1 => (avg_z - bbox.max.z as f64).abs(),
            2 => (avg_x - bbox.min.x as f64).abs(),
            _ => (avg_x - bbox.max.x as f64).abs(),
        };
        let mut best = candidates[0];
        for &candidate in &candidates[1..] {
            if dist_to(candidate) < dist_to(best) {
                best = candidate;
            }
        }
        best
    };

    let result = WALLS[winner];
    tracing::debug!(
        doors = doors.len(),
        votes = ?votes,
        entrance = %result,
        "detected entrance wall"
    );
    Some(result)
}

/// Positions of entrance composites at their base cell only. The upper
/// half of a paired composite is skipped so a door counts once.
fn collect_entrance_positions(
    structure: &Structure,
    catalog: &dyn MaterialCatalog,
) -> Vec<IVec3> {
    structure
        .overrides
        .iter()
        .filter_map(|block| {
            let material = catalog.get(&block.material)?;
            if !material.entrance {
                return None;
            }
            if let Some(props) = &block.properties {
                let upper = props
                    .iter()
                    .any(|(k, v)| k.eq_ignore_ascii_case("half") && v.eq_ignore_ascii_case("upper"));
                if upper {
                    return None;
                }
            }
            block.position()
        })
        .collect()
}

/// Clockwise quarter turns needed so `entrance_wall` ends up as the wall
/// facing the requester (the wall opposite the requester's facing).
pub fn rotation_count(entrance_wall: Facing, requester_facing: Facing) -> u32 {
    let target = requester_facing.opposite();
    let from = entrance_wall.cw_index().unwrap_or(0);
    let to = target.cw_index().unwrap_or(0);
    (to + 4 - from) % 4
}

/// Rotate the whole structure clockwise by `times` quarter turns in place:
/// region corners, override positions, exclude cutouts, and directional
/// properties all move together. The rotated frame keeps coordinates in
/// the positive quadrant; four turns restore an origin-anchored structure
/// exactly.
pub fn rotate_structure(structure: &mut Structure, times: u32) {
    for _ in 0..times % 4 {
        rotate_cw90(structure);
    }
}

fn rotate_cw90(structure: &mut Structure) {
    // The full box, overrides included: rotated overrides must land in the
    // same frame as rotated regions.
    let max_z = BoundingBox::of(structure).max.z;
    let rotate = |c: IVec3| IVec3::new(max_z - c.z, c.y, c.x);

    for region in &mut structure.regions {
        if let Some((from, to)) = region.corners() {
            let from = rotate(from);
            let to = rotate(to);
            region.from = Some(vec![from.x, from.y, from.z]);
            region.to = Some(vec![to.x, to.y, to.z]);
        }

        match &mut region.properties {
            Some(props) if !props.is_empty() => rotate_raw_properties(props),
            _ => {
                if let Some(facing) = &region.facing {
                    region.facing = Some(rotate_facing_name(facing));
                }
            }
        }

        let cutouts = region.excludes();
        if !cutouts.is_empty() {
            let rotated: Vec<(IVec3, IVec3)> = cutouts
                .iter()
                .map(|(a, b)| (rotate(*a), rotate(*b)))
                .collect();
            region.set_excludes(&rotated);
        }
    }

    for block in &mut structure.overrides {
        if let Some(pos) = block.position() {
            let pos = rotate(pos);
            block.pos = Some(vec![pos.x, pos.y, pos.z]);
        }
        if let Some(props) = &mut block.properties {
            rotate_raw_properties(props);
        }
    }
}

/// Rotate directional values inside a raw property map. Only facing and
/// axis change under rotation; halves, hinges and the rest are invariant.
fn rotate_raw_properties(props: &mut HashMap<String, String>) {
    for (key, value) in props.iter_mut() {
        match PropertyKey::resolve(key) {
            Some(PropertyKey::Facing) => *value = rotate_facing_name(value),
            Some(PropertyKey::Axis) => *value = rotate_axis_name(value),
            _ => {}
        }
    }
}

/// South -> West -> North -> East -> South; vertical and unparseable
/// values pass through unchanged.
fn rotate_facing_name(value: &str) -> String {
    match Facing::parse(value) {
        Some(dir) if dir.is_horizontal() => dir.rotated_cw(1).name().to_string(),
        _ => value.to_string(),
    }
}

fn rotate_axis_name(value: &str) -> String {
    match value.to_ascii_lowercase().as_str() {
        "x" => "z".to_string(),
        "z" => "x".to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::BuiltinCatalog;

    fn parse(json: &str) -> Structure {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rotation_count_relations() {
        // Entrance already faces the requester: no turn needed.
        assert_eq!(rotation_count(Facing::South, Facing::North), 0);
        // Entrance on the far side: half turn.
        assert_eq!(rotation_count(Facing::South, Facing::South), 2);
        assert_eq!(rotation_count(Facing::West, Facing::East), 0);
        assert_eq!(rotation_count(Facing::North, Facing::West), 3);
    }

    #[test]
    fn test_detect_entrance_south_wall() {
        let s = parse(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [8,4,8]}],
                "overrides": [
                    {"material": "oak_door", "pos": [3,1,8], "properties": {"half": "lower"}},
                    {"material": "oak_door", "pos": [3,2,8], "properties": {"half": "upper"}}
                ]
            }"#,
        );
        let wall = detect_entrance_wall(&s, &BuiltinCatalog::default());
        assert_eq!(wall, Some(Facing::South));
        assert_eq!(rotation_count(Facing::South, Facing::South), 2);
    }

    #[test]
    fn test_detect_entrance_votes_beat_position() {
        // Two doors on the south wall outvote one on the east wall even
        // though the average position drifts east.
        let s = parse(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [8,4,8]}],
                "overrides": [
                    {"material": "oak_door", "pos": [3,1,8]},
                    {"material": "oak_door", "pos": [4,1,8]},
                    {"material": "oak_door", "pos": [8,1,4]}
                ]
            }"#,
        );
        let wall = detect_entrance_wall(&s, &BuiltinCatalog::default());
        assert_eq!(wall, Some(Facing::South));
    }

    #[test]
    fn test_detect_entrance_no_doors() {
        let s = parse(r#"{"regions": [{"material": "stone", "from": [0,0,0], "to": [4,4,4]}]}"#);
        assert_eq!(detect_entrance_wall(&s, &BuiltinCatalog::default()), None);
    }

    #[test]
    fn test_detect_entrance_beds_do_not_vote() {
        let s = parse(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [8,4,8]}],
                "overrides": [{"material": "red_bed", "pos": [4,1,0]}]
            }"#,
        );
        assert_eq!(detect_entrance_wall(&s, &BuiltinCatalog::default()), None);
    }

    #[test]
    fn test_corner_door_tie_uses_wall_precedence() {
        // A door exactly on the south-east corner is equidistant from the
        // south and east walls; the fixed precedence votes south first.
        let s = parse(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [8,4,8]}],
                "overrides": [{"material": "oak_door", "pos": [8,1,8]}]
            }"#,
        );
        let wall = detect_entrance_wall(&s, &BuiltinCatalog::default());
        assert_eq!(wall, Some(Facing::South));
    }

    #[test]
    fn test_single_rotation_moves_coordinates() {
        let mut s = parse(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [4,2,8]}],
                "overrides": [{"material": "torch", "pos": [1,1,2]}]
            }"#,
        );
        rotate_structure(&mut s, 1);
        // (x,y,z) -> (maxZ - z, y, x) with maxZ = 8
        assert_eq!(s.regions[0].corners().unwrap().0, IVec3::new(8, 0, 0));
        assert_eq!(s.regions[0].corners().unwrap().1, IVec3::new(0, 2, 4));
        assert_eq!(s.overrides[0].position().unwrap(), IVec3::new(6, 1, 1));
    }

    #[test]
    fn test_four_rotations_identity() {
        let original = parse(
            r#"{
                "regions": [{
                    "material": "oak_log",
                    "from": [0,0,0], "to": [6,3,9],
                    "properties": {"axis": "x"},
                    "exclude": [[[1,0,1],[2,1,2]]]
                }],
                "overrides": [{
                    "material": "oak_stairs",
                    "pos": [2,1,3],
                    "properties": {"facing": "south", "half": "bottom"}
                }]
            }"#,
        );
        let mut rotated = original.clone();
        rotate_structure(&mut rotated, 4);

        assert_eq!(
            rotated.regions[0].corners(),
            original.regions[0].corners()
        );
        assert_eq!(rotated.regions[0].excludes(), original.regions[0].excludes());
        assert_eq!(
            rotated.regions[0].properties.as_ref().unwrap()["axis"],
            "x"
        );
        assert_eq!(
            rotated.overrides[0].position(),
            original.overrides[0].position()
        );
        assert_eq!(
            rotated.overrides[0].properties.as_ref().unwrap()["facing"],
            "south"
        );
    }

    #[test]
    fn test_split_rotations_compose_to_identity() {
        let original = parse(
            r#"{
                "regions": [{"material": "stone", "from": [0,0,0], "to": [5,4,7]}],
                "overrides": [{"material": "oak_door", "pos": [3,1,7], "properties": {"facing": "south"}}]
            }"#,
        );
        for (a, b) in [(1u32, 3u32), (2, 2), (3, 1)] {
            let mut s = original.clone();
            rotate_structure(&mut s, a);
            rotate_structure(&mut s, b);
            assert_eq!(s.regions[0].corners(), original.regions[0].corners());
            assert_eq!(s.overrides[0].position(), original.overrides[0].position());
            assert_eq!(
                s.overrides[0].properties.as_ref().unwrap()["facing"],
                "south"
            );
        }
    }

    #[test]
    fn test_facing_property_cycles() {
        let mut s = parse(
            r#"{"overrides": [{"material": "oak_stairs", "pos": [0,0,0], "properties": {"facing": "south"}}]}"#,
        );
        rotate_structure(&mut s, 1);
        assert_eq!(s.overrides[0].properties.as_ref().unwrap()["facing"], "west");
        rotate_structure(&mut s, 1);
        assert_eq!(s.overrides[0].properties.as_ref().unwrap()["facing"], "north");
    }

    #[test]
    fn test_axis_property_swaps_on_odd_turns() {
        let mut s = parse(
            r#"{"regions": [{"material": "oak_log", "from": [0,0,0], "to": [3,0,3], "properties": {"axis": "x"}}]}"#,
        );
        rotate_structure(&mut s, 1);
        assert_eq!(s.regions[0].properties.as_ref().unwrap()["axis"], "z");
        rotate_structure(&mut s, 2);
        assert_eq!(s.regions[0].properties.as_ref().unwrap()["axis"], "x");
    }

    #[test]
    fn test_legacy_facing_field_rotates() {
        let mut s = parse(
            r#"{"regions": [{"material": "oak_stairs", "from": [0,0,0], "to": [1,0,1], "facing": "east"}]}"#,
        );
        rotate_structure(&mut s, 1);
        assert_eq!(s.regions[0].facing.as_deref(), Some("south"));
    }

    #[test]
    fn test_vertical_facing_unchanged_by_rotation() {
        let mut s = parse(
            r#"{"overrides": [{"material": "oak_stairs", "pos": [0,0,0], "properties": {"facing": "up"}}]}"#,
        );
        rotate_structure(&mut s, 1);
        assert_eq!(s.overrides[0].properties.as_ref().unwrap()["facing"], "up");
    }
}
