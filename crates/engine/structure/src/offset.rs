//! World-space anchor placement
//!
//! Positions a structure so its entrance-facing side sits a small gap in
//! front of the requester, centered on the requester's lateral axis.

use glam::IVec3;

use crate::facing::Facing;
use crate::model::BoundingBox;

/// Cells between the requester and the nearest structure wall
const GAP: i32 = 2;

/// Compute the structure anchor from a requester position and facing.
///
/// The returned anchor is the world position of the structure's relative
/// origin; the structure extends from it by its bounding box. A vertical
/// facing leaves the anchor at the requester position.
pub fn compute_anchor(requester: IVec3, facing: Facing, bbox: &BoundingBox) -> IVec3 {
    match facing {
        // Requester looks north (negative Z): entrance on the south wall,
        // structure extends away to the north.
        Facing::North => {
            requester + IVec3::new(-bbox.min.x - bbox.width() / 2, 0, -bbox.max.z - GAP)
        }
        Facing::South => {
            requester + IVec3::new(-bbox.min.x - bbox.width() / 2, 0, -bbox.min.z + GAP)
        }
        Facing::East => {
            requester + IVec3::new(-bbox.min.x + GAP, 0, -bbox.min.z - bbox.depth() / 2)
        }
        Facing::West => {
            requester + IVec3::new(-bbox.max.x - GAP, 0, -bbox.min.z - bbox.depth() / 2)
        }
        Facing::Up | Facing::Down => requester,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(min: [i32; 3], max: [i32; 3]) -> BoundingBox {
        BoundingBox {
            min: IVec3::from_array(min),
            max: IVec3::from_array(max),
        }
    }

    #[test]
    fn test_facing_north_places_structure_north() {
        let b = bbox([0, 0, 0], [8, 4, 8]);
        let anchor = compute_anchor(IVec3::new(100, 64, 100), Facing::North, &b);
        // width 9 -> lateral shift -(0 + 4); depth shift -(8 + 2)
        assert_eq!(anchor, IVec3::new(96, 64, 90));
    }

    #[test]
    fn test_facing_south_places_structure_south() {
        let b = bbox([0, 0, 0], [8, 4, 8]);
        let anchor = compute_anchor(IVec3::new(100, 64, 100), Facing::South, &b);
        assert_eq!(anchor, IVec3::new(96, 64, 102));
    }

    #[test]
    fn test_facing_east_places_structure_east() {
        let b = bbox([0, 0, 0], [8, 4, 8]);
        let anchor = compute_anchor(IVec3::new(100, 64, 100), Facing::East, &b);
        // gap ahead on X, centered on Z: -(0) + 2, -(0 + 4)
        assert_eq!(anchor, IVec3::new(102, 64, 96));
    }

    #[test]
    fn test_facing_west_places_structure_west() {
        let b = bbox([0, 0, 0], [8, 4, 8]);
        let anchor = compute_anchor(IVec3::new(100, 64, 100), Facing::West, &b);
        assert_eq!(anchor, IVec3::new(90, 64, 96));
    }

    #[test]
    fn test_negative_min_corner() {
        let b = bbox([-3, 0, -2], [3, 4, 4]);
        let anchor = compute_anchor(IVec3::new(0, 0, 0), Facing::North, &b);
        // width 7 -> -(-3 + 3) = 0; -(4 + 2) = -6
        assert_eq!(anchor, IVec3::new(0, 0, -6));
    }

    #[test]
    fn test_vertical_facing_no_offset() {
        let b = bbox([0, 0, 0], [8, 4, 8]);
        let requester = IVec3::new(7, 70, -3);
        assert_eq!(compute_anchor(requester, Facing::Up, &b), requester);
        assert_eq!(compute_anchor(requester, Facing::Down, &b), requester);
    }
}
