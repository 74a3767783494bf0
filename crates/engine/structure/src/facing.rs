use serde::{Deserialize, Serialize};

/// Cardinal or vertical facing direction
///
/// The four horizontal directions double as the wall sides of a bounding
/// box. Clockwise order (seen from above) is South, West, North, East.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

/// Clockwise wall order used for rotation arithmetic
const CW_ORDER: [Facing; 4] = [Facing::South, Facing::West, Facing::North, Facing::East];

impl Facing {
    /// Parse a direction name, case-insensitive. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "north" => Some(Facing::North),
            "south" => Some(Facing::South),
            "east" => Some(Facing::East),
            "west" => Some(Facing::West),
            "up" => Some(Facing::Up),
            "down" => Some(Facing::Down),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Facing::North => "north",
            Facing::South => "south",
            Facing::East => "east",
            Facing::West => "west",
            Facing::Up => "up",
            Facing::Down => "down",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
            Facing::Up => Facing::Down,
            Facing::Down => Facing::Up,
        }
    }

    pub fn is_horizontal(self) -> bool {
        !matches!(self, Facing::Up | Facing::Down)
    }

    /// Index in clockwise wall order: South=0, West=1, North=2, East=3.
    /// Vertical directions have no wall index.
    pub fn cw_index(self) -> Option<u32> {
        CW_ORDER.iter().position(|f| *f == self).map(|i| i as u32)
    }

    /// Rotate a horizontal direction clockwise by `times` quarter turns.
    /// Vertical directions are returned unchanged.
    pub fn rotated_cw(self, times: u32) -> Self {
        match self.cw_index() {
            Some(idx) => CW_ORDER[((idx + times) % 4) as usize],
            None => self,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Orientation axis of pillar-like materials (logs, chains)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockAxis {
    X,
    Y,
    Z,
}

impl BlockAxis {
    /// Parse an axis name; anything that is not `x` or `z` maps to `Y`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "x" => BlockAxis::X,
            "z" => BlockAxis::Z,
            _ => BlockAxis::Y,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockAxis::X => "x",
            BlockAxis::Y => "y",
            BlockAxis::Z => "z",
        }
    }

    /// A quarter turn around Y swaps X and Z; Y is unchanged.
    /// An even number of turns is the identity.
    pub fn rotated_cw(self, times: u32) -> Self {
        if times % 2 == 0 {
            return self;
        }
        match self {
            BlockAxis::X => BlockAxis::Z,
            BlockAxis::Z => BlockAxis::X,
            BlockAxis::Y => BlockAxis::Y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Facing::parse("NORTH"), Some(Facing::North));
        assert_eq!(Facing::parse("south"), Some(Facing::South));
        assert_eq!(Facing::parse("Up"), Some(Facing::Up));
        assert_eq!(Facing::parse("northeast"), None);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Facing::North.opposite(), Facing::South);
        assert_eq!(Facing::East.opposite(), Facing::West);
        assert_eq!(Facing::Up.opposite(), Facing::Down);
    }

    #[test]
    fn test_cw_index_order() {
        assert_eq!(Facing::South.cw_index(), Some(0));
        assert_eq!(Facing::West.cw_index(), Some(1));
        assert_eq!(Facing::North.cw_index(), Some(2));
        assert_eq!(Facing::East.cw_index(), Some(3));
        assert_eq!(Facing::Up.cw_index(), None);
    }

    #[test]
    fn test_rotated_cw_cycle() {
        assert_eq!(Facing::South.rotated_cw(1), Facing::West);
        assert_eq!(Facing::West.rotated_cw(1), Facing::North);
        assert_eq!(Facing::North.rotated_cw(1), Facing::East);
        assert_eq!(Facing::East.rotated_cw(1), Facing::South);
        assert_eq!(Facing::South.rotated_cw(4), Facing::South);
        assert_eq!(Facing::Up.rotated_cw(3), Facing::Up);
    }

    #[test]
    fn test_axis_rotation() {
        assert_eq!(BlockAxis::X.rotated_cw(1), BlockAxis::Z);
        assert_eq!(BlockAxis::Z.rotated_cw(3), BlockAxis::X);
        assert_eq!(BlockAxis::Y.rotated_cw(1), BlockAxis::Y);
        assert_eq!(BlockAxis::X.rotated_cw(2), BlockAxis::X);
    }

    #[test]
    fn test_axis_parse_defaults_to_y() {
        assert_eq!(BlockAxis::parse("X"), BlockAxis::X);
        assert_eq!(BlockAxis::parse("z"), BlockAxis::Z);
        assert_eq!(BlockAxis::parse("w"), BlockAxis::Y);
    }
}
