use bitflags::bitflags;
use glam::{IVec2, Vec2};

/// A cardinal movement direction on the tile grid.
///
/// The declaration order — Up, Left, Down, Right — is the canonical
/// decision order: turn candidates are scanned in this order, which makes
/// distance ties deterministic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

/// All directions, in decision order.
pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Whether `other` is at a right angle to `self`.
    pub fn is_perpendicular(self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn as_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        dir.as_ivec2()
    }
}

bitflags! {
    /// The set of legal exit directions at a tile, as stored in the map's
    /// turn table.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct DirectionSet: u8 {
        const UP = 1 << 0;
        const LEFT = 1 << 1;
        const DOWN = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl DirectionSet {
    pub fn has(self, dir: Direction) -> bool {
        self.contains(DirectionSet::from(dir))
    }

    /// Number of exits in the set.
    pub fn count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Iterates the contained directions in decision order.
    pub fn iter_directions(self) -> impl Iterator<Item = Direction> {
        DIRECTIONS.into_iter().filter(move |&d| self.has(d))
    }

    /// True when the set is exactly one collinear pair (a straight
    /// corridor), which is the one multi-exit shape that is not an
    /// intersection.
    pub fn is_straight_pair(self) -> bool {
        self == DirectionSet::UP | DirectionSet::DOWN || self == DirectionSet::LEFT | DirectionSet::RIGHT
    }
}

impl From<Direction> for DirectionSet {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => DirectionSet::UP,
            Direction::Left => DirectionSet::LEFT,
            Direction::Down => DirectionSet::DOWN,
            Direction::Right => DirectionSet::RIGHT,
        }
    }
}
