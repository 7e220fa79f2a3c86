//! Light colours and compass directions.
//!
//! Both are fixed enumerations with no runtime mutability. The clockwise
//! adjacency between directions is a constant table indexed by ordinal.

crate::signal_enum! {
    /// Colour shown by a single traffic light.
    pub enum LightColor {
        Green,
        Yellow,
        Red,
    }
}

crate::signal_enum! {
    /// Compass point controlling one light at the intersection.
    pub enum Direction {
        North,
        East,
        South,
        West,
    }
}

/// Clockwise neighbour of each direction, indexed by `Direction::ordinal`.
const ADJACENT: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];

/// Direction sharing a light phase with each direction, indexed by ordinal.
const OPPOSITE: [Direction; 4] = [
    Direction::South,
    Direction::West,
    Direction::North,
    Direction::East,
];

impl Direction {
    /// Number of directions at the intersection.
    pub const COUNT: usize = 4;

    /// The next direction clockwise.
    ///
    /// A red light only turns green while this neighbour shows yellow.
    ///
    /// ```
    /// use crossing::Direction;
    ///
    /// assert_eq!(Direction::North.adjacent(), Direction::East);
    /// assert_eq!(Direction::West.adjacent(), Direction::North);
    /// ```
    pub const fn adjacent(self) -> Direction {
        ADJACENT[self.ordinal()]
    }

    /// The direction across the intersection, which always shows the same colour.
    pub const fn opposite(self) -> Direction {
        OPPOSITE[self.ordinal()]
    }
}
