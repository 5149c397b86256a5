//! Grid coordinates and the four compass moves.
//!
//! The city is an `N × N` lattice of intersections.  `x` is the row (growing
//! southwards) and `y` is the column (growing eastwards), so:
//!
//! ```text
//! UP    = (-1,  0)      DOWN  = (+1, 0)
//! LEFT  = ( 0, -1)      RIGHT = ( 0, +1)
//! ```
//!
//! Coordinates are signed so that stepping off the edge of the grid yields a
//! representable (but out-of-range) intersection rather than an underflow.

use std::fmt;

// ── Direction ─────────────────────────────────────────────────────────────────

/// One unit move on the grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions in canonical expansion order.
    ///
    /// Route search and the idle-taxi tie set both iterate in this order,
    /// which makes "earliest found" well defined.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Row delta.
    #[inline]
    pub fn dx(self) -> i32 {
        match self {
            Direction::Up   => -1,
            Direction::Down => 1,
            Direction::Left | Direction::Right => 0,
        }
    }

    /// Column delta.
    #[inline]
    pub fn dy(self) -> i32 {
        match self {
            Direction::Left  => -1,
            Direction::Right => 1,
            Direction::Up | Direction::Down => 0,
        }
    }

    /// `true` for the north–south axis.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up    => "UP",
            Direction::Down  => "DOWN",
            Direction::Left  => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Intersection ──────────────────────────────────────────────────────────────

/// A grid cell, the atomic unit of position.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    pub x: i32,
    pub y: i32,
}

impl Intersection {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `true` iff `0 <= x, y < size`.
    #[inline]
    pub fn is_within(self, size: usize) -> bool {
        let n = size as i32;
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }

    /// The neighbour one unit away in `dir`.  May lie outside the grid.
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        Self { x: self.x + dir.dx(), y: self.y + dir.dy() }
    }

    /// Chebyshev (king-move) distance.
    #[inline]
    pub fn chebyshev(self, other: Intersection) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    /// The direction that moves `self` onto `other`, if they are adjacent.
    pub fn direction_to(self, other: Intersection) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&d| self.step(d) == other)
    }

    /// Row-major index into an `size × size` array.
    ///
    /// Callers must check [`is_within`](Self::is_within) first.
    #[inline]
    pub fn index(self, size: usize) -> usize {
        self.x as usize * size + self.y as usize
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
