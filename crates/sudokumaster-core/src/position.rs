//! Board position representation.

use std::fmt::{self, Display};

/// A cell coordinate on the board.
///
/// `x` is the column and `y` is the row, both zero-based and bounded by the
/// owning grid's boundary. A position is the identity key of a cell: a grid
/// holds exactly one cell per `(x, y)` pair.
///
/// # Examples
///
/// ```
/// use sudokumaster_core::Position;
///
/// let pos = Position::new(3, 7);
/// assert_eq!(pos.x, 3);
/// assert_eq!(pos.y, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Column index (0-based).
    pub x: u8,
    /// Row index (0-based).
    pub y: u8,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Returns an iterator over all positions of a `boundary × boundary`
    /// board in row-major order.
    pub fn all(boundary: u8) -> impl Iterator<Item = Self> {
        (0..boundary).flat_map(move |y| (0..boundary).map(move |x| Self::new(x, y)))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
