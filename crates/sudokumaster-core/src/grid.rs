//! Board representation and wire codec.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::{Cell, Position};

/// Errors raised while constructing or decoding a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    /// The cell count does not describe a square board whose side length has
    /// an integer square root.
    #[display("grid of {len} cells has no valid boundary (need len = b² with integer √b)")]
    InvalidBoundary {
        /// Number of cells supplied.
        len: usize,
    },
    /// A character outside `'0'..='9'` appeared in a grid encoding.
    #[display("invalid digit character {ch:?} in grid encoding")]
    InvalidDigit {
        /// The offending character.
        ch: char,
    },
    /// A cell value exceeded the grid boundary.
    #[display("cell value {value} exceeds boundary {boundary}")]
    ValueOutOfRange {
        /// The offending value.
        value: u8,
        /// The grid's side length.
        boundary: u8,
    },
}

/// A `boundary × boundary` Sudoku board.
///
/// Cells are stored row-major in a single backing vector, giving `O(1)`
/// lookup by position and copy-free iteration over rows, columns, and
/// subgrids. The boundary is a runtime value: 9 for standard Sudoku, with
/// 4×4 and 16×16 variants representable as well. `sqrt(boundary)` must be
/// an integer (the subgrid side length), checked at construction.
///
/// The grid's [`Display`] implementation and [`Grid::from_digits`] form the
/// persisted wire format: one character per cell value `0..=9` in row-major
/// order (boundaries above 9 have no digit-string encoding).
///
/// # Examples
///
/// ```
/// use sudokumaster_core::{Grid, Position};
///
/// let grid: Grid = "000000000000000000000000000000000000\
///                   000000000000000000000000000000000000\
///                   000000004".parse().unwrap();
/// assert_eq!(grid.boundary(), 9);
/// assert_eq!(grid.cell(Position::new(8, 8)).value(), 4);
/// assert!(grid.cell(Position::new(8, 8)).is_fixed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    boundary: u8,
    box_size: u8,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty grid with the given boundary.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidBoundary`] if `sqrt(boundary)` is not an
    /// integer.
    pub fn empty(boundary: u8) -> Result<Self, GridError> {
        let values = vec![0; usize::from(boundary) * usize::from(boundary)];
        Self::from_values(&values, |_, _| false)
    }

    /// Creates a grid from a flat row-major slice of values plus a
    /// fixed-cell predicate.
    ///
    /// The boundary is derived from `values.len()`: the slice must hold
    /// `boundary²` values where `sqrt(boundary)` is itself an integer.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidBoundary`] if the length does not
    /// describe a valid board, or [`GridError::ValueOutOfRange`] if a value
    /// exceeds the boundary.
    pub fn from_values(
        values: &[u8],
        is_fixed: impl Fn(Position, u8) -> bool,
    ) -> Result<Self, GridError> {
        let len = values.len();
        let boundary = exact_sqrt(len).ok_or(GridError::InvalidBoundary { len })?;
        let box_size = exact_sqrt(boundary).ok_or(GridError::InvalidBoundary { len })?;
        let boundary_u8 = u8::try_from(boundary).map_err(|_| GridError::InvalidBoundary { len })?;
        let box_size_u8 = u8::try_from(box_size).map_err(|_| GridError::InvalidBoundary { len })?;

        let mut cells = Vec::with_capacity(len);
        for (pos, &value) in Position::all(boundary_u8).zip(values) {
            if value > boundary_u8 {
                return Err(GridError::ValueOutOfRange {
                    value,
                    boundary: boundary_u8,
                });
            }
            cells.push(Cell::new(pos, value, is_fixed(pos, value)));
        }

        Ok(Self {
            boundary: boundary_u8,
            box_size: box_size_u8,
            cells,
        })
    }

    /// Decodes a flat digit string, marking every nonzero cell fixed.
    ///
    /// This is the decoding used for a puzzle's *initial* grid, where the
    /// clues present at creation are exactly the nonzero cells.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDigit`] for non-digit characters and
    /// [`GridError::InvalidBoundary`] for lengths that do not describe a
    /// valid board.
    pub fn from_digits(encoded: &str) -> Result<Self, GridError> {
        let values = decode_digits(encoded)?;
        Self::from_values(&values, |_, value| value != 0)
    }

    /// Decodes a flat digit string as the working state over an initial
    /// grid, carrying fixedness over from `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidBoundary`] if the encoding's length does
    /// not match `initial`, or [`GridError::InvalidDigit`] for non-digit
    /// characters.
    pub fn from_digits_over(encoded: &str, initial: &Grid) -> Result<Self, GridError> {
        let values = decode_digits(encoded)?;
        if values.len() != initial.cells.len() {
            return Err(GridError::InvalidBoundary { len: values.len() });
        }
        Self::from_values(&values, |pos, _| initial.cell(pos).is_fixed())
    }

    /// Returns the board's side length.
    #[must_use]
    pub const fn boundary(&self) -> u8 {
        self.boundary
    }

    /// Returns the subgrid side length (`sqrt(boundary)`).
    #[must_use]
    pub const fn box_size(&self) -> u8 {
        self.box_size
    }

    /// Returns `true` if the position lies on this board.
    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x < self.boundary && pos.y < self.boundary
    }

    fn index(&self, pos: Position) -> usize {
        assert!(self.contains(pos), "position {pos} out of bounds");
        usize::from(pos.y) * usize::from(self.boundary) + usize::from(pos.x)
    }

    /// Returns the cell at the given position.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the board.
    #[must_use]
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    /// Sets the value of the cell at the given position.
    ///
    /// This is the raw mutation primitive; fixed-cell and range policy is
    /// enforced one level up, by the puzzle.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the board or the value exceeds
    /// the boundary.
    pub fn set_value(&mut self, pos: Position, value: u8) {
        assert!(value <= self.boundary, "value {value} out of range");
        let index = self.index(pos);
        self.cells[index].set_value(value);
    }

    /// Moves input focus to the given position, or clears it with `None`.
    ///
    /// At most one cell has focus at a time.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the board.
    pub fn set_focus(&mut self, pos: Option<Position>) {
        let index = pos.map(|pos| self.index(pos));
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.set_focus(Some(i) == index);
        }
    }

    /// Returns the focused cell, if any.
    #[must_use]
    pub fn focused(&self) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.has_focus())
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Returns all cells in row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside the board.
    pub fn row(&self, y: u8) -> impl Iterator<Item = &Cell> {
        assert!(y < self.boundary, "row {y} out of bounds");
        let boundary = usize::from(self.boundary);
        let start = usize::from(y) * boundary;
        self.cells[start..start + boundary].iter()
    }

    /// Returns all cells in column `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` is outside the board.
    pub fn column(&self, x: u8) -> impl Iterator<Item = &Cell> {
        assert!(x < self.boundary, "column {x} out of bounds");
        self.cells
            .iter()
            .skip(usize::from(x))
            .step_by(usize::from(self.boundary))
    }

    /// Returns all cells in the subgrid containing `pos`.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the board.
    pub fn subgrid(&self, pos: Position) -> impl Iterator<Item = &Cell> {
        assert!(self.contains(pos), "position {pos} out of bounds");
        let boundary = usize::from(self.boundary);
        let size = usize::from(self.box_size);
        let x0 = usize::from(pos.x) / size * size;
        let y0 = usize::from(pos.y) / size * size;
        (y0..y0 + size).flat_map(move |y| {
            let start = y * boundary + x0;
            self.cells[start..start + size].iter()
        })
    }

    /// Encodes the grid as the flat digit string wire format.
    ///
    /// Row-major, one character per cell value, `0` for empty. Fixedness and
    /// focus are not part of the encoding; fixedness is reconstructed from
    /// the initial grid on decode.
    #[must_use]
    pub fn digits(&self) -> String {
        self.cells
            .iter()
            .map(|cell| char::from(b'0' + cell.value()))
            .collect()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_digits(s)
    }
}

fn decode_digits(encoded: &str) -> Result<Vec<u8>, GridError> {
    encoded
        .chars()
        .map(|ch| {
            ch.to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or(GridError::InvalidDigit { ch })
        })
        .collect()
}

fn exact_sqrt(n: usize) -> Option<usize> {
    let mut root = 0;
    while root * root < n {
        root += 1;
    }
    (root * root == n).then_some(root)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_boundaries() {
        assert!(Grid::empty(4).is_ok());
        assert!(Grid::empty(9).is_ok());
        assert!(Grid::empty(16).is_ok());
        assert_eq!(
            Grid::empty(8),
            Err(GridError::InvalidBoundary { len: 64 })
        );
        assert_eq!(
            Grid::empty(5),
            Err(GridError::InvalidBoundary { len: 25 })
        );
    }

    #[test]
    fn test_from_values_rejects_non_square_length() {
        assert_eq!(
            Grid::from_values(&[0; 80], |_, _| false),
            Err(GridError::InvalidBoundary { len: 80 })
        );
    }

    #[test]
    fn test_from_values_rejects_out_of_range_value() {
        let mut values = [0u8; 16];
        values[3] = 5;
        assert_eq!(
            Grid::from_values(&values, |_, _| false),
            Err(GridError::ValueOutOfRange {
                value: 5,
                boundary: 4
            })
        );
    }

    #[test]
    fn test_lookup_and_iteration_order() {
        let values: Vec<u8> = (0..16).map(|i| u8::try_from(i % 5).unwrap()).collect();
        let grid = Grid::from_values(&values, |_, _| false).unwrap();

        assert_eq!(grid.cell(Position::new(1, 0)).value(), 1);
        assert_eq!(grid.cell(Position::new(0, 1)).value(), 4);

        let row: Vec<u8> = grid.row(1).map(Cell::value).collect();
        assert_eq!(row, vec![4, 0, 1, 2]);

        let column: Vec<u8> = grid.column(2).map(Cell::value).collect();
        assert_eq!(column, vec![2, 1, 0, 4]);

        // All four subgrid queries inside the top-left box hit the same cells.
        let expected: Vec<Position> = vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ];
        for pos in &expected {
            let seen: Vec<Position> = grid.subgrid(*pos).map(Cell::position).collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn test_focus_is_exclusive() {
        let mut grid = Grid::empty(9).unwrap();
        grid.set_focus(Some(Position::new(2, 3)));
        grid.set_focus(Some(Position::new(5, 5)));

        let focused: Vec<Position> = grid
            .cells()
            .filter(|cell| cell.has_focus())
            .map(Cell::position)
            .collect();
        assert_eq!(focused, vec![Position::new(5, 5)]);

        grid.set_focus(None);
        assert!(grid.focused().is_none());
    }

    #[test]
    fn test_digit_codec_round_trip_preserves_fixedness() {
        let encoded = "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        let initial = Grid::from_digits(encoded).unwrap();
        assert_eq!(initial.digits(), encoded);

        for cell in initial.cells() {
            assert_eq!(cell.is_fixed(), cell.value() != 0);
        }

        // A working grid decoded over the initial keeps the initial's mask.
        let mut working = encoded.to_string().into_bytes();
        working[2] = b'4';
        let current = Grid::from_digits_over(std::str::from_utf8(&working).unwrap(), &initial)
            .unwrap();
        assert_eq!(current.cell(Position::new(2, 0)).value(), 4);
        assert!(!current.cell(Position::new(2, 0)).is_fixed());
        assert!(current.cell(Position::new(0, 0)).is_fixed());
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(
            Grid::from_digits("1234x6789".repeat(9).as_str()),
            Err(GridError::InvalidDigit { ch: 'x' })
        );
        assert_eq!(
            Grid::from_digits("123"),
            Err(GridError::InvalidBoundary { len: 3 })
        );
    }

    proptest! {
        #[test]
        fn prop_codec_round_trips(values in proptest::collection::vec(0..=9u8, 81)) {
            let grid = Grid::from_values(&values, |_, value| value != 0).unwrap();
            let decoded = Grid::from_digits(&grid.digits()).unwrap();
            prop_assert_eq!(grid, decoded);
        }

        #[test]
        fn prop_current_decode_round_trips(
            initial in proptest::collection::vec(0..=9u8, 81),
            current in proptest::collection::vec(0..=9u8, 81),
        ) {
            let initial = Grid::from_values(&initial, |_, value| value != 0).unwrap();
            // Working state: fixed cells keep the clue, others take the sample.
            let merged: Vec<u8> = initial
                .cells()
                .zip(&current)
                .map(|(cell, &value)| if cell.is_fixed() { cell.value() } else { value })
                .collect();
            let working = Grid::from_values(&merged, |pos, _| initial.cell(pos).is_fixed())
                .unwrap();
            let decoded = Grid::from_digits_over(&working.digits(), &initial).unwrap();
            prop_assert_eq!(working, decoded);
        }
    }
}
