//! Row/column/subgrid uniqueness checks and completion detection.

use crate::{Cell, Grid, Position};

impl Grid {
    /// Returns `true` if no nonzero value repeats within row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside the board.
    #[must_use]
    pub fn is_row_valid(&self, y: u8) -> bool {
        !has_duplicate(self.row(y))
    }

    /// Returns `true` if no nonzero value repeats within column `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` is outside the board.
    #[must_use]
    pub fn is_column_valid(&self, x: u8) -> bool {
        !has_duplicate(self.column(x))
    }

    /// Returns `true` if no nonzero value repeats within the subgrid
    /// containing `pos`.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the board.
    #[must_use]
    pub fn is_subgrid_valid(&self, pos: Position) -> bool {
        !has_duplicate(self.subgrid(pos))
    }

    /// Returns `true` if every row, column, and subgrid is valid.
    ///
    /// Empty cells never conflict. The check short-circuits on the first
    /// violation found; the order of checking does not affect the result.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let size = self.box_size();
        (0..self.boundary()).all(|y| self.is_row_valid(y))
            && (0..self.boundary()).all(|x| self.is_column_valid(x))
            && (0..size).all(|by| {
                (0..size).all(|bx| self.is_subgrid_valid(Position::new(bx * size, by * size)))
            })
    }

    /// Returns `true` if every cell holds a nonzero value.
    ///
    /// A filled grid is not necessarily valid; completion requires both.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells().all(|cell| !cell.is_empty())
    }
}

fn has_duplicate<'a>(cells: impl Iterator<Item = &'a Cell>) -> bool {
    let mut seen = 0u32;
    for cell in cells {
        if cell.is_empty() {
            continue;
        }
        let bit = 1u32 << cell.value();
        if seen & bit != 0 {
            return true;
        }
        seen |= bit;
    }
    false
}
