//! Core data structures for the SudokuMaster engine.
//!
//! This crate provides the canonical board representation shared by the game,
//! generator, and session crates:
//!
//! - [`Position`]: a cell coordinate on the board
//! - [`Cell`]: a single square with its value, fixed flag, and focus flag
//! - [`Grid`]: a `boundary × boundary` board with constraint validation and a
//!   flat digit-string wire codec
//!
//! The grid is generic over its side length (`boundary`), so 4×4 and 16×16
//! variants are representable alongside the standard 9×9 board. The only
//! requirement is that `sqrt(boundary)` is an integer, which is checked at
//! construction.
//!
//! # Examples
//!
//! ```
//! use sudokumaster_core::{Grid, Position};
//!
//! let grid = Grid::empty(9).unwrap();
//! assert_eq!(grid.boundary(), 9);
//! assert!(grid.is_valid());
//! assert!(!grid.is_filled());
//! assert_eq!(grid.cell(Position::new(4, 4)).value(), 0);
//! ```

pub mod cell;
pub mod grid;
pub mod position;
mod validate;

pub use self::{
    cell::Cell,
    grid::{Grid, GridError},
    position::Position,
};
