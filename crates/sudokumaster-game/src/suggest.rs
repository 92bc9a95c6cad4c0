//! Greedy single-cell move suggestion.

use sudokumaster_core::{Cell, Grid, Position};

/// A proposed legal next move: set `position` to `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    /// The target cell.
    pub position: Position,
    /// The value to place (`1..=boundary`).
    pub value: u8,
}

/// Proposes at most one legal value for an empty cell.
///
/// The preferred cell (usually the focused one) is tried first if it is
/// empty and not fixed, scanning candidate values `1..=boundary` in
/// increasing order and returning the first that keeps the grid locally
/// valid. Failing that, every empty, non-fixed cell is tried the same way
/// in row-major order, so a cell with no fitting value is skipped rather
/// than ending the search.
///
/// This is a greedy, non-backtracking constraint check, not a solver: the
/// suggested value is consistent with the current row, column, and subgrid,
/// but carries no guarantee of eventual solvability. `None` means no
/// `(cell, value)` pair validates anywhere, which is a legitimate outcome
/// for an already-inconsistent partial grid.
#[must_use]
pub fn suggest_move(grid: &Grid, preferred: Option<Position>) -> Option<Suggestion> {
    if let Some(pos) = preferred
        && grid.contains(pos)
        && let Some(suggestion) = suggest_for_cell(grid, pos)
    {
        return Some(suggestion);
    }

    grid.cells()
        .filter(|cell| cell.is_empty() && !cell.is_fixed())
        .find_map(|cell| suggest_for_cell(grid, cell.position()))
}

fn suggest_for_cell(grid: &Grid, pos: Position) -> Option<Suggestion> {
    let cell = grid.cell(pos);
    if !cell.is_empty() || cell.is_fixed() {
        return None;
    }
    (1..=grid.boundary())
        .find(|&value| placement_is_valid(grid, pos, value))
        .map(|value| Suggestion {
            position: pos,
            value,
        })
}

/// Checks a hypothetical single-cell placement without mutating the grid.
fn placement_is_valid(grid: &Grid, pos: Position, value: u8) -> bool {
    let conflicts = |cell: &Cell| cell.position() != pos && cell.value() == value;
    !grid.row(pos.y).any(conflicts)
        && !grid.column(pos.x).any(conflicts)
        && !grid.subgrid(pos).any(conflicts)
}
