//! The playable puzzle: clue snapshot, working grid, and elapsed time.

use sudokumaster_core::{Grid, Position};

use crate::Difficulty;

/// Errors raised while assembling a [`Puzzle`] from stored parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PuzzleError {
    /// Initial and current grid have different boundaries.
    #[display("initial and current grid boundaries differ")]
    BoundaryMismatch,
    /// A fixed cell of the current grid disagrees with the initial clue.
    #[display("fixed cell at {pos} disagrees with the initial clue")]
    FixedCellMismatch {
        /// Position of the disagreeing cell.
        pos: Position,
    },
}

/// Outcome of a digit-input attempt.
///
/// Invalid input (a digit on a fixed cell, an out-of-range value, an
/// out-of-bounds position) is a rejected no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum InputOutcome {
    /// The cell was updated.
    Applied,
    /// The input was silently ignored.
    Rejected,
}

/// A Sudoku puzzle: immutable clue snapshot, mutable working grid, and the
/// session's elapsed play time.
///
/// The initial grid is the clue set present at creation; its nonzero cells
/// are fixed and never editable. The current grid is the working state,
/// mutated only through [`Puzzle::set_value`], which enforces the fixed-cell
/// rule. For every cell the fixed mask of both grids agrees, and fixed cells
/// carry the initial value; construction establishes this invariant and every
/// mutation preserves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    id: i64,
    difficulty: Difficulty,
    initial: Grid,
    current: Grid,
    elapsed_seconds: u64,
}

impl Puzzle {
    /// Creates a fresh puzzle from an initial clue grid.
    ///
    /// The working grid starts as a copy of the clues.
    #[must_use]
    pub fn new(id: i64, difficulty: Difficulty, initial: Grid) -> Self {
        let current = initial.clone();
        Self {
            id,
            difficulty,
            initial,
            current,
            elapsed_seconds: 0,
        }
    }

    /// Reassembles a puzzle from stored parts.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::BoundaryMismatch`] if the grids differ in
    /// size, or [`PuzzleError::FixedCellMismatch`] if the fixed masks or
    /// fixed values disagree.
    pub fn from_parts(
        id: i64,
        difficulty: Difficulty,
        initial: Grid,
        current: Grid,
        elapsed_seconds: u64,
    ) -> Result<Self, PuzzleError> {
        if initial.boundary() != current.boundary() {
            return Err(PuzzleError::BoundaryMismatch);
        }
        for pos in Position::all(initial.boundary()) {
            let clue = initial.cell(pos);
            let working = current.cell(pos);
            let mask_agrees = clue.is_fixed() == working.is_fixed();
            let value_agrees = !clue.is_fixed() || clue.value() == working.value();
            if !mask_agrees || !value_agrees {
                return Err(PuzzleError::FixedCellMismatch { pos });
            }
        }
        Ok(Self {
            id,
            difficulty,
            initial,
            current,
            elapsed_seconds,
        })
    }

    /// Returns the puzzle's stable identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the puzzle's difficulty tag.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the immutable clue snapshot.
    #[must_use]
    pub const fn initial(&self) -> &Grid {
        &self.initial
    }

    /// Returns the mutable working grid.
    #[must_use]
    pub const fn current(&self) -> &Grid {
        &self.current
    }

    /// Returns the elapsed play time in seconds.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Sets the elapsed play time, used when resuming a stored session.
    pub const fn set_elapsed_seconds(&mut self, seconds: u64) {
        self.elapsed_seconds = seconds;
    }

    /// Advances the elapsed-time counter by one second.
    pub const fn record_tick(&mut self) {
        self.elapsed_seconds += 1;
    }

    /// Attempts to set the value of a cell (`0` clears it).
    ///
    /// Fixed cells, out-of-bounds positions, and values above the boundary
    /// are rejected as silent no-ops.
    pub fn set_value(&mut self, pos: Position, value: u8) -> InputOutcome {
        if !self.current.contains(pos)
            || self.current.cell(pos).is_fixed()
            || value > self.current.boundary()
        {
            return InputOutcome::Rejected;
        }
        self.current.set_value(pos, value);
        InputOutcome::Applied
    }

    /// Moves input focus to the given position, or clears it with `None`.
    ///
    /// Out-of-bounds positions are ignored.
    pub fn set_focus(&mut self, pos: Option<Position>) {
        match pos {
            Some(pos) if !self.current.contains(pos) => {}
            _ => self.current.set_focus(pos),
        }
    }

    /// Returns the position of the focused cell, if any.
    #[must_use]
    pub fn focused(&self) -> Option<Position> {
        self.current.focused().map(|cell| cell.position())
    }

    /// Returns `true` if the working grid is both filled and valid.
    ///
    /// This is the sole authority for "solved": a filled but inconsistent
    /// grid is not complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current.is_valid() && self.current.is_filled()
    }
}
