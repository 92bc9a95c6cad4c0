//! Persisted session snapshots.

use std::time::{SystemTime, UNIX_EPOCH};

use sudokumaster_core::{Grid, GridError};
use sudokumaster_game::{Difficulty, Puzzle, PuzzleError};

/// An id value meaning "not yet assigned by the repository".
pub const UNASSIGNED_ID: i64 = 0;

/// The persisted snapshot of a puzzle plus session bookkeeping.
///
/// Grids travel as flat digit strings (row-major, one character per cell),
/// the same wire format [`Grid`] renders through `Display`. The record is
/// the only shape that crosses the repository boundary, and the
/// `Puzzle ⇄ SessionRecord` round-trip is lossless.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionRecord {
    /// Stable identifier, assigned by the repository on first save.
    pub id: i64,
    /// Difficulty granted by the puzzle source.
    pub difficulty: Difficulty,
    /// Clue grid as a flat digit string.
    pub initial_grid: String,
    /// Working grid as a flat digit string.
    pub current_grid: String,
    /// Unix time in milliseconds when the session started.
    pub start_time_millis: u64,
    /// Unix time in milliseconds when the puzzle was solved, if it was.
    pub end_time_millis: Option<u64>,
    /// Elapsed play time in seconds.
    pub duration_seconds: u64,
    /// Final score; zero while unsolved.
    pub score: u64,
    /// Whether the puzzle was solved.
    pub is_solved: bool,
    /// Unix time in milliseconds of the last activity on this record.
    pub date_played_millis: u64,
}

/// Errors raised while rebuilding a [`Puzzle`] from a stored record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum RecordError {
    /// A stored grid string failed to decode.
    #[display("stored grid is malformed: {_0}")]
    Grid(GridError),
    /// The decoded grids break the puzzle invariant.
    #[display("stored grids are inconsistent: {_0}")]
    Puzzle(PuzzleError),
}

impl SessionRecord {
    /// Builds the record of a freshly acquired, unsaved session.
    #[must_use]
    pub fn fresh(initial: &Grid, difficulty: Difficulty, now_millis: u64) -> Self {
        let digits = initial.digits();
        Self {
            id: UNASSIGNED_ID,
            difficulty,
            initial_grid: digits.clone(),
            current_grid: digits,
            start_time_millis: now_millis,
            end_time_millis: None,
            duration_seconds: 0,
            score: 0,
            is_solved: false,
            date_played_millis: now_millis,
        }
    }

    /// Snapshots an in-progress puzzle for a progress save.
    #[must_use]
    pub fn in_progress(puzzle: &Puzzle, start_time_millis: u64, now_millis: u64) -> Self {
        Self {
            id: puzzle.id(),
            difficulty: puzzle.difficulty(),
            initial_grid: puzzle.initial().digits(),
            current_grid: puzzle.current().digits(),
            start_time_millis,
            end_time_millis: None,
            duration_seconds: puzzle.elapsed_seconds(),
            score: 0,
            is_solved: false,
            date_played_millis: now_millis,
        }
    }

    /// Snapshots a solved puzzle with its end time and final score.
    #[must_use]
    pub fn solved(puzzle: &Puzzle, start_time_millis: u64, end_time_millis: u64, score: u64) -> Self {
        Self {
            id: puzzle.id(),
            difficulty: puzzle.difficulty(),
            initial_grid: puzzle.initial().digits(),
            current_grid: puzzle.current().digits(),
            start_time_millis,
            end_time_millis: Some(end_time_millis),
            duration_seconds: puzzle.elapsed_seconds(),
            score,
            is_solved: true,
            date_played_millis: end_time_millis,
        }
    }

    /// Rebuilds the playable puzzle this record snapshots.
    ///
    /// Fixedness of the working grid is carried over from the clue grid, so
    /// the round-trip restores the exact editable mask.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when a stored grid string fails to decode or
    /// the decoded grids break the fixed-cell invariant.
    pub fn to_puzzle(&self) -> Result<Puzzle, RecordError> {
        let initial = Grid::from_digits(&self.initial_grid)?;
        let current = Grid::from_digits_over(&self.current_grid, &initial)?;
        let puzzle = Puzzle::from_parts(
            self.id,
            self.difficulty,
            initial,
            current,
            self.duration_seconds,
        )?;
        Ok(puzzle)
    }

    /// Returns the solve time in milliseconds, if solved.
    #[must_use]
    pub fn solve_time_millis(&self) -> Option<u64> {
        self.is_solved
            .then_some(self.duration_seconds.saturating_mul(1000))
    }
}

/// Current Unix time in milliseconds.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
