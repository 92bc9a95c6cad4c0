//! Game-level logic for the SudokuMaster engine.
//!
//! This crate builds the playable puzzle on top of the core grid model:
//!
//! - [`Difficulty`]: the ordered Easy/Medium/Hard tag with its scoring
//!   multiplier and clue-retention ratio
//! - [`Puzzle`]: an initial-clues snapshot plus mutable working grid and the
//!   session's elapsed time, with fixed-cell protection and the sole
//!   completion authority
//! - [`suggest_move`]: the greedy single-cell move suggestion search
//! - [`score`]: score computation and new-record detection

pub mod difficulty;
pub mod puzzle;
pub mod score;
pub mod suggest;

pub use self::{
    difficulty::Difficulty,
    puzzle::{InputOutcome, Puzzle, PuzzleError},
    suggest::{Suggestion, suggest_move},
};
