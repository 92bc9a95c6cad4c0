//! Puzzle acquisition.

use sudokumaster_core::Grid;
use sudokumaster_game::Difficulty;
use sudokumaster_generator::PuzzleGenerator;

/// Error raised when a puzzle cannot be acquired.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AcquisitionError {
    /// The puzzle source could not supply a puzzle.
    #[display("puzzle source unavailable: {reason}")]
    SourceUnavailable {
        /// Human-readable failure description.
        reason: String,
    },
}

/// A supplier of fresh initial grids.
///
/// The granted difficulty may differ from the requested one, for example
/// when a remote service substitutes what it has available. Implementations
/// run on the engine's background worker thread.
pub trait PuzzleSource: Send {
    /// Produces a fresh initial grid for the requested difficulty.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] when no puzzle can be supplied.
    fn fetch_new_puzzle(
        &mut self,
        difficulty: Difficulty,
    ) -> Result<(Grid, Difficulty), AcquisitionError>;
}

/// The local, generator-backed puzzle source.
///
/// Always grants the requested difficulty and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorSource {
    generator: PuzzleGenerator,
}

impl GeneratorSource {
    /// Creates a source backed by a fresh generator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generator: PuzzleGenerator::new(),
        }
    }
}

impl PuzzleSource for GeneratorSource {
    fn fetch_new_puzzle(
        &mut self,
        difficulty: Difficulty,
    ) -> Result<(Grid, Difficulty), AcquisitionError> {
        let puzzle = self.generator.generate(difficulty);
        log::debug!(
            "generated a local {difficulty} puzzle from seed {}",
            puzzle.seed
        );
        Ok((puzzle.problem, difficulty))
    }
}
