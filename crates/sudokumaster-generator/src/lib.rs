//! Local Sudoku puzzle generation.
//!
//! [`PuzzleGenerator`] produces standard 9×9 puzzles without any external
//! puzzle service: it backtracks a fully solved grid with a shuffled
//! candidate order, then blanks cells until only the clue budget for the
//! requested [`Difficulty`] remains. Every puzzle carries the seed that
//! produced it, so any generated puzzle can be reproduced exactly with
//! [`PuzzleGenerator::generate_with_seed`].

use rand::{Rng, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64Mcg;
use sudokumaster_core::Grid;
use sudokumaster_game::Difficulty;

/// Side length of the generated grids.
const BOUNDARY: usize = 9;
/// Side length of one subgrid.
const BOX_SIZE: usize = 3;
/// Total number of cells in a generated grid.
const CELL_COUNT: usize = BOUNDARY * BOUNDARY;

/// A generated puzzle together with its solution and the seed that made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    /// The puzzle grid. Clue cells are filled and fixed, the rest are empty.
    pub problem: Grid,
    /// The fully solved grid the problem was carved from.
    pub solution: Grid,
    /// RNG seed that reproduces this puzzle.
    pub seed: u64,
}

/// Generator for random 9×9 Sudoku puzzles.
///
/// # Examples
///
/// ```
/// use sudokumaster_game::Difficulty;
/// use sudokumaster_generator::PuzzleGenerator;
///
/// let generator = PuzzleGenerator::new();
/// let puzzle = generator.generate_with_seed(Difficulty::Easy, 42);
///
/// assert!(puzzle.solution.is_filled());
/// assert!(puzzle.solution.is_valid());
///
/// let clues = puzzle.problem.cells().filter(|cell| !cell.is_empty()).count();
/// assert_eq!(clues, 41);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PuzzleGenerator {
    _private: (),
}

impl PuzzleGenerator {
    /// Creates a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generates a puzzle from a fresh entropy seed.
    #[must_use]
    pub fn generate(&self, difficulty: Difficulty) -> GeneratedPuzzle {
        self.generate_with_seed(difficulty, rand::random())
    }

    /// Generates the puzzle identified by `seed`.
    ///
    /// The same `(difficulty, seed)` pair always yields the same puzzle.
    #[must_use]
    pub fn generate_with_seed(&self, difficulty: Difficulty, seed: u64) -> GeneratedPuzzle {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);

        let mut values = [0_u8; CELL_COUNT];
        let filled = fill_from(&mut values, 0, &mut rng);
        debug_assert!(filled, "an empty grid always admits a solution");
        let solution = grid_from_values(&values);

        let removals = CELL_COUNT - clue_count(difficulty);
        let problem = remove_cells(&solution, removals, &mut rng);

        GeneratedPuzzle {
            problem,
            solution,
            seed,
        }
    }
}

/// Returns how many clues a puzzle of the given difficulty retains.
#[must_use]
pub fn clue_count(difficulty: Difficulty) -> usize {
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clue ratios keep the product within 0..=81"
    )]
    let clues = (CELL_COUNT as f64 * difficulty.clue_ratio()).round() as usize;
    clues
}

/// Blanks `count` filled cells of `full`, chosen uniformly at random.
///
/// The remaining filled cells come back marked fixed, so the result is ready
/// to serve as the initial grid of a puzzle. Callers asking to remove more
/// cells than are filled get a fully empty grid.
#[must_use]
#[expect(
    clippy::missing_panics_doc,
    reason = "rebuilding from an existing grid cannot fail"
)]
pub fn remove_cells<R: Rng + ?Sized>(full: &Grid, count: usize, rng: &mut R) -> Grid {
    let mut values: Vec<u8> = full.cells().map(sudokumaster_core::Cell::value).collect();

    let mut filled: Vec<usize> = (0..values.len()).filter(|&i| values[i] != 0).collect();
    filled.shuffle(rng);
    for &index in filled.iter().take(count) {
        values[index] = 0;
    }

    Grid::from_values(&values, |_, value| value != 0)
        .expect("cell count of a valid grid stays square")
}

fn grid_from_values(values: &[u8; CELL_COUNT]) -> Grid {
    Grid::from_values(values, |_, value| value != 0).expect("81 in-range values form a 9x9 grid")
}

/// Fills `values[index..]` by backtracking with a shuffled candidate order.
fn fill_from(values: &mut [u8; CELL_COUNT], index: usize, rng: &mut Pcg64Mcg) -> bool {
    if index == CELL_COUNT {
        return true;
    }

    let mut candidates: [u8; BOUNDARY] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    candidates.shuffle(rng);

    for &value in &candidates {
        if conflicts(values, index, value) {
            continue;
        }
        values[index] = value;
        if fill_from(values, index + 1, rng) {
            return true;
        }
    }

    values[index] = 0;
    false
}

/// Reports whether placing `value` at flat `index` repeats the value in the
/// cell's row, column, or subgrid.
fn conflicts(values: &[u8; CELL_COUNT], index: usize, value: u8) -> bool {
    let (x, y) = (index % BOUNDARY, index / BOUNDARY);

    for i in 0..BOUNDARY {
        if values[y * BOUNDARY + i] == value || values[i * BOUNDARY + x] == value {
            return true;
        }
    }

    let (box_x, box_y) = (x / BOX_SIZE * BOX_SIZE, y / BOX_SIZE * BOX_SIZE);
    for dy in 0..BOX_SIZE {
        for dx in 0..BOX_SIZE {
            if values[(box_y + dy) * BOUNDARY + box_x + dx] == value {
                return true;
            }
        }
    }

    false
}
