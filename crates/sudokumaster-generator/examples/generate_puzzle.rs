//! Example demonstrating local puzzle generation.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example generate_puzzle
//! ```
//!
//! Pick a difficulty (easy, medium, or hard):
//!
//! ```sh
//! cargo run --example generate_puzzle -- --difficulty hard
//! ```
//!
//! Reproduce a previously generated puzzle from its seed:
//!
//! ```sh
//! cargo run --example generate_puzzle -- --seed 42
//! ```

use clap::Parser;
use sudokumaster_core::Grid;
use sudokumaster_game::Difficulty;
use sudokumaster_generator::PuzzleGenerator;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Difficulty of the generated puzzle.
    #[arg(short, long, value_name = "LEVEL", default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// RNG seed. A fresh entropy seed is drawn when omitted.
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();
    let generator = PuzzleGenerator::new();

    let puzzle = match args.seed {
        Some(seed) => generator.generate_with_seed(args.difficulty, seed),
        None => generator.generate(args.difficulty),
    };

    println!("Difficulty:");
    println!("  {}", args.difficulty);
    println!();
    println!("Seed:");
    println!("  {}", puzzle.seed);
    println!();
    println!("Problem:");
    println!("  {}", puzzle.problem);
    println!();
    print_board(&puzzle.problem);
    println!();
    println!("Solution:");
    println!("  {}", puzzle.solution);
}

fn print_board(grid: &Grid) {
    for y in 0..grid.boundary() {
        let row = grid
            .row(y)
            .map(|cell| {
                if cell.is_empty() {
                    ".".to_string()
                } else {
                    cell.value().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {row}");
    }
}
