//! Puzzle difficulty levels.

use std::str::FromStr;

/// Puzzle difficulty, ordered `Easy < Medium < Hard`.
///
/// The wire spelling (`EASY`/`MEDIUM`/`HARD`) is what persisted session
/// records carry; [`FromStr`] accepts it case-insensitively.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    /// Easiest level, score multiplier 1.
    #[display("EASY")]
    Easy,
    /// Middle level, score multiplier 2.
    #[default]
    #[display("MEDIUM")]
    Medium,
    /// Hardest level, score multiplier 3.
    #[display("HARD")]
    Hard,
}

impl Difficulty {
    /// All difficulty levels in ascending order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Returns the score multiplier for this difficulty.
    #[must_use]
    pub const fn score_multiplier(self) -> u32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// Returns the fraction of cells kept as clues by the local generator.
    #[must_use]
    pub const fn clue_ratio(self) -> f64 {
        match self {
            Self::Easy => 0.50,
            Self::Medium => 0.44,
            Self::Hard => 0.38,
        }
    }
}

/// Error returned when parsing an unknown difficulty name.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown difficulty {name:?}")]
pub struct ParseDifficultyError {
    /// The unmatched input.
    name: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EASY" => Ok(Self::Easy),
            "MEDIUM" => Ok(Self::Medium),
            "HARD" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError {
                name: s.to_string(),
            }),
        }
    }
}
