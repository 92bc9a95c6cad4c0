//! Score computation and new-record detection.

use crate::Difficulty;

/// Score awarded for an instantaneous solve, before the multiplier.
pub const BASE_SCORE: u64 = 10_000;

/// Points deducted from the base per elapsed second.
pub const TIME_PENALTY_PER_SECOND: u64 = 10;

/// Computes the score for a solve.
///
/// `max(0, base − elapsed × penalty) × multiplier`, clamped at zero before
/// the multiplier is applied, so the result is always a non-negative
/// integer. For fixed difficulty the score is non-increasing in elapsed
/// time; for equal time the multipliers order it `Easy < Medium < Hard`.
#[must_use]
pub fn compute_score(difficulty: Difficulty, elapsed_seconds: u64) -> u64 {
    let penalty = elapsed_seconds.saturating_mul(TIME_PENALTY_PER_SECOND);
    BASE_SCORE.saturating_sub(penalty) * u64::from(difficulty.score_multiplier())
}

/// Returns `true` if a solve time sets a new record for its difficulty.
///
/// A record requires a solve time in milliseconds strictly below the stored
/// best; an absent best always yields a record.
#[must_use]
pub fn is_new_record(solve_time_millis: u64, previous_best_millis: Option<u64>) -> bool {
    previous_best_millis.is_none_or(|best| solve_time_millis < best)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_easy_solve_in_120_seconds() {
        assert_eq!(compute_score(Difficulty::Easy, 120), 8800);
    }

    #[test]
    fn test_multiplier_applies_after_clamping() {
        // Past 1000 seconds the base is exhausted; no difficulty pays out.
        for difficulty in Difficulty::ALL {
            assert_eq!(compute_score(difficulty, 1000), 0);
            assert_eq!(compute_score(difficulty, 5000), 0);
        }
        assert_eq!(compute_score(Difficulty::Hard, 120), 26_400);
    }

    #[test]
    fn test_record_detection_is_strict() {
        assert!(is_new_record(90_000, None));
        assert!(is_new_record(90_000, Some(90_001)));
        assert!(!is_new_record(90_000, Some(90_000)));
        assert!(!is_new_record(90_000, Some(89_999)));
    }

    proptest! {
        #[test]
        fn prop_score_non_increasing_in_time(elapsed in 0..5000u64, step in 0..500u64) {
            for difficulty in Difficulty::ALL {
                prop_assert!(
                    compute_score(difficulty, elapsed + step)
                        <= compute_score(difficulty, elapsed)
                );
            }
        }

        #[test]
        fn prop_difficulties_strictly_ordered_before_clamp(elapsed in 0..999u64) {
            let easy = compute_score(Difficulty::Easy, elapsed);
            let medium = compute_score(Difficulty::Medium, elapsed);
            let hard = compute_score(Difficulty::Hard, elapsed);
            prop_assert!(easy < medium && medium < hard);
        }
    }
}
