//! Aggregated play statistics.

use std::collections::BTreeMap;

use sudokumaster_game::Difficulty;

use crate::SessionRecord;

/// Read-only aggregates derived from the full set of session records.
///
/// Statistics are recomputed from the records on every read and never
/// mutated directly; the records are the single source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserStatistics {
    /// Number of sessions ever started.
    pub games_played: usize,
    /// Number of sessions finished with a solved puzzle.
    pub games_solved: usize,
    /// Mean solve time across solved sessions, in milliseconds.
    pub average_solve_time_millis: Option<u64>,
    /// Fastest solve per difficulty, in milliseconds.
    pub best_solve_time_millis: BTreeMap<Difficulty, u64>,
}

impl UserStatistics {
    /// Recomputes the aggregates from a record set.
    #[must_use]
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let games_played = records.len();

        let solve_times: Vec<(Difficulty, u64)> = records
            .iter()
            .filter_map(|record| {
                record
                    .solve_time_millis()
                    .map(|millis| (record.difficulty, millis))
            })
            .collect();
        let games_solved = solve_times.len();

        let average_solve_time_millis = u64::try_from(games_solved)
            .ok()
            .filter(|&count| count > 0)
            .map(|count| {
                let total: u64 = solve_times.iter().map(|&(_, millis)| millis).sum();
                total / count
            });

        let mut best_solve_time_millis = BTreeMap::new();
        for &(difficulty, millis) in &solve_times {
            best_solve_time_millis
                .entry(difficulty)
                .and_modify(|best: &mut u64| *best = (*best).min(millis))
                .or_insert(millis);
        }

        Self {
            games_played,
            games_solved,
            average_solve_time_millis,
            best_solve_time_millis,
        }
    }

    /// Returns the stored best solve time for a difficulty, in milliseconds.
    #[must_use]
    pub fn best_for(&self, difficulty: Difficulty) -> Option<u64> {
        self.best_solve_time_millis.get(&difficulty).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(difficulty: Difficulty, solved: Option<u64>) -> SessionRecord {
        SessionRecord {
            id: 1,
            difficulty,
            initial_grid: String::new(),
            current_grid: String::new(),
            start_time_millis: 0,
            end_time_millis: solved.map(|seconds| seconds * 1000),
            duration_seconds: solved.unwrap_or(10),
            score: 0,
            is_solved: solved.is_some(),
            date_played_millis: 0,
        }
    }

    #[test]
    fn test_empty_record_set() {
        let stats = UserStatistics::from_records(&[]);
        assert_eq!(stats, UserStatistics::default());
    }

    #[test]
    fn test_aggregates() {
        let records = [
            record(Difficulty::Easy, Some(120)),
            record(Difficulty::Easy, Some(90)),
            record(Difficulty::Hard, Some(300)),
            record(Difficulty::Medium, None),
        ];
        let stats = UserStatistics::from_records(&records);
        assert_eq!(stats.games_played, 4);
        assert_eq!(stats.games_solved, 3);
        assert_eq!(stats.average_solve_time_millis, Some(170_000));
        assert_eq!(stats.best_for(Difficulty::Easy), Some(90_000));
        assert_eq!(stats.best_for(Difficulty::Hard), Some(300_000));
        assert_eq!(stats.best_for(Difficulty::Medium), None);
    }
}
