//! Persistence collaborator interfaces.

use sudokumaster_game::Difficulty;

use crate::{SessionRecord, UserStatistics};

/// Error raised by session persistence.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PersistenceError {
    /// The underlying store failed to read or write.
    #[display("session store I/O failed: {message}")]
    Io {
        /// Human-readable failure description.
        message: String,
    },
    /// Stored data failed to decode.
    #[display("session store data is malformed: {message}")]
    Format {
        /// Human-readable failure description.
        message: String,
    },
    /// No record with the requested identity exists.
    #[display("session record not found")]
    NotFound,
}

/// Storage for session records.
///
/// The engine talks to the repository only through its background worker,
/// so implementations never see concurrent calls. Records with
/// [`UNASSIGNED_ID`] get a fresh identifier on save.
///
/// [`UNASSIGNED_ID`]: crate::record::UNASSIGNED_ID
pub trait SessionRepository: Send {
    /// Returns the most recently played unsolved record, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the store cannot be read.
    fn load_latest_unfinished(&mut self) -> Result<Option<SessionRecord>, PersistenceError>;

    /// Inserts or updates a record, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the store cannot be written.
    fn save(&mut self, record: &SessionRecord) -> Result<i64, PersistenceError>;

    /// Returns every stored record.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the store cannot be read.
    fn load_all(&mut self) -> Result<Vec<SessionRecord>, PersistenceError>;

    /// Recomputes the aggregated statistics from the stored records.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the store cannot be read.
    fn load_statistics(&mut self) -> Result<UserStatistics, PersistenceError> {
        Ok(UserStatistics::from_records(&self.load_all()?))
    }
}

/// Host-owned user preferences.
///
/// The engine consumes the default difficulty and maintains the
/// last-unfinished-session marker; the marker's getter is host-facing (for
/// a "continue game" affordance, say), while the resume path itself goes
/// through [`SessionRepository::load_latest_unfinished`], which stays
/// authoritative even when the preference store is out of date.
pub trait Preferences: Send {
    /// The difficulty used when a new game names none.
    fn default_difficulty(&self) -> Difficulty;

    /// Updates the default difficulty.
    fn set_default_difficulty(&mut self, difficulty: Difficulty);

    /// Identifier of the last unfinished session, if one is recorded.
    fn last_unfinished_session(&self) -> Option<i64>;

    /// Records or clears the last unfinished session identifier.
    fn set_last_unfinished_session(&mut self, id: Option<i64>);
}
