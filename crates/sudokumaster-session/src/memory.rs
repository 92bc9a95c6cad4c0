//! In-memory repository and preferences, for tests and embedding.

use std::sync::{Arc, Mutex, PoisonError};

use sudokumaster_game::Difficulty;

use crate::{
    PersistenceError, Preferences, SessionRecord, SessionRepository, record::UNASSIGNED_ID,
};

/// A [`SessionRepository`] backed by a plain vector.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    records: Vec<SessionRecord>,
    next_id: i64,
}

impl InMemorySessionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with records.
    ///
    /// Ids already present are kept; fresh ids are assigned above them.
    #[must_use]
    pub fn with_records(records: Vec<SessionRecord>) -> Self {
        let next_id = records.iter().map(|record| record.id).max().unwrap_or(0);
        Self { records, next_id }
    }

    /// Returns a copy of the stored records.
    #[must_use]
    pub fn records(&self) -> Vec<SessionRecord> {
        self.records.clone()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn load_latest_unfinished(&mut self) -> Result<Option<SessionRecord>, PersistenceError> {
        Ok(self
            .records
            .iter()
            .filter(|record| !record.is_solved)
            .max_by_key(|record| record.date_played_millis)
            .cloned())
    }

    fn save(&mut self, record: &SessionRecord) -> Result<i64, PersistenceError> {
        let mut stored = record.clone();
        if stored.id == UNASSIGNED_ID {
            self.next_id += 1;
            stored.id = self.next_id;
        }
        let id = stored.id;
        match self.records.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = stored,
            None => self.records.push(stored),
        }
        Ok(id)
    }

    fn load_all(&mut self) -> Result<Vec<SessionRecord>, PersistenceError> {
        Ok(self.records.clone())
    }
}

/// A cloneable handle sharing one [`InMemorySessionRepository`] across
/// threads.
///
/// The engine's worker takes ownership of the repository it is given; this
/// handle lets an embedder (or a test) keep inspecting the same store.
#[derive(Debug, Clone, Default)]
pub struct SharedSessionRepository {
    inner: Arc<Mutex<InMemorySessionRepository>>,
}

impl SharedSessionRepository {
    /// Creates a handle to a fresh empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the underlying repository.
    pub fn with<T>(&self, f: impl FnOnce(&mut InMemorySessionRepository) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl SessionRepository for SharedSessionRepository {
    fn load_latest_unfinished(&mut self) -> Result<Option<SessionRecord>, PersistenceError> {
        self.with(SessionRepository::load_latest_unfinished)
    }

    fn save(&mut self, record: &SessionRecord) -> Result<i64, PersistenceError> {
        self.with(|repository| repository.save(record))
    }

    fn load_all(&mut self) -> Result<Vec<SessionRecord>, PersistenceError> {
        self.with(SessionRepository::load_all)
    }
}

/// In-memory [`Preferences`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryPreferences {
    default_difficulty: Difficulty,
    last_unfinished_session: Option<i64>,
}

impl InMemoryPreferences {
    /// Creates preferences with the default difficulty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for InMemoryPreferences {
    fn default_difficulty(&self) -> Difficulty {
        self.default_difficulty
    }

    fn set_default_difficulty(&mut self, difficulty: Difficulty) {
        self.default_difficulty = difficulty;
    }

    fn last_unfinished_session(&self) -> Option<i64> {
        self.last_unfinished_session
    }

    fn set_last_unfinished_session(&mut self, id: Option<i64>) {
        self.last_unfinished_session = id;
    }
}
