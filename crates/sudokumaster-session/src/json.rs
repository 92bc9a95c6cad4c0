//! Flat-file JSON persistence.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{PersistenceError, SessionRecord, SessionRepository, record::UNASSIGNED_ID};

/// A [`SessionRepository`] persisting records to one JSON file.
///
/// The whole record set is kept in memory and rewritten on every save;
/// session history stays small enough that this is the simplest store that
/// round-trips exactly. A missing file reads as an empty repository.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Vec<SessionRecord>,
    next_id: i64,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading any existing records.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] when the file exists but cannot be
    /// read, or [`PersistenceError::Format`] when its contents fail to
    /// decode.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| PersistenceError::Format {
                    message: err.to_string(),
                })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(io_error(&err)),
        };
        let next_id = records
            .iter()
            .map(|record: &SessionRecord| record.id)
            .max()
            .unwrap_or(0);
        Ok(Self {
            path,
            records,
            next_id,
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| io_error(&err))?;
        }
        let contents =
            serde_json::to_string_pretty(&self.records).map_err(|err| PersistenceError::Format {
                message: err.to_string(),
            })?;
        fs::write(&self.path, contents).map_err(|err| io_error(&err))
    }
}

fn io_error(err: &io::Error) -> PersistenceError {
    PersistenceError::Io {
        message: err.to_string(),
    }
}

impl SessionRepository for JsonFileStore {
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
        self.persist()?;
        Ok(id)
    }

    fn load_all(&mut self) -> Result<Vec<SessionRecord>, PersistenceError> {
        Ok(self.records.clone())
    }
}
