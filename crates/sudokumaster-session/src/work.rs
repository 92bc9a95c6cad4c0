//! Background persistence and acquisition worker.
//!
//! All repository and source I/O runs on one dedicated thread that owns the
//! injected collaborator handles. Requests travel over a FIFO channel with a
//! per-request response channel, and callers poll a [`WorkHandle`] instead
//! of blocking. The FIFO ordering plus snapshot-at-enqueue is what makes the
//! persisted record always reflect the latest applied input.

use std::{sync::mpsc, thread};

use sudokumaster_game::{Difficulty, score};

use crate::{
    AcquisitionError, PersistenceError, PuzzleSource, SessionRecord, SessionRepository,
    record::now_millis,
};

/// A request executed on the worker thread.
#[derive(Debug, Clone)]
pub(crate) enum WorkRequest {
    /// Acquire a puzzle: resume the latest unfinished session when asked to
    /// and one exists, otherwise fetch and persist a fresh one.
    AcquirePuzzle {
        difficulty: Difficulty,
        resume: bool,
    },
    /// Persist an in-progress snapshot, best-effort.
    SaveProgress(SessionRecord),
    /// Persist a solved session and detect whether it sets a new record.
    CompleteSession(SessionRecord),
}

/// A response produced by background work.
#[derive(Debug, Clone)]
pub(crate) enum WorkResponse {
    /// An acquired (fresh or resumed) session, already persisted.
    PuzzleReady { record: SessionRecord },
    /// A progress snapshot was persisted.
    Saved { id: i64 },
    /// A solved session was persisted.
    Completed { id: i64, new_record: bool },
    /// The requested work failed.
    Failed(WorkError),
}

/// Errors crossing the worker boundary.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub(crate) enum WorkError {
    /// Puzzle acquisition failed.
    #[display("{_0}")]
    Acquisition(AcquisitionError),
    /// A repository call failed.
    #[display("{_0}")]
    Persistence(PersistenceError),
    /// The worker thread went away.
    #[display("background worker disconnected")]
    WorkerDisconnected,
}

struct WorkRequestEnvelope {
    request: WorkRequest,
    response_tx: mpsc::Sender<WorkResponse>,
}

/// A handle for polling background work completion.
pub(crate) struct WorkHandle {
    receiver: mpsc::Receiver<WorkResponse>,
}

impl std::fmt::Debug for WorkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkHandle").finish()
    }
}

impl WorkHandle {
    /// Attempts to poll for a completed response.
    pub(crate) fn poll(&mut self) -> Result<Option<WorkResponse>, WorkError> {
        use mpsc::TryRecvError;

        match self.receiver.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkError::WorkerDisconnected),
        }
    }
}

/// Owner of the worker thread and its request channel.
#[derive(Debug)]
pub(crate) struct Worker {
    sender: Option<mpsc::Sender<WorkRequestEnvelope>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawns the worker thread, handing it the collaborator handles.
    pub(crate) fn spawn(
        source: Box<dyn PuzzleSource>,
        repository: Box<dyn SessionRepository>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel::<WorkRequestEnvelope>();
        let thread = thread::spawn(move || {
            let mut source = source;
            let mut repository = repository;
            while let Ok(envelope) = receiver.recv() {
                let response = handle(&mut *source, &mut *repository, envelope.request);
                let _ = envelope.response_tx.send(response);
            }
        });
        Self {
            sender: Some(sender),
            thread: Some(thread),
        }
    }

    /// Enqueues a request and returns a handle for polling completion.
    pub(crate) fn enqueue(&self, request: WorkRequest) -> Result<WorkHandle, WorkError> {
        let sender = self.sender.as_ref().ok_or(WorkError::WorkerDisconnected)?;
        let (response_tx, response_rx) = mpsc::channel();
        sender
            .send(WorkRequestEnvelope {
                request,
                response_tx,
            })
            .map_err(|_| WorkError::WorkerDisconnected)?;
        Ok(WorkHandle {
            receiver: response_rx,
        })
    }

    /// Closes the request channel and waits for the worker to drain its
    /// queue and exit.
    pub(crate) fn shutdown(&mut self) {
        self.sender = None;
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::warn!("background worker panicked before shutdown");
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn handle(
    source: &mut dyn PuzzleSource,
    repository: &mut dyn SessionRepository,
    request: WorkRequest,
) -> WorkResponse {
    match request {
        WorkRequest::AcquirePuzzle { difficulty, resume } => {
            acquire(source, repository, difficulty, resume)
        }
        WorkRequest::SaveProgress(record) => match repository.save(&record) {
            Ok(id) => WorkResponse::Saved { id },
            Err(err) => {
                log::warn!("progress save failed: {err}");
                WorkResponse::Failed(WorkError::Persistence(err))
            }
        },
        WorkRequest::CompleteSession(record) => complete(repository, record),
    }
}

fn acquire(
    source: &mut dyn PuzzleSource,
    repository: &mut dyn SessionRepository,
    difficulty: Difficulty,
    resume: bool,
) -> WorkResponse {
    if resume {
        match repository.load_latest_unfinished() {
            Ok(Some(record)) => {
                log::debug!("resuming unfinished session {}", record.id);
                return WorkResponse::PuzzleReady { record };
            }
            Ok(None) => {}
            // A fresh puzzle still serves the user when resume is broken.
            Err(err) => log::warn!("failed to load the latest unfinished session: {err}"),
        }
    }

    let (grid, granted) = match source.fetch_new_puzzle(difficulty) {
        Ok(pair) => pair,
        Err(err) => return WorkResponse::Failed(WorkError::Acquisition(err)),
    };

    let mut record = SessionRecord::fresh(&grid, granted, now_millis());
    match repository.save(&record) {
        Ok(id) => {
            record.id = id;
            WorkResponse::PuzzleReady { record }
        }
        Err(err) => WorkResponse::Failed(WorkError::Persistence(err)),
    }
}

fn complete(repository: &mut dyn SessionRepository, record: SessionRecord) -> WorkResponse {
    // The stored bests must be read before this solve lands in the store.
    let new_record = match repository.load_statistics() {
        Ok(stats) => {
            let solve_time = record.duration_seconds.saturating_mul(1000);
            score::is_new_record(solve_time, stats.best_for(record.difficulty))
        }
        Err(err) => {
            log::warn!("failed to load statistics for record detection: {err}");
            false
        }
    };

    match repository.save(&record) {
        Ok(id) => WorkResponse::Completed { id, new_record },
        Err(err) => WorkResponse::Failed(WorkError::Persistence(err)),
    }
}
