//! Session orchestration for the SudokuMaster engine.
//!
//! This crate turns a puzzle into a playable session:
//!
//! - [`SessionEngine`]: the Loading/Active/Complete/Error state machine that
//!   owns the puzzle, the timer, scoring, and persistence scheduling
//! - [`InputEvent`] and [`SessionView`]: the event surface and the render
//!   snapshot exposed to a host UI
//! - [`PuzzleSource`], [`SessionRepository`], [`Preferences`]: the
//!   collaborator interfaces the engine consumes, with in-memory
//!   implementations and a JSON flat-file store shipped in the box
//! - [`SessionRecord`] and [`UserStatistics`]: the persisted wire format
//!   and the aggregates derived from it
//!
//! All repository and source I/O happens on a background worker thread
//! owned by the engine; hosts drive the engine with events, 1 Hz ticks,
//! and regular [`SessionEngine::poll`] calls. The crate logs through the
//! [`log`] facade and installs no logger itself.

pub mod engine;
pub mod event;
pub mod json;
pub mod memory;
pub mod record;
pub mod repository;
pub mod source;
pub mod stats;
pub mod view;
mod work;

pub use self::{
    engine::{AUTOSAVE_TICK_INTERVAL, SessionEngine},
    event::{InputEvent, ScreenState},
    json::JsonFileStore,
    memory::{InMemoryPreferences, InMemorySessionRepository, SharedSessionRepository},
    record::{RecordError, SessionRecord},
    repository::{PersistenceError, Preferences, SessionRepository},
    source::{AcquisitionError, GeneratorSource, PuzzleSource},
    stats::UserStatistics,
    view::{SessionView, TileView},
};
