//! The session state machine.

use sudokumaster_core::Position;
use sudokumaster_game::{Difficulty, Puzzle, score, suggest_move};

use crate::{
    InputEvent, PersistenceError, Preferences, PuzzleSource, ScreenState, SessionRecord,
    SessionRepository, SessionView,
    record::now_millis,
    work::{WorkError, WorkHandle, WorkRequest, WorkResponse, Worker},
};

/// Number of timer ticks between periodic progress saves.
pub const AUTOSAVE_TICK_INTERVAL: u32 = 10;

/// Orchestrates one Sudoku session: puzzle lifecycle, timer, persistence,
/// and scoring.
///
/// The engine is the sole mutator of the puzzle. The host feeds it
/// [`InputEvent`]s and 1 Hz [`tick`]s, and calls [`poll`] regularly (for
/// example once per frame) to apply finished background work. Repository
/// and source I/O runs on a worker thread owned by the engine, so events
/// and ticks never block on persistence.
///
/// A fresh engine starts in [`ScreenState::Loading`], resuming the latest
/// unfinished session when one exists and acquiring a fresh puzzle at the
/// preferred difficulty otherwise.
///
/// [`tick`]: SessionEngine::tick
/// [`poll`]: SessionEngine::poll
pub struct SessionEngine {
    screen: ScreenState,
    puzzle: Option<Puzzle>,
    start_time_millis: u64,
    paused: bool,
    dirty: bool,
    ticks_since_save: u32,
    new_record: bool,
    last_error: Option<String>,
    preferences: Box<dyn Preferences>,
    worker: Worker,
    in_flight: Vec<InFlightWork>,
}

/// A polled work handle tagged with how its failure is handled.
///
/// Criticality is fixed at enqueue time: the screen state may have moved on
/// by the time the response lands, so it cannot classify the failure.
struct InFlightWork {
    handle: WorkHandle,
    critical: bool,
}

impl SessionEngine {
    /// Spawns the background worker and starts acquiring a session.
    #[must_use]
    pub fn new(
        source: Box<dyn PuzzleSource>,
        repository: Box<dyn SessionRepository>,
        preferences: Box<dyn Preferences>,
    ) -> Self {
        let worker = Worker::spawn(source, repository);
        let mut engine = Self {
            screen: ScreenState::Loading,
            puzzle: None,
            start_time_millis: 0,
            paused: false,
            dirty: false,
            ticks_since_save: 0,
            new_record: false,
            last_error: None,
            preferences,
            worker,
            in_flight: Vec::new(),
        };
        let difficulty = engine.preferences.default_difficulty();
        engine.begin_loading(difficulty, true);
        engine
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn screen_state(&self) -> ScreenState {
        self.screen
    }

    /// Elapsed play time in seconds; 0 while no puzzle is loaded.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.puzzle.as_ref().map_or(0, Puzzle::elapsed_seconds)
    }

    /// Whether the just-completed solve set a new record.
    #[must_use]
    pub const fn is_new_record(&self) -> bool {
        self.new_record
    }

    /// Whether the timer is suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// The failure that put the session into [`ScreenState::Error`], if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The loaded puzzle, if one is on the board.
    #[must_use]
    pub const fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref()
    }

    /// Builds the render snapshot of the whole session.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::build(self.screen, self.puzzle.as_ref(), self.new_record)
    }

    /// Handles one input event.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Digit(value) => self.on_digit(value),
            InputEvent::TileFocused { x, y } => self.on_tile_focused(x, y),
            InputEvent::NewGame(difficulty) => self.on_new_game(difficulty),
            InputEvent::SuggestMove => self.on_suggest_move(),
            InputEvent::Pause => self.on_pause(),
            InputEvent::Resume => self.on_resume(),
        }
    }

    /// Advances the timer by one second.
    ///
    /// Driven by the host at 1 Hz while it wants the clock running. Ticks
    /// are ignored outside [`ScreenState::Active`] and while paused. Every
    /// [`AUTOSAVE_TICK_INTERVAL`] ticks the puzzle is snapshotted and
    /// queued for a best-effort save; elapsed time is part of the persisted
    /// state, so the cadence fires even without board edits.
    pub fn tick(&mut self) {
        if !self.screen.is_active() || self.paused {
            return;
        }
        let Some(puzzle) = self.puzzle.as_mut() else {
            return;
        };
        puzzle.record_tick();
        self.dirty = true;
        self.ticks_since_save += 1;
        if self.ticks_since_save >= AUTOSAVE_TICK_INTERVAL {
            self.ticks_since_save = 0;
            self.save_progress();
        }
    }

    /// Applies every finished piece of background work.
    pub fn poll(&mut self) {
        let mut i = 0;
        while i < self.in_flight.len() {
            match self.in_flight[i].handle.poll() {
                Ok(Some(response)) => {
                    let critical = self.in_flight.swap_remove(i).critical;
                    self.apply_response(response, critical);
                }
                Ok(None) => i += 1,
                Err(err) => {
                    let critical = self.in_flight.swap_remove(i).critical;
                    self.on_work_failure(&err, critical);
                }
            }
        }
    }

    /// Tears the session down with a best-effort final save.
    ///
    /// The worker drains every queued request before exiting, so the save
    /// of the latest applied input lands if the store allows it; failures
    /// are logged and never block teardown.
    pub fn shutdown(mut self) {
        if self.screen.is_active()
            && let Some(puzzle) = self.puzzle.as_ref()
        {
            let record = SessionRecord::in_progress(puzzle, self.start_time_millis, now_millis());
            match self.worker.enqueue(WorkRequest::SaveProgress(record)) {
                Ok(handle) => drop(handle),
                Err(err) => log::warn!("teardown save could not be queued: {err}"),
            }
        }
        self.in_flight.clear();
        self.worker.shutdown();
    }

    fn begin_loading(&mut self, difficulty: Difficulty, resume: bool) {
        log::debug!("loading a {difficulty} session (resume: {resume})");
        self.screen = ScreenState::Loading;
        self.puzzle = None;
        self.paused = false;
        self.dirty = false;
        self.ticks_since_save = 0;
        self.new_record = false;
        self.enqueue_critical(WorkRequest::AcquirePuzzle { difficulty, resume });
    }

    fn on_digit(&mut self, value: u8) {
        if !self.screen.is_active() {
            return;
        }
        let Some(puzzle) = self.puzzle.as_mut() else {
            return;
        };
        let Some(pos) = puzzle.focused() else {
            return;
        };
        if puzzle.set_value(pos, value).is_applied() {
            self.dirty = true;
            self.evaluate_completion();
        }
    }

    fn on_tile_focused(&mut self, x: u8, y: u8) {
        if !self.screen.is_active() {
            return;
        }
        if let Some(puzzle) = self.puzzle.as_mut() {
            puzzle.set_focus(Some(Position::new(x, y)));
        }
    }

    fn on_suggest_move(&mut self) {
        if !self.screen.is_active() {
            return;
        }
        let Some(puzzle) = self.puzzle.as_mut() else {
            return;
        };
        let Some(suggestion) = suggest_move(puzzle.current(), puzzle.focused()) else {
            log::debug!("no suggestion available for the current board");
            return;
        };
        if puzzle.set_value(suggestion.position, suggestion.value).is_applied() {
            puzzle.set_focus(Some(suggestion.position));
            self.dirty = true;
            self.evaluate_completion();
        }
    }

    fn on_new_game(&mut self, requested: Option<Difficulty>) {
        if self.screen.is_loading() {
            return;
        }
        let difficulty = requested.unwrap_or_else(|| self.preferences.default_difficulty());
        if self.screen.is_active()
            && let Some(puzzle) = self.puzzle.as_ref()
        {
            // Abandoning an unsolved board persists it best-effort first.
            let record = SessionRecord::in_progress(puzzle, self.start_time_millis, now_millis());
            self.enqueue_best_effort(WorkRequest::SaveProgress(record));
        }
        self.begin_loading(difficulty, false);
    }

    fn on_pause(&mut self) {
        if !self.screen.is_active() || self.paused {
            return;
        }
        self.paused = true;
        if self.dirty {
            self.save_progress();
        }
    }

    fn on_resume(&mut self) {
        if self.screen.is_active() {
            self.paused = false;
        }
    }

    fn save_progress(&mut self) {
        let Some(puzzle) = self.puzzle.as_ref() else {
            return;
        };
        let record = SessionRecord::in_progress(puzzle, self.start_time_millis, now_millis());
        self.dirty = false;
        self.enqueue_best_effort(WorkRequest::SaveProgress(record));
    }

    fn evaluate_completion(&mut self) {
        let Some(puzzle) = self.puzzle.as_ref() else {
            return;
        };
        if !puzzle.is_complete() {
            return;
        }
        let end_time_millis = now_millis();
        let final_score = score::compute_score(puzzle.difficulty(), puzzle.elapsed_seconds());
        let record =
            SessionRecord::solved(puzzle, self.start_time_millis, end_time_millis, final_score);
        self.screen = ScreenState::Complete;
        self.dirty = false;
        log::debug!("session {} complete with score {final_score}", record.id);
        self.preferences.set_last_unfinished_session(None);
        self.enqueue_critical(WorkRequest::CompleteSession(record));
    }

    fn apply_response(&mut self, response: WorkResponse, critical: bool) {
        match response {
            WorkResponse::PuzzleReady { record } => self.on_puzzle_ready(&record),
            WorkResponse::Saved { id } => {
                log::debug!("session {id} progress saved");
                // A save can land after completion cleared the marker.
                if self.screen.is_active() {
                    self.preferences.set_last_unfinished_session(Some(id));
                }
            }
            WorkResponse::Completed { id, new_record } => {
                // A new game may already have reset the record flag.
                if self.screen.is_complete() {
                    log::debug!("session {id} persisted as solved (new record: {new_record})");
                    self.new_record = new_record;
                } else {
                    log::debug!("dropping a stale completion for session {id}");
                }
            }
            WorkResponse::Failed(err) => self.on_work_failure(&err, critical),
        }
    }

    fn on_puzzle_ready(&mut self, record: &SessionRecord) {
        if !self.screen.is_loading() {
            log::debug!("dropping a stale acquisition for session {}", record.id);
            return;
        }
        match record.to_puzzle() {
            Ok(puzzle) => {
                log::debug!("session {} active ({})", record.id, record.difficulty);
                self.preferences.set_last_unfinished_session(Some(record.id));
                self.start_time_millis = record.start_time_millis;
                self.puzzle = Some(puzzle);
                self.last_error = None;
                self.screen = ScreenState::Active;
            }
            Err(err) => self.fail(&WorkError::Persistence(PersistenceError::Format {
                message: err.to_string(),
            })),
        }
    }

    fn on_work_failure(&mut self, err: &WorkError, critical: bool) {
        if critical {
            self.fail(err);
        } else {
            // Periodic and abandon-time saves never change session state.
            log::warn!("best-effort save failed: {err}");
        }
    }

    fn fail(&mut self, err: &WorkError) {
        log::warn!("session entered the error state: {err}");
        self.last_error = Some(err.to_string());
        self.screen = ScreenState::Error;
    }

    fn enqueue_critical(&mut self, request: WorkRequest) {
        match self.worker.enqueue(request) {
            Ok(handle) => self.in_flight.push(InFlightWork {
                handle,
                critical: true,
            }),
            Err(err) => self.fail(&err),
        }
    }

    fn enqueue_best_effort(&mut self, request: WorkRequest) {
        match self.worker.enqueue(request) {
            Ok(handle) => self.in_flight.push(InFlightWork {
                handle,
                critical: false,
            }),
            Err(err) => log::warn!("best-effort save could not be queued: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use sudokumaster_core::Grid;
    use sudokumaster_game::Difficulty;

    use super::*;
    use crate::{
        AcquisitionError, GeneratorSource, InMemoryPreferences, SharedSessionRepository,
    };

    const SOLVED: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    /// The solved grid with the last cell (8, 8) blanked.
    fn almost_solved_digits() -> String {
        let mut digits = SOLVED.to_string();
        digits.replace_range(80..81, "0");
        digits
    }

    struct FixedSource(String);

    impl PuzzleSource for FixedSource {
        fn fetch_new_puzzle(
            &mut self,
            difficulty: Difficulty,
        ) -> Result<(Grid, Difficulty), AcquisitionError> {
            Ok((Grid::from_digits(&self.0).unwrap(), difficulty))
        }
    }

    struct FailingSource;

    impl PuzzleSource for FailingSource {
        fn fetch_new_puzzle(
            &mut self,
            _difficulty: Difficulty,
        ) -> Result<(Grid, Difficulty), AcquisitionError> {
            Err(AcquisitionError::SourceUnavailable {
                reason: "offline".into(),
            })
        }
    }

    fn poll_until(engine: &mut SessionEngine, pred: impl Fn(&SessionEngine) -> bool) {
        for _ in 0..500 {
            engine.poll();
            if pred(engine) {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("engine never reached the expected state");
    }

    fn active_engine(repository: &SharedSessionRepository) -> SessionEngine {
        let mut engine = SessionEngine::new(
            Box::new(FixedSource(almost_solved_digits())),
            Box::new(repository.clone()),
            Box::new(InMemoryPreferences::new()),
        );
        assert!(engine.screen_state().is_loading());
        poll_until(&mut engine, |engine| engine.screen_state().is_active());
        engine
    }

    #[test]
    fn test_loading_to_active_persists_the_fresh_session() {
        let repository = SharedSessionRepository::new();
        let engine = active_engine(&repository);
        let records = repository.with(|repo| repo.records());
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_solved);
        assert_eq!(records[0].initial_grid, almost_solved_digits());
        drop(engine);
    }

    #[test]
    fn test_last_cell_input_completes_in_the_same_step() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);

        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.tick();
        engine.handle_event(InputEvent::Digit(9));

        // Active -> Complete happens synchronously with the input.
        assert!(engine.screen_state().is_complete());

        poll_until(&mut engine, SessionEngine::is_new_record);
        let records = repository.with(|repo| repo.records());
        assert_eq!(records.len(), 1, "one final record, persisted once");
        assert!(records[0].is_solved);
        assert_eq!(records[0].current_grid, SOLVED);
        assert_eq!(records[0].duration_seconds, 1);
        assert_eq!(
            records[0].score,
            score::compute_score(Difficulty::Medium, 1)
        );
    }

    #[test]
    fn test_wrong_last_digit_leaves_the_session_active() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);

        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.handle_event(InputEvent::Digit(5));

        // Filled but invalid is not complete.
        assert!(engine.screen_state().is_active());
    }

    #[test]
    fn test_suggest_move_applies_and_focuses_the_tile() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);

        engine.handle_event(InputEvent::SuggestMove);

        // The only empty cell takes the only legal value.
        assert!(engine.screen_state().is_complete());
        let view = engine.view();
        let tile = view.tile(8, 8).unwrap();
        assert_eq!(tile.value, 9);
        assert!(tile.has_focus);
    }

    #[test]
    fn test_second_solve_with_slower_time_is_not_a_record() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);
        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.handle_event(InputEvent::Digit(9));
        poll_until(&mut engine, SessionEngine::is_new_record);

        engine.handle_event(InputEvent::NewGame(None));
        poll_until(&mut engine, |engine| engine.screen_state().is_active());
        assert!(!engine.is_new_record());

        for _ in 0..10 {
            engine.tick();
        }
        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.handle_event(InputEvent::Digit(9));
        assert!(engine.screen_state().is_complete());

        let solved = |repository: &SharedSessionRepository| {
            repository.with(|repo| {
                repo.records()
                    .iter()
                    .filter(|record| record.is_solved)
                    .count()
            })
        };
        poll_until(&mut engine, |_| solved(&repository) == 2);
        assert!(!engine.is_new_record(), "slower solve sets no record");
    }

    #[test]
    fn test_new_game_saves_progress_before_reloading() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);

        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.handle_event(InputEvent::Digit(1));
        engine.handle_event(InputEvent::Digit(0));
        engine.handle_event(InputEvent::NewGame(Some(Difficulty::Hard)));
        assert!(engine.screen_state().is_loading());

        poll_until(&mut engine, |engine| engine.screen_state().is_active());
        let records = repository.with(|repo| repo.records());
        assert_eq!(records.len(), 2, "abandoned progress plus the new session");
        assert!(records.iter().all(|record| !record.is_solved));
        assert_eq!(engine.puzzle().unwrap().difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_autosave_fires_on_cadence() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);

        // Elapsed time alone is progress worth persisting: a crash after
        // tick-only play must not resume with an understated solve time.
        for _ in 0..AUTOSAVE_TICK_INTERVAL {
            engine.tick();
        }
        poll_until(&mut engine, |_| {
            repository.with(|repo| {
                repo.records()
                    .first()
                    .is_some_and(|record| record.duration_seconds == u64::from(AUTOSAVE_TICK_INTERVAL))
            })
        });

        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.handle_event(InputEvent::Digit(1));
        engine.handle_event(InputEvent::Digit(0));
        for _ in 0..AUTOSAVE_TICK_INTERVAL {
            engine.tick();
        }
        poll_until(&mut engine, |_| {
            repository.with(|repo| {
                repo.records().first().is_some_and(|record| {
                    record.duration_seconds == 2 * u64::from(AUTOSAVE_TICK_INTERVAL)
                        && record.current_grid == record.initial_grid
                })
            })
        });
    }

    /// Rejects in-progress saves of an edited board; everything else goes
    /// through to the shared store.
    struct EditSaveFailingRepository {
        inner: SharedSessionRepository,
    }

    impl SessionRepository for EditSaveFailingRepository {
        fn load_latest_unfinished(&mut self) -> Result<Option<SessionRecord>, PersistenceError> {
            self.inner.load_latest_unfinished()
        }

        fn save(&mut self, record: &SessionRecord) -> Result<i64, PersistenceError> {
            if !record.is_solved && record.current_grid != record.initial_grid {
                return Err(PersistenceError::Io {
                    message: "disk full".into(),
                });
            }
            self.inner.save(record)
        }

        fn load_all(&mut self) -> Result<Vec<SessionRecord>, PersistenceError> {
            self.inner.load_all()
        }
    }

    #[test]
    fn test_abandon_save_failure_does_not_block_the_new_game() {
        let repository = SharedSessionRepository::new();
        let mut engine = SessionEngine::new(
            Box::new(FixedSource(almost_solved_digits())),
            Box::new(EditSaveFailingRepository {
                inner: repository.clone(),
            }),
            Box::new(InMemoryPreferences::new()),
        );
        poll_until(&mut engine, |engine| engine.screen_state().is_active());

        // The abandon-time save fails after the engine moved on to Loading;
        // it stays best-effort and never surfaces as Error.
        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.handle_event(InputEvent::Digit(1));
        engine.handle_event(InputEvent::NewGame(None));
        poll_until(&mut engine, |engine| engine.screen_state().is_active());
        assert_eq!(engine.last_error(), None);
    }

    #[test]
    fn test_stale_completion_does_not_leak_into_the_next_session() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);
        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.handle_event(InputEvent::Digit(9));
        assert!(engine.screen_state().is_complete());

        // Starting over before the completion response is polled: the
        // record flag of the solved session must not follow along.
        engine.handle_event(InputEvent::NewGame(None));
        poll_until(&mut engine, |engine| engine.screen_state().is_active());
        thread::sleep(Duration::from_millis(20));
        engine.poll();
        assert!(!engine.is_new_record());
    }

    #[test]
    fn test_pause_stops_the_timer_until_resume() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);

        engine.tick();
        engine.handle_event(InputEvent::Pause);
        for _ in 0..5 {
            engine.tick();
        }
        assert_eq!(engine.elapsed_seconds(), 1);

        engine.handle_event(InputEvent::Resume);
        engine.tick();
        assert_eq!(engine.elapsed_seconds(), 2);
    }

    #[test]
    fn test_acquisition_failure_reaches_error_and_retry_reloads() {
        let repository = SharedSessionRepository::new();
        let mut engine = SessionEngine::new(
            Box::new(FailingSource),
            Box::new(repository.clone()),
            Box::new(InMemoryPreferences::new()),
        );
        poll_until(&mut engine, |engine| engine.screen_state().is_error());
        assert!(engine.last_error().unwrap().contains("offline"));

        // Retry is user-initiated and re-enters Loading.
        engine.handle_event(InputEvent::NewGame(None));
        assert!(engine.screen_state().is_loading());
        poll_until(&mut engine, |engine| engine.screen_state().is_error());
    }

    #[test]
    fn test_engine_resumes_the_latest_unfinished_session() {
        let repository = SharedSessionRepository::new();
        {
            let mut engine = active_engine(&repository);
            engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
            engine.handle_event(InputEvent::Digit(1));
            engine.handle_event(InputEvent::Digit(0));
            engine.tick();
            engine.shutdown();
        }

        let mut engine = SessionEngine::new(
            Box::new(GeneratorSource::new()),
            Box::new(repository.clone()),
            Box::new(InMemoryPreferences::new()),
        );
        poll_until(&mut engine, |engine| engine.screen_state().is_active());

        // The stored board came back rather than a generated one.
        let records = repository.with(|repo| repo.records());
        assert_eq!(records.len(), 1);
        assert_eq!(engine.puzzle().unwrap().id(), records[0].id);
        assert_eq!(engine.elapsed_seconds(), 1);
        assert_eq!(
            engine.puzzle().unwrap().initial().digits(),
            almost_solved_digits()
        );
    }

    #[test]
    fn test_input_is_ignored_outside_active() {
        let repository = SharedSessionRepository::new();
        let mut engine = active_engine(&repository);
        engine.handle_event(InputEvent::TileFocused { x: 8, y: 8 });
        engine.handle_event(InputEvent::Digit(9));
        assert!(engine.screen_state().is_complete());

        let elapsed = engine.elapsed_seconds();
        engine.handle_event(InputEvent::Digit(1));
        engine.tick();
        assert_eq!(engine.elapsed_seconds(), elapsed);
        assert!(engine.screen_state().is_complete());
    }
}
