//! Input events and observable screen states.

use sudokumaster_game::Difficulty;

/// An input event fed into [`SessionEngine::handle_event`].
///
/// Events originate from a host UI layer; the engine is the sole consumer
/// and processes them one at a time.
///
/// [`SessionEngine::handle_event`]: crate::SessionEngine::handle_event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A digit (1..=boundary) or 0 (clear) for the focused cell.
    Digit(u8),
    /// Moves focus to the tile at `(x, y)`.
    TileFocused {
        /// Column of the focused tile.
        x: u8,
        /// Row of the focused tile.
        y: u8,
    },
    /// Abandons the current session and starts a new game.
    ///
    /// `None` requests the preferred default difficulty.
    NewGame(Option<Difficulty>),
    /// Asks for a legal move and applies it to the board.
    SuggestMove,
    /// Suspends the timer, saving progress first.
    Pause,
    /// Resumes the timer after a pause.
    Resume,
}

/// The lifecycle state of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum ScreenState {
    /// A puzzle is being acquired or resumed.
    #[display("LOADING")]
    Loading,
    /// A puzzle is on the board and the timer may run.
    #[display("ACTIVE")]
    Active,
    /// The puzzle has been solved; terminal until a new game starts.
    #[display("COMPLETE")]
    Complete,
    /// Acquisition or persistence failed; recovery is user-initiated.
    #[display("ERROR")]
    Error,
}
