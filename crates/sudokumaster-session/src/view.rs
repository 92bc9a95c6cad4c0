//! Read-only snapshots for a host UI.

use sudokumaster_game::Puzzle;

use crate::ScreenState;

/// One tile of the board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileView {
    /// Column of the tile.
    pub x: u8,
    /// Row of the tile.
    pub y: u8,
    /// Current value, 0 when empty.
    pub value: u8,
    /// Whether the tile is an uneditable clue.
    pub is_fixed: bool,
    /// Whether the tile holds the input focus.
    pub has_focus: bool,
}

/// Everything a host needs to render the session: screen state, board
/// snapshot, elapsed time, and the new-record flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// The lifecycle state of the session.
    pub screen: ScreenState,
    /// Side length of the board; 0 while no puzzle is loaded.
    pub boundary: u8,
    /// Row-major board snapshot; empty while no puzzle is loaded.
    pub tiles: Vec<TileView>,
    /// Elapsed play time in seconds.
    pub elapsed_seconds: u64,
    /// Whether the just-completed solve set a new record.
    pub new_record: bool,
}

impl SessionView {
    pub(crate) fn build(screen: ScreenState, puzzle: Option<&Puzzle>, new_record: bool) -> Self {
        let (boundary, tiles, elapsed_seconds) = match puzzle {
            Some(puzzle) => {
                let tiles = puzzle
                    .current()
                    .cells()
                    .map(|cell| TileView {
                        x: cell.position().x,
                        y: cell.position().y,
                        value: cell.value(),
                        is_fixed: cell.is_fixed(),
                        has_focus: cell.has_focus(),
                    })
                    .collect();
                (puzzle.current().boundary(), tiles, puzzle.elapsed_seconds())
            }
            None => (0, Vec::new(), 0),
        };
        Self {
            screen,
            boundary,
            tiles,
            elapsed_seconds,
            new_record,
        }
    }

    /// Returns the tile at `(x, y)`, if the board holds one.
    #[must_use]
    pub fn tile(&self, x: u8, y: u8) -> Option<&TileView> {
        let index = usize::from(y) * usize::from(self.boundary) + usize::from(x);
        self.tiles.get(index)
    }
}
