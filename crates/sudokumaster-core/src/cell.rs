//! Single-cell representation.

use crate::Position;

/// A single square of the board.
///
/// A cell's value is `0` when empty and `1..=boundary` when filled. Cells
/// present as clues at puzzle creation are *fixed* and never user-editable.
/// The focus flag routes digit input in the UI layer and is irrelevant to
/// puzzle logic; it is not part of the persisted wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    value: u8,
    is_fixed: bool,
    has_focus: bool,
}

impl Cell {
    pub(crate) const fn new(position: Position, value: u8, is_fixed: bool) -> Self {
        Self {
            position,
            value,
            is_fixed,
            has_focus: false,
        }
    }

    /// Returns the cell's position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns the cell's value (`0` = empty).
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Returns `true` if the cell holds no value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value == 0
    }

    /// Returns `true` if the cell is a clue fixed at puzzle creation.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.is_fixed
    }

    /// Returns `true` if the cell currently has input focus.
    #[must_use]
    pub const fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub(crate) const fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    pub(crate) const fn set_focus(&mut self, focus: bool) {
        self.has_focus = focus;
    }
}
