use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// A single square of the board.
///
/// `is_mine` and `adjacent_mines` are fixed when the board is generated; only
/// `revealed` and `flagged` change during play, and never both at once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    adjacent_mines: u8,
    revealed: bool,
    flagged: bool,
}

impl Cell {
    pub(crate) const fn new(is_mine: bool, adjacent_mines: u8) -> Self {
        Self {
            is_mine,
            adjacent_mines,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    /// Mines among the up to 8 neighbors, always 0 for a mine.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Hidden and not flagged.
    pub const fn is_covered(self) -> bool {
        !self.revealed && !self.flagged
    }

    /// Returns `Ok(false)` when the cell was already revealed.
    pub(crate) fn reveal(&mut self) -> Result<bool> {
        if self.flagged {
            return Err(GameError::IllegalAction);
        }
        let changed = !self.revealed;
        self.revealed = true;
        Ok(changed)
    }

    /// Returns the new flag state.
    pub(crate) fn toggle_flag(&mut self) -> Result<bool> {
        if self.revealed {
            return Err(GameError::IllegalAction);
        }
        self.flagged = !self.flagged;
        Ok(self.flagged)
    }

    /// Reveals regardless of flags, used when the clock runs out.
    pub(crate) fn force_reveal(&mut self) {
        self.flagged = false;
        self.revealed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flagged_cell_refuses_reveal() {
        let mut cell = Cell::new(false, 2);
        cell.toggle_flag().unwrap();

        assert_eq!(cell.reveal(), Err(GameError::IllegalAction));
        assert!(!cell.is_revealed());
        assert!(cell.is_flagged());
    }

    #[test]
    fn revealed_cell_refuses_flag() {
        let mut cell = Cell::new(false, 0);
        assert_eq!(cell.reveal(), Ok(true));

        assert_eq!(cell.toggle_flag(), Err(GameError::IllegalAction));
        assert!(!cell.is_flagged());
        assert_eq!(cell.reveal(), Ok(false));
    }

    #[test]
    fn force_reveal_clears_flag() {
        let mut cell = Cell::new(true, 0);
        cell.toggle_flag().unwrap();
        cell.force_reveal();

        assert!(cell.is_revealed());
        assert!(!cell.is_flagged());
    }
}
