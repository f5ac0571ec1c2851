use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the player gets to see of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// Mine shown once the game is over
    Mine,
    /// The mine that ended the game
    TriggeredMine,
    /// Flag left on a safe cell when the game ended
    Misflagged,
}

impl CellView {
    /// whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::Misflagged)
    }
}

/// Read-only projection of a session, rebuilt after every operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord2,
    pub cells: Array2<CellView>,
    pub state: SessionState,
    pub score: u32,
    pub flags_remaining: i64,
    pub elapsed_secs: u32,
}

impl BoardView {
    pub fn from_session(session: &GameSession) -> Self {
        let board = session.board();
        let state = session.state();
        let triggered = session.triggered_mine();

        let mut cells = Array2::default(board.size().to_nd_index());
        for (coords, cell) in board.cells() {
            cells[coords.to_nd_index()] = Self::project(cell, coords, state, triggered);
        }

        Self {
            size: board.size(),
            cells,
            state,
            score: session.score().value(),
            flags_remaining: session.flags_remaining(),
            elapsed_secs: session.elapsed_secs(),
        }
    }

    /// `None` outside the board.
    pub fn cell(&self, coords: Coord2) -> Option<CellView> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    fn project(
        cell: Cell,
        coords: Coord2,
        state: SessionState,
        triggered: Option<Coord2>,
    ) -> CellView {
        use CellView::*;

        match (cell.is_revealed(), cell.is_flagged(), cell.is_mine()) {
            (true, _, true) if triggered == Some(coords) => TriggeredMine,
            (true, _, true) => Mine,
            (true, _, false) => Revealed(cell.adjacent_mines()),
            (false, true, false) if state.is_terminal() => Misflagged,
            (false, true, _) => Flagged,
            // unflagged mines are marked for the winner and exposed for the loser
            (false, false, true) => match state {
                SessionState::Won => Flagged,
                SessionState::Lost => Mine,
                _ => Hidden,
            },
            (false, false, false) => Hidden,
        }
    }
}
