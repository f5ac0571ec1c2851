use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(ConfigIssue),
    #[error("Coordinates {0:?} are outside the board")]
    OutOfBounds(Coord2),
    #[error("Action not allowed in the current state")]
    IllegalAction,
}

/// Reason a [`GameConfig`](crate::GameConfig) was rejected.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("board needs at least one row and one column")]
    EmptyBoard,
    #[error("{mines} mines do not fit in {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("generated layout {layout:?} with {layout_mines} mines, expected {expected:?} with {expected_mines}")]
    LayoutMismatch {
        expected: Coord2,
        expected_mines: CellCount,
        layout: Coord2,
        layout_mines: CellCount,
    },
}

impl From<ConfigIssue> for GameError {
    fn from(issue: ConfigIssue) -> Self {
        Self::InvalidConfiguration(issue)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
