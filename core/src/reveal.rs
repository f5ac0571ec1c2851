use alloc::vec::Vec;

use crate::*;

/// Result of revealing a single target cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Target was flagged or already revealed.
    NoChange,
    /// Safe cells were opened, `opened` counts the target plus everything flooded.
    Continue { opened: CellCount },
    /// Target was a mine.
    Detonated,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Reveal propagation and win detection over a [`Board`].
pub struct RevealEngine;

impl RevealEngine {
    /// Reveals `coords`, flooding outward from zero-adjacency cells.
    ///
    /// The flood uses an explicit work list, so board size never affects stack
    /// depth. Flagged and already revealed cells stop the propagation.
    pub fn reveal(board: &mut Board, coords: Coord2) -> Result<RevealOutcome> {
        let coords = board.validate_coords(coords)?;
        let target = board.cell_at(coords);

        if !target.is_covered() {
            log::trace!("Reveal at {:?} ignored, cell is not covered", coords);
            return Ok(RevealOutcome::NoChange);
        }

        if target.is_mine() {
            board.reveal_cell(coords)?;
            log::debug!("Mine detonated at {:?}", coords);
            return Ok(RevealOutcome::Detonated);
        }

        let mut opened = 0;
        let mut to_visit = Vec::from([coords]);
        while let Some(visit_coords) = to_visit.pop() {
            let cell = board.cell_at(visit_coords);
            if !cell.is_covered() || cell.is_mine() {
                continue;
            }

            board.reveal_cell(visit_coords)?;
            opened += 1;
            log::trace!(
                "Opened {:?}, adjacent mines: {}",
                visit_coords,
                cell.adjacent_mines()
            );

            if cell.adjacent_mines() == 0 {
                to_visit.extend(
                    board
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| board.cell_at(pos).is_covered()),
                );
            }
        }

        log::debug!("Reveal at {:?} opened {} cells", coords, opened);
        Ok(RevealOutcome::Continue { opened })
    }

    /// Whether every non-mine cell is revealed.
    pub fn check_win(board: &Board) -> bool {
        board.revealed_safe_count() == board.safe_cell_count()
    }
}
