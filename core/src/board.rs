use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The grid of cells for one session, with mines and adjacency fixed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    revealed_safe_count: CellCount,
    flagged_count: CellCount,
}

impl Board {
    /// Validates `config`, then asks `generator` where the mines go.
    pub fn new(config: &GameConfig, generator: impl MineGenerator) -> Result<Self> {
        config.validate()?;
        let layout = generator.generate(config);
        if layout.size() != config.size() || layout.mine_count() != config.mines() {
            return Err(ConfigIssue::LayoutMismatch {
                expected: config.size(),
                expected_mines: config.mines(),
                layout: layout.size(),
                layout_mines: layout.mine_count(),
            }
            .into());
        }
        Self::from_layout(layout)
    }

    /// Random board reproducible from `seed`.
    pub fn with_seed(rows: Coord, cols: Coord, mine_count: CellCount, seed: u64) -> Result<Self> {
        let config = GameConfig::new(rows, cols, mine_count)?;
        Self::new(&config, RandomMineGenerator::new(seed))
    }

    /// Builds the board for a known layout and precomputes every adjacency count.
    pub fn from_layout(layout: MineLayout) -> Result<Self> {
        let (rows, cols) = layout.size();
        GameConfig::new_unchecked(rows, cols, layout.mine_count()).validate()?;

        let cells = Array2::from_shape_fn(layout.size().to_nd_index(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            if layout.contains_mine(coords) {
                Cell::new(true, 0)
            } else {
                Cell::new(false, layout.adjacent_mine_count(coords))
            }
        });
        log::debug!(
            "Board {}x{} with {} mines ready",
            rows,
            cols,
            layout.mine_count()
        );

        Ok(Self {
            cells,
            mine_count: layout.mine_count(),
            revealed_safe_count: 0,
            flagged_count: 0,
        })
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus flags placed; negative when over-flagged.
    pub fn mines_remaining_estimate(&self) -> i64 {
        i64::from(self.mine_count) - i64::from(self.flagged_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords))
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// Every cell with its `(row, col)` position, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub(crate) fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    /// Reveals one cell without any propagation, returns whether it changed.
    pub(crate) fn reveal_cell(&mut self, coords: Coord2) -> Result<bool> {
        let cell = &mut self.cells[coords.to_nd_index()];
        let changed = cell.reveal()?;
        if changed && !cell.is_mine() {
            self.revealed_safe_count += 1;
        }
        Ok(changed)
    }

    /// Flips the flag on a hidden cell, returns the new flag state.
    pub(crate) fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        let flagged = self.cells[coords.to_nd_index()].toggle_flag()?;
        if flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Ok(flagged)
    }

    /// Exposes the whole board, clearing every flag.
    pub(crate) fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            if !cell.is_revealed() && !cell.is_mine() {
                self.revealed_safe_count += 1;
            }
            cell.force_reveal();
        }
        self.flagged_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_count(board: &Board, coords: Coord2) -> u8 {
        let (rows, cols) = board.size();
        let mut count = 0;
        for d_row in -1i32..=1 {
            for d_col in -1i32..=1 {
                if d_row == 0 && d_col == 0 {
                    continue;
                }
                let row = i32::from(coords.0) + d_row;
                let col = i32::from(coords.1) + d_col;
                if row < 0 || col < 0 || row >= i32::from(rows) || col >= i32::from(cols) {
                    continue;
                }
                if board.cell((row as Coord, col as Coord)).unwrap().is_mine() {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn adjacency_matches_brute_force_on_small_boards() {
        for rows in 1..=10 {
            for cols in 1..=10 {
                let total = mult(rows, cols);
                for mines in [0, total / 5, total / 2, total - 1] {
                    let seed = u64::from(total) * 31 + u64::from(mines);
                    let board = Board::with_seed(rows, cols, mines, seed).unwrap();

                    let mined = board.cells().filter(|(_, cell)| cell.is_mine()).count();
                    assert_eq!(mined as CellCount, mines);

                    for (coords, cell) in board.cells() {
                        if !cell.is_mine() {
                            assert_eq!(
                                cell.adjacent_mines(),
                                brute_force_count(&board, coords),
                                "{rows}x{cols} with {mines} mines at {coords:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        assert!(matches!(
            Board::with_seed(0, 5, 0, 1),
            Err(GameError::InvalidConfiguration(ConfigIssue::EmptyBoard))
        ));
        assert!(matches!(
            Board::with_seed(2, 2, 4, 1),
            Err(GameError::InvalidConfiguration(ConfigIssue::TooManyMines { .. }))
        ));

        let full = MineLayout::from_mine_coords((1, 2), &[(0, 0), (0, 1)]).unwrap();
        assert!(matches!(
            Board::from_layout(full),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    struct FixedLayout(MineLayout);

    impl MineGenerator for FixedLayout {
        fn generate(self, _config: &GameConfig) -> MineLayout {
            self.0
        }
    }

    #[test]
    fn generator_must_honour_the_configuration() {
        let config = GameConfig::new(3, 3, 2).unwrap();

        let wrong_size = MineLayout::from_mine_coords((2, 3), &[(0, 0), (1, 1)]).unwrap();
        assert!(matches!(
            Board::new(&config, FixedLayout(wrong_size)),
            Err(GameError::InvalidConfiguration(ConfigIssue::LayoutMismatch { .. }))
        ));

        let wrong_count = MineLayout::from_mine_coords((3, 3), &[(0, 0)]).unwrap();
        assert!(matches!(
            Board::new(&config, FixedLayout(wrong_count)),
            Err(GameError::InvalidConfiguration(ConfigIssue::LayoutMismatch { .. }))
        ));

        let matching = MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();
        let board = Board::new(&config, FixedLayout(matching)).unwrap();
        assert!(board.cell((2, 2)).unwrap().is_mine());
    }

    #[test]
    fn out_of_bounds_lookup_is_rejected() {
        let board = Board::with_seed(3, 4, 2, 9).unwrap();

        assert_eq!(board.cell((3, 0)), Err(GameError::OutOfBounds((3, 0))));
        assert_eq!(board.cell((0, 4)), Err(GameError::OutOfBounds((0, 4))));
        assert!(board.cell((2, 3)).is_ok());
    }

    #[test]
    fn mines_remaining_goes_negative_when_over_flagged() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut board = Board::from_layout(layout).unwrap();

        board.toggle_flag((0, 1)).unwrap();
        board.toggle_flag((1, 0)).unwrap();

        assert_eq!(board.flagged_count(), 2);
        assert_eq!(board.mines_remaining_estimate(), -1);

        board.toggle_flag((1, 0)).unwrap();
        assert_eq!(board.mines_remaining_estimate(), 0);
    }

    #[test]
    fn reveal_all_counts_safe_cells_once() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(1, 1)]).unwrap();
        let mut board = Board::from_layout(layout).unwrap();
        board.reveal_cell((0, 0)).unwrap();
        board.toggle_flag((1, 1)).unwrap();

        board.reveal_all();

        assert_eq!(board.revealed_safe_count(), 3);
        assert_eq!(board.flagged_count(), 0);
        assert!(board.cells().all(|(_, cell)| cell.is_revealed()));
    }
}
