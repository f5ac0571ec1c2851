use ndarray::Array2;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::*;

/// Uniformly random placement, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: &GameConfig) -> MineLayout {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        place_mines(config, &mut rng)
    }
}

/// Picks a uniformly random set of exactly `config.mines()` distinct cells.
///
/// Sparse boards draw random coordinates and reject duplicates. Once more than
/// half the grid is mined the rejection rate climbs, so dense boards sample
/// indices without replacement instead.
pub fn place_mines<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> MineLayout {
    let (rows, cols) = config.size();
    let total_cells = config.total_cells();
    let mines = config.mines().min(total_cells);
    if mines < config.mines() {
        log::warn!(
            "Requested {} mines but only {} cells, clamped",
            config.mines(),
            total_cells
        );
    }

    let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());

    if u64::from(mines) * 2 <= u64::from(total_cells) {
        let mut placed = 0;
        while placed < mines {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            let slot = &mut mine_mask[coords.to_nd_index()];
            if !*slot {
                *slot = true;
                placed += 1;
            }
        }
    } else {
        log::debug!(
            "Dense board ({} of {} cells), sampling without replacement",
            mines,
            total_cells
        );
        let cols = usize::from(cols);
        for index in rand::seq::index::sample(rng, total_cells as usize, mines as usize).iter() {
            mine_mask[[index / cols, index % cols]] = true;
        }
    }

    MineLayout::from_mine_mask(mine_mask)
}
