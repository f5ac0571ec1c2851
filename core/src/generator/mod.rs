use crate::*;
pub use random::*;

mod random;

/// Strategy that decides where the mines go for a validated configuration.
pub trait MineGenerator {
    fn generate(self, config: &GameConfig) -> MineLayout;
}
