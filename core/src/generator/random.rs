use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Purely random generation strategy. Boards drawn from the same seed come out in
/// the same order.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator {
    seed: u64,
    rng: SmallRng,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(&mut self, size: Coord, profile: &DifficultyProfile) -> OreGrid {
        let grid = generate(size, profile, &mut self.rng);
        log::debug!(
            "Generated {size}x{size} board worth {} points",
            grid.total_points()
        );
        grid
    }
}
