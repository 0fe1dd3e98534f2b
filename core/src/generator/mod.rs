use ndarray::Array2;

use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(&mut self, size: Coord, profile: &DifficultyProfile) -> OreGrid;
}

/// Source of uniform draws in `0..100`.
pub trait PercentDraw {
    fn draw_percent(&mut self) -> u8;
}

impl<R: rand::Rng + ?Sized> PercentDraw for R {
    fn draw_percent(&mut self) -> u8 {
        self.random_range(0..DifficultyProfile::DRAW_RANGE)
    }
}

/// Fills a `size`×`size` grid in row-major order, one draw per cell.
pub fn generate<D: PercentDraw + ?Sized>(
    size: Coord,
    profile: &DifficultyProfile,
    draws: &mut D,
) -> OreGrid {
    let dim = usize::from(size);
    let mut tiles: Array2<TileValue> = Array2::default((dim, dim));
    for coords in iter_coords(size) {
        tiles[coords.to_nd_index()] = profile.tile_for(draws.draw_percent());
    }
    OreGrid::from_tiles(tiles)
}
