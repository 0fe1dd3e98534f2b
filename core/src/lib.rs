use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use error::*;
pub use generator::*;
pub use profile::*;
pub use score::*;
pub use session::*;
pub use store::*;
pub use tile::*;
pub use types::*;

mod error;
mod generator;
mod profile;
mod score;
mod session;
mod store;
mod tile;
mod types;

/// Board size, tile table and difficulty table of one flavour of the game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameVariant {
    size: Coord,
    ores: OreTable,
    difficulties: DifficultyTable,
}

impl GameVariant {
    pub fn new(size: Coord, ores: OreTable, difficulties: DifficultyTable) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize);
        }
        let expected = ores.len().saturating_sub(1);
        for (_, profile) in difficulties.iter() {
            let found = profile.thresholds().len();
            if found != expected {
                return Err(GameError::ProfileLengthMismatch { expected, found });
            }
        }
        Ok(Self {
            size,
            ores,
            difficulties,
        })
    }

    /// 10x10 board with six tile kinds.
    pub fn standard() -> Self {
        Self {
            size: 10,
            ores: OreTable::STANDARD,
            difficulties: DifficultyTable::standard(),
        }
    }

    /// 15x15 board with eight tile kinds.
    pub fn extended() -> Self {
        Self {
            size: 15,
            ores: OreTable::EXTENDED,
            difficulties: DifficultyTable::extended(),
        }
    }

    pub const fn size(&self) -> Coord {
        self.size
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub fn ores(&self) -> &OreTable {
        &self.ores
    }

    pub fn profile(&self, difficulty: Difficulty) -> &DifficultyProfile {
        self.difficulties.profile(difficulty)
    }
}

/// Square matrix of tile values, fixed once generated or imported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OreGrid {
    tiles: Array2<TileValue>,
}

impl OreGrid {
    pub fn from_tiles(tiles: Array2<TileValue>) -> Self {
        Self { tiles }
    }

    /// Builds a grid from row-major nested rows, requiring exactly `size` rows of
    /// `size` cells each.
    pub fn from_rows(size: Coord, rows: &[Vec<TileValue>]) -> Result<Self> {
        let expected = usize::from(size);
        let ragged = rows.iter().find(|row| row.len() != expected);
        if rows.len() != expected || ragged.is_some() {
            return Err(GameError::DimensionMismatch {
                expected: size,
                found_rows: rows.len(),
                found_cols: ragged.or(rows.first()).map_or(0, Vec::len),
            });
        }

        let mut tiles = Array2::default((expected, expected));
        for (coords, value) in iter_coords(size).zip(rows.iter().flatten()) {
            tiles[coords.to_nd_index()] = *value;
        }
        Ok(Self { tiles })
    }

    pub fn to_rows(&self) -> Vec<Vec<TileValue>> {
        self.tiles.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    pub fn size(&self) -> Coord {
        self.tiles.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        self.tiles.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        let size = self.size();
        row < size && col < size
    }

    pub fn get(&self, coords: Coord2) -> Option<TileValue> {
        self.tiles.get(coords.to_nd_index()).copied()
    }

    /// Sum of every tile, the score of a fully revealed board.
    pub fn total_points(&self) -> Score {
        self.tiles
            .iter()
            .fold(0, |total: Score, &value| total.saturating_add(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = TileValue> + '_ {
        self.tiles.iter().copied()
    }
}

impl Index<Coord2> for OreGrid {
    type Output = TileValue;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.tiles[(row as usize, col as usize)]
    }
}
