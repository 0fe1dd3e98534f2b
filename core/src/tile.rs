use serde::{Deserialize, Serialize};

use crate::TileValue;

/// Player-visible state of one cell in the live session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed(TileValue),
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Display data for one tile kind. The tile's points are its index in the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ore {
    pub name: &'static str,
    pub color: [u8; 3],
}

impl Ore {
    pub const UNKNOWN: Ore = Ore::new("Unknown", [255, 255, 255]);

    pub const fn new(name: &'static str, color: [u8; 3]) -> Self {
        Self { name, color }
    }
}

const STONE: Ore = Ore::new("Stone", [100, 100, 100]);
const COPPER: Ore = Ore::new("Copper", [184, 115, 51]);
const QUARTZ: Ore = Ore::new("Quartz", [255, 255, 250]);
const IRON: Ore = Ore::new("Iron", [255, 223, 252]);
const AMETHYST: Ore = Ore::new("Amethyst", [160, 100, 220]);
const GOLD: Ore = Ore::new("Gold", [255, 215, 0]);
const JADEITE: Ore = Ore::new("Jadeite", [32, 128, 0]);
const DIAMOND: Ore = Ore::new("Diamond", [170, 255, 255]);

/// Ordered tile table, index `i` is the tile worth `i` points.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OreTable(&'static [Ore]);

impl OreTable {
    pub const STANDARD: OreTable = OreTable(&[STONE, QUARTZ, COPPER, AMETHYST, GOLD, DIAMOND]);
    pub const EXTENDED: OreTable =
        OreTable(&[STONE, COPPER, QUARTZ, IRON, AMETHYST, GOLD, JADEITE, DIAMOND]);

    pub const fn new(ores: &'static [Ore]) -> Self {
        Self(ores)
    }

    pub const fn len(&self) -> usize {
        self.0.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display data for `value`, or [`Ore::UNKNOWN`] for values an imported board
    /// may carry beyond the table.
    pub fn ore(&self, value: TileValue) -> Ore {
        usize::try_from(value)
            .ok()
            .and_then(|index| self.0.get(index))
            .copied()
            .unwrap_or(Ore::UNKNOWN)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileValue, Ore)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(value, &ore)| (value as TileValue, ore))
    }
}
