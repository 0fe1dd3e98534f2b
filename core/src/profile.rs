use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Difficulty tier chosen in the settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Normal => "NORMAL",
            Self::Hard => "HARD",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Normal => 1,
            Self::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("unknown difficulty: {s}")),
        }
    }
}

/// Cumulative percentage thresholds, `thresholds[i]` is the exclusive upper bound
/// of the draws that produce tile `i`. Draws past the last threshold produce the
/// highest tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifficultyProfile {
    thresholds: SmallVec<[u8; 8]>,
}

impl DifficultyProfile {
    /// Exclusive upper bound of the uniform draw a tile is picked from.
    pub const DRAW_RANGE: u8 = 100;

    pub fn new(thresholds: &[u8]) -> Result<Self> {
        let increasing = thresholds.windows(2).all(|pair| pair[0] < pair[1]);
        let in_range = thresholds.iter().all(|&t| t < Self::DRAW_RANGE);
        if !increasing || !in_range {
            return Err(GameError::InvalidProfile);
        }
        Ok(Self::new_unchecked(thresholds))
    }

    pub(crate) fn new_unchecked(thresholds: &[u8]) -> Self {
        Self {
            thresholds: SmallVec::from_slice(thresholds),
        }
    }

    pub fn thresholds(&self) -> &[u8] {
        &self.thresholds
    }

    /// Number of distinct tile values this profile produces.
    pub fn tile_kinds(&self) -> usize {
        self.thresholds.len() + 1
    }

    pub fn max_tile(&self) -> TileValue {
        self.thresholds.len() as TileValue
    }

    /// Maps a draw in `0..100` to the first tile whose threshold exceeds it.
    pub fn tile_for(&self, draw: u8) -> TileValue {
        self.thresholds
            .iter()
            .position(|&threshold| draw < threshold)
            .map_or(self.max_tile(), |index| index as TileValue)
    }

    /// Probability, in percent, of drawing `tile`.
    pub fn weight_of(&self, tile: TileValue) -> u8 {
        let index = match usize::try_from(tile) {
            Ok(index) if index <= self.thresholds.len() => index,
            _ => return 0,
        };
        let lower = index
            .checked_sub(1)
            .map_or(0, |prev| self.thresholds[prev]);
        let upper = self
            .thresholds
            .get(index)
            .copied()
            .unwrap_or(Self::DRAW_RANGE);
        upper - lower
    }
}

/// One profile per difficulty tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifficultyTable {
    profiles: [DifficultyProfile; 3],
}

impl DifficultyTable {
    pub fn new(easy: &[u8], normal: &[u8], hard: &[u8]) -> Result<Self> {
        Ok(Self {
            profiles: [
                DifficultyProfile::new(easy)?,
                DifficultyProfile::new(normal)?,
                DifficultyProfile::new(hard)?,
            ],
        })
    }

    pub fn standard() -> Self {
        Self::new_unchecked(&[60, 80, 90, 96, 99], &[50, 70, 85, 93, 98], &[40, 60, 75, 85, 95])
    }

    pub fn extended() -> Self {
        Self::new_unchecked(
            &[50, 70, 82, 90, 95, 98, 99],
            &[40, 60, 75, 86, 93, 97, 99],
            &[30, 50, 70, 82, 90, 95, 98],
        )
    }

    fn new_unchecked(easy: &[u8], normal: &[u8], hard: &[u8]) -> Self {
        Self {
            profiles: [
                DifficultyProfile::new_unchecked(easy),
                DifficultyProfile::new_unchecked(normal),
                DifficultyProfile::new_unchecked(hard),
            ],
        }
    }

    pub fn profile(&self, difficulty: Difficulty) -> &DifficultyProfile {
        &self.profiles[difficulty.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, &DifficultyProfile)> {
        Difficulty::ALL
            .into_iter()
            .map(|difficulty| (difficulty, self.profile(difficulty)))
    }
}
