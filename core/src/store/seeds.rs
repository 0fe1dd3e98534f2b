use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::{read_json_or_default, write_json};
use crate::*;

/// Replayable snapshot of a generated board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub seed_id: String,
    pub ore_data: Vec<Vec<TileValue>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Seed {
    /// Snapshots `grid` under a fresh random id.
    pub fn new(grid: &OreGrid) -> Self {
        Self {
            seed_id: uuid::Uuid::new_v4().to_string(),
            ore_data: grid.to_rows(),
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    pub fn id(&self) -> &str {
        &self.seed_id
    }

    /// Rebuilds the board, which must be exactly `size`×`size`.
    pub fn board(&self, size: Coord) -> Result<OreGrid> {
        OreGrid::from_rows(size, &self.ore_data)
    }
}

/// Append-only list of seeds kept in a single JSON array.
#[derive(Debug)]
pub struct SeedStore {
    path: PathBuf,
}

impl SeedStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> Vec<serde_json::Value> {
        read_json_or_default(&self.path)
    }

    /// Every readable seed, oldest first. Entries that don't parse are skipped.
    pub fn list(&self) -> Vec<Seed> {
        self.entries()
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(seed) => Some(seed),
                Err(err) => {
                    log::warn!(
                        "Skipping seed #{index} in {}: {err}",
                        self.path.display()
                    );
                    None
                }
            })
            .collect()
    }

    /// First entry whose `seedId` is `id`. A matching entry that doesn't parse
    /// is reported as unreadable rather than missing.
    pub fn find_by_id(&self, id: &str) -> Result<Seed> {
        let entry = self
            .entries()
            .into_iter()
            .find(|entry| entry.get("seedId").and_then(serde_json::Value::as_str) == Some(id))
            .ok_or_else(|| GameError::SeedNotFound(id.to_owned()))?;
        serde_json::from_value(entry).map_err(|err| GameError::UnreadableSeed {
            id: id.to_owned(),
            reason: err.to_string(),
        })
    }

    /// Re-reads the list, appends `seed` and writes the whole list back.
    pub fn append(&self, seed: Seed) -> core::result::Result<(), StoreError> {
        let mut seeds = self.list();
        log::debug!("Saving seed {} ({} stored)", seed.seed_id, seeds.len());
        seeds.push(seed);
        write_json(&self.path, &seeds)
    }

    pub fn clear(&self) -> core::result::Result<(), StoreError> {
        log::debug!("Clearing seeds in {}", self.path.display());
        write_json(&self.path, &[] as &[Seed])
    }
}
