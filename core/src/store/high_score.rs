use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{read_json_or_default, write_json};
use crate::{Score, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    #[serde(rename = "highScore")]
    high_score: Score,
}

/// Best total ever observed, kept in memory and mirrored to disk.
#[derive(Debug)]
pub struct HighScoreStore {
    path: PathBuf,
    high_score: Score,
}

impl HighScoreStore {
    pub fn load(path: PathBuf) -> Self {
        let record: HighScoreRecord = read_json_or_default(&path);
        Self {
            path,
            high_score: record.high_score,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Score {
        self.high_score
    }

    /// Raises the high score to `total` if it beats it, writing the record when it
    /// does. Returns whether `total` was a new high score, even when the write fails.
    pub fn record_if_higher(&mut self, total: Score) -> (bool, Result<(), StoreError>) {
        if total > self.high_score {
            log::info!("New high score {total} (was {})", self.high_score);
            self.high_score = total;
            (true, self.save())
        } else {
            (false, Ok(()))
        }
    }

    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.high_score = 0;
        self.save()
    }

    pub fn save(&self) -> Result<(), StoreError> {
        write_json(
            &self.path,
            &HighScoreRecord {
                high_score: self.high_score,
            },
        )
    }
}
