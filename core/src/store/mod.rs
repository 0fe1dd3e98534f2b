//! Flat JSON records persisted next to each other in one data directory.
//!
//! Reads never fail: a missing or unreadable record falls back to its default
//! and the problem is logged. Writes report a [`StoreError`] which the session
//! downgrades to a warning.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::StoreError;
pub use high_score::*;
pub use seeds::*;
pub use settings::*;

mod high_score;
mod seeds;
mod settings;

/// Every persisted record the game uses, opened from one directory.
#[derive(Debug)]
pub struct Stores {
    pub settings: SettingsStore,
    pub high_score: HighScoreStore,
    pub seeds: SeedStore,
}

impl Stores {
    pub const SETTINGS_FILE: &'static str = "settings.json";
    pub const HIGH_SCORE_FILE: &'static str = "highscore.json";
    pub const SEED_FILE: &'static str = "seeds.json";

    /// Loads settings and high score from `dir`. The seed list is read on demand.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        log::debug!("Opening stores in {}", dir.display());
        Self {
            settings: SettingsStore::load(dir.join(Self::SETTINGS_FILE)),
            high_score: HighScoreStore::load(dir.join(Self::HIGH_SCORE_FILE)),
            seeds: SeedStore::new(dir.join(Self::SEED_FILE)),
        }
    }
}

/// Reads and parses `path`, `Ok(None)` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_owned(),
                source,
            });
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_owned(),
            source,
        })
}

/// Like [`read_json`], substituting the default for anything that can't be read.
pub(crate) fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json(path) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::debug!("{} not found, using defaults", path.display());
            T::default()
        }
        Err(err) => {
            log::warn!("{err}, using defaults");
            T::default()
        }
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        path: path.to_owned(),
        source,
    })?;
    let write_err = |source| StoreError::Write {
        path: path.to_owned(),
        source,
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)
}
