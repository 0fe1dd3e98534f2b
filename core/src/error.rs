use std::path::PathBuf;

use thiserror::Error;

use crate::Coord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Seed board is {found_rows}x{found_cols}, expected {expected}x{expected}")]
    DimensionMismatch {
        expected: Coord,
        found_rows: usize,
        found_cols: usize,
    },
    #[error("Seed not found: {0}")]
    SeedNotFound(String),
    #[error("Seed {id} is unreadable: {reason}")]
    UnreadableSeed { id: String, reason: String },
    #[error("Difficulty thresholds must be strictly increasing and below 100")]
    InvalidProfile,
    #[error("Difficulty profile has {found} thresholds, tile table needs {expected}")]
    ProfileLengthMismatch { expected: usize, found: usize },
    #[error("Board size must be at least 1")]
    InvalidSize,
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure reading or writing one of the persisted records.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Write { path, .. }
            | Self::Encode { path, .. } => path,
        }
    }
}
