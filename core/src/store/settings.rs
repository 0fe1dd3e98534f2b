use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::{read_json_or_default, write_json};
use crate::{Difficulty, StoreError};

/// Color scheme of the front end. Stored, never interpreted by the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Rendering backend of the front end. Stored, never interpreted by the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Renderer {
    Software,
    #[default]
    HardwareAccelerated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub difficulty: Difficulty,
    pub sound_enabled: bool,
    pub animations_enabled: bool,
    #[serde(deserialize_with = "or_default")]
    pub theme: Theme,
    #[serde(deserialize_with = "or_default")]
    pub renderer: Renderer,
}

/// Reads a presentation-only field, substituting its default for values other
/// front ends may have written.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        log::debug!("Ignoring stored presentation setting: {err}");
        T::default()
    }))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            sound_enabled: true,
            animations_enabled: true,
            theme: Theme::Light,
            renderer: Renderer::HardwareAccelerated,
        }
    }
}

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    pub fn load(path: PathBuf) -> Self {
        let settings = read_json_or_default(&path);
        Self { path, settings }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Applies `change` in memory and writes the record. The in-memory value is
    /// kept even if the write fails.
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) -> Result<(), StoreError> {
        change(&mut self.settings);
        self.save()
    }

    pub fn save(&self) -> Result<(), StoreError> {
        write_json(&self.path, &self.settings)
    }
}
