//! Persistence for player settings and the high score
//!
//! Settings are read once at startup and written back whenever something
//! changes. The JSON file layout is:
//!
//! ```json
//! {
//!   "sound_enabled": true,
//!   "vibration_enabled": true,
//!   "high_score": 120,
//!   "skin": "classic",
//!   "game_mode": "survival"
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::skin::Skin;
use crate::game::GameMode;

/// Everything that survives between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub high_score: u32,
    pub skin: Skin,
    pub game_mode: GameMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
            high_score: 0,
            skin: Skin::default(),
            game_mode: GameMode::default(),
        }
    }
}

/// Where settings live between sessions
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings stored as pretty-printed JSON on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    /// Missing files give defaults; unreadable JSON is logged and replaced by defaults
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = ?self.path, "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {:?}", self.path))?;

        match serde_json::from_str(&json) {
            Ok(settings) => Ok(settings),
            Err(error) => {
                warn!(path = ?self.path, %error, "corrupt settings file, using defaults");
                Ok(Settings::default())
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;

        Ok(())
    }
}

/// In-process store used by tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RefCell<Settings>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RefCell::new(settings),
            saves: RefCell::new(0),
        }
    }

    /// How many times `save` was called
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.borrow().clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.borrow_mut() = settings.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
