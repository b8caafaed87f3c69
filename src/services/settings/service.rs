use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::settings::TimetableSettings;

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings file. A missing file yields the defaults.
    pub fn get(&self) -> Result<TimetableSettings> {
        if !self.path.exists() {
            return Ok(TimetableSettings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let settings = toml::from_str(&data)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        Ok(settings)
    }

    /// Like [`SettingsService::get`], but logs and falls back to defaults
    /// when the file cannot be used.
    pub fn get_or_default(&self) -> TimetableSettings {
        match self.get() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load settings: {e:#}, using defaults");
                TimetableSettings::default()
            }
        }
    }

    pub fn update(&self, settings: &TimetableSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;
        Ok(())
    }

    pub fn reset(&self) -> Result<()> {
        self.update(&TimetableSettings::default())
    }
}
