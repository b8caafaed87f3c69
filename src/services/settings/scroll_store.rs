use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::services::scroll::ScrollSnapshot;

/// Last scroll position, kept next to the settings as a JSON pair `[x, y]`.
pub struct ScrollPositionStore {
    path: PathBuf,
}

impl ScrollPositionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved pair. Nothing saved yet means the origin; saved values
    /// that are negative or not finite are reset to zero.
    pub fn load(&self) -> Result<ScrollSnapshot> {
        if !self.path.exists() {
            return Ok(ScrollSnapshot::default());
        }

        let data = fs::read_to_string(&self.path).with_context(|| {
            format!("Failed to read scroll position from {}", self.path.display())
        })?;
        let values: [f32; 2] = serde_json::from_str(&data).with_context(|| {
            format!("Failed to parse scroll position in {}", self.path.display())
        })?;
        Ok(ScrollSnapshot::from_values(values))
    }

    /// Like [`ScrollPositionStore::load`], but logs and starts at the origin
    /// when the file cannot be used.
    pub fn load_or_origin(&self) -> ScrollSnapshot {
        self.load().unwrap_or_else(|e| {
            log::warn!("Failed to restore scroll position: {e:#}");
            ScrollSnapshot::default()
        })
    }

    pub fn save(&self, snapshot: ScrollSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }

        let data = serde_json::to_string(&snapshot.to_values())
            .context("Failed to serialize scroll position")?;
        fs::write(&self.path, data).with_context(|| {
            format!("Failed to write scroll position to {}", self.path.display())
        })?;
        Ok(())
    }
}
