//! # Settings
//!
//! Runtime settings for the `padstate` binary, stored as TOML under the user's
//! configuration directory (`~/.config/padstate/config.toml` on Linux).
//!
//! Loading is fail-safe: a missing file is created with defaults, and an
//! unreadable or malformed file is reported and replaced by defaults in memory
//! so the poller still starts. Keys missing from a file take their default
//! values, which keeps older files valid when settings are added.

use crate::controller::controller_handle::ControllerSettings;
use crate::source::GilrsSettings;
use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "padstate";
const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Pause between two controller updates in milliseconds
    pub poll_interval_ms: u64,
    /// Gamepad to read from, by index in connection order
    pub gamepad_index: Option<usize>,
    /// Log every changed snapshot at info level
    pub log_snapshots: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_ms: ControllerSettings::default().poll_interval_ms,
            gamepad_index: None,
            log_snapshots: true,
        }
    }
}

impl Settings {
    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| eyre!("No config directory available"))?;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| eyre!("Failed to parse settings: {}", e))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| eyre!("Failed to serialize settings: {}", e))
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read {}: {}", path.display(), e))?;
        let settings = Self::from_toml_str(&content)?;
        debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| eyre!("Failed to create config directory: {}", e))?;
        }
        tokio::fs::write(path, self.to_toml_string()?)
            .await
            .map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Load settings from `path`, writing defaults there if it does not exist.
    pub async fn load_or_default(path: &Path) -> Self {
        let exists = tokio::fs::try_exists(path).await.unwrap_or(false);
        if !exists {
            info!("No settings at {}, writing defaults", path.display());
            let settings = Self::default();
            if let Err(e) = settings.save_to(path).await {
                warn!("Unable to write default settings: {}", e);
            }
            return settings;
        }

        match Self::load_from(path).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{}, falling back to defaults", e);
                Self::default()
            }
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    pub fn source_settings(&self) -> GilrsSettings {
        GilrsSettings {
            gamepad_index: self.gamepad_index,
        }
    }
}
