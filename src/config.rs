use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::path::MotionConfig;
use crate::typing::TypingConfig;

/// Main configuration for humanctl
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub typing: TypingConfig,
    #[serde(default)]
    pub device: DeviceSettings,
}

/// Virtual input device configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeviceSettings {
    #[serde(default = "default_device_name")]
    pub name: String,
    /// Where the pointer is assumed to be when the device is created
    #[serde(default)]
    pub origin_x: i32,
    #[serde(default)]
    pub origin_y: i32,
    /// Scroll distance in pixels per wheel notch
    #[serde(default = "default_pixels_per_notch")]
    pub pixels_per_notch: f64,
}

fn default_device_name() -> String {
    "humanctl virtual device".to_string()
}

fn default_pixels_per_notch() -> f64 {
    100.0
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            name: default_device_name(),
            origin_x: 0,
            origin_y: 0,
            pixels_per_notch: default_pixels_per_notch(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/humanctl/config.toml")
    }

    /// Load config from the default path, returning defaults if the file is
    /// missing or unreadable
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), "falling back to default config: {}", e);
                Self::default()
            }
        }
    }

    /// Load config from `path`, failing on any read or parse error
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }
}
