//! Configuration management for slotcache

mod io;
mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cache::CacheSettings;

impl Config {
    /// Get the config file path (~/.config/slotcache/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        io::config_path()
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        io::load_from(&io::config_path()?)
    }

    /// Load configuration from a specific file, or defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        io::load_from(path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        io::save_to(self, path)
    }

    /// Capacity settings for the image cache
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            extra_slots: self.cache.extra_slots,
            pre_reading: self.cache.pre_reading,
        }
    }

    /// Loader thread count, never below one
    pub fn loader_threads(&self) -> usize {
        self.loader.threads.max(1)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
