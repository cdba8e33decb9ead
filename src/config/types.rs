//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::pool::DEFAULT_LOADER_THREADS;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

/// Image cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Slots kept for previously viewed images (on top of the current one)
    #[serde(default = "default_extra_slots")]
    pub extra_slots: usize,
    /// Load the next image in the background while the current one is shown
    #[serde(default = "default_pre_reading")]
    pub pre_reading: bool,
}

pub fn default_extra_slots() -> usize {
    2
}

pub fn default_pre_reading() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            extra_slots: default_extra_slots(),
            pre_reading: default_pre_reading(),
        }
    }
}

/// Background loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Worker threads for pre-reading
    #[serde(default = "default_threads")]
    pub threads: usize,
}

pub fn default_threads() -> usize {
    DEFAULT_LOADER_THREADS
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}
