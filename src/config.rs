//! Application configuration management.
//!
//! This module handles loading application-wide defaults for flags the
//! user does not want to repeat per invocation, such as the seed file
//! and the bulk-load policy. CLI flags override config values.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cache::LoadPolicy;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seed file loaded into the cache before any query.
    #[serde(default)]
    pub seed: Option<PathBuf>,

    /// Policy for malformed seed entries.
    #[serde(default)]
    pub load_policy: LoadPolicy,

    /// Lowest similarity score that is reported (1..=100).
    #[serde(default = "default_min_score")]
    pub min_score: u8,
}

fn default_min_score() -> u8 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            load_policy: LoadPolicy::default(),
            min_score: default_min_score(),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "simsieve", "simsieve")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}
