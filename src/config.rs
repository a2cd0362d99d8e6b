//! Configuration module for the snapshot reader

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::error::BookError;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding one snapshot file per record address
    pub snapshot_dir: PathBuf,

    /// File extension of snapshot files
    pub snapshot_extension: String,

    /// Price levels to display per side
    pub depth_levels: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            snapshot_dir: env::var("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./snapshots")),
            snapshot_extension: env::var("SNAPSHOT_EXTENSION")
                .unwrap_or_else(|_| "bin".to_string()),
            depth_levels: env::var("DEPTH_LEVELS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BookError> {
        if self.snapshot_extension.is_empty() {
            return Err(BookError::ConfigError(
                "SNAPSHOT_EXTENSION must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("./snapshots"),
            snapshot_extension: "bin".to_string(),
            depth_levels: 20,
        }
    }
}
