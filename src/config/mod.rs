//! Configuration management for hutcam
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use hutcam::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Storage endpoint: {}", config.storage.base_url);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `HUTCAM__<section>__<key>`
//!
//! Examples:
//! - `HUTCAM__STORAGE__BASE_URL=https://cams.example.net`
//! - `HUTCAM__NAVIGATION__MAX_SCAN_DAYS=3`
//! - `HUTCAM__LATEST__STALE_AFTER_MINUTES=45`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/hutcam.toml`.
//! This can be overridden using the `HUTCAM_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use models::{
    CamerasConfig, Config, FetchConfig, LatestConfig, NavigationConfig, StorageConfig,
};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`HUTCAM__*`)
    /// 2. TOML file (default: `config/hutcam.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or validation
    /// fails (bad base URL, empty camera list, zero scan bound).
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
