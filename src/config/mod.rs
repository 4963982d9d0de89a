//! Configuration management for fruitbox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. `.env` file in the working directory (or a parent)
//! 4. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use fruitbox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `FRUITBOX__<section>__<key>`
//!
//! Examples:
//! - `FRUITBOX__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `FRUITBOX__STORAGE__BACKEND=memory`
//! - `FRUITBOX__STORAGE__PATH=/var/lib/fruitbox`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/fruitbox.toml`.
//! This can be overridden using the `FRUITBOX_CONFIG` environment variable.
//! Each `[resources.<name>]` table mounts the resource routes under `path`.

mod models;
mod sources;
mod validation;

pub use models::{
    ApiLimits, Config, ResourceConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use validation::ValidationError;

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
    /// 1. Environment variables (`FRUITBOX__*`)
    /// 2. TOML file (default: `config/fruitbox.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (bad mount paths, duplicate mounts, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// `.env` and environment overrides still apply.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_path(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check mount paths, collection names, and limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}
