// src/config.rs

//! Configuration loading utilities.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load a configuration file, falling back to defaults when it is missing
/// or unreadable, then validate it.
pub fn load_all(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path);
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration in {path:?}: {e}")))?;
    Ok(config)
}

/// Load and validate a configuration file that must exist.
pub fn load_strict(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    config.validate()?;
    Ok(config)
}
