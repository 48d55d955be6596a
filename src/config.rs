// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading the run
//! configuration and the source list from a storage directory.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, Sources};

/// Load configuration from `config.toml`, falling back to defaults with
/// a logged warning when the file is missing or malformed.
pub fn load_config(base_path: &Path) -> Config {
    Config::load_or_default(base_path.join("config.toml"))
}

/// Load the source list from `sources.toml`.
///
/// Unlike the run configuration there is no useful default here: with no
/// sources there is nothing to scrape.
pub fn load_sources(base_path: &Path) -> Result<Sources> {
    let path = base_path.join("sources.toml");
    if !path.exists() {
        return Err(AppError::config(format!(
            "Source list not found at {}",
            path.display()
        )));
    }
    Sources::load(&path)
}

/// Load and validate both configuration and sources.
pub fn load_all(base_path: &Path) -> Result<(Config, Sources)> {
    let config = load_config(base_path);
    config.validate()?;

    let sources = load_sources(base_path)?;
    sources
        .validate()
        .map_err(|e| AppError::config(format!("Invalid source list: {e}")))?;

    Ok((config, sources))
}
