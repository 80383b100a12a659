//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use quakestat_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Load layered configuration: defaults, then the config file, then the environment
pub fn load_config(config_file: Option<&Path>) -> Result<LayeredConfig> {
    let config = LayeredConfig::with_defaults()
        .load_optional_file(config_file)
        .context("Failed to load configuration file")?
        .load_from_env();

    Ok(config)
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(
    config_file: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = load_config(config_file)?;
    config.update_from_cli(overrides);
    Ok(config)
}
