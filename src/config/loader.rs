// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{AgentConfig, RawAgentConfig};
use crate::errors::Result;

/// Load a configuration file and return the raw, unvalidated config.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawAgentConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawAgentConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file, apply defaults and validate it.
///
/// This is the entry point the rest of the agent uses.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<AgentConfig> {
    let raw_config = load_from_path(&path)?;
    let config = AgentConfig::try_from(raw_config)?;
    Ok(config)
}
