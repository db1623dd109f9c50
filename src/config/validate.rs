// src/config/validate.rs

use crate::config::model::{AgentConfig, RawAgentConfig};
use crate::errors::{AgentError, Result};
use crate::jobsupervisor::SUPERVISOR_NAMES;

impl TryFrom<RawAgentConfig> for AgentConfig {
    type Error = crate::errors::AgentError;

    fn try_from(raw: RawAgentConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(AgentConfig::new_unchecked(raw.agent, raw.monit))
    }
}

fn validate_raw_config(cfg: &RawAgentConfig) -> Result<()> {
    validate_supervisor(cfg)?;
    validate_base_dir(cfg)?;
    validate_monit(cfg)?;
    Ok(())
}

fn validate_supervisor(cfg: &RawAgentConfig) -> Result<()> {
    let name = cfg.agent.supervisor.as_str();
    if !SUPERVISOR_NAMES.contains(&name) {
        return Err(AgentError::ConfigError(format!(
            "[agent].supervisor must be one of {:?} (got '{}')",
            SUPERVISOR_NAMES, name
        )));
    }
    Ok(())
}

fn validate_base_dir(cfg: &RawAgentConfig) -> Result<()> {
    if cfg.agent.base_dir.as_os_str().is_empty() {
        return Err(AgentError::ConfigError(
            "[agent].base_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_monit(cfg: &RawAgentConfig) -> Result<()> {
    if cfg.agent.supervisor != "monit" {
        return Ok(());
    }

    let url = cfg.monit.url.trim();
    if url.is_empty() {
        return Err(AgentError::ConfigError(
            "[monit].url must be set when the monit supervisor is used".to_string(),
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AgentError::ConfigError(format!(
            "[monit].url must be an http(s) URL (got '{}')",
            url
        )));
    }
    Ok(())
}
