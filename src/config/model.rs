// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Agent configuration as read from a TOML file.
///
/// ```toml
/// [agent]
/// supervisor = "monit"
/// base_dir = "/var/vcap"
///
/// [monit]
/// url = "http://127.0.0.1:2822"
/// user = "vcap"
/// password = "secret"
/// ```
///
/// All sections are optional and have defaults matching a standard host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAgentConfig {
    #[serde(default)]
    pub agent: AgentSection,

    #[serde(default)]
    pub monit: MonitSection,
}

/// Validated configuration. Only constructed through
/// `AgentConfig::try_from(RawAgentConfig)`.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub agent: AgentSection,
    pub monit: MonitSection,
}

impl AgentConfig {
    pub(crate) fn new_unchecked(agent: AgentSection, monit: MonitSection) -> Self {
        Self { agent, monit }
    }
}

/// `[agent]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentSection {
    /// `"monit"`, `"dummy"` or `"dummy-nats"`.
    #[serde(default = "default_supervisor")]
    pub supervisor: String,

    /// Root of the agent's directory layout.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

fn default_supervisor() -> String {
    "monit".to_string()
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("/var/vcap")
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            supervisor: default_supervisor(),
            base_dir: default_base_dir(),
        }
    }
}

/// `[monit]` section: how to reach the daemon's HTTP interface.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitSection {
    #[serde(default = "default_monit_url")]
    pub url: String,

    #[serde(default = "default_monit_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,
}

fn default_monit_url() -> String {
    "http://127.0.0.1:2822".to_string()
}

fn default_monit_user() -> String {
    "vcap".to_string()
}

impl Default for MonitSection {
    fn default() -> Self {
        Self {
            url: default_monit_url(),
            user: default_monit_user(),
            password: String::new(),
        }
    }
}
