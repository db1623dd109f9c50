// src/config/mod.rs

//! Configuration loading and validation for the agent.
//!
//! - `model.rs` defines the TOML-backed data model.
//! - `loader.rs` reads a config file from disk.
//! - `validate.rs` turns a raw config into a validated [`AgentConfig`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{AgentConfig, AgentSection, MonitSection, RawAgentConfig};
