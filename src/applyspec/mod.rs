// src/applyspec/mod.rs

//! The applied job specification, as far as this crate reads it.
//!
//! The spec is persisted as JSON by the component that applies it:
//!
//! ```json
//! {
//!   "deployment": "cf",
//!   "name": "router",
//!   "index": 0,
//!   "job": { "templates": [{ "name": "gorouter" }, { "name": "metron" }] }
//! }
//! ```
//!
//! Unknown fields are ignored.

use serde::Deserialize;

pub mod service;

pub use service::{FileSpecService, SpecService};

/// One installed job template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobTemplateSpec {
    pub name: String,
}

impl JobTemplateSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `job` section of the apply spec.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub name: Option<String>,

    /// Installed templates, in the order they were applied.
    #[serde(default)]
    pub templates: Vec<JobTemplateSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApplySpec {
    #[serde(default)]
    pub deployment: Option<String>,

    /// Instance group name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub index: Option<u32>,

    #[serde(default)]
    pub job: JobSpec,
}

impl ApplySpec {
    pub fn job_template_specs(&self) -> &[JobTemplateSpec] {
        &self.job.templates
    }
}
