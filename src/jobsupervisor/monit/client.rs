// src/jobsupervisor/monit/client.rs

//! Client abstraction over the monit daemon's control interface.

use std::fmt::Debug;

use thiserror::Error;

use crate::jobsupervisor::monit::status::MonitStatus;
use crate::types::BoxFuture;

/// Errors talking to the monit daemon.
#[derive(Debug, Error)]
pub enum MonitError {
    /// The HTTP request itself failed (connection refused, timeout, ...).
    #[error("monit request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Monit answered with a non-2xx status code.
    #[error("monit API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("could not parse monit status: {0}")]
    Parse(String),
}

/// Service actions monit accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Unmonitor,
}

impl ServiceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Unmonitor => "unmonitor",
        }
    }
}

pub trait MonitClient: Send + Sync + Debug {
    fn service_action<'a>(
        &'a self,
        service: &'a str,
        action: ServiceAction,
    ) -> BoxFuture<'a, Result<(), MonitError>>;

    fn status(&self) -> BoxFuture<'_, Result<MonitStatus, MonitError>>;

    /// Names of the services belonging to `group`.
    fn services_in_group<'a>(
        &'a self,
        group: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, MonitError>> {
        Box::pin(async move { Ok(self.status().await?.service_names_in_group(group)) })
    }
}
