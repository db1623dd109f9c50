// src/jobsupervisor/mod.rs

//! Job supervision: keeping the processes of installed jobs running.
//!
//! - [`JobSupervisor`] is the capability set every supervisor offers.
//! - [`Supervisor`] is the flat enum over the three implementations:
//!   monit-backed, no-op, and no-op with message-bus failure injection.
//! - [`provider`] maps configuration names to supervisors.

use std::path::Path;
use std::sync::Arc;

use crate::errors::Result;
use crate::types::BoxFuture;

pub mod dummy;
pub mod dummy_nats;
pub mod monit;
pub mod provider;

pub use dummy::DummyJobSupervisor;
pub use dummy_nats::DummyNatsJobSupervisor;
pub use monit::{MonitJobSupervisor, MonitReloadOptions};
pub use provider::{SupervisorProvider, JOB_FAILURES_SERVER_PORT, SUPERVISOR_NAMES};

/// Aggregate job status reported upward.
pub const STATUS_RUNNING: &str = "running";
pub const STATUS_STARTING: &str = "starting";
pub const STATUS_FAILING: &str = "failing";
pub const STATUS_UNKNOWN: &str = "unknown";

/// A process failure notification raised by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alert {
    pub id: String,
    pub service: String,
    pub event: String,
    pub action: String,
    pub date: String,
    pub description: String,
}

/// Callback receiving job failure alerts.
pub type JobFailureHandler = Arc<dyn Fn(Alert) -> anyhow::Result<()> + Send + Sync>;

pub trait JobSupervisor: Send + Sync {
    /// Make the supervisor pick up changed job configuration and wait until
    /// it is active.
    fn reload(&self) -> BoxFuture<'_, Result<()>>;

    fn start(&self) -> BoxFuture<'_, Result<()>>;

    fn stop(&self) -> BoxFuture<'_, Result<()>>;

    fn unmonitor(&self) -> BoxFuture<'_, Result<()>>;

    /// One of [`STATUS_RUNNING`], [`STATUS_STARTING`], [`STATUS_FAILING`] or
    /// [`STATUS_UNKNOWN`] (the dummy-nats supervisor reports whatever it was
    /// last told).
    fn status(&self) -> BoxFuture<'_, String>;

    /// Install the supervisor config of job `job_name` at position
    /// `job_index`.
    fn add_job(&self, job_name: &str, job_index: usize, config_path: &Path) -> Result<()>;

    fn remove_all_jobs(&self) -> Result<()>;

    /// Deliver job failure alerts to `handler`. For the monit supervisor
    /// this runs the alert listener and only returns on error.
    fn monitor_job_failures(&self, handler: JobFailureHandler) -> BoxFuture<'_, Result<()>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Supervisor {
    Monit(MonitJobSupervisor),
    Dummy(DummyJobSupervisor),
    DummyNats(DummyNatsJobSupervisor),
}

impl Supervisor {
    fn inner(&self) -> &dyn JobSupervisor {
        match self {
            Supervisor::Monit(s) => s,
            Supervisor::Dummy(s) => s,
            Supervisor::DummyNats(s) => s,
        }
    }
}

impl JobSupervisor for Supervisor {
    fn reload(&self) -> BoxFuture<'_, Result<()>> {
        self.inner().reload()
    }

    fn start(&self) -> BoxFuture<'_, Result<()>> {
        self.inner().start()
    }

    fn stop(&self) -> BoxFuture<'_, Result<()>> {
        self.inner().stop()
    }

    fn unmonitor(&self) -> BoxFuture<'_, Result<()>> {
        self.inner().unmonitor()
    }

    fn status(&self) -> BoxFuture<'_, String> {
        self.inner().status()
    }

    fn add_job(&self, job_name: &str, job_index: usize, config_path: &Path) -> Result<()> {
        self.inner().add_job(job_name, job_index, config_path)
    }

    fn remove_all_jobs(&self) -> Result<()> {
        self.inner().remove_all_jobs()
    }

    fn monitor_job_failures(&self, handler: JobFailureHandler) -> BoxFuture<'_, Result<()>> {
        self.inner().monitor_job_failures(handler)
    }
}
