// src/jobsupervisor/provider.rs

//! Construction of the configured job supervisor.

use std::sync::Arc;

use crate::dirs::DirProvider;
use crate::errors::{AgentError, Result};
use crate::jobsupervisor::monit::MonitClient;
use crate::jobsupervisor::{
    DummyJobSupervisor, DummyNatsJobSupervisor, MonitJobSupervisor, MonitReloadOptions,
    Supervisor,
};
use crate::mbus::MessageHandler;
use crate::platform::Platform;

/// Local port monit delivers failure alerts to.
pub const JOB_FAILURES_SERVER_PORT: u16 = 2825;

/// Names accepted by [`SupervisorProvider::get`].
pub const SUPERVISOR_NAMES: [&str; 3] = ["monit", "dummy", "dummy-nats"];

#[derive(Debug, Clone)]
pub struct SupervisorProvider {
    platform: Platform,
    client: Arc<dyn MonitClient>,
    dirs: DirProvider,
    handler: Arc<dyn MessageHandler>,
}

impl SupervisorProvider {
    pub fn new(
        platform: Platform,
        client: Arc<dyn MonitClient>,
        dirs: DirProvider,
        handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            platform,
            client,
            dirs,
            handler,
        }
    }

    pub fn get(&self, name: &str) -> Result<Supervisor> {
        match name {
            "monit" => Ok(Supervisor::Monit(MonitJobSupervisor::new(
                Arc::clone(self.platform.fs()),
                Arc::clone(self.platform.runner()),
                Arc::clone(&self.client),
                self.dirs.clone(),
                JOB_FAILURES_SERVER_PORT,
                MonitReloadOptions::default(),
            ))),
            "dummy" => Ok(Supervisor::Dummy(DummyJobSupervisor::new())),
            "dummy-nats" => Ok(Supervisor::DummyNats(DummyNatsJobSupervisor::new(
                Arc::clone(&self.handler),
            ))),
            other => Err(AgentError::SupervisorNotFound(other.to_string())),
        }
    }
}
