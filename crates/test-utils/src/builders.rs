#![allow(dead_code)]

use hostagent::applyspec::{ApplySpec, JobTemplateSpec};
use hostagent::jobsupervisor::monit::{MonitService, MonitStatus};

/// Builder for `ApplySpec` to simplify test setup.
pub struct ApplySpecBuilder {
    spec: ApplySpec,
}

impl ApplySpecBuilder {
    pub fn new() -> Self {
        Self {
            spec: ApplySpec::default(),
        }
    }

    pub fn with_job(mut self, name: &str) -> Self {
        self.spec.job.templates.push(JobTemplateSpec::new(name));
        self
    }

    pub fn build(self) -> ApplySpec {
        self.spec
    }
}

impl Default for ApplySpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `MonitStatus` snapshots.
pub struct MonitStatusBuilder {
    status: MonitStatus,
}

impl MonitStatusBuilder {
    pub fn new(incarnation: u64) -> Self {
        Self {
            status: MonitStatus {
                incarnation,
                ..MonitStatus::default()
            },
        }
    }

    /// Add a healthy, monitored service to `group`.
    pub fn running(self, group: &str, name: &str) -> Self {
        self.service(group, name, 0, 1, 0)
    }

    /// Add a service whose monitoring is still initialising.
    pub fn initializing(self, group: &str, name: &str) -> Self {
        self.service(group, name, 0, 2, 0)
    }

    /// Add a monitored service reporting an error.
    pub fn erroring(self, group: &str, name: &str) -> Self {
        self.service(group, name, 512, 1, 0)
    }

    pub fn service(
        mut self,
        group: &str,
        name: &str,
        status: u32,
        monitor: u32,
        pending_action: u32,
    ) -> Self {
        self.status.services.push(MonitService {
            name: name.to_string(),
            status,
            monitor,
            pending_action,
        });
        self.status
            .groups
            .entry(group.to_string())
            .or_default()
            .push(name.to_string());
        self
    }

    pub fn build(self) -> MonitStatus {
        self.status
    }
}
