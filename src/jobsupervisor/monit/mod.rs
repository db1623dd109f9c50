// src/jobsupervisor/monit/mod.rs

//! Monit-backed job supervisor.
//!
//! - [`client`] / [`http_client`] talk to the daemon.
//! - [`status`] parses its status document.
//! - [`reload`] holds the pure reload state machine; this module drives it.
//! - [`alerts`] receives monit's failure alerts.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::dirs::DirProvider;
use crate::errors::{AgentError, Result};
use crate::fs::FileSystem;
use crate::jobsupervisor::{
    JobFailureHandler, JobSupervisor, STATUS_FAILING, STATUS_RUNNING, STATUS_STARTING,
    STATUS_UNKNOWN,
};
use crate::platform::{CmdRunner, Command};
use crate::types::BoxFuture;

pub mod alerts;
pub mod client;
pub mod http_client;
pub mod reload;
pub mod status;

pub use client::{MonitClient, MonitError, ServiceAction};
pub use http_client::HttpMonitClient;
pub use reload::{MonitReloadOptions, ReloadCommand, ReloadEvent, ReloadMachine, ReloadReport, ReloadState};
pub use status::{MonitService, MonitStatus};

/// Monit service group containing every job process.
pub const JOB_GROUP: &str = "vcap";

#[derive(Clone)]
pub struct MonitJobSupervisor {
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CmdRunner>,
    client: Arc<dyn MonitClient>,
    dirs: DirProvider,
    job_failures_server_port: u16,
    reload_options: MonitReloadOptions,
}

impl MonitJobSupervisor {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn CmdRunner>,
        client: Arc<dyn MonitClient>,
        dirs: DirProvider,
        job_failures_server_port: u16,
        reload_options: MonitReloadOptions,
    ) -> Self {
        Self {
            fs,
            runner,
            client,
            dirs,
            job_failures_server_port,
            reload_options,
        }
    }

    pub fn reload_options(&self) -> MonitReloadOptions {
        self.reload_options
    }

    pub fn job_failures_server_port(&self) -> u16 {
        self.job_failures_server_port
    }

    /// Reload monit and wait for the new configuration to be active,
    /// reporting the retry budget consumed.
    ///
    /// Each call runs an independent [`ReloadMachine`]; intermediate
    /// failures are logged, only exhaustion is returned.
    pub async fn reload_with_report(&self) -> Result<ReloadReport> {
        let mut machine = ReloadMachine::new(self.reload_options, JOB_GROUP);
        let mut command = machine.start();

        loop {
            let event = match command {
                ReloadCommand::FetchBaseline { attempt } => {
                    let baseline = match self.client.status().await {
                        Ok(status) => Some(status.incarnation),
                        Err(e) => {
                            warn!(attempt, error = %e, "failed to fetch monit incarnation before reload");
                            None
                        }
                    };
                    ReloadEvent::BaselineFetched(baseline)
                }
                ReloadCommand::IssueReload { attempt } => {
                    ReloadEvent::ReloadIssued(self.run_reload_command(attempt).await)
                }
                ReloadCommand::CheckStatus {
                    attempt,
                    check,
                    delay,
                } => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let status = match self.client.status().await {
                        Ok(status) => {
                            debug!(attempt, check, incarnation = status.incarnation, "checked monit status");
                            Some(status)
                        }
                        Err(e) => {
                            warn!(attempt, check, error = %e, "failed to check monit status");
                            None
                        }
                    };
                    ReloadEvent::StatusChecked(status)
                }
                ReloadCommand::Converged(report) => {
                    info!(
                        attempts = report.attempts,
                        checks = report.checks,
                        before = report.before,
                        after = report.after,
                        "monit reloaded"
                    );
                    return Ok(report);
                }
                ReloadCommand::Exhausted {
                    attempts,
                    before,
                    after,
                } => {
                    warn!(attempts, ?before, ?after, "giving up reloading monit");
                    return Err(AgentError::ReloadExhausted {
                        attempts,
                        before,
                        after,
                    });
                }
            };

            command = machine.step(event);
        }
    }

    async fn run_reload_command(&self, attempt: u32) -> bool {
        info!(attempt, "reloading monit");

        match self.runner.run_command(Command::new("monit").arg("reload")).await {
            Ok(output) if output.success() => true,
            Ok(output) => {
                warn!(
                    attempt,
                    exit_code = output.exit_code,
                    stderr = %output.stderr.trim(),
                    "monit reload exited with failure"
                );
                false
            }
            Err(e) => {
                warn!(attempt, error = %e, "monit reload could not be run");
                false
            }
        }
    }

    async fn apply_to_group(&self, action: ServiceAction) -> Result<()> {
        let services = self.client.services_in_group(JOB_GROUP).await?;

        for service in services {
            debug!(service = %service, action = action.as_str(), "applying monit action");
            self.client.service_action(&service, action).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for MonitJobSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitJobSupervisor")
            .field("client", &self.client)
            .field("dirs", &self.dirs)
            .field("job_failures_server_port", &self.job_failures_server_port)
            .field("reload_options", &self.reload_options)
            .finish_non_exhaustive()
    }
}

impl PartialEq for MonitJobSupervisor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fs, &other.fs)
            && Arc::ptr_eq(&self.runner, &other.runner)
            && Arc::ptr_eq(&self.client, &other.client)
            && self.dirs == other.dirs
            && self.job_failures_server_port == other.job_failures_server_port
            && self.reload_options == other.reload_options
    }
}

/// Aggregate status of the job group.
fn group_status(status: &MonitStatus) -> &'static str {
    let services = status.services_in_group(JOB_GROUP);

    if services.iter().any(|s| s.is_failing()) {
        STATUS_FAILING
    } else if services.iter().any(|s| s.is_pending()) {
        STATUS_STARTING
    } else {
        STATUS_RUNNING
    }
}

impl JobSupervisor for MonitJobSupervisor {
    fn reload(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { self.reload_with_report().await.map(|_| ()) })
    }

    fn start(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.apply_to_group(ServiceAction::Start))
    }

    fn stop(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.apply_to_group(ServiceAction::Stop))
    }

    fn unmonitor(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.apply_to_group(ServiceAction::Unmonitor))
    }

    fn status(&self) -> BoxFuture<'_, String> {
        Box::pin(async move {
            match self.client.status().await {
                Ok(status) => group_status(&status).to_string(),
                Err(e) => {
                    warn!(error = %e, "failed to get monit status");
                    STATUS_UNKNOWN.to_string()
                }
            }
        })
    }

    fn add_job(&self, job_name: &str, job_index: usize, config_path: &Path) -> Result<()> {
        let target = self
            .dirs
            .monit_jobs_dir()
            .join(format!("{job_index:04}_{job_name}.monitrc"));

        debug!(job = %job_name, src = ?config_path, dst = ?target, "installing monit job config");
        self.fs.copy_file(config_path, &target)?;
        Ok(())
    }

    fn remove_all_jobs(&self) -> Result<()> {
        self.fs.remove_all(&self.dirs.monit_jobs_dir())?;
        Ok(())
    }

    fn monitor_job_failures(&self, handler: JobFailureHandler) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let listener = TcpListener::bind(("127.0.0.1", self.job_failures_server_port)).await?;
            alerts::serve_alerts(listener, handler).await?;
            Ok(())
        })
    }
}
