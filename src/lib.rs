// src/lib.rs

pub mod action;
pub mod applyspec;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod errors;
pub mod fs;
pub mod jobsupervisor;
pub mod logging;
pub mod mbus;
pub mod platform;
pub mod scriptrunner;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::action::{RunScriptAction, ScriptResults};
use crate::applyspec::FileSpecService;
use crate::cli::{AgentCommand, CliArgs};
use crate::config::load_and_validate;
use crate::dirs::DirProvider;
use crate::errors::AgentError;
use crate::jobsupervisor::monit::HttpMonitClient;
use crate::jobsupervisor::{Alert, JobFailureHandler, JobSupervisor, SupervisorProvider};
use crate::mbus::LocalMessageHandler;
use crate::platform::Platform;
use crate::scriptrunner::ConcreteJobScriptProvider;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - platform, directory layout and monit client
/// - the configured job supervisor
/// - the requested command
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {:?}", config_path))?;

    let platform = Platform::real();
    let dirs = DirProvider::new(&cfg.agent.base_dir);
    let client = HttpMonitClient::new(&cfg.monit.url, &cfg.monit.user, &cfg.monit.password)?;
    let handler = Arc::new(LocalMessageHandler::new());

    let provider = SupervisorProvider::new(platform.clone(), Arc::new(client), dirs.clone(), handler);
    let supervisor = provider.get(&cfg.agent.supervisor)?;
    info!(supervisor = %cfg.agent.supervisor, base_dir = ?dirs.base_dir(), "agent configured");

    match args.command {
        AgentCommand::RunScript { name } => {
            let script_provider = ConcreteJobScriptProvider::new(
                Arc::clone(platform.fs()),
                Arc::clone(platform.runner()),
                dirs.clone(),
            );
            let spec_service =
                FileSpecService::new(Arc::clone(platform.fs()), dirs.etc_dir().join("spec.json"));
            let action = RunScriptAction::new(Arc::new(script_provider), Arc::new(spec_service));

            match action.run(&name).await {
                Ok(results) => print_results(&results),
                Err(AgentError::ScriptsFailed(failures)) => {
                    print_results(&failures.results);
                    return Err(AgentError::ScriptsFailed(failures).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        AgentCommand::Reload => supervisor.reload().await?,
        AgentCommand::Status => println!("{}", supervisor.status().await),
        AgentCommand::Start => supervisor.start().await?,
        AgentCommand::Stop => supervisor.stop().await?,
        AgentCommand::MonitorFailures => {
            let handler: JobFailureHandler = Arc::new(|alert: Alert| -> Result<()> {
                warn!(
                    service = %alert.service,
                    event = %alert.event,
                    action = %alert.action,
                    description = %alert.description,
                    "job failure"
                );
                Ok(())
            });

            tokio::select! {
                res = supervisor.monitor_job_failures(handler) => res?,
                res = tokio::signal::ctrl_c() => {
                    res.context("listening for Ctrl+C")?;
                    info!("interrupted; stopping failure monitoring");
                }
            }
        }
    }

    Ok(())
}

fn print_results(results: &ScriptResults) {
    for (job, status) in results {
        println!("{job}: {status}");
    }
}
