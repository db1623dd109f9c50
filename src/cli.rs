// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `hostagent`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hostagent",
    version,
    about = "Run job lifecycle scripts and control the job supervisor.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the agent config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "hostagent.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HOSTAGENT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: AgentCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AgentCommand {
    /// Run `bin/<NAME>` of every installed job that has it.
    RunScript {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Reload the supervisor and wait for the new job config to be active.
    Reload,
    /// Print the aggregate job status.
    Status,
    /// Start all jobs.
    Start,
    /// Stop all jobs.
    Stop,
    /// Listen for job failure alerts and log them until interrupted.
    MonitorFailures,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
