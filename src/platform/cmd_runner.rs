// src/platform/cmd_runner.rs

//! External command execution.

use std::fmt::Debug;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::types::BoxFuture;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Human-readable form used in logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `-1` when the process was terminated by a signal.
    pub exit_code: i32,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external commands to completion.
///
/// An `Err` means the process could not be spawned or waited on; a process
/// that ran and exited non-zero is reported through [`CmdOutput::exit_code`].
pub trait CmdRunner: Send + Sync + Debug {
    fn run_command(&self, command: Command) -> BoxFuture<'_, Result<CmdOutput>>;
}

/// Production runner backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct RealCmdRunner;

impl CmdRunner for RealCmdRunner {
    fn run_command(&self, command: Command) -> BoxFuture<'_, Result<CmdOutput>> {
        Box::pin(async move {
            debug!(cmd = %command.display(), "running command");

            let mut cmd = TokioCommand::new(&command.name);
            cmd.args(&command.args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let output = cmd
                .output()
                .await
                .with_context(|| format!("running command '{}'", command.display()))?;

            let exit_code = output.status.code().unwrap_or(-1);
            debug!(cmd = %command.display(), exit_code, "command exited");

            Ok(CmdOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code,
            })
        })
    }
}
