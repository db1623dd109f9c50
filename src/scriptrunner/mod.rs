// src/scriptrunner/mod.rs

//! Job lifecycle scripts and the channel they report completion on.
//!
//! Every dispatched script receives a [`CompletionSink`]. The sink is
//! consumed by [`CompletionSink::succeeded`] / [`CompletionSink::failed`], so
//! a script can signal at most once. All sinks of one orchestration feed a
//! single unbounded channel drained by the orchestrator.

use std::fmt::Debug;
use std::path::Path;

use tokio::sync::mpsc;
use tracing::debug;

use crate::types::BoxFuture;

pub mod generic;
pub mod provider;

pub use generic::GenericScript;
pub use provider::ConcreteJobScriptProvider;

/// Identifies which job/script produced a completion signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunScriptResult {
    pub job_name: String,
    pub script_path: String,
}

impl RunScriptResult {
    pub fn new(job_name: impl Into<String>, script_path: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            script_path: script_path.into(),
        }
    }
}

/// A completion signal as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCompletion {
    Succeeded(RunScriptResult),
    Failed(RunScriptResult),
}

/// Create a connected sink/receiver pair.
pub fn completion_channel() -> (CompletionSink, mpsc::UnboundedReceiver<ScriptCompletion>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CompletionSink { tx }, rx)
}

/// Write side handed to one running script.
///
/// Cloning produces another producer on the same channel; the orchestrator
/// gives each dispatched script its own clone.
#[derive(Debug, Clone)]
pub struct CompletionSink {
    tx: mpsc::UnboundedSender<ScriptCompletion>,
}

impl CompletionSink {
    pub fn succeeded(self, result: RunScriptResult) {
        self.send(ScriptCompletion::Succeeded(result));
    }

    pub fn failed(self, result: RunScriptResult) {
        self.send(ScriptCompletion::Failed(result));
    }

    fn send(self, completion: ScriptCompletion) {
        if let Err(e) = self.tx.send(completion) {
            debug!(completion = ?e.0, "completion receiver dropped; discarding signal");
        }
    }
}

/// One runnable lifecycle hook belonging to one job.
pub trait Script: Send + Sync {
    /// Name of the job the script belongs to.
    fn tag(&self) -> &str;

    fn path(&self) -> &Path;

    fn exists(&self) -> bool;

    /// Run the script to completion and report exactly once on `sink`.
    fn run(&self, sink: CompletionSink) -> BoxFuture<'_, ()>;
}

/// Resolves `(job name, path relative to the job dir)` to a script.
pub trait JobScriptProvider: Send + Sync + Debug {
    fn get(&self, job_name: &str, relative_path: &Path) -> Box<dyn Script>;
}
