// src/action/summary.rs

//! Aggregation of script completion signals into a results map and a
//! human-readable failure summary.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{AgentError, Result};
use crate::scriptrunner::ScriptCompletion;

/// Final status of one job's script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    Executed,
    Failed,
}

impl ScriptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptStatus::Executed => "executed",
            ScriptStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ScriptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job name → status. Jobs without the requested script have no entry.
pub type ScriptResults = BTreeMap<String, ScriptStatus>;

/// Outcome of a run in which at least one script failed.
///
/// `Display` renders the summary operators see, e.g.
/// `1 of 2 run-me scripts failed. Failed Jobs: a. Successful Jobs: b.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailures {
    pub script_name: String,
    pub total: usize,
    /// Failed job names in signal-arrival order.
    pub failed: Vec<String>,
    /// Successful job names in signal-arrival order.
    pub succeeded: Vec<String>,
    pub results: ScriptResults,
}

impl fmt::Display for ScriptFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} {} scripts failed. Failed Jobs: {}.",
            self.failed.len(),
            self.total,
            self.script_name,
            join_names(&self.failed)
        )?;

        if !self.succeeded.is_empty() {
            write!(f, " Successful Jobs: {}.", join_names(&self.succeeded))?;
        }

        Ok(())
    }
}

/// Join names as `a`, `a and b`, `a, b and c`.
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Single-consumer accumulator for the signals of one orchestration.
#[derive(Debug)]
pub struct ResultCollector {
    script_name: String,
    expected: usize,
    failed: Vec<String>,
    succeeded: Vec<String>,
    results: ScriptResults,
}

impl ResultCollector {
    pub fn new(script_name: impl Into<String>, expected: usize) -> Self {
        Self {
            script_name: script_name.into(),
            expected,
            failed: Vec::new(),
            succeeded: Vec::new(),
            results: ScriptResults::new(),
        }
    }

    pub fn received(&self) -> usize {
        self.failed.len() + self.succeeded.len()
    }

    pub fn is_complete(&self) -> bool {
        self.received() >= self.expected
    }

    pub fn record(&mut self, completion: ScriptCompletion) {
        match completion {
            ScriptCompletion::Succeeded(result) => {
                self.results
                    .insert(result.job_name.clone(), ScriptStatus::Executed);
                self.succeeded.push(result.job_name);
            }
            ScriptCompletion::Failed(result) => {
                self.results
                    .insert(result.job_name.clone(), ScriptStatus::Failed);
                self.failed.push(result.job_name);
            }
        }
    }

    /// `Ok(results)` when nothing failed, otherwise
    /// [`AgentError::ScriptsFailed`] carrying every result collected.
    pub fn finish(self) -> Result<ScriptResults> {
        if self.failed.is_empty() {
            return Ok(self.results);
        }

        Err(AgentError::ScriptsFailed(ScriptFailures {
            script_name: self.script_name,
            total: self.expected,
            failed: self.failed,
            succeeded: self.succeeded,
            results: self.results,
        }))
    }
}
