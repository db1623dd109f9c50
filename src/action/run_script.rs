// src/action/run_script.rs

//! Run one named lifecycle script for every job that defines it.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::action::summary::{ResultCollector, ScriptResults};
use crate::action::Action;
use crate::applyspec::SpecService;
use crate::errors::{AgentError, Result};
use crate::scriptrunner::{completion_channel, JobScriptProvider};

/// Fans a script out to all jobs of the applied spec and fans the results
/// back in.
///
/// Every job whose script exists runs on its own Tokio task. The call only
/// returns once each dispatched script has signalled; a failure never stops
/// the wait for its siblings and nothing is cancelled.
#[derive(Debug, Clone)]
pub struct RunScriptAction {
    script_provider: Arc<dyn JobScriptProvider>,
    spec_service: Arc<dyn SpecService>,
}

impl RunScriptAction {
    pub fn new(
        script_provider: Arc<dyn JobScriptProvider>,
        spec_service: Arc<dyn SpecService>,
    ) -> Self {
        Self {
            script_provider,
            spec_service,
        }
    }

    /// Run `bin/<script_name>` for each job of the current spec.
    ///
    /// Returns the results map when every script succeeded. If any failed,
    /// returns [`AgentError::ScriptsFailed`], which still carries the full
    /// results map.
    pub async fn run(&self, script_name: &str) -> Result<ScriptResults> {
        let spec = self.spec_service.get()?;
        let relative_path = Path::new("bin").join(script_name);

        let (sink, mut completions) = completion_channel();
        let mut dispatched = 0usize;

        for template in spec.job_template_specs() {
            let script = self.script_provider.get(&template.name, &relative_path);
            if !script.exists() {
                debug!(job = %template.name, script = %script_name, "job has no such script; skipping");
                continue;
            }

            debug!(job = %template.name, script = ?script.path(), "dispatching script");
            let job_sink = sink.clone();
            tokio::spawn(async move {
                script.run(job_sink).await;
            });
            dispatched += 1;
        }

        // Only the per-job clones keep the channel open from here on.
        drop(sink);

        info!(script = %script_name, jobs = dispatched, "waiting for scripts to finish");

        let mut collector = ResultCollector::new(script_name, dispatched);
        while !collector.is_complete() {
            match completions.recv().await {
                Some(completion) => {
                    debug!(?completion, "script signalled");
                    collector.record(completion);
                }
                None => {
                    warn!(
                        script = %script_name,
                        expected = dispatched,
                        received = collector.received(),
                        "all scripts finished without signalling"
                    );
                    return Err(AgentError::MissingScriptSignals {
                        expected: dispatched,
                        received: collector.received(),
                    });
                }
            }
        }

        let outcome = collector.finish();
        match &outcome {
            Ok(results) => info!(script = %script_name, ?results, "all scripts succeeded"),
            Err(e) => warn!(script = %script_name, error = %e, "scripts failed"),
        }
        outcome
    }
}

impl Action for RunScriptAction {
    fn is_asynchronous(&self) -> bool {
        true
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
