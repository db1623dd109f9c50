use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Barrier;

use anyhow::anyhow;
use hostagent::applyspec::{ApplySpec, SpecService};
use hostagent::errors::Result;
use hostagent::jobsupervisor::monit::{MonitClient, MonitError, MonitStatus, ServiceAction};
use hostagent::platform::{CmdOutput, CmdRunner, Command};
use hostagent::scriptrunner::{
    CompletionSink, JobScriptProvider, RunScriptResult, Script,
};
use hostagent::types::BoxFuture;

/// How a [`FakeScript`] finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeOutcome {
    Succeed,
    Fail,
    /// Drop the sink without signalling.
    Silent,
}

/// A script that optionally waits on a shared barrier, sleeps for `delay`
/// and then signals `outcome`.
#[derive(Debug, Clone)]
pub struct FakeScript {
    tag: String,
    path: PathBuf,
    exists: bool,
    outcome: FakeOutcome,
    delay: Duration,
    barrier: Option<Arc<Barrier>>,
    runs: Arc<AtomicUsize>,
}

impl FakeScript {
    pub fn new(tag: &str, path: &str) -> Self {
        Self {
            tag: tag.to_string(),
            path: PathBuf::from(path),
            exists: true,
            outcome: FakeOutcome::Succeed,
            delay: Duration::ZERO,
            barrier: None,
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn missing(mut self) -> Self {
        self.exists = false;
        self
    }

    pub fn outcome(mut self, outcome: FakeOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Wait on `barrier` before signalling. Only completes if enough
    /// scripts sharing the barrier are running at the same time.
    pub fn barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Number of times any clone of this script was run.
    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Script for FakeScript {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.exists
    }

    fn run(&self, sink: CompletionSink) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let result = RunScriptResult::new(&self.tag, self.path.to_string_lossy());
            match self.outcome {
                FakeOutcome::Succeed => sink.succeeded(result),
                FakeOutcome::Fail => sink.failed(result),
                FakeOutcome::Silent => drop(sink),
            }
        })
    }
}

/// Script provider returning preconfigured scripts per job; jobs without an
/// entry get a script that does not exist.
#[derive(Debug, Default)]
pub struct FakeJobScriptProvider {
    scripts: BTreeMap<String, FakeScript>,
    requests: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeJobScriptProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, job_name: &str, script: FakeScript) -> Self {
        self.scripts.insert(job_name.to_string(), script);
        self
    }

    /// `(job name, relative path)` of every lookup, in order.
    pub fn requests(&self) -> Vec<(String, PathBuf)> {
        self.requests.lock().unwrap().clone()
    }
}

impl JobScriptProvider for FakeJobScriptProvider {
    fn get(&self, job_name: &str, relative_path: &Path) -> Box<dyn Script> {
        self.requests
            .lock()
            .unwrap()
            .push((job_name.to_string(), relative_path.to_path_buf()));

        let script = self.scripts.get(job_name).cloned().unwrap_or_else(|| {
            FakeScript::new(job_name, &relative_path.to_string_lossy()).missing()
        });
        Box::new(script)
    }
}

#[derive(Debug, Default)]
pub struct FakeSpecService {
    spec: ApplySpec,
}

impl FakeSpecService {
    pub fn new(spec: ApplySpec) -> Self {
        Self { spec }
    }
}

impl SpecService for FakeSpecService {
    fn get(&self) -> Result<ApplySpec> {
        Ok(self.spec.clone())
    }
}

/// Scripted answer of [`FakeMonitClient::status`].
#[derive(Debug, Clone)]
pub enum StatusResponse {
    Status(MonitStatus),
    Unavailable,
}

impl StatusResponse {
    fn into_result(self) -> std::result::Result<MonitStatus, MonitError> {
        match self {
            StatusResponse::Status(status) => Ok(status),
            StatusResponse::Unavailable => Err(MonitError::Api {
                status: 503,
                body: "monit unavailable".to_string(),
            }),
        }
    }
}

/// Monit client answering status calls from a queue, falling back to a
/// fixed response once the queue is drained.
#[derive(Debug)]
pub struct FakeMonitClient {
    responses: Mutex<VecDeque<StatusResponse>>,
    fallback: StatusResponse,
    status_calls: AtomicUsize,
    actions: Mutex<Vec<(String, ServiceAction)>>,
    fail_actions: bool,
}

impl FakeMonitClient {
    pub fn new(fallback: StatusResponse) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback,
            status_calls: AtomicUsize::new(0),
            actions: Mutex::new(Vec::new()),
            fail_actions: false,
        }
    }

    pub fn with_status(fallback: MonitStatus) -> Self {
        Self::new(StatusResponse::Status(fallback))
    }

    pub fn then(self, response: StatusResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Queue the same response `times` times.
    pub fn then_repeat(self, response: StatusResponse, times: usize) -> Self {
        {
            let mut responses = self.responses.lock().unwrap();
            for _ in 0..times {
                responses.push_back(response.clone());
            }
        }
        self
    }

    pub fn failing_actions(mut self) -> Self {
        self.fail_actions = true;
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn actions(&self) -> Vec<(String, ServiceAction)> {
        self.actions.lock().unwrap().clone()
    }
}

impl MonitClient for FakeMonitClient {
    fn service_action<'a>(
        &'a self,
        service: &'a str,
        action: ServiceAction,
    ) -> BoxFuture<'a, std::result::Result<(), MonitError>> {
        Box::pin(async move {
            if self.fail_actions {
                return Err(MonitError::Api {
                    status: 500,
                    body: format!("cannot {} {}", action.as_str(), service),
                });
            }
            self.actions
                .lock()
                .unwrap()
                .push((service.to_string(), action));
            Ok(())
        })
    }

    fn status(&self) -> BoxFuture<'_, std::result::Result<MonitStatus, MonitError>> {
        Box::pin(async move {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.fallback.clone()).into_result()
        })
    }
}

/// Scripted behaviour of one command in [`FakeCmdRunner`].
#[derive(Debug, Clone)]
pub enum FakeCmdResult {
    Output(CmdOutput),
    SpawnError(String),
}

/// Command runner that records commands and answers from a per-command
/// queue (keyed by `Command::display()`); unknown commands exit 0.
#[derive(Debug, Default)]
pub struct FakeCmdRunner {
    results: Mutex<BTreeMap<String, VecDeque<FakeCmdResult>>>,
    commands: Mutex<Vec<Command>>,
}

impl FakeCmdRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&self, command: &str, result: FakeCmdResult) {
        self.results
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn exit_code(code: i32) -> FakeCmdResult {
        FakeCmdResult::Output(CmdOutput {
            exit_code: code,
            ..CmdOutput::default()
        })
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    /// Number of recorded commands whose display form equals `command`.
    pub fn count(&self, command: &str) -> usize {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.display() == command)
            .count()
    }
}

impl CmdRunner for FakeCmdRunner {
    fn run_command(&self, command: Command) -> BoxFuture<'_, anyhow::Result<CmdOutput>> {
        Box::pin(async move {
            let key = command.display();
            self.commands.lock().unwrap().push(command);

            let next = self
                .results
                .lock()
                .unwrap()
                .get_mut(&key)
                .and_then(VecDeque::pop_front);

            match next {
                Some(FakeCmdResult::Output(output)) => Ok(output),
                Some(FakeCmdResult::SpawnError(msg)) => Err(anyhow!(msg)),
                None => Ok(CmdOutput::default()),
            }
        })
    }
}
