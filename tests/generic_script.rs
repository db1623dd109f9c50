// tests/generic_script.rs

mod common;
use crate::common::fakes::{FakeCmdResult, FakeCmdRunner};
use crate::common::init_tracing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hostagent::dirs::DirProvider;
use hostagent::fs::mock::MockFileSystem;
use hostagent::fs::{FileSystem, RealFileSystem};
use hostagent::platform::CmdOutput;
use hostagent::scriptrunner::{
    completion_channel, ConcreteJobScriptProvider, JobScriptProvider, RunScriptResult,
    ScriptCompletion,
};

const SCRIPT: &str = "/var/vcap/jobs/router/bin/drain";

fn provider(fs: &MockFileSystem, runner: &Arc<FakeCmdRunner>) -> ConcreteJobScriptProvider {
    ConcreteJobScriptProvider::new(
        Arc::new(fs.clone()),
        runner.clone(),
        DirProvider::new("/var/vcap"),
    )
}

#[test]
fn provider_resolves_script_inside_job_dir() {
    let fs = MockFileSystem::new();
    let runner = Arc::new(FakeCmdRunner::new());

    let script = provider(&fs, &runner).get("router", Path::new("bin/drain"));

    assert_eq!(script.tag(), "router");
    assert_eq!(script.path(), Path::new(SCRIPT));
    assert!(!script.exists());

    fs.add_file(SCRIPT, "#!/bin/sh\n");
    assert!(script.exists());
}

#[tokio::test]
async fn successful_run_signals_success_and_saves_output() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = Arc::new(FakeCmdRunner::new());
    runner.add_result(
        SCRIPT,
        FakeCmdResult::Output(CmdOutput {
            stdout: "drained\n".to_string(),
            stderr: "warn\n".to_string(),
            exit_code: 0,
        }),
    );
    let script = provider(&fs, &runner).get("router", Path::new("bin/drain"));
    let (sink, mut rx) = completion_channel();

    script.run(sink).await;

    assert_eq!(
        rx.recv().await,
        Some(ScriptCompletion::Succeeded(RunScriptResult::new("router", SCRIPT)))
    );
    assert_eq!(runner.count(SCRIPT), 1);
    assert_eq!(
        fs.read_to_string(Path::new("/var/vcap/sys/log/router/drain.stdout.log"))
            .unwrap(),
        "drained\n"
    );
    assert_eq!(
        fs.read_to_string(Path::new("/var/vcap/sys/log/router/drain.stderr.log"))
            .unwrap(),
        "warn\n"
    );
}

#[tokio::test]
async fn non_zero_exit_signals_failure() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = Arc::new(FakeCmdRunner::new());
    runner.add_result(SCRIPT, FakeCmdRunner::exit_code(3));
    let script = provider(&fs, &runner).get("router", Path::new("bin/drain"));
    let (sink, mut rx) = completion_channel();

    script.run(sink).await;

    assert_eq!(
        rx.recv().await,
        Some(ScriptCompletion::Failed(RunScriptResult::new("router", SCRIPT)))
    );
    assert!(fs
        .paths()
        .contains(&PathBuf::from("/var/vcap/sys/log/router/drain.stdout.log")));
}

#[tokio::test]
async fn spawn_error_signals_failure_without_logs() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = Arc::new(FakeCmdRunner::new());
    runner.add_result(SCRIPT, FakeCmdResult::SpawnError("permission denied".to_string()));
    let script = provider(&fs, &runner).get("router", Path::new("bin/drain"));
    let (sink, mut rx) = completion_channel();

    script.run(sink).await;

    assert!(matches!(rx.recv().await, Some(ScriptCompletion::Failed(_))));
    assert!(fs.paths().is_empty());
}

#[tokio::test]
async fn each_run_signals_exactly_once() {
    let fs = MockFileSystem::new();
    let runner = Arc::new(FakeCmdRunner::new());
    let script = provider(&fs, &runner).get("router", Path::new("bin/drain"));
    let (sink, mut rx) = completion_channel();

    script.run(sink).await;

    assert!(rx.recv().await.is_some());
    // The only sink was consumed by the run, so the channel is closed.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn output_of_later_runs_is_appended_to_logs() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = Arc::new(FakeCmdRunner::new());
    for (stdout, exit_code) in [("first\n", 0), ("second\n", 1)] {
        runner.add_result(
            SCRIPT,
            FakeCmdResult::Output(CmdOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code,
            }),
        );
    }
    let script = provider(&fs, &runner).get("router", Path::new("bin/drain"));

    for _ in 0..2 {
        let (sink, mut rx) = completion_channel();
        script.run(sink).await;
        assert!(rx.recv().await.is_some());
    }

    assert_eq!(
        fs.read_to_string(Path::new("/var/vcap/sys/log/router/drain.stdout.log"))
            .unwrap(),
        "first\nsecond\n"
    );
}

#[test]
fn real_filesystem_append_creates_then_extends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sys/log/router/drain.stdout.log");
    let fs = RealFileSystem;

    fs.append(&path, b"first\n").unwrap();
    fs.append(&path, b"second\n").unwrap();

    assert_eq!(fs.read_to_string(&path).unwrap(), "first\nsecond\n");
}
