// tests/supervisor_provider.rs

mod common;
use crate::common::builders::MonitStatusBuilder;
use crate::common::fakes::{FakeCmdRunner, FakeMonitClient};

use std::sync::Arc;

use hostagent::dirs::DirProvider;
use hostagent::errors::AgentError;
use hostagent::fs::mock::MockFileSystem;
use hostagent::fs::FileSystem;
use hostagent::jobsupervisor::monit::MonitClient;
use hostagent::jobsupervisor::{
    DummyJobSupervisor, DummyNatsJobSupervisor, JobSupervisor, MonitJobSupervisor,
    MonitReloadOptions, Supervisor, SupervisorProvider, JOB_FAILURES_SERVER_PORT,
};
use hostagent::mbus::{LocalMessageHandler, MessageHandler};
use hostagent::platform::{CmdRunner, Platform};

struct Fixture {
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CmdRunner>,
    client: Arc<dyn MonitClient>,
    handler: Arc<dyn MessageHandler>,
    dirs: DirProvider,
    provider: SupervisorProvider,
}

fn fixture() -> Fixture {
    let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());
    let runner: Arc<dyn CmdRunner> = Arc::new(FakeCmdRunner::new());
    let client: Arc<dyn MonitClient> =
        Arc::new(FakeMonitClient::with_status(MonitStatusBuilder::new(1).build()));
    let handler: Arc<dyn MessageHandler> = Arc::new(LocalMessageHandler::new());
    let dirs = DirProvider::new("/var/vcap");

    let provider = SupervisorProvider::new(
        Platform::new(Arc::clone(&fs), Arc::clone(&runner)),
        Arc::clone(&client),
        dirs.clone(),
        Arc::clone(&handler),
    );

    Fixture {
        fs,
        runner,
        client,
        handler,
        dirs,
        provider,
    }
}

#[test]
fn monit_supervisor_is_built_from_platform_and_client() {
    let f = fixture();

    let supervisor = f.provider.get("monit").unwrap();

    let expected = Supervisor::Monit(MonitJobSupervisor::new(
        Arc::clone(&f.fs),
        Arc::clone(&f.runner),
        Arc::clone(&f.client),
        f.dirs.clone(),
        JOB_FAILURES_SERVER_PORT,
        MonitReloadOptions::default(),
    ));
    assert_eq!(supervisor, expected);
}

#[test]
fn monit_supervisor_uses_default_reload_options_and_alert_port() {
    let f = fixture();

    let Supervisor::Monit(monit) = f.provider.get("monit").unwrap() else {
        panic!("expected monit supervisor");
    };

    assert_eq!(monit.job_failures_server_port(), 2825);
    assert_eq!(
        monit.reload_options(),
        MonitReloadOptions {
            max_tries: 3,
            max_check_tries: 6,
            delay_between_check_tries: std::time::Duration::from_secs(5),
        }
    );
}

#[test]
fn monit_supervisor_with_other_client_is_not_equal() {
    let f = fixture();
    let other_client: Arc<dyn MonitClient> =
        Arc::new(FakeMonitClient::with_status(MonitStatusBuilder::new(1).build()));

    let supervisor = f.provider.get("monit").unwrap();

    let other = Supervisor::Monit(MonitJobSupervisor::new(
        Arc::clone(&f.fs),
        Arc::clone(&f.runner),
        other_client,
        f.dirs.clone(),
        JOB_FAILURES_SERVER_PORT,
        MonitReloadOptions::default(),
    ));
    assert_ne!(supervisor, other);
}

#[test]
fn dummy_supervisor() {
    let f = fixture();

    let supervisor = f.provider.get("dummy").unwrap();

    assert_eq!(supervisor, Supervisor::Dummy(DummyJobSupervisor::new()));
}

#[test]
fn dummy_nats_supervisor_shares_the_message_handler() {
    let f = fixture();

    let supervisor = f.provider.get("dummy-nats").unwrap();

    assert_eq!(
        supervisor,
        Supervisor::DummyNats(DummyNatsJobSupervisor::new(Arc::clone(&f.handler)))
    );
}

#[test]
fn unknown_supervisor_name_is_an_error() {
    let f = fixture();

    let err = f.provider.get("does-not-exist").unwrap_err();

    assert!(matches!(err, AgentError::SupervisorNotFound(ref name) if name == "does-not-exist"));
    assert_eq!(err.to_string(), "does-not-exist could not be found");
}

#[tokio::test]
async fn dummy_supervisor_always_succeeds() {
    let supervisor = fixture().provider.get("dummy").unwrap();

    supervisor.reload().await.unwrap();
    supervisor.start().await.unwrap();
    supervisor.stop().await.unwrap();
    supervisor.unmonitor().await.unwrap();
    supervisor
        .add_job("router", 0, std::path::Path::new("/tmp/router.monitrc"))
        .unwrap();
    supervisor.remove_all_jobs().unwrap();
    assert_eq!(supervisor.status().await, "running");
}
