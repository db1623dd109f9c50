pub mod builders;
pub mod fakes;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use hostagent::logging::{build_filter, LOG_ENV_VAR};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Upper bound for any single test future.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Install a per-test tracing subscriber once per test binary.
///
/// Uses the agent's own filter rules, so `HOSTAGENT_LOG=debug cargo test`
/// works as it does for the binary. Output goes through the test writer and
/// is only shown for failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV_VAR).ok();
        let filter = build_filter(None, env.as_deref()).unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking after [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .expect("test future did not finish in time")
}
