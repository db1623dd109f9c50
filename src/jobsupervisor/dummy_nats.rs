// src/jobsupervisor/dummy_nats.rs

//! No-op supervisor whose status, and job failures, are driven over the
//! message bus. Used by test deployments to simulate failing jobs.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::Result;
use crate::jobsupervisor::{
    Alert, JobFailureHandler, JobSupervisor, STATUS_FAILING, STATUS_RUNNING,
};
use crate::mbus::{MessageHandler, Request, Response};
use crate::types::BoxFuture;

/// Method the supervisor answers on the message bus.
pub const SET_DUMMY_STATUS: &str = "set_dummy_status";

#[derive(Debug, Deserialize)]
struct SetStatusBody {
    status: String,
}

#[derive(Default)]
struct DummyNatsState {
    status: Option<String>,
    failure_handler: Option<JobFailureHandler>,
}

#[derive(Clone)]
pub struct DummyNatsJobSupervisor {
    handler: Arc<dyn MessageHandler>,
    state: Arc<Mutex<DummyNatsState>>,
}

impl DummyNatsJobSupervisor {
    pub fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self {
            handler,
            state: Arc::new(Mutex::new(DummyNatsState::default())),
        }
    }

    fn current_status(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .status
            .clone()
            .unwrap_or_else(|| STATUS_RUNNING.to_string())
    }
}

impl fmt::Debug for DummyNatsJobSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyNatsJobSupervisor")
            .field("handler", &self.handler)
            .field("status", &self.current_status())
            .finish_non_exhaustive()
    }
}

impl PartialEq for DummyNatsJobSupervisor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
            && self.current_status() == other.current_status()
    }
}

fn handle_status_request(state: &Mutex<DummyNatsState>, request: &Request) -> Response {
    if request.method != SET_DUMMY_STATUS {
        return Response::Unhandled;
    }

    let body: SetStatusBody = match serde_json::from_str(&request.payload) {
        Ok(body) => body,
        Err(e) => return Response::Exception(format!("parsing {SET_DUMMY_STATUS} payload: {e}")),
    };

    let failure_handler = {
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        state.status = Some(body.status.clone());
        state.failure_handler.clone()
    };
    info!(status = %body.status, "dummy job status set over message bus");

    if body.status == STATUS_FAILING {
        if let Some(failure_handler) = failure_handler {
            let alert = Alert {
                id: "dummy-nats-alert".to_string(),
                service: "dummy-nats-service".to_string(),
                event: STATUS_FAILING.to_string(),
                action: "Start".to_string(),
                date: "Sun, 22 May 2011 20:07:41 +0500".to_string(),
                description: "job failure requested over message bus".to_string(),
            };
            if let Err(e) = failure_handler(alert) {
                warn!(error = %e, "job failure handler returned an error");
            }
        }
    }

    Response::Value(Value::String("ok".to_string()))
}

impl JobSupervisor for DummyNatsJobSupervisor {
    fn reload(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn start(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn stop(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn unmonitor(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async { Ok(()) })
    }

    fn status(&self) -> BoxFuture<'_, String> {
        Box::pin(async move { self.current_status() })
    }

    fn add_job(&self, _job_name: &str, _job_index: usize, _config_path: &Path) -> Result<()> {
        Ok(())
    }

    fn remove_all_jobs(&self) -> Result<()> {
        Ok(())
    }

    fn monitor_job_failures(&self, handler: JobFailureHandler) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .failure_handler = Some(handler);

            let state = Arc::clone(&self.state);
            self.handler.register_additional_func(Box::new(move |request: &Request| {
                handle_status_request(&state, request)
            }));
            Ok(())
        })
    }
}
