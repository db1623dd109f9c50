// src/mbus.rs

//! In-process side of the agent's message bus.
//!
//! Transports (NATS, HTTPS) live elsewhere; they hand decoded requests to a
//! [`MessageHandler`], which offers them to every registered function until
//! one of them claims the request.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::debug;

/// A decoded inbound request: method name plus raw JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub payload: String,
}

impl Request {
    pub fn new(method: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Value(Value),
    Exception(String),
    /// The function does not handle this method.
    Unhandled,
}

pub type HandlerFunc = Box<dyn Fn(&Request) -> Response + Send + Sync>;

pub trait MessageHandler: Send + Sync + fmt::Debug {
    /// Register a function consulted for requests no built-in action handles.
    fn register_additional_func(&self, func: HandlerFunc);

    /// Offer `request` to the registered functions in registration order.
    fn dispatch(&self, request: &Request) -> Response;
}

/// Message handler keeping its functions in memory.
#[derive(Clone, Default)]
pub struct LocalMessageHandler {
    funcs: Arc<Mutex<Vec<HandlerFunc>>>,
}

impl LocalMessageHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for LocalMessageHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .funcs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("LocalMessageHandler")
            .field("funcs", &count)
            .finish()
    }
}

impl MessageHandler for LocalMessageHandler {
    fn register_additional_func(&self, func: HandlerFunc) {
        self.funcs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(func);
    }

    fn dispatch(&self, request: &Request) -> Response {
        let funcs = self.funcs.lock().unwrap_or_else(PoisonError::into_inner);
        for func in funcs.iter() {
            let response = func(request);
            if response != Response::Unhandled {
                return response;
            }
        }

        debug!(method = %request.method, "no handler for request");
        Response::Unhandled
    }
}
