// src/platform/mod.rs

//! Host platform access: filesystem plus command execution.

use std::sync::Arc;

use crate::fs::{FileSystem, RealFileSystem};

pub mod cmd_runner;

pub use cmd_runner::{CmdOutput, CmdRunner, Command, RealCmdRunner};

/// Shared handles to the filesystem and command runner of the host.
///
/// Cloning is cheap; clones share the same underlying collaborators.
#[derive(Debug, Clone)]
pub struct Platform {
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CmdRunner>,
}

impl Platform {
    pub fn new(fs: Arc<dyn FileSystem>, runner: Arc<dyn CmdRunner>) -> Self {
        Self { fs, runner }
    }

    /// Platform talking to the real host.
    pub fn real() -> Self {
        Self::new(Arc::new(RealFileSystem), Arc::new(RealCmdRunner))
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn runner(&self) -> &Arc<dyn CmdRunner> {
        &self.runner
    }
}
