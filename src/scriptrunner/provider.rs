// src/scriptrunner/provider.rs

use std::path::Path;
use std::sync::Arc;

use crate::dirs::DirProvider;
use crate::fs::FileSystem;
use crate::platform::CmdRunner;
use crate::scriptrunner::{GenericScript, JobScriptProvider, Script};

/// Builds [`GenericScript`]s rooted in the installed jobs directory.
#[derive(Debug, Clone)]
pub struct ConcreteJobScriptProvider {
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CmdRunner>,
    dirs: DirProvider,
}

impl ConcreteJobScriptProvider {
    pub fn new(fs: Arc<dyn FileSystem>, runner: Arc<dyn CmdRunner>, dirs: DirProvider) -> Self {
        Self { fs, runner, dirs }
    }
}

impl JobScriptProvider for ConcreteJobScriptProvider {
    fn get(&self, job_name: &str, relative_path: &Path) -> Box<dyn Script> {
        let path = self.dirs.jobs_dir().join(job_name).join(relative_path);
        let log_dir = self.dirs.logs_dir().join(job_name);

        Box::new(GenericScript::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.runner),
            job_name,
            path,
            log_dir,
        ))
    }
}
