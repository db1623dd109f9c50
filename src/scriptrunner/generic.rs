// src/scriptrunner/generic.rs

//! Script backed by an executable file inside a job directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::fs::FileSystem;
use crate::platform::{CmdOutput, CmdRunner, Command};
use crate::scriptrunner::{CompletionSink, RunScriptResult, Script};
use crate::types::BoxFuture;

/// Runs `<jobs dir>/<job>/<relative path>` and keeps its output under
/// `<log dir>/<script name>.{stdout,stderr}.log`.
#[derive(Debug, Clone)]
pub struct GenericScript {
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CmdRunner>,
    tag: String,
    path: PathBuf,
    log_dir: PathBuf,
}

impl GenericScript {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn CmdRunner>,
        tag: impl Into<String>,
        path: impl Into<PathBuf>,
        log_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            runner,
            tag: tag.into(),
            path: path.into(),
            log_dir: log_dir.into(),
        }
    }

    fn script_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "script".to_string())
    }

    fn result(&self) -> RunScriptResult {
        RunScriptResult::new(&self.tag, self.path.to_string_lossy())
    }

    fn save_logs(&self, output: &CmdOutput) {
        let name = self.script_name();
        let logs = [
            (format!("{name}.stdout.log"), &output.stdout),
            (format!("{name}.stderr.log"), &output.stderr),
        ];

        for (file, contents) in logs {
            let path = self.log_dir.join(file);
            if let Err(e) = self.fs.append(&path, contents.as_bytes()) {
                warn!(job = %self.tag, path = ?path, error = %e, "failed to save script output");
            }
        }
    }
}

impl Script for GenericScript {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.fs.is_file(&self.path)
    }

    fn run(&self, sink: CompletionSink) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            info!(job = %self.tag, script = ?self.path, "running script");

            let command = Command::new(self.path.to_string_lossy());

            match self.runner.run_command(command).await {
                Ok(output) => {
                    self.save_logs(&output);
                    if output.success() {
                        info!(job = %self.tag, script = ?self.path, "script succeeded");
                        sink.succeeded(self.result());
                    } else {
                        error!(
                            job = %self.tag,
                            script = ?self.path,
                            exit_code = output.exit_code,
                            "script exited with failure"
                        );
                        sink.failed(self.result());
                    }
                }
                Err(e) => {
                    error!(job = %self.tag, script = ?self.path, error = %e, "script could not be run");
                    sink.failed(self.result());
                }
            }
        })
    }
}
