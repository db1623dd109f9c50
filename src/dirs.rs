// src/dirs.rs

//! On-disk directory layout of the agent.

use std::path::{Path, PathBuf};

/// Resolves agent directories relative to a base dir (e.g. `/var/vcap`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirProvider {
    base_dir: PathBuf,
}

impl DirProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Installed job templates: `<base>/jobs/<job>/...`.
    pub fn jobs_dir(&self) -> PathBuf {
        self.base_dir.join("jobs")
    }

    pub fn monit_dir(&self) -> PathBuf {
        self.base_dir.join("monit")
    }

    /// Per-job monit control files written by `add_job`.
    pub fn monit_jobs_dir(&self) -> PathBuf {
        self.monit_dir().join("job")
    }

    /// Script stdout/stderr logs: `<base>/sys/log/<job>/...`.
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("sys").join("log")
    }

    pub fn etc_dir(&self) -> PathBuf {
        self.base_dir.join("bosh").join("etc")
    }
}
