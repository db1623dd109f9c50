// src/applyspec/service.rs

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::applyspec::ApplySpec;
use crate::errors::Result;
use crate::fs::FileSystem;

/// Read access to the currently applied spec.
pub trait SpecService: Send + Sync + Debug {
    fn get(&self) -> Result<ApplySpec>;
}

/// Reads the persisted spec JSON from disk on every call.
///
/// A missing file means nothing has been applied yet and yields an empty
/// spec.
#[derive(Debug, Clone)]
pub struct FileSpecService {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileSpecService {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SpecService for FileSpecService {
    fn get(&self) -> Result<ApplySpec> {
        if !self.fs.exists(&self.path) {
            debug!(path = ?self.path, "no apply spec persisted yet; using empty spec");
            return Ok(ApplySpec::default());
        }

        let contents = self.fs.read_to_string(&self.path)?;
        let spec: ApplySpec = serde_json::from_str(&contents)?;
        Ok(spec)
    }
}
