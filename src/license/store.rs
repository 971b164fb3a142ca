//! Key pool and activation persistence
//!
//! The pool lives in `<data_dir>/licenses.lince`, one key per line. The
//! activated key lives in its own file and holds nothing but the key.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::keygen;
use crate::config::{Paths, DEFAULT_POOL_SIZE};
use crate::error::{Result, WorkerError};

/// Persisted key pool plus the local activation
#[derive(Debug, Clone)]
pub struct LicenseStore {
    pool_file: PathBuf,
    activation_file: PathBuf,
    pool_size: usize,
}

impl LicenseStore {
    pub fn new(paths: &Paths) -> Self {
        Self {
            pool_file: paths.pool_file(),
            activation_file: paths.activation_file.clone(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Override how many keys a fresh pool receives
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn pool_file(&self) -> &Path {
        &self.pool_file
    }

    pub fn activation_file(&self) -> &Path {
        &self.activation_file
    }

    /// Generate and persist the pool unless it already exists
    ///
    /// Returns `true` when a new pool was written. An existing pool is never
    /// touched.
    pub fn ensure_pool(&self) -> Result<bool> {
        if self.pool_file.exists() {
            debug!(path = %self.pool_file.display(), "license pool present");
            return Ok(false);
        }

        if let Some(parent) = self.pool_file.parent() {
            fs::create_dir_all(parent).map_err(WorkerError::io(parent))?;
        }

        let keys = keygen::generate(self.pool_size);
        self.write_pool(&keys.join("\n"))?;

        info!(
            path = %self.pool_file.display(),
            count = keys.len(),
            "generated license pool"
        );
        Ok(true)
    }

    /// Whether `key` is an exact line of the pool
    ///
    /// Fails closed: a missing pool validates nothing.
    pub fn is_valid(&self, key: &str) -> Result<bool> {
        let Some(pool) = self.read_pool()? else {
            debug!("license pool missing, rejecting key");
            return Ok(false);
        };
        Ok(pool.lines().any(|line| line == key))
    }

    /// First `count` keys of the pool, for handing out to users
    pub fn issue(&self, count: usize) -> Result<Vec<String>> {
        let pool = self
            .read_pool()?
            .ok_or_else(|| WorkerError::NotFound(self.pool_file.clone()))?;
        Ok(pool
            .lines()
            .filter(|line| !line.is_empty())
            .take(count)
            .map(str::to_string)
            .collect())
    }

    /// The activated key, trimmed; `None` when absent or blank
    pub fn load_activation(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.activation_file) {
            Ok(content) => {
                let key = content.trim();
                Ok((!key.is_empty()).then(|| key.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WorkerError::io(&self.activation_file)(e)),
        }
    }

    /// Persist `key` as the sole content of the activation file
    pub fn activate(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.activation_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(WorkerError::io(parent))?;
            }
        }
        fs::write(&self.activation_file, key).map_err(WorkerError::io(&self.activation_file))?;
        info!(path = %self.activation_file.display(), "license activated");
        Ok(())
    }

    /// An activation exists and is still in the pool
    pub fn currently_activated(&self) -> Result<bool> {
        match self.load_activation()? {
            Some(key) => self.is_valid(&key),
            None => Ok(false),
        }
    }

    /// Write the pool in one step so an interrupted write never leaves a
    /// truncated pool behind
    fn write_pool(&self, contents: &str) -> Result<()> {
        let dir = self.pool_file.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(WorkerError::io(dir))?;
        tmp.write_all(contents.as_bytes())
            .map_err(WorkerError::io(tmp.path()))?;
        tmp.persist(&self.pool_file)
            .map_err(|e| WorkerError::io(&self.pool_file)(e.error))?;
        Ok(())
    }

    fn read_pool(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.pool_file) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WorkerError::io(&self.pool_file)(e)),
        }
    }
}
