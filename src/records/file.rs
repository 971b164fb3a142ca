//! Dataset files
//!
//! A dataset is `<data_dir>/<name>.mahk`: the header line followed by one
//! `name,salary,attendance` line per worker, in insertion order.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::record::{WorkerRecord, HEADER};
use crate::config::{Paths, DATASET_EXTENSION};
use crate::error::{Result, WorkerError};

/// One named worker dataset
#[derive(Debug, Clone)]
pub struct RecordFile {
    name: String,
    path: PathBuf,
}

impl RecordFile {
    /// Resolve `name` under the data directory; nothing is touched on disk
    pub fn open(paths: &Paths, name: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            path: paths.dataset_file(name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the header line, truncating any existing dataset
    pub fn create(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(WorkerError::io(parent))?;
        }
        fs::write(&self.path, format!("{}\n", HEADER)).map_err(WorkerError::io(&self.path))?;
        info!(dataset = %self.name, "created dataset");
        Ok(())
    }

    /// Append a worker with zero attendance
    pub fn append(&self, worker_name: &str, salary: &str) -> Result<()> {
        self.require_exists()?;
        let record = WorkerRecord::new(worker_name, salary)?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(WorkerError::io(&self.path))?;
        writeln!(file, "{}", record.to_line()).map_err(WorkerError::io(&self.path))?;

        debug!(dataset = %self.name, worker = %record.name, "appended worker");
        Ok(())
    }

    /// Increment attendance on every row named `worker_name`
    ///
    /// Rows without exactly three fields are left as they are. The whole file
    /// is rebuilt in memory and replaced in one step, so a bad attendance
    /// value aborts the call with the dataset untouched. Returns how many rows
    /// were incremented.
    pub fn mark_attendance(&self, worker_name: &str) -> Result<usize> {
        self.require_exists()?;
        if worker_name.is_empty() {
            return Err(WorkerError::InvalidInput(
                "worker name must not be empty".to_string(),
            ));
        }

        let content = fs::read_to_string(&self.path).map_err(WorkerError::io(&self.path))?;
        let mut rewritten = String::with_capacity(content.len() + 16);
        let mut marked = 0;

        let mut lines = content.lines();
        // The header is never a match candidate, even for a worker named "Name"
        if let Some(header) = lines.next() {
            rewritten.push_str(header.trim());
            rewritten.push('\n');
        }

        for line in lines {
            let mut fields: Vec<String> = line.trim().split(',').map(str::to_string).collect();
            if fields.len() == 3 && fields[0] == worker_name {
                fields[2] = increment(worker_name, &fields[2])?;
                marked += 1;
            }
            rewritten.push_str(&fields.join(","));
            rewritten.push('\n');
        }

        self.replace_contents(&rewritten)?;
        debug!(dataset = %self.name, worker = worker_name, marked, "marked attendance");
        Ok(marked)
    }

    /// Full persisted text
    pub fn read(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(WorkerError::NotFound(self.path.clone()))
            }
            Err(e) => Err(WorkerError::io(&self.path)(e)),
        }
    }

    /// Remove the dataset file
    pub fn delete(&self) -> Result<()> {
        self.require_exists()?;
        fs::remove_file(&self.path).map_err(WorkerError::io(&self.path))?;
        info!(dataset = %self.name, "deleted dataset");
        Ok(())
    }

    /// Names of all datasets under the data directory, sorted
    pub fn list(paths: &Paths) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&paths.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(WorkerError::io(&paths.data_dir)(e)),
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|n| n.strip_suffix(DATASET_EXTENSION))
                    .filter(|stem| !stem.is_empty())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn require_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(WorkerError::NotFound(self.path.clone()))
        }
    }

    fn replace_contents(&self, contents: &str) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(WorkerError::io(dir))?;
        tmp.write_all(contents.as_bytes())
            .map_err(WorkerError::io(tmp.path()))?;
        tmp.persist(&self.path)
            .map_err(|e| WorkerError::io(&self.path)(e.error))?;
        Ok(())
    }
}

fn increment(worker_name: &str, value: &str) -> Result<String> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_add(1))
        .map(|n| n.to_string())
        .ok_or_else(|| WorkerError::InvalidAttendance {
            worker: worker_name.to_string(),
            value: value.to_string(),
        })
}
