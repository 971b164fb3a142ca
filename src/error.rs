//! Error types

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, WorkerError>;

/// Failure of a single core operation
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("The entered license key is invalid")]
    InvalidLicense,

    #[error("No valid license is activated")]
    NotActivated,

    #[error("Attendance for {worker} is not a number: {value:?}")]
    InvalidAttendance { worker: String, value: String },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WorkerError {
    /// Build a closure that wraps an `io::Error` with the path it concerns
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> WorkerError + '_ {
        move |source| WorkerError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
