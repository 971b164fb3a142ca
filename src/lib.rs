//! worker-ledger library
//!
//! Core functionality for license-gated worker datasets: key pool
//! generation and validation, flat-file worker records, and the gate
//! that ties them together.

pub mod config;
pub mod error;
pub mod license;
pub mod records;
pub mod service;

pub use error::{Result, WorkerError};
