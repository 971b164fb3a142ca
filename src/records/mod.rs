//! Worker datasets stored as flat delimited files

pub mod file;
pub mod record;

pub use file::RecordFile;
pub use record::{parse_rows, WorkerRecord, HEADER};
