//! Storage layout and paths

use std::path::{Path, PathBuf};

use crate::error::{Result, WorkerError};

/// Directory holding the key pool and every dataset
pub const APP_FOLDER: &str = "./work_management";

/// Key pool file name, inside [`APP_FOLDER`]
pub const POOL_FILE_NAME: &str = "licenses.lince";

/// Activation file, relative to the process working directory
pub const ACTIVATION_FILE_NAME: &str = "user_license.txt";

/// Extension appended to a dataset name
pub const DATASET_EXTENSION: &str = ".mahk";

/// Number of keys generated for a fresh pool
pub const DEFAULT_POOL_SIZE: usize = 10_000;

/// Resolved storage locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Directory holding the pool and datasets
    pub data_dir: PathBuf,
    /// File holding the activated key
    pub activation_file: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(APP_FOLDER),
            activation_file: PathBuf::from(ACTIVATION_FILE_NAME),
        }
    }
}

impl Paths {
    pub fn new(data_dir: impl Into<PathBuf>, activation_file: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            activation_file: activation_file.into(),
        }
    }

    /// Default layout rooted at `root` instead of the working directory
    pub fn under<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.join(APP_FOLDER),
            activation_file: root.join(ACTIVATION_FILE_NAME),
        }
    }

    pub fn pool_file(&self) -> PathBuf {
        self.data_dir.join(POOL_FILE_NAME)
    }

    /// Resolve a dataset name to its file
    ///
    /// Names must be non-empty and stay inside the data directory.
    pub fn dataset_file(&self, name: &str) -> Result<PathBuf> {
        validate_dataset_name(name)?;
        Ok(self.data_dir.join(format!("{}{}", name, DATASET_EXTENSION)))
    }
}

fn validate_dataset_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(WorkerError::InvalidInput(
            "dataset name must not be empty".to_string(),
        ));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(WorkerError::InvalidInput(format!(
            "invalid dataset name: {}",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let paths = Paths::default();
        assert_eq!(
            paths.pool_file(),
            PathBuf::from("./work_management/licenses.lince")
        );
        assert_eq!(paths.activation_file, PathBuf::from("user_license.txt"));
        assert_eq!(
            paths.dataset_file("team").unwrap(),
            PathBuf::from("./work_management/team.mahk")
        );
    }

    #[test]
    fn test_under_root() {
        let paths = Paths::under("/tmp/ledger");
        assert_eq!(
            paths.activation_file,
            PathBuf::from("/tmp/ledger/user_license.txt")
        );
        assert!(paths.pool_file().starts_with("/tmp/ledger"));
    }

    #[test]
    fn test_dataset_name_rejected() {
        let paths = Paths::default();
        for bad in ["", ".", "..", "a/b", "..\\x"] {
            assert!(matches!(
                paths.dataset_file(bad),
                Err(WorkerError::InvalidInput(_))
            ));
        }
    }
}
