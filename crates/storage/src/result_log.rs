//! Append-only result log.

use async_trait::async_trait;
use quiz_core::model::Score;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::repository::{ResultLogRepository, StorageError};

/// Appends one `"<username>, <score>"` line per completed quiz to a local
/// file.
///
/// The file is opened in append mode for every write; small single-line
/// appends ride on the platform's append atomicity, so concurrent writers
/// need no locking. This is a human-readable debug log, not a machine-parsed
/// format.
#[derive(Debug, Clone)]
pub struct FileResultLog {
    path: PathBuf,
}

impl FileResultLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultLogRepository for FileResultLog {
    async fn append(&self, username: &str, score: &Score) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::Io(e.to_string()))?;
        writeln!(file, "{username}, {score}").map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }
}
