//! Plain-text run log.
//!
//! Every status line is appended to the run's log file and, when the log is
//! loud, echoed to stdout. The file is reopened for each line.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct StatusLog {
    path: PathBuf,
    loud: bool,
}

impl StatusLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, loud: bool) -> Self {
        Self {
            path: path.into(),
            loud,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `message` plus a newline to the log file.
    pub fn message(&self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{message}")?;

        tracing::debug!(target: "status", "{message}");
        if self.loud {
            println!("{message}");
        }
        Ok(())
    }
}
