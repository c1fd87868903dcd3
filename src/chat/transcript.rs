use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::SessionError;

/// Transcript file for one chat session.
///
/// Every append is flushed straight away, so a crash loses at most the
/// write in flight. Dropping the log flushes and closes the file.
pub struct SessionLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl SessionLog {
    /// `Session_<YYYYMMDD_HHMMSS>.log`
    pub fn file_name(started: &DateTime<Local>) -> String {
        format!("Session_{}.log", started.format("%Y%m%d_%H%M%S"))
    }

    /// Creates the transcript in `directory`, creating the directory first if
    /// needed. A session started in the same second overwrites the file.
    pub fn create(directory: &Path, started: &DateTime<Local>) -> Result<Self, SessionError> {
        let path = directory.join(Self::file_name(started));
        let log_error = |source| SessionError::Log {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(directory).map_err(log_error)?;
        let file = File::create(&path).map_err(log_error)?;
        info!("Session log opened at {}", path.display());

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `text` and flushes it to disk.
    pub fn append(&mut self, text: &str) -> Result<(), SessionError> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|source| SessionError::Log {
                path: self.path.clone(),
                source,
            })
    }
}

impl Drop for SessionLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
