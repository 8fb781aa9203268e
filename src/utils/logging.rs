//! Append-only transcript log.
//!
//! Every completed turn is written as a user line and an assistant line
//! sharing one timestamp, followed by a blank separator line. The file is
//! reopened in append mode for each write so several sessions can share it;
//! their turns may interleave but never overwrite each other.

use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ChatLog {
    file_path: PathBuf,
    is_active: bool,
}

impl ChatLog {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            is_active: true,
        }
    }

    /// A log that records nothing but still knows where a stale file from an
    /// earlier run would live, so clearing can remove it.
    pub fn paused(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            is_active: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Flips recording on or off and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }

    pub fn append_turn(
        &self,
        user: &str,
        assistant: &str,
        at: DateTime<Local>,
    ) -> io::Result<()> {
        if !self.is_active {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(format_turn(user, assistant, at).as_bytes())?;
        writer.flush()?;
        debug!(path = %self.file_path.display(), "appended turn to transcript log");
        Ok(())
    }

    /// Deletes the log file. A missing file is not an error.
    pub fn remove(&self) -> io::Result<bool> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => {
                debug!(path = %self.file_path.display(), "removed transcript log");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn status_string(&self) -> String {
        let name = self
            .file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        if self.is_active {
            format!("active ({name})")
        } else {
            "disabled".to_string()
        }
    }
}

pub fn format_turn(user: &str, assistant: &str, at: DateTime<Local>) -> String {
    let now = at.format(LOG_TIMESTAMP_FORMAT);
    format!("[{now}] User: {user}\n[{now}] Assistant: {assistant}\n\n")
}
