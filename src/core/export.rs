use std::error::Error;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::core::message::Message;

#[derive(Debug)]
pub enum ExportError {
    NothingToExport,
    AlreadyExists(PathBuf),
    Io(io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NothingToExport => {
                write!(f, "Nothing to export - the conversation is empty.")
            }
            ExportError::AlreadyExists(path) => write!(
                f,
                "File '{}' already exists. Choose another name with /export <file>.",
                path.display()
            ),
            ExportError::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

pub fn default_export_filename(today: DateTime<Local>) -> String {
    format!("duet-export-{}.txt", today.format("%Y-%m-%d"))
}

/// One `<Role>: <content>` line per non-system message, or `None` when there
/// is nothing to export.
pub fn render_export(messages: &[Message]) -> Option<String> {
    let lines: Vec<String> = messages
        .iter()
        .filter(|message| !message.is_system())
        .map(|message| format!("{}: {}", message.role.label(), message.content))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Writes the rendered export to `path`. Never overwrites an existing file.
pub fn export_to_path(messages: &[Message], path: &Path) -> Result<usize, ExportError> {
    let contents = render_export(messages).ok_or(ExportError::NothingToExport)?;

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| match err.kind() {
            io::ErrorKind::AlreadyExists => ExportError::AlreadyExists(path.to_path_buf()),
            _ => ExportError::Io(err),
        })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    debug!(path = %path.display(), bytes = contents.len(), "exported conversation");
    Ok(contents.len())
}
