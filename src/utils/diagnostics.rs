//! Diagnostic tracing output.
//!
//! The TUI owns the terminal, so events go to a file and only when one is
//! requested with `--debug-log`. Filtering follows `DUET_LOG` (same syntax as
//! `RUST_LOG`) and defaults to `duet=debug`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const FILTER_ENV: &str = "DUET_LOG";
const DEFAULT_FILTER: &str = "duet=debug";

pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a global subscriber appending to `path`. Without a path nothing
/// is installed and every event is dropped.
pub fn init(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| err.to_string())?;
    tracing::debug!(path = %path.display(), "diagnostics enabled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn no_path_installs_nothing() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn file_subscriber_is_installed_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("duet-debug.log");

        init(Some(&path)).unwrap();
        assert!(path.exists());

        let err = init(Some(&path)).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
