//! Output destinations
//!
//! Rendered reports, exports and migration scripts go either to stdout or
//! to a file whose directory is created on demand.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;

/// Write `content` to the file at `path`, creating parent directories
pub fn write_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;

    tracing::info!(path = %path.display(), bytes = content.len(), "Output written");
    Ok(())
}

/// Write `content` to stdout
pub fn write_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        handle.write_all(b"\n")?;
    }
    handle.flush()?;
    Ok(())
}

/// Write to `destination` when given, otherwise to stdout
pub fn emit(destination: Option<&str>, content: &str) -> Result<()> {
    match destination {
        Some(path) => write_file(path, content),
        None => write_stdout(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_file_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/nested/migration.sql");

        write_file(&path, "SELECT 1;\nGO\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "SELECT 1;\nGO\n");
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let path_str = path.to_string_lossy().into_owned();

        emit(Some(&path_str), "report").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "report");
    }
}
