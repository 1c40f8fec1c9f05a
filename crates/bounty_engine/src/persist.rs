use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("parent directory missing or not writable: {0}")]
    ParentDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Ensure the directory that will hold `path` exists; create it if missing.
pub fn ensure_parent_dir(path: &Path) -> Result<(), PersistError> {
    let dir = parent_dir(path);
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::ParentDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::ParentDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::ParentDir(e.to_string()))?;
    }
    Ok(())
}

/// Replace `target` with `content` by writing a sibling temp file, syncing it
/// and renaming it over the target. Readers never observe a truncated file.
pub fn write_atomic(target: &Path, content: &str) -> Result<(), PersistError> {
    ensure_parent_dir(target)?;

    let mut tmp = NamedTempFile::new_in(parent_dir(target))?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}
