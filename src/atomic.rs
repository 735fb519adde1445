//! Replacing a file's contents in one step.
//!
//! The new bytes go to a temporary file next to the target, are synced, and
//! the temporary file is then renamed over the target. An interrupted write
//! leaves the original untouched.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create temporary file in {}: {source}", dir.display())]
    Create { dir: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to replace {}: {source}", path.display())]
    Persist { path: PathBuf, source: io::Error },
}

/// Atomically replace the contents of `path` with `content`, keeping the
/// original file's permissions.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| WriteError::Create {
        dir: dir.to_path_buf(),
        source,
    })?;

    let write_err = |source| WriteError::Write {
        path: path.to_path_buf(),
        source,
    };
    tmp.write_all(content).map_err(write_err)?;
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;

    tmp.persist(path).map_err(|e| WriteError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
