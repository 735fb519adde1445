//! `.editorconfig` discovery and loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::EditorConfig;
use super::parse::{parse, ParseError};
use crate::settings::find_file_upward;

pub const EDITORCONFIG_FILE_NAME: &str = ".editorconfig";

#[derive(Debug, Error)]
pub enum EditorConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Find `.editorconfig` by searching upward from the given directory.
pub fn find_editorconfig(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, EDITORCONFIG_FILE_NAME, false)
}

/// Read and parse an `.editorconfig` file.
pub fn load_editorconfig(path: &Path) -> Result<EditorConfig, EditorConfigError> {
    let text = fs::read_to_string(path).map_err(|source| EditorConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&text).map_err(|source| EditorConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(config)
}
