//! Settings file discovery and loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::toml_schema::SettingsToml;

pub const SETTINGS_FILE_NAME: &str = "ectools.toml";

/// Error type for settings loading
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading the file
    #[error("failed to read settings file: {0}")]
    Io(#[from] io::Error),
    /// TOML parsing error
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Parsed, but a value is out of range
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Search upward from `start_dir` for a file with the given name.
///
/// If `stop_at_git_root` is true, stops searching when a `.git` directory is found.
/// Returns `None` if the file is not found.
pub fn find_file_upward(
    start_dir: &Path,
    filename: &str,
    stop_at_git_root: bool,
) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.is_file() {
            return Some(file_path);
        }

        if stop_at_git_root && current.join(".git").exists() {
            return None;
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Find ectools.toml by searching upward from the given directory.
///
/// Stops at the first `ectools.toml` found, or at the git repository root
/// (directory containing `.git`), whichever comes first.
pub fn find_settings_file(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, SETTINGS_FILE_NAME, true)
}

/// Load, parse and range-check ectools.toml from the given path.
pub fn load_settings(path: &Path) -> Result<SettingsToml, SettingsError> {
    let content = fs::read_to_string(path)?;
    let settings: SettingsToml = toml::from_str(&content)?;
    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &SettingsToml) -> Result<(), SettingsError> {
    let policy = &settings.policy;

    if policy.tab_width == Some(0) {
        return Err(SettingsError::Invalid("policy.tab_width must be at least 1".into()));
    }
    if policy.max_indent_size.is_some_and(|n| n < 2) {
        return Err(SettingsError::Invalid(
            "policy.max_indent_size must be at least 2".into(),
        ));
    }
    if let Some(majority) = policy.majority {
        if !(0.0..1.0).contains(&majority) {
            return Err(SettingsError::Invalid(format!(
                "policy.majority must be in [0, 1), got {majority}"
            )));
        }
    }

    Ok(())
}
