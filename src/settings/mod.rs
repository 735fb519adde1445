//! Tool settings for ectools.
//!
//! This module provides:
//! - Loading settings from `ectools.toml`
//! - Settings file discovery (search upward from current directory)
//! - Merging CLI args, settings file, and defaults
//! - Template generation with `--init`

mod file;
mod init;
mod merge;
mod toml_schema;

pub use file::{
    find_file_upward, find_settings_file, load_settings, SettingsError, SETTINGS_FILE_NAME,
};
pub use init::{generate_init_file, generate_init_file_in, ECTOOLS_TOML_TEMPLATE};
pub use merge::{merge_settings, CliSettings, Settings};
pub use toml_schema::{PolicySection, SettingsToml, WalkSection};
