//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file::SETTINGS_FILE_NAME;

/// Template ectools.toml with documentation
pub const ECTOOLS_TOML_TEMPLATE: &str = r#"# ectools.toml - Settings for the ectools EditorConfig checker
#
# Formatting rules themselves live in .editorconfig. This file only tunes
# how ectools measures files against them and how it infers new rules.
# Uncomment and modify as needed.

[policy]
# Tab stop used to convert between tabs and spaces when .editorconfig sets
# neither tab_width nor a numeric indent_size.
# Default: 4
# tab_width = 4

# Largest indentation step considered when detecting a file's indent_size.
# Default: 8
# max_indent_size = 8

# When generating a config, a value is kept only if more than this share of
# the files that report it agree. Otherwise the property is left out.
# Default: 0.5
# majority = 0.5

[walk]
# Include hidden files and directories when walking directories.
# Default: false
# hidden = false
"#;

/// Generate ectools.toml in the specified directory (or current directory if None).
///
/// Returns an error if ectools.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(
        || PathBuf::from(SETTINGS_FILE_NAME),
        |d| d.join(SETTINGS_FILE_NAME),
    );

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{SETTINGS_FILE_NAME} already exists"),
        ));
    }

    fs::write(&path, ECTOOLS_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate ectools.toml in the current directory.
///
/// Returns an error if ectools.toml already exists.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
