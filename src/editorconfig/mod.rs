//! EditorConfig support.
//!
//! This module provides:
//! - The typed config model (sections, known properties, unknown pairs)
//! - Parsing and serializing the `.editorconfig` text format
//! - Glob matching in the EditorConfig dialect
//! - Resolving the effective style for one path
//! - Discovery and loading of `.editorconfig` files

mod file;
mod glob;
mod model;
mod parse;
mod resolve;

pub use file::{find_editorconfig, load_editorconfig, EditorConfigError, EDITORCONFIG_FILE_NAME};
pub use glob::{glob_matches, GlobError};
pub use model::{
    Charset, EditorConfig, EndOfLine, IndentSize, IndentStyle, Key, Properties, Property, Section,
};
pub use parse::{parse, serialize, ParseError, ParseErrorKind};
pub use resolve::{effective_style, relative_path, CompiledConfig};
