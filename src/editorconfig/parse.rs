//! Reading and writing the INI-like `.editorconfig` text format.

use thiserror::Error;

use super::model::{EditorConfig, Key, Property, Section};

/// A malformed line in an `.editorconfig` file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("section header is missing its closing `]`")]
    UnterminatedSection,
    #[error("section header has an empty glob")]
    EmptySection,
    #[error("expected `key = value`, found `{0}`")]
    MissingEquals(String),
    #[error("property has an empty key")]
    EmptyKey,
}

/// Parse `.editorconfig` text.
///
/// Blank lines and lines starting with `#` or `;` are skipped. Keys are
/// lowercased; values of known keys are matched case-insensitively.
pub fn parse(text: &str) -> Result<EditorConfig, ParseError> {
    let mut config = EditorConfig::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let error = |kind| ParseError {
            line: idx + 1,
            kind,
        };

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let glob = header
                .strip_suffix(']')
                .ok_or_else(|| error(ParseErrorKind::UnterminatedSection))?
                .trim();
            if glob.is_empty() {
                return Err(error(ParseErrorKind::EmptySection));
            }
            config.sections.push(Section::new(glob));
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| error(ParseErrorKind::MissingEquals(line.to_string())))?;
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if key.is_empty() {
            return Err(error(ParseErrorKind::EmptyKey));
        }

        match config.sections.last_mut() {
            Some(section) => {
                let property = Property::from_pair(&key, value);
                if matches!(property, Property::Unknown { .. }) {
                    if Key::from_name(&key).is_some() {
                        tracing::warn!(line = idx + 1, "invalid value `{value}` for {key}");
                    } else {
                        tracing::debug!(line = idx + 1, "unknown property {key}");
                    }
                }
                section.properties.push(property);
            }
            None if key == "root" => {
                config.root = match value.to_ascii_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => {
                        config.preamble.push((key, value.to_string()));
                        continue;
                    }
                };
            }
            None => config.preamble.push((key, value.to_string())),
        }
    }

    Ok(config)
}

/// Render a config back to text. `parse(&serialize(c))` yields an equal config.
pub fn serialize(config: &EditorConfig) -> String {
    let mut out = String::new();

    if let Some(root) = config.root {
        out.push_str(&format!("root = {root}\n"));
    }
    for (key, value) in &config.preamble {
        out.push_str(&format!("{key} = {value}\n"));
    }

    for section in &config.sections {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", section.glob));
        for property in &section.properties {
            out.push_str(&format!("{} = {}\n", property.name(), property.value()));
        }
    }

    out
}
