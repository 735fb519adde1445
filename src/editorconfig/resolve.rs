//! Resolving the effective style of a single file.

use std::path::{Component, Path};

use globset::GlobSet;

use super::glob::{compile, glob_matches};
use super::model::{EditorConfig, Properties, Section};

/// Merge every section whose glob matches `path`, in declaration order.
///
/// Later sections override earlier ones one property at a time. Properties no
/// section sets stay `None`.
pub fn effective_style(config: &EditorConfig, path: &str) -> Properties {
    merge(
        config
            .sections
            .iter()
            .filter(|section| glob_matches(&section.glob, path)),
    )
}

/// An `EditorConfig` with its section globs compiled once, for resolving
/// many paths.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    config: EditorConfig,
    /// One entry per section; `None` for globs that do not compile.
    matchers: Vec<Option<GlobSet>>,
}

impl CompiledConfig {
    pub fn new(config: EditorConfig) -> Self {
        let matchers = config
            .sections
            .iter()
            .map(|section| match compile(&section.glob) {
                Ok(set) => Some(set),
                Err(e) => {
                    tracing::warn!("ignoring section [{}]: {e}", section.glob);
                    None
                }
            })
            .collect();
        Self { config, matchers }
    }

    /// Same result as [`effective_style`] without recompiling any glob.
    pub fn effective_style(&self, path: &str) -> Properties {
        merge(
            self.config
                .sections
                .iter()
                .zip(&self.matchers)
                .filter(|(_, matcher)| matcher.as_ref().is_some_and(|m| m.is_match(path)))
                .map(|(section, _)| section),
        )
    }
}

fn merge<'a>(sections: impl Iterator<Item = &'a Section>) -> Properties {
    let mut style = Properties::default();
    for section in sections {
        for property in &section.properties {
            style.apply(property);
        }
    }
    style
}

/// Express `file` relative to `base` with `/` separators, the form section
/// globs are matched against. Falls back to the file name when `file` is not
/// below `base`.
pub fn relative_path(base: &Path, file: &Path) -> String {
    let base = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
    let file = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());

    match file.strip_prefix(&base) {
        Ok(rel) => join_components(rel),
        Err(_) => file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| join_components(&file)),
    }
}

fn join_components(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editorconfig::model::{EndOfLine, IndentSize, IndentStyle};
    use crate::editorconfig::parse::parse;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> EditorConfig {
        parse(
            r#"
root = true

[*]
indent_style = space
indent_size = 4
end_of_line = lf

[Makefile]
indent_style = tab

[*.md]
indent_size = 2
indent_size = unset

[docs/*.md]
end_of_line = crlf
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_later_section_overrides_per_property() {
        let style = effective_style(&sample(), "Makefile");
        assert_eq!(style.indent_style, Some(IndentStyle::Tab));
        assert_eq!(style.indent_size, Some(IndentSize::Width(4)));
        assert_eq!(style.end_of_line, Some(EndOfLine::Lf));
    }

    #[test]
    fn test_unset_clears_inherited_value() {
        let style = effective_style(&sample(), "README.md");
        assert_eq!(style.indent_style, Some(IndentStyle::Space));
        assert_eq!(style.indent_size, None);
    }

    #[test]
    fn test_only_matching_sections_apply() {
        let config = sample();
        assert_eq!(
            effective_style(&config, "docs/guide.md").end_of_line,
            Some(EndOfLine::CrLf)
        );
        assert_eq!(
            effective_style(&config, "notes/guide.md").end_of_line,
            Some(EndOfLine::Lf)
        );
    }

    #[test]
    fn test_no_match_leaves_everything_unset() {
        let config = parse("[*.py]\nindent_style = space\n").unwrap();
        assert!(effective_style(&config, "main.rs").is_empty());
    }

    #[test]
    fn test_compiled_config_agrees_with_effective_style() {
        let config = sample();
        let compiled = CompiledConfig::new(config.clone());
        for path in ["Makefile", "README.md", "docs/guide.md", "src/main.rs", "a/Makefile"] {
            assert_eq!(
                compiled.effective_style(path),
                effective_style(&config, path),
                "path: {path}"
            );
        }
    }

    #[test]
    fn test_compiled_config_skips_invalid_glob() {
        let config = parse("[*]\nend_of_line = lf\n[[bad]\nend_of_line = crlf\n").unwrap();
        let compiled = CompiledConfig::new(config);
        assert_eq!(
            compiled.effective_style("[bad").end_of_line,
            Some(EndOfLine::Lf)
        );
    }

    #[test]
    fn test_relative_path_below_base() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        let file = dir.path().join("src/main.rs");
        fs::write(&file, "fn main() {}\n").unwrap();

        assert_eq!(relative_path(dir.path(), &file), "src/main.rs");
    }

    #[test]
    fn test_relative_path_outside_base_uses_file_name() {
        let base = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let file = other.path().join("Makefile");
        fs::write(&file, "all:\n").unwrap();

        assert_eq!(relative_path(base.path(), &file), "Makefile");
    }
}
