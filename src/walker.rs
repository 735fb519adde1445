use globset::GlobBuilder;
use ignore::{Walk, WalkBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("no files match '{0}'")]
    NoMatch(String),
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Walk paths and collect file paths, respecting gitignore.
///
/// Files come out in argument order, and in name order within a directory.
/// `.git` is never entered, even when hidden files are included. An argument
/// that does not exist but contains `*`, `?`, `[` or `{` is matched as a glob
/// against the files below its literal leading directories, so quoted
/// patterns work without shell expansion. An argument that matches no file
/// is an error; unreadable entries inside a tree are logged and skipped.
pub fn walk_paths(paths: &[String], hidden: bool) -> Result<Vec<PathBuf>, WalkError> {
    let mut all_files = vec![];

    for arg in paths {
        let path = Path::new(arg);
        if path.exists() {
            all_files.extend(files_under(path, hidden, None));
        } else if is_pattern(arg) {
            let before = all_files.len();
            expand_pattern(arg, hidden, &mut all_files)?;
            if all_files.len() == before {
                return Err(WalkError::NoMatch(arg.clone()));
            }
        } else {
            return Err(WalkError::NoMatch(arg.clone()));
        }
    }

    Ok(all_files)
}

fn is_pattern(text: &str) -> bool {
    text.contains(['*', '?', '[', '{'])
}

fn walker(root: &Path, hidden: bool, max_depth: Option<usize>) -> Walk {
    WalkBuilder::new(root)
        .hidden(!hidden)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .max_depth(max_depth)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| entry.file_name() != ".git")
        .build()
}

fn files_under(
    root: &Path,
    hidden: bool,
    max_depth: Option<usize>,
) -> impl Iterator<Item = PathBuf> {
    walker(root, hidden, max_depth).filter_map(|entry| match entry {
        Ok(entry) => entry
            .file_type()
            .is_some_and(|ft| ft.is_file())
            .then(|| entry.into_path()),
        Err(e) => {
            tracing::warn!("{e}");
            None
        }
    })
}

fn expand_pattern(pattern: &str, hidden: bool, out: &mut Vec<PathBuf>) -> Result<(), WalkError> {
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }

    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|source| WalkError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let (root, depth) = pattern_root(pattern);
    let max_depth = (!pattern.contains("**")).then_some(depth);
    let in_current_dir = root == Path::new(".");

    for path in files_under(&root, hidden, max_depth) {
        let path = if in_current_dir {
            path.strip_prefix(".").map(Path::to_path_buf).unwrap_or(path)
        } else {
            path
        };
        if matcher.is_match(&path) {
            out.push(path);
        }
    }

    Ok(())
}

/// The literal directories a pattern starts with, and how many segments
/// below them it spans.
fn pattern_root(pattern: &str) -> (PathBuf, usize) {
    let segments: Vec<&str> = pattern.split('/').collect();
    let mut root = PathBuf::new();
    let mut consumed = 0;

    for segment in &segments[..segments.len() - 1] {
        if is_pattern(segment) {
            break;
        }
        if segment.is_empty() && consumed == 0 {
            root.push("/");
        } else {
            root.push(segment);
        }
        consumed += 1;
    }

    if root.as_os_str().is_empty() {
        root.push(".");
    }
    (root, segments.len() - consumed)
}
