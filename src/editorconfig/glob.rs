//! Section glob matching in the EditorConfig dialect.
//!
//! A section pattern is brace-expanded into plain patterns, rewritten into
//! `globset` syntax and compiled into one set:
//! - no `/` in the pattern: match the file name at any depth (`**/` prefix)
//! - a `/` anywhere: anchored at the directory holding the `.editorconfig`
//! - `*` never crosses a `/`, `**` does, even inside a segment (`a**b`)
//! - `{a,b}` groups nest, `{n..m}` is a numeric range, and a group
//!   without a comma (`{single}`) is literal text

use std::sync::LazyLock;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::Regex;
use thiserror::Error;

/// Ranges larger than this are left literal rather than expanded.
const MAX_RANGE_LEN: i64 = 1024;

/// Upper bound on the plain patterns one section header may expand to.
const MAX_ALTERNATIVES: usize = 4096;

static NUMERIC_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+)\.\.(-?\d+)$").unwrap());

#[derive(Debug, Error)]
pub enum GlobError {
    #[error(transparent)]
    Invalid(#[from] globset::Error),
    #[error("expands to more than {MAX_ALTERNATIVES} patterns")]
    TooLarge,
}

/// Does `pattern` (a section header) select `path`?
///
/// `path` is relative to the config directory and uses `/` separators.
/// Patterns that fail to compile never match.
pub fn glob_matches(pattern: &str, path: &str) -> bool {
    compile(pattern).is_ok_and(|set| set.is_match(path))
}

/// Compile a section pattern into a matcher.
pub fn compile(pattern: &str) -> Result<GlobSet, GlobError> {
    let mut builder = GlobSetBuilder::new();
    for translated in translate(pattern)? {
        builder.add(
            GlobBuilder::new(&translated)
                .literal_separator(true)
                .backslash_escape(true)
                .build()?,
        );
    }
    Ok(builder.build()?)
}

fn translate(pattern: &str) -> Result<Vec<String>, GlobError> {
    let (body, anchored) = match pattern.strip_prefix('/') {
        Some(rest) => (rest, true),
        None => (pattern, pattern.contains('/')),
    };

    let mut out = Vec::new();
    for alternative in expand_braces(body)? {
        for spelled in split_inner_double_star(&alternative) {
            let widened = widen_recursive(&spelled);
            out.push(if anchored {
                widened
            } else {
                format!("**/{widened}")
            });
        }
        if out.len() > MAX_ALTERNATIVES {
            return Err(GlobError::TooLarge);
        }
    }
    Ok(out)
}

/// Every brace-free pattern `pattern` stands for.
///
/// Braces that do not form a group come out escaped, so `globset` reads
/// them as literal characters.
fn expand_braces(pattern: &str) -> Result<Vec<String>, GlobError> {
    let Some((open, close)) = find_group(pattern) else {
        return Ok(vec![escape_stray_closers(pattern)]);
    };
    let prefix = escape_stray_closers(&pattern[..open]);

    let Some(close) = close else {
        let rest = expand_braces(&pattern[open + 1..])?;
        return Ok(rest.into_iter().map(|r| format!("{prefix}\\{{{r}")).collect());
    };

    let body = &pattern[open + 1..close];
    let options = match numeric_range(body) {
        Some(numbers) => numbers,
        None => {
            let parts = split_alternatives(body);
            if parts.len() == 1 {
                expand_braces(body)?
                    .into_iter()
                    .map(|b| format!("\\{{{b}\\}}"))
                    .collect()
            } else {
                let mut options = Vec::new();
                for part in parts {
                    options.extend(expand_braces(part)?);
                    if options.len() > MAX_ALTERNATIVES {
                        return Err(GlobError::TooLarge);
                    }
                }
                options
            }
        }
    };

    let suffixes = expand_braces(&pattern[close + 1..])?;
    if options.len().saturating_mul(suffixes.len()) > MAX_ALTERNATIVES {
        return Err(GlobError::TooLarge);
    }

    let prefix = &prefix;
    Ok(options
        .iter()
        .flat_map(|option| {
            suffixes
                .iter()
                .map(move |suffix| format!("{prefix}{option}{suffix}"))
        })
        .collect())
}

/// Byte offsets of the first top-level `{` and its matching `}`, if any.
fn find_group(pattern: &str) -> Option<(usize, Option<usize>)> {
    let bytes = pattern.as_bytes();
    let mut open = None;
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => {
                if depth == 0 {
                    open = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return open.map(|o| (o, Some(i)));
                }
            }
            _ => {}
        }
        i += 1;
    }

    open.map(|o| (o, None))
}

/// Split a group body at its top-level commas.
fn split_alternatives(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut parts = Vec::new();
    let (mut depth, mut start, mut i) = (0usize, 0, 0);

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    parts.push(&body[start..]);
    parts
}

fn numeric_range(body: &str) -> Option<Vec<String>> {
    let caps = NUMERIC_RANGE.captures(body)?;
    let a: i64 = caps[1].parse().ok()?;
    let b: i64 = caps[2].parse().ok()?;
    let (lo, hi) = (a.min(b), a.max(b));
    if hi - lo >= MAX_RANGE_LEN {
        return None;
    }
    Some((lo..=hi).map(|n| n.to_string()).collect())
}

fn escape_stray_closers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                out.push(ch);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '}' => out.push_str("\\}"),
            _ => out.push(ch),
        }
    }
    out
}

/// `a**b` matches `axb` as well as `a/x/b`; globset only accepts `**` as a
/// whole segment, so spell it both ways.
fn split_inner_double_star(pattern: &str) -> Vec<String> {
    let inner = pattern
        .match_indices("**")
        .map(|(pos, _)| pos)
        .find(|&pos| pos > 0 && !pattern[..pos].ends_with('/'));
    let Some(pos) = inner else {
        return vec![pattern.to_string()];
    };

    let (head, tail) = (&pattern[..pos], &pattern[pos + 2..]);
    let spanning = if tail.is_empty() || tail.starts_with('/') {
        format!("{head}*/**{tail}")
    } else {
        format!("{head}*/**/*{tail}")
    };

    let mut out = split_inner_double_star(&format!("{head}*{tail}"));
    out.extend(split_inner_double_star(&spanning));
    out
}

/// `dir/**.md` means "any `.md` below `dir`"; globset wants `dir/**/*.md`.
fn widen_recursive(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut rest = pattern;

    while let Some(pos) = rest.find("**") {
        let (before, after) = rest.split_at(pos);
        let after = &after[2..];
        out.push_str(before);
        out.push_str("**");

        let at_segment_start = out.len() == 2 || out[..out.len() - 2].ends_with('/');
        if at_segment_start && !after.is_empty() && !after.starts_with('/') {
            out.push_str("/*");
        }
        rest = after;
    }

    out.push_str(rest);
    out
}
