//! Deriving an `.editorconfig` from the styles files already use.

use std::collections::BTreeMap;
use std::path::Path;

use crate::editorconfig::{EditorConfig, IndentSize, IndentStyle, Properties, Section};
use crate::inspect::{LineEndings, ObservedIndentSize, ObservedStyle};
use crate::Policy;

/// Build a config from observed styles.
///
/// The `[*]` section holds the majority value of every property across all
/// files. Files are then grouped by [`group_pattern`], and a group gets its
/// own section holding only the properties whose group majority differs
/// from the global one. A property without a majority is left out.
pub fn infer(files: &[(String, ObservedStyle)], policy: &Policy) -> EditorConfig {
    let mut config = EditorConfig {
        root: Some(true),
        ..Default::default()
    };

    let votes: Vec<(String, Properties)> = files
        .iter()
        .map(|(path, observed)| (group_pattern(path), vote(observed)))
        .collect();

    let global = tally(votes.iter().map(|(_, props)| props), policy.majority);
    if !global.is_empty() {
        config.sections.push(section("*", &global));
    }

    let mut groups: BTreeMap<&str, Vec<&Properties>> = BTreeMap::new();
    for (pattern, props) in &votes {
        groups.entry(pattern.as_str()).or_default().push(props);
    }

    for (pattern, members) in groups {
        let local = tally(members.into_iter(), policy.majority);
        let overrides = overrides(&global, &local);
        if !overrides.is_empty() {
            config.sections.push(section(pattern, &overrides));
        }
    }

    config
}

/// Section pattern for a file: `*.ext`, or the bare file name when there is
/// no extension (`Makefile`, `.gitignore`).
pub fn group_pattern(path: &str) -> String {
    let path = Path::new(path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    match path.extension() {
        Some(ext) => format!("*.{}", escape_glob(&ext.to_string_lossy())),
        None => escape_glob(&name),
    }
}

fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for ch in literal.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '{' | '}' | ',' | '!' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// What one file says about each property. Mixed line endings and tab
/// indentation's `N/A` size cast no vote.
fn vote(observed: &ObservedStyle) -> Properties {
    Properties {
        indent_style: observed.indent_style,
        indent_size: match observed.indent_size {
            Some(ObservedIndentSize::Width(n)) => Some(IndentSize::Width(n)),
            _ => None,
        },
        end_of_line: match observed.end_of_line {
            Some(LineEndings::Uniform(eol)) => Some(eol),
            _ => None,
        },
        insert_final_newline: observed.insert_final_newline,
        trim_trailing_whitespace: observed.trim_trailing_whitespace,
        charset: observed.charset,
        ..Default::default()
    }
}

fn tally<'a>(votes: impl Iterator<Item = &'a Properties> + Clone, threshold: f64) -> Properties {
    Properties {
        indent_style: majority(votes.clone().filter_map(|p| p.indent_style), threshold),
        indent_size: majority(votes.clone().filter_map(|p| p.indent_size), threshold),
        end_of_line: majority(votes.clone().filter_map(|p| p.end_of_line), threshold),
        insert_final_newline: majority(
            votes.clone().filter_map(|p| p.insert_final_newline),
            threshold,
        ),
        trim_trailing_whitespace: majority(
            votes.clone().filter_map(|p| p.trim_trailing_whitespace),
            threshold,
        ),
        charset: majority(votes.filter_map(|p| p.charset), threshold),
        ..Default::default()
    }
}

/// The value held by strictly more than `threshold` of the votes, if exactly
/// one value leads.
fn majority<T: Ord + Copy>(values: impl Iterator<Item = T>, threshold: f64) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    let mut total = 0usize;
    for value in values {
        *counts.entry(value).or_default() += 1;
        total += 1;
    }

    let best = counts.values().copied().max()?;
    let mut leaders = counts.iter().filter(|(_, count)| **count == best);
    let (value, _) = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }

    (best as f64 > threshold * total as f64).then_some(*value)
}

/// Properties of `local` that a file in its group would not get from `global`.
fn overrides(global: &Properties, local: &Properties) -> Properties {
    fn differs<T: PartialEq + Copy>(global: Option<T>, local: Option<T>) -> Option<T> {
        local.filter(|value| global != Some(*value))
    }

    let mut out = Properties {
        indent_style: differs(global.indent_style, local.indent_style),
        indent_size: differs(global.indent_size, local.indent_size),
        end_of_line: differs(global.end_of_line, local.end_of_line),
        insert_final_newline: differs(global.insert_final_newline, local.insert_final_newline),
        trim_trailing_whitespace: differs(
            global.trim_trailing_whitespace,
            local.trim_trailing_whitespace,
        ),
        charset: differs(global.charset, local.charset),
        ..Default::default()
    };

    // Tab-indented files have no width of their own, so without this they
    // would inherit the global column count.
    if out.indent_style == Some(IndentStyle::Tab)
        && out.indent_size.is_none()
        && matches!(global.indent_size, Some(IndentSize::Width(_)))
    {
        out.indent_size = Some(IndentSize::Tab);
    }

    out
}

fn section(pattern: &str, props: &Properties) -> Section {
    props
        .to_properties()
        .into_iter()
        .fold(Section::new(pattern), Section::with)
}
