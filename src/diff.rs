//! Comparing configured style against observed style.

use std::fmt;

use crate::editorconfig::{Charset, IndentSize, IndentStyle, Key, Properties};
use crate::inspect::{LineEndings, ObservedIndentSize, ObservedStyle};
use crate::Policy;

/// How many line numbers a message lists before summarizing the rest.
const MAX_LISTED_LINES: usize = 5;

/// One property of one file that does not match its configured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    pub key: Key,
    pub expected: String,
    pub observed: String,
    /// 1-based lines the finding points at, when it is line-specific.
    pub lines: Vec<usize>,
}

impl Discrepancy {
    fn new(key: Key, expected: impl ToString, observed: impl ToString) -> Self {
        Self {
            key,
            expected: expected.to_string(),
            observed: observed.to_string(),
            lines: Vec::new(),
        }
    }

    fn at(mut self, lines: &[usize]) -> Self {
        self.lines = lines.to_vec();
        self
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (expected, observed) = (&self.expected, &self.observed);
        match self.key {
            Key::IndentStyle => write!(
                f,
                "incorrect indent style: expected {expected}, found {observed}"
            )?,
            Key::IndentSize => write!(
                f,
                "incorrect indent size: expected {expected}, found {observed}"
            )?,
            Key::EndOfLine => write!(
                f,
                "incorrect line ending: expected {expected}, found {observed}"
            )?,
            Key::InsertFinalNewline if expected == "true" => f.write_str("missing final newline")?,
            Key::InsertFinalNewline => f.write_str("unexpected final newline")?,
            Key::TrimTrailingWhitespace => f.write_str("trailing whitespace found")?,
            Key::Charset => write!(f, "incorrect charset: expected {expected}, found {observed}")?,
            Key::TabWidth => write!(f, "{}: expected {expected}, found {observed}", self.key)?,
        }
        write_lines(f, &self.lines)
    }
}

fn write_lines(f: &mut fmt::Formatter<'_>, lines: &[usize]) -> fmt::Result {
    match lines {
        [] => Ok(()),
        [line] => write!(f, " (line {line})"),
        _ => {
            let shown: Vec<String> = lines
                .iter()
                .take(MAX_LISTED_LINES)
                .map(ToString::to_string)
                .collect();
            write!(f, " (lines {}", shown.join(", "))?;
            if lines.len() > MAX_LISTED_LINES {
                write!(f, " and {} more", lines.len() - MAX_LISTED_LINES)?;
            }
            f.write_str(")")
        }
    }
}

/// List every configured property the observed style contradicts, in
/// [`Key`] order.
///
/// A property the file gives no evidence about (no indented lines, an empty
/// file) is never a discrepancy. `policy` supplies the tab stop when the
/// configuration has none.
pub fn diff(expected: &Properties, observed: &ObservedStyle, policy: &Policy) -> Vec<Discrepancy> {
    let mut found = Vec::new();

    if let (Some(want), Some(have)) = (expected.indent_style, observed.indent_style) {
        if want != have {
            let lines = match have {
                IndentStyle::Tab => &observed.tab_indented_lines,
                IndentStyle::Space => &observed.space_indented_lines,
            };
            found.push(Discrepancy::new(Key::IndentStyle, want, have).at(lines));
        } else if want == IndentStyle::Tab {
            // Spaces short of a full tab stop are alignment, not indentation.
            let tab_width = expected.tab_width().unwrap_or(policy.tab_width).max(1) as usize;
            let spaced: Vec<usize> = observed
                .space_indented_lines
                .iter()
                .zip(&observed.space_indent_widths)
                .filter(|(_, width)| **width >= tab_width)
                .map(|(line, _)| *line)
                .collect();
            if !spaced.is_empty() {
                found.push(
                    Discrepancy::new(Key::IndentStyle, want, IndentStyle::Space).at(&spaced),
                );
            }
        }
    }

    if let Some(IndentSize::Width(want)) = expected.indent_size {
        if expected.indent_style != Some(IndentStyle::Tab) {
            match observed.indent_size {
                Some(have @ ObservedIndentSize::NotApplicable) => found.push(
                    Discrepancy::new(Key::IndentSize, want, have).at(&observed.tab_indented_lines),
                ),
                Some(have @ ObservedIndentSize::Width(width)) if width % want != 0 => {
                    found.push(Discrepancy::new(Key::IndentSize, want, have));
                }
                _ => {}
            }
        }
    }

    if let (Some(want), Some(have)) = (expected.end_of_line, &observed.end_of_line) {
        match have {
            LineEndings::Uniform(eol) if *eol == want => {}
            LineEndings::Uniform(_) => {
                found.push(Discrepancy::new(Key::EndOfLine, want, have));
            }
            LineEndings::Mixed(kinds) => {
                let others: Vec<&str> = kinds
                    .iter()
                    .filter(|eol| **eol != want)
                    .map(|eol| eol.as_str())
                    .collect();
                let mut lines: Vec<usize> = observed
                    .lines_by_ending
                    .iter()
                    .filter(|(eol, _)| **eol != want)
                    .flat_map(|(_, lines)| lines.iter().copied())
                    .collect();
                lines.sort_unstable();
                found.push(Discrepancy::new(Key::EndOfLine, want, others.join(",")).at(&lines));
            }
        }
    }

    if let (Some(want), Some(have)) = (
        expected.insert_final_newline,
        observed.insert_final_newline,
    ) {
        if want != have {
            found.push(Discrepancy::new(Key::InsertFinalNewline, want, have));
        }
    }

    if expected.trim_trailing_whitespace == Some(true)
        && observed.trim_trailing_whitespace == Some(false)
    {
        found.push(
            Discrepancy::new(Key::TrimTrailingWhitespace, true, false)
                .at(&observed.trailing_whitespace_lines),
        );
    }

    if let (Some(want), Some(have)) = (expected.charset, observed.charset) {
        if !charset_conforms(want, have) {
            found.push(Discrepancy::new(Key::Charset, want, have));
        }
    }

    found
}

/// Without a BOM, valid UTF-8 is also valid latin1, so latin1 accepts it.
fn charset_conforms(expected: Charset, observed: Charset) -> bool {
    expected == observed || (expected == Charset::Latin1 && observed == Charset::Utf8)
}
