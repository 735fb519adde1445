//! Measuring the formatting a file actually uses.

mod indent;
mod text;

pub use indent::{analyze, leading_whitespace, visual_width, IndentStats};
pub use text::{encode, is_binary, lines, sniff_charset, Document, Line, Lines, Skip};

use std::collections::BTreeMap;
use std::fmt;

use crate::editorconfig::{Charset, EndOfLine, IndentStyle};
use crate::Policy;

/// Indent size as measured; tab indentation has no meaningful column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedIndentSize {
    Width(u32),
    NotApplicable,
}

impl fmt::Display for ObservedIndentSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width(n) => write!(f, "{n}"),
            Self::NotApplicable => f.write_str("N/A"),
        }
    }
}

/// The line terminators found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEndings {
    Uniform(EndOfLine),
    /// More than one kind, in order of first appearance.
    Mixed(Vec<EndOfLine>),
}

impl fmt::Display for LineEndings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(eol) => f.write_str(eol.as_str()),
            Self::Mixed(kinds) => {
                let names: Vec<_> = kinds.iter().map(|k| k.as_str()).collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

/// Formatting observed in one file. `None` means "cannot tell" (for example,
/// no indented lines, or an empty file), never "violates".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedStyle {
    pub indent_style: Option<IndentStyle>,
    pub indent_size: Option<ObservedIndentSize>,
    pub end_of_line: Option<LineEndings>,
    pub insert_final_newline: Option<bool>,
    pub trim_trailing_whitespace: Option<bool>,
    pub charset: Option<Charset>,

    pub tab_indented_lines: Vec<usize>,
    pub space_indented_lines: Vec<usize>,
    /// Indent width in columns of each entry in `space_indented_lines`.
    pub space_indent_widths: Vec<usize>,
    pub trailing_whitespace_lines: Vec<usize>,
    /// 1-based lines grouped by the terminator that ends them.
    pub lines_by_ending: BTreeMap<EndOfLine, Vec<usize>>,
}

impl ObservedStyle {
    /// The terminator used by the most lines, if any line is terminated.
    pub fn dominant_ending(&self) -> Option<EndOfLine> {
        self.lines_by_ending
            .iter()
            .max_by_key(|(_, lines)| lines.len())
            .map(|(eol, _)| *eol)
    }
}

/// Inspect raw file bytes.
///
/// An empty file yields an all-`None` style. Binary files and bytes that do
/// not decode are reported as a [`Skip`] instead of a style.
pub fn observe(bytes: &[u8], policy: &Policy) -> Result<ObservedStyle, Skip> {
    if bytes.is_empty() {
        return Ok(ObservedStyle::default());
    }
    let document = Document::decode(bytes)?;
    Ok(observe_document(&document, policy))
}

pub fn observe_document(document: &Document, policy: &Policy) -> ObservedStyle {
    let mut style = ObservedStyle {
        charset: Some(document.charset),
        ..Default::default()
    };

    let mut first_seen: Vec<EndOfLine> = Vec::new();
    let mut last_ending = None;
    let mut line_count = 0;

    for (idx, line) in lines(&document.text).enumerate() {
        line_count += 1;
        if line.body.ends_with([' ', '\t']) {
            style.trailing_whitespace_lines.push(idx + 1);
        }
        if let Some(eol) = line.ending {
            if !first_seen.contains(&eol) {
                first_seen.push(eol);
            }
            style.lines_by_ending.entry(eol).or_default().push(idx + 1);
        }
        last_ending = line.ending;
    }

    if line_count == 0 {
        return style;
    }

    style.end_of_line = match first_seen.len() {
        0 => None,
        1 => Some(LineEndings::Uniform(first_seen[0])),
        _ => Some(LineEndings::Mixed(first_seen)),
    };
    style.insert_final_newline = Some(last_ending.is_some());
    style.trim_trailing_whitespace = Some(style.trailing_whitespace_lines.is_empty());

    let indent = analyze(lines(&document.text), policy.max_indent_size);
    if !indent.tab_lines.is_empty() {
        style.indent_style = Some(IndentStyle::Tab);
        style.indent_size = Some(ObservedIndentSize::NotApplicable);
    } else if !indent.space_lines.is_empty() {
        style.indent_style = Some(IndentStyle::Space);
        style.indent_size = indent.step.map(ObservedIndentSize::Width);
    }
    style.tab_indented_lines = indent.tab_lines;
    style.space_indented_lines = indent.space_lines;
    style.space_indent_widths = indent.space_widths;

    style
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_str(text: &str) -> ObservedStyle {
        observe(text.as_bytes(), &Policy::default()).unwrap()
    }

    #[test]
    fn test_empty_file_is_all_unset() {
        assert_eq!(observe_str(""), ObservedStyle::default());
    }

    #[test]
    fn test_space_indented_file() {
        let style = observe_str("def f():\n    return 1\n");
        assert_eq!(style.indent_style, Some(IndentStyle::Space));
        assert_eq!(style.indent_size, Some(ObservedIndentSize::Width(4)));
        assert_eq!(style.end_of_line, Some(LineEndings::Uniform(EndOfLine::Lf)));
        assert_eq!(style.insert_final_newline, Some(true));
        assert_eq!(style.trim_trailing_whitespace, Some(true));
        assert_eq!(style.charset, Some(Charset::Utf8));
    }

    #[test]
    fn test_any_tab_line_makes_style_tab() {
        let style = observe_str("a\n    b\n\tc\n");
        assert_eq!(style.indent_style, Some(IndentStyle::Tab));
        assert_eq!(style.indent_size, Some(ObservedIndentSize::NotApplicable));
        assert_eq!(style.tab_indented_lines, vec![3]);
        assert_eq!(style.space_indented_lines, vec![2]);
        assert_eq!(style.space_indent_widths, vec![4]);
    }

    #[test]
    fn test_unindented_file_has_no_indent_style() {
        let style = observe_str("one\ntwo\n");
        assert_eq!(style.indent_style, None);
        assert_eq!(style.indent_size, None);
    }

    #[test]
    fn test_mixed_line_endings() {
        let style = observe_str("a\r\nb\nc\r\n");
        assert_eq!(
            style.end_of_line,
            Some(LineEndings::Mixed(vec![EndOfLine::CrLf, EndOfLine::Lf]))
        );
        assert_eq!(style.end_of_line.unwrap().to_string(), "crlf,lf");
        assert_eq!(style.lines_by_ending[&EndOfLine::Lf], vec![2]);
    }

    #[test]
    fn test_single_line_without_newline() {
        let style = observe_str("hello");
        assert_eq!(style.end_of_line, None);
        assert_eq!(style.insert_final_newline, Some(false));
    }

    #[test]
    fn test_trailing_whitespace_lines() {
        let style = observe_str("ok\nspace \ntab\t\n");
        assert_eq!(style.trim_trailing_whitespace, Some(false));
        assert_eq!(style.trailing_whitespace_lines, vec![2, 3]);
    }

    #[test]
    fn test_binary_is_skipped() {
        assert_eq!(
            observe(b"\x89PNG\x00\x00", &Policy::default()),
            Err(Skip::Binary)
        );
    }

    #[test]
    fn test_latin1_and_bom_charsets() {
        let latin1 = observe(b"caf\xe9\n", &Policy::default()).unwrap();
        assert_eq!(latin1.charset, Some(Charset::Latin1));

        let bom = observe(b"\xEF\xBB\xBFhi\n", &Policy::default()).unwrap();
        assert_eq!(bom.charset, Some(Charset::Utf8Bom));
        assert_eq!(bom.insert_final_newline, Some(true));
    }

    #[test]
    fn test_dominant_ending() {
        let style = observe_str("a\r\nb\r\nc\n");
        assert_eq!(style.dominant_ending(), Some(EndOfLine::CrLf));
    }
}
