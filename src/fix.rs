//! Rewriting file contents to conform to an effective style.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::diff::{diff, Discrepancy};
use crate::editorconfig::{EndOfLine, IndentStyle, Key, Properties};
use crate::inspect::{
    encode, leading_whitespace, lines, observe, observe_document, visual_width, Document, Skip,
};
use crate::Policy;

/// Result of fixing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    /// The new file contents (identical to the input when nothing applied).
    pub content: Vec<u8>,
    /// Properties that were rewritten, in report order.
    pub applied: Vec<Key>,
    /// Discrepancies still present after rewriting.
    pub unfixable: Vec<Discrepancy>,
}

impl Fix {
    fn unchanged(bytes: &[u8], unfixable: Vec<Discrepancy>) -> Self {
        Self {
            content: bytes.to_vec(),
            applied: Vec::new(),
            unfixable,
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Bring `bytes` into conformance with `expected`.
///
/// Only properties that currently disagree with `expected` are touched, so a
/// conforming file comes back byte-for-byte identical and fixing twice gives
/// the same bytes as fixing once. Indent size is never rewritten, and a
/// charset that cannot represent the text is left as it was.
pub fn fix(bytes: &[u8], expected: &Properties, policy: &Policy) -> Result<Fix, Skip> {
    if bytes.is_empty() {
        return Ok(Fix::unchanged(bytes, Vec::new()));
    }

    let document = Document::decode(bytes)?;
    let observed = observe_document(&document, policy);
    let discrepancies = diff(expected, &observed, policy);
    if discrepancies.is_empty() {
        return Ok(Fix::unchanged(bytes, Vec::new()));
    }

    let wanted: BTreeSet<Key> = discrepancies.iter().map(|d| d.key).collect();
    let active = |key: Key| wanted.contains(&key);

    let tab_width = expected.tab_width().unwrap_or(policy.tab_width).max(1) as usize;
    let reindent_to = expected.indent_style.filter(|_| active(Key::IndentStyle));
    let trim = active(Key::TrimTrailingWhitespace);
    let target_eol = expected.end_of_line.filter(|_| active(Key::EndOfLine));

    let mut text = String::with_capacity(document.text.len() + 2);
    for line in lines(&document.text) {
        let mut body = Cow::Borrowed(line.body);
        if let Some(reindented) = reindent_to.and_then(|s| reindent(line.body, s, tab_width)) {
            body = Cow::Owned(reindented);
        }
        if trim {
            let trimmed_len = body.trim_end_matches([' ', '\t']).len();
            if trimmed_len < body.len() {
                body.to_mut().truncate(trimmed_len);
            }
        }
        text.push_str(&body);
        if let Some(ending) = line.ending {
            text.push_str(target_eol.unwrap_or(ending).terminator());
        }
    }

    if active(Key::InsertFinalNewline) {
        match expected.insert_final_newline {
            Some(true) => {
                let eol = expected
                    .end_of_line
                    .or_else(|| observed.dominant_ending())
                    .unwrap_or(EndOfLine::Lf);
                text.push_str(eol.terminator());
            }
            Some(false) => {
                let kept = text.trim_end_matches(['\r', '\n']).len();
                text.truncate(kept);
            }
            None => {}
        }
    }

    let mut charset = document.charset;
    if let Some(target) = expected.charset.filter(|_| active(Key::Charset)) {
        // A second BOM decodes to a leading U+FEFF, which would read back as a BOM.
        let body = if target.bom().is_empty() {
            text.trim_start_matches('\u{feff}')
        } else {
            text.as_str()
        };
        if encode(body, target).is_ok() {
            text = body.to_string();
            charset = target;
        }
    }
    // Text decoded from a charset always encodes back into it.
    let content = encode(&text, charset).unwrap_or_else(|_| text.into_bytes());

    let remaining = match observe(&content, policy) {
        Ok(fixed) => diff(expected, &fixed, policy),
        Err(_) => return Ok(Fix::unchanged(bytes, discrepancies)),
    };
    let applied: Vec<Key> = wanted
        .into_iter()
        .filter(|key| !remaining.iter().any(|d| d.key == *key))
        .collect();
    if applied.is_empty() {
        return Ok(Fix::unchanged(bytes, remaining));
    }

    Ok(Fix {
        content,
        applied,
        unfixable: remaining,
    })
}

/// Indentation of `body` rewritten in `style` at the same visual column, or
/// `None` when the line needs no change.
///
/// Unindented and whitespace-only lines are left alone.
fn reindent(body: &str, style: IndentStyle, tab_width: usize) -> Option<String> {
    let whitespace = leading_whitespace(body);
    if whitespace.is_empty() || whitespace.len() == body.len() {
        return None;
    }

    let columns = visual_width(whitespace, tab_width);
    let mut indent = match style {
        IndentStyle::Space => " ".repeat(columns),
        IndentStyle::Tab => {
            let mut indent = "\t".repeat(columns / tab_width);
            indent.push_str(&" ".repeat(columns % tab_width));
            indent
        }
    };
    if indent == whitespace {
        return None;
    }

    indent.push_str(&body[whitespace.len()..]);
    Some(indent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editorconfig::{effective_style, parse, Charset};

    fn style(config: &str) -> Properties {
        effective_style(&parse(config).unwrap(), "file")
    }

    fn fix_str(config: &str, content: &[u8]) -> Fix {
        fix(content, &style(config), &Policy::default()).unwrap()
    }

    #[test]
    fn test_tabs_to_spaces() {
        let result = fix_str(
            "[*]\nindent_style=space\nindent_size=4\n",
            b"all:\n\techo hi\n\t\techo deeper\n",
        );
        assert!(result.has_changes());
        assert_eq!(result.content, b"all:\n    echo hi\n        echo deeper\n");
        assert_eq!(result.applied, vec![Key::IndentStyle, Key::IndentSize]);
        assert!(result.unfixable.is_empty());
    }

    #[test]
    fn test_spaces_to_tabs_keeps_alignment() {
        let result = fix_str(
            "[*]\nindent_style=tab\ntab_width=4\n",
            b"{\n    a;\n      b;\n}\n",
        );
        assert_eq!(result.content, b"{\n\ta;\n\t  b;\n}\n");
    }

    #[test]
    fn test_mixed_tab_and_space_indent_expands_by_column() {
        let result = fix_str("[*]\nindent_style=space\ntab_width=8\n", b"x\n  \ty\n");
        assert_eq!(result.content, b"x\n        y\n");
    }

    #[test]
    fn test_indent_size_is_not_rewritten() {
        let content = b"a\n  b\n";
        let result = fix_str("[*]\nindent_style=space\nindent_size=4\n", content);
        assert!(!result.has_changes());
        assert_eq!(result.content, content);
        assert_eq!(result.unfixable.len(), 1);
        assert_eq!(result.unfixable[0].key, Key::IndentSize);
    }

    #[test]
    fn test_line_endings_normalized() {
        let result = fix_str("[*]\nend_of_line=lf\n", b"a\r\nb\nc\rd\r\n");
        assert_eq!(result.content, b"a\nb\nc\nd\n");
        assert_eq!(result.applied, vec![Key::EndOfLine]);
    }

    #[test]
    fn test_final_newline_appended_once() {
        let result = fix_str("[*]\ninsert_final_newline=true\n", b"hello");
        assert_eq!(result.content, b"hello\n");
    }

    #[test]
    fn test_final_newline_uses_file_line_ending() {
        let result = fix_str("[*]\ninsert_final_newline=true\n", b"a\r\nb");
        assert_eq!(result.content, b"a\r\nb\r\n");
    }

    #[test]
    fn test_final_newline_removed() {
        let result = fix_str("[*]\ninsert_final_newline=false\n", b"a\n\n\n");
        assert_eq!(result.content, b"a");
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        let result = fix_str("[*]\ntrim_trailing_whitespace=true\n", b"a  \n\t\nb\t \nc ");
        assert_eq!(result.content, b"a\n\nb\nc");
    }

    #[test]
    fn test_whitespace_only_lines_not_reindented() {
        let result = fix_str("[*]\nindent_style=space\ntab_width=4\n", b"a\n\tb\n\t\n");
        assert_eq!(result.content, b"a\n    b\n\t\n");
    }

    #[test]
    fn test_charset_transcoding() {
        let result = fix_str("[*]\ncharset=utf-8\n", b"caf\xe9\n");
        assert_eq!(result.content, "caf\u{e9}\n".as_bytes());

        let result = fix_str("[*]\ncharset=utf-8-bom\n", b"x\n");
        assert_eq!(result.content, b"\xEF\xBB\xBFx\n");

        let result = fix_str("[*]\ncharset=utf-8\n", b"\xEF\xBB\xBFx\n");
        assert_eq!(result.content, b"x\n");
    }

    #[test]
    fn test_lossy_charset_left_alone() {
        let content = "snow \u{2603}\n".as_bytes();
        let result = fix_str("[*]\ncharset=utf-16le\n", content);
        assert!(result.has_changes());

        let bom_content = "\u{feff}snow \u{2603}\n".as_bytes();
        let result = fix_str("[*]\ncharset=latin1\n", bom_content);
        assert!(!result.has_changes());
        assert_eq!(result.unfixable[0].key, Key::Charset);
        assert_eq!(result.content, bom_content);
    }

    #[test]
    fn test_conforming_file_untouched() {
        let config = "[*]\nindent_style=space\nindent_size=2\nend_of_line=crlf\ninsert_final_newline=true\ntrim_trailing_whitespace=true\n";
        let content = b"a:\r\n  b\r\n";
        let result = fix_str(config, content);
        assert!(!result.has_changes());
        assert!(result.applied.is_empty());
        assert_eq!(result.content, content);
    }

    #[test]
    fn test_fix_is_idempotent() {
        let config = "[*]\nindent_style=tab\nindent_size=4\nend_of_line=crlf\ninsert_final_newline=true\ntrim_trailing_whitespace=true\ncharset=utf-8-bom\n";
        let inputs: [&[u8]; 4] = [
            b"a\n    b  \n  c\n",
            b"x\r\ny\n\tz \r",
            b"caf\xe9 \n        deep",
            b"\n\n   \n",
        ];
        let expected = style(config);
        let policy = Policy::default();

        for input in inputs {
            let once = fix(input, &expected, &policy).unwrap();
            assert!(once.has_changes(), "input: {input:?}");
            let twice = fix(&once.content, &expected, &policy).unwrap();
            assert_eq!(once.content, twice.content, "input: {input:?}");
            assert!(!twice.has_changes(), "input: {input:?}");
        }
    }

    #[test]
    fn test_doubled_bom_stripped_in_one_pass() {
        let expected = style("[*]\ncharset=utf-8\n");
        let policy = Policy::default();

        let once = fix(b"\xEF\xBB\xBF\xEF\xBB\xBFx\n", &expected, &policy).unwrap();
        assert_eq!(once.content, b"x\n");
        assert_eq!(once.applied, vec![Key::Charset]);
        assert!(once.unfixable.is_empty());

        let twice = fix(&once.content, &expected, &policy).unwrap();
        assert!(!twice.has_changes());
        assert_eq!(twice.content, once.content);
    }

    #[test]
    fn test_space_lines_in_tab_file_converted() {
        let result = fix_str("[*]\nindent_style=tab\n", b"{\n\tx;\n    y;\n    z;\n}\n");
        assert_eq!(result.content, b"{\n\tx;\n\ty;\n\tz;\n}\n");
        assert_eq!(result.applied, vec![Key::IndentStyle]);
    }

    #[test]
    fn test_fixed_file_passes_check() {
        let expected = style(
            "[*]\nindent_style=space\nindent_size=4\nend_of_line=lf\ninsert_final_newline=true\n",
        );
        let result = fix(b"all:\r\n\techo hi\r\n\techo bye", &expected, &Policy::default()).unwrap();
        assert_eq!(result.content, b"all:\n    echo hi\n    echo bye\n");

        let observed = observe(&result.content, &Policy::default()).unwrap();
        assert!(diff(&expected, &observed, &Policy::default()).is_empty());
        assert_eq!(observed.charset, Some(Charset::Utf8));
    }

    #[test]
    fn test_binary_is_skipped() {
        let result = fix(b"\x00\x01", &style("[*]\nend_of_line=lf\n"), &Policy::default());
        assert_eq!(result, Err(Skip::Binary));
    }
}
