//! Indentation analysis over leading whitespace.

use std::collections::BTreeMap;

use super::text::Line;

/// The run of spaces and tabs a line starts with.
pub fn leading_whitespace(body: &str) -> &str {
    let rest = body.trim_start_matches([' ', '\t']);
    &body[..body.len() - rest.len()]
}

/// Column reached after `whitespace`, with tab stops every `tab_width` columns.
pub fn visual_width(whitespace: &str, tab_width: usize) -> usize {
    whitespace.chars().fold(0, |col, ch| match ch {
        '\t' => (col / tab_width + 1) * tab_width,
        _ => col + 1,
    })
}

/// What the indented lines of a file look like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentStats {
    /// 1-based lines whose indentation contains a tab.
    pub tab_lines: Vec<usize>,
    /// 1-based lines indented with spaces only.
    pub space_lines: Vec<usize>,
    /// Indent width in columns of each entry in `space_lines`.
    pub space_widths: Vec<usize>,
    /// Most common step between consecutive space indentation levels.
    pub step: Option<u32>,
}

/// Scan lines the way a person eyeballing indentation would.
///
/// Blank and whitespace-only lines are ignored, as is any line following one
/// that ends in a `\` continuation. For space-indented lines, every increase
/// over the previous indented line votes for its size; increases of one
/// column (comment alignment such as ` * `) and steps wider than
/// `max_step` do not vote. Ties go to the smaller step.
pub fn analyze<'a>(lines: impl IntoIterator<Item = Line<'a>>, max_step: u32) -> IndentStats {
    let mut stats = IndentStats::default();
    let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
    let mut previous = 0;
    let mut continued = false;

    for (idx, line) in lines.into_iter().enumerate() {
        let skip = continued;
        continued = line.body.trim_end().ends_with('\\');

        let whitespace = leading_whitespace(line.body);
        if skip || whitespace.len() == line.body.len() {
            continue;
        }

        if whitespace.contains('\t') {
            stats.tab_lines.push(idx + 1);
            previous = 0;
            continue;
        }

        let width = whitespace.len();
        if width > 0 {
            stats.space_lines.push(idx + 1);
            stats.space_widths.push(width);
        }
        let step = width.saturating_sub(previous);
        if (2..=max_step as usize).contains(&step) {
            *votes.entry(step).or_default() += 1;
        }
        previous = width;
    }

    stats.step = votes
        .into_iter()
        .fold(None, |best: Option<(usize, usize)>, (step, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((step, count)),
        })
        .and_then(|(step, _)| u32::try_from(step).ok());

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::text::lines;

    fn stats(text: &str) -> IndentStats {
        analyze(lines(text), 8)
    }

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(leading_whitespace("  \tx "), "  \t");
        assert_eq!(leading_whitespace("x"), "");
        assert_eq!(leading_whitespace("   "), "   ");
    }

    #[test]
    fn test_visual_width() {
        assert_eq!(visual_width("\t", 4), 4);
        assert_eq!(visual_width("  \t", 4), 4);
        assert_eq!(visual_width("\t  ", 4), 6);
        assert_eq!(visual_width("\t\t", 8), 16);
    }

    #[test]
    fn test_space_indentation_step() {
        let s = stats("fn main() {\n    if x {\n        y();\n    }\n}\n");
        assert_eq!(s.step, Some(4));
        assert_eq!(s.space_lines, vec![2, 3, 4]);
        assert_eq!(s.space_widths.len(), s.space_lines.len());
        assert!(s.tab_lines.is_empty());
    }

    #[test]
    fn test_two_space_step_beats_deeper_levels() {
        let s = stats("a:\n  b:\n    c:\n      d\n  e\n");
        assert_eq!(s.step, Some(2));
    }

    #[test]
    fn test_tie_goes_to_smaller_step() {
        let s = stats("a\n  b\nc\n    d\n");
        assert_eq!(s.step, Some(2));
    }

    #[test]
    fn test_tab_lines_recorded() {
        let s = stats("all:\n\techo hi\n\t  echo aligned\n");
        assert_eq!(s.tab_lines, vec![2, 3]);
        assert!(s.space_lines.is_empty());
    }

    #[test]
    fn test_single_space_comment_alignment_does_not_vote() {
        let s = stats("/**\n * doc\n */\nfn f() {\n    x\n}\n");
        assert_eq!(s.step, Some(4));
    }

    #[test]
    fn test_continuation_and_blank_lines_skipped() {
        let s = stats("x = 1 + \\\n\t\t2\n\n   \ny\n");
        assert!(s.tab_lines.is_empty());
        assert!(s.space_lines.is_empty());
        assert_eq!(s.step, None);
    }
}
