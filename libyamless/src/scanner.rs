//! Phase 1: Scanner
//!
//! The scanner converts raw source text into scan lines. It performs:
//! - Comment removal (`#` outside quotes, at line start or after whitespace)
//! - Blank line removal
//! - Indentation counting
//! - List marker extraction (the "-" prefix)
//!
//! The scanner never rejects input. Lines that fit no rule are reported by
//! the block parser, which knows what each indentation level expects.

use crate::depth::BracketDepth;
use crate::flow::FlowText;
use crate::scalar::outside_quotes;
use tracing::trace;

/// A single line after the scanning phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLine {
    /// Content after indent, with comments and trailing whitespace removed.
    /// Empty for marker lines.
    pub content: String,
    /// Column where the content (or the marker) starts.
    pub indent: usize,
    /// `true` for a "- " list marker.
    pub marker: bool,
    /// Column of the marker this content was split from, if any.
    pub marker_col: Option<usize>,
    /// Zero-based line number for error reporting.
    pub line_num: usize,
    /// The indentation continued with a tab. Only set on the first scan line
    /// of a source line.
    pub tab_indent: bool,
}

impl ScanLine {
    fn marker(indent: usize, marker_col: Option<usize>, line_num: usize) -> Self {
        Self {
            content: String::new(),
            indent,
            marker: true,
            marker_col,
            line_num,
            tab_indent: false,
        }
    }

    fn text(content: &str, indent: usize, marker_col: Option<usize>, line_num: usize) -> Self {
        Self {
            content: content.to_string(),
            indent,
            marker: false,
            marker_col,
            line_num,
            tab_indent: false,
        }
    }
}

/// Scan source text into logical lines.
pub fn scan(source: &str) -> Vec<ScanLine> {
    let mut lines = Vec::new();

    for (line_num, line_str) in source.split('\n').enumerate() {
        let line_str = line_str.strip_suffix('\r').unwrap_or(line_str);

        // Count leading spaces (indent)
        let indent = count_indent(line_str);

        let rest = strip_comment(&line_str[indent..]).trim_end();
        if rest.is_empty() {
            continue;
        }

        // Tabs are not indentation; flag the line for the block parser.
        let tab_indent = rest.starts_with('\t');
        let first = lines.len();
        push_content(&mut lines, rest.trim_start(), indent, line_num);
        if tab_indent {
            lines[first].tab_indent = true;
        }
    }

    lines
}

/// Count the number of leading spaces in a line.
fn count_indent(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Remove a trailing comment.
fn strip_comment(s: &str) -> &str {
    for (i, c) in outside_quotes(s) {
        if c == '#' && (i == 0 || s[..i].ends_with(char::is_whitespace)) {
            return &s[..i];
        }
    }
    s
}

/// Check whether line content begins with a list marker.
fn is_marker(rest: &str) -> bool {
    rest == "-" || rest.starts_with("- ")
}

/// Split list markers off the front of a line.
///
/// `- - key: 1` becomes two marker lines followed by a content line whose
/// indent is the column of `key`.
fn push_content(lines: &mut Vec<ScanLine>, mut rest: &str, mut indent: usize, line_num: usize) {
    let mut marker_col = None;

    while is_marker(rest) {
        lines.push(ScanLine::marker(indent, marker_col, line_num));
        marker_col = Some(indent);

        let after = &rest[1..];
        let content = after.trim_start();
        indent += 1 + after.len() - content.len();
        rest = content;
        if rest.is_empty() {
            return;
        }
    }

    lines.push(ScanLine::text(rest, indent, marker_col, line_num));
}

/// Gather a flow value that continues past its first line.
///
/// `first` starts at column `col` of `lines[i]`. While its brackets are still
/// open, following lines indented deeper than `owner_indent` are appended to
/// the value. Returns the joined text and the index of the first line not
/// consumed. An unbalanced result is left for the flow parser to report.
pub fn join_flow_value(
    lines: &[ScanLine],
    i: usize,
    first: &str,
    col: usize,
    owner_indent: usize,
) -> (FlowText, usize) {
    let mut text = FlowText::new(first, lines[i].line_num, col);
    let mut depth = BracketDepth::new();
    depth.feed_str(first);

    let mut next = i + 1;
    while depth.is_open() {
        let Some(line) = lines.get(next) else {
            break;
        };
        if line.marker || line.tab_indent || line.indent <= owner_indent {
            break;
        }
        trace!(line = line.line_num + 1, "joining flow continuation");
        depth.feed_str(&line.content);
        text.push_line(&line.content, line.line_num, line.indent);
        next += 1;
    }

    (text, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_indent() {
        assert_eq!(count_indent(""), 0);
        assert_eq!(count_indent("hello"), 0);
        assert_eq!(count_indent("  hello"), 2);
        assert_eq!(count_indent("    hello"), 4);
    }

    #[test]
    fn test_scan_simple() {
        let lines = scan("hello");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].content, "hello");
        assert_eq!(lines[0].indent, 0);
        assert!(!lines[0].marker);
    }

    #[test]
    fn test_scan_comment() {
        let lines = scan("int: 2   # a comment\n# whole line\n  # indented\n\nnext: 3");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content, "int: 2");
        assert_eq!(lines[1].content, "next: 3");
        assert_eq!(lines[1].line_num, 4);
    }

    #[test]
    fn test_hash_inside_quotes_and_words() {
        let lines = scan("a: \"not # a comment\"\nb: c#d");
        assert_eq!(lines[0].content, "a: \"not # a comment\"");
        assert_eq!(lines[1].content, "b: c#d");
    }

    #[test]
    fn test_mismatched_quotes_close() {
        let lines = scan("s: 'string4\"  # trailing");
        assert_eq!(lines[0].content, "s: 'string4\"");
    }

    #[test]
    fn test_scan_list() {
        let lines = scan("  - bla: 1\n    blu: 3");
        assert_eq!(lines.len(), 3);
        assert!(lines[0].marker);
        assert_eq!(lines[0].indent, 2);
        assert_eq!(lines[1].content, "bla: 1");
        assert_eq!(lines[1].indent, 4);
        assert_eq!(lines[1].marker_col, Some(2));
        assert_eq!(lines[2].content, "blu: 3");
        assert_eq!(lines[2].marker_col, None);
    }

    #[test]
    fn test_scan_nested_markers() {
        let lines = scan("- -   a");
        assert_eq!(lines.len(), 3);
        assert!(lines[0].marker && lines[1].marker);
        assert_eq!(lines[1].indent, 2);
        assert_eq!(lines[2].content, "a");
        assert_eq!(lines[2].indent, 6);
    }

    #[test]
    fn test_negative_number_is_not_marker() {
        let lines = scan("-2.0\n-\n-x");
        assert_eq!(lines[0].content, "-2.0");
        assert!(lines[1].marker);
        assert_eq!(lines[2].content, "-x");
    }

    #[test]
    fn test_crlf() {
        let lines = scan("a: 1\r\nb: 2\r\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content, "a: 1");
    }

    #[test]
    fn test_join_flow_value() {
        let lines = scan("list: [1,\n  2,\n  3]\nnext: 4");
        let (text, next) = join_flow_value(&lines, 0, "[1,", 6, 0);
        assert_eq!(text.as_str(), "[1, 2, 3]");
        assert_eq!(next, 3);
        // Offsets map back to the line each piece came from
        assert_eq!(text.position(0), (0, 6));
        assert_eq!(text.position(4), (1, 2));
        assert_eq!(text.position(7), (2, 2));
    }

    #[test]
    fn test_join_stops_at_dedent() {
        let lines = scan("bad: {{1.0, 2.0}\nnext: 42");
        let (text, next) = join_flow_value(&lines, 0, "{{1.0, 2.0}", 5, 0);
        assert_eq!(text.as_str(), "{{1.0, 2.0}");
        assert_eq!(next, 1);
    }

    #[test]
    fn test_tab_indent_is_flagged() {
        let lines = scan("node:\n\tint: 1\n  \t- x\n\t# comment\na: b\tc");
        assert_eq!(lines.len(), 5);
        assert!(!lines[0].tab_indent);
        assert!(lines[1].tab_indent);
        assert_eq!(lines[1].content, "int: 1");
        assert_eq!(lines[1].indent, 0);
        assert!(lines[2].marker && lines[2].tab_indent);
        assert_eq!(lines[2].indent, 2);
        assert!(!lines[3].tab_indent);
        assert!(!lines[4].tab_indent);
        assert_eq!(lines[4].content, "a: b\tc");
    }

    #[test]
    fn test_unclosed_leading_apostrophe_hides_comment() {
        // An apostrophe where a token starts opens a quote that runs to the
        // end of the line, so a later `#` is part of the value.
        let lines = scan("a: 'tis fine # c\nb: it's fine # c");
        assert_eq!(lines[0].content, "a: 'tis fine # c");
        assert_eq!(lines[1].content, "b: it's fine");
    }
}
