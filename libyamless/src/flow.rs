//! Flow collections: `[a, b]`, `{a, b}`, `(a, b)`.
//!
//! Every group becomes a sequence, whichever brackets were used, and a group
//! with one element stays a one-element sequence. Leaf elements are stored
//! as raw scalars and only interpreted on extraction.

use crate::depth::{is_closer, is_opener, BracketDepth};
use crate::error::{ParseContext, ParseError, Result};
use crate::node::Node;
use crate::scalar::{outside_quotes, Scalar};
use tracing::trace;

/// A flow value, possibly joined from several source lines.
///
/// Lines are joined with a single space. Each joined piece remembers where
/// it came from so errors point at the original line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowText {
    text: String,
    /// `(offset in text, line_num, col)` for the start of each piece.
    pieces: Vec<(usize, usize, usize)>,
}

impl FlowText {
    /// Start a value whose first character is at `line_num`, `col`.
    pub fn new(first: &str, line_num: usize, col: usize) -> Self {
        Self {
            text: first.to_string(),
            pieces: vec![(0, line_num, col)],
        }
    }

    /// Append a continuation line whose content starts at `col`.
    pub fn push_line(&mut self, content: &str, line_num: usize, col: usize) {
        self.text.push(' ');
        self.pieces.push((self.text.len(), line_num, col));
        self.text.push_str(content);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Source line and column of the byte at `pos`.
    pub fn position(&self, pos: usize) -> (usize, usize) {
        let (offset, line_num, col) = self
            .pieces
            .iter()
            .rev()
            .find(|&&(offset, _, _)| offset <= pos)
            .copied()
            .unwrap_or(self.pieces[0]);
        (line_num, col + pos - offset)
    }
}

/// Parse a complete flow value starting with an opening bracket.
pub fn parse_flow(source: &FlowText, ctx: &ParseContext) -> Result<Node> {
    let text = source.as_str();
    let mut parser = FlowParser {
        text,
        pos: 0,
        ctx,
        source,
    };

    let mut depth = BracketDepth::new();
    depth.feed_str(text);
    if !depth.is_balanced() {
        return Err(parser.unbalanced());
    }

    let node = parser.parse_group()?;

    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(ParseError::malformed(
            &text[parser.pos..],
            parser.locate(parser.pos),
        ));
    }
    Ok(node)
}

struct FlowParser<'a> {
    text: &'a str,
    pos: usize,
    ctx: &'a ParseContext,
    source: &'a FlowText,
}

impl FlowParser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn locate(&self, pos: usize) -> crate::error::Location {
        let (line_num, col) = self.source.position(pos);
        self.ctx.locate(line_num, col)
    }

    fn unbalanced(&self) -> ParseError {
        ParseError::UnbalancedBrackets {
            loc: self.locate(self.pos),
        }
    }

    fn empty_element(&self) -> ParseError {
        ParseError::EmptyElement {
            loc: self.locate(self.pos),
        }
    }

    /// Parse one bracketed group; `pos` is at its opening bracket.
    fn parse_group(&mut self) -> Result<Node> {
        let start = self.pos;
        // Brackets are ASCII, so one byte.
        self.pos += 1;
        let mut items = Vec::new();

        self.skip_whitespace();
        match self.peek() {
            Some(c) if is_closer(c) => {
                self.pos += 1;
                trace!(offset = start, "parsed empty flow group");
                return Ok(Node::Sequence(items));
            }
            None => return Err(self.unbalanced()),
            _ => {}
        }

        loop {
            self.skip_whitespace();
            let item = match self.peek() {
                None => return Err(self.unbalanced()),
                Some(c) if is_opener(c) => self.parse_group()?,
                Some(c) if c == ',' || is_closer(c) => return Err(self.empty_element()),
                Some(_) => self.parse_leaf()?,
            };
            items.push(item);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if matches!(self.peek(), Some(c) if is_closer(c)) {
                        return Err(self.empty_element());
                    }
                }
                Some(c) if is_closer(c) => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let rest = &self.text[self.pos..];
                    return Err(ParseError::malformed(rest, self.locate(self.pos)));
                }
                None => return Err(self.unbalanced()),
            }
        }

        trace!(
            offset = start,
            len = items.len(),
            "parsed flow group"
        );
        Ok(Node::Sequence(items))
    }

    /// Parse a scalar element up to the next separator or bracket.
    fn parse_leaf(&mut self) -> Result<Node> {
        let rest = &self.text[self.pos..];
        let end = outside_quotes(rest)
            .find(|&(_, c)| c == ',' || is_opener(c) || is_closer(c))
            .map(|(i, _)| i)
            .ok_or_else(|| self.unbalanced())?;

        let token = rest[..end].trim();
        self.pos += end;
        if matches!(self.peek(), Some(c) if is_opener(c)) {
            return Err(ParseError::malformed(
                &self.text[self.pos..],
                self.locate(self.pos),
            ));
        }
        Ok(Node::Scalar(Scalar::new(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(s: &str) -> Result<Node> {
        parse_flow(&FlowText::new(s, 0, 0), &ParseContext::new(None))
    }

    #[test]
    fn test_simple_list() {
        let node = flow("[0, 1, 2]").unwrap();
        assert_eq!(node.size(), 3);
        assert_eq!(node[2].as_str(), Some("2"));
    }

    #[test]
    fn test_nested_lists() {
        let node = flow("[ [1 ,2], [1.0, -2.0, 3.0], [[\"a\", \"b\"], ['cd', 'efg\"]]]").unwrap();
        assert_eq!(node.size(), 3);
        assert_eq!(node[0].size(), 2);
        assert_eq!(node[0][0].as_str(), Some("1"));
        assert_eq!(node[1].size(), 3);
        assert_eq!(node[2][0][1].as_str(), Some("b"));
        assert_eq!(node[2][1][1].as_str(), Some("efg"));
    }

    #[test]
    fn test_single_element_groups_stay_sequences() {
        let node = flow("[{braces}, (parentheses), [mixed}]").unwrap();
        assert_eq!(node.size(), 3);
        assert!(node[0].is_sequence());
        assert_eq!(node[0].size(), 1);
        assert_eq!(node[1][0].as_str(), Some("parentheses"));
        assert_eq!(node[2][0].as_str(), Some("mixed"));
    }

    #[test]
    fn test_empty_group() {
        let node = flow("[]").unwrap();
        assert!(node.is_sequence());
        assert_eq!(node.size(), 0);
        assert_eq!(flow("[ [], ( ) ]").unwrap().size(), 2);
    }

    #[test]
    fn test_quoted_separators() {
        let node = flow("[\"a, b\", 'c]']").unwrap();
        assert_eq!(node.size(), 2);
        assert_eq!(node[0].as_str(), Some("a, b"));
        assert_eq!(node[1].as_str(), Some("c]"));
    }

    #[test]
    fn test_unbalanced() {
        assert!(matches!(
            flow("{{1.0, 2.0}"),
            Err(ParseError::UnbalancedBrackets { .. })
        ));
        assert!(matches!(
            flow("{1.0, 2.0}}"),
            Err(ParseError::UnbalancedBrackets { .. })
        ));
    }

    #[test]
    fn test_empty_elements() {
        for text in ["[1, , 2]", "[1, 2,]", "[,]", "[, 1]"] {
            assert!(
                matches!(flow(text), Err(ParseError::EmptyElement { .. })),
                "{text} should fail"
            );
        }
    }

    #[test]
    fn test_trailing_text() {
        assert!(matches!(
            flow("[1] [2]"),
            Err(ParseError::MalformedLine { .. })
        ));
        assert!(matches!(
            flow("[[1] x]"),
            Err(ParseError::MalformedLine { .. })
        ));
        assert!(matches!(
            flow("[a(b)]"),
            Err(ParseError::MalformedLine { .. })
        ));
    }

    #[test]
    fn test_error_column() {
        let ctx = ParseContext::new(None);
        let err = parse_flow(&FlowText::new("[1, , 2]", 3, 10), &ctx).unwrap_err();
        assert_eq!(err.location().line, 3);
        assert_eq!(err.location().col, 14);
    }

    #[test]
    fn test_error_on_continuation_line() {
        let ctx = ParseContext::new(None);
        let mut text = FlowText::new("[1,", 0, 6);
        text.push_line("2,", 1, 2);
        text.push_line(", 3]", 2, 2);
        assert_eq!(text.as_str(), "[1, 2, , 3]");

        let err = parse_flow(&text, &ctx).unwrap_err();
        assert!(matches!(err, ParseError::EmptyElement { .. }));
        assert_eq!(err.location().line, 2);
        assert_eq!(err.location().col, 2);
    }

    #[test]
    fn test_position() {
        let mut text = FlowText::new("[a,", 4, 10);
        text.push_line("b]", 5, 8);
        assert_eq!(text.position(0), (4, 10));
        assert_eq!(text.position(2), (4, 12));
        assert_eq!(text.position(4), (5, 8));
        assert_eq!(text.position(5), (5, 9));
    }
}
