//! Phase 2: Block Structure Parser
//!
//! Builds mappings and sequences from scanned lines. Each scope is parsed by
//! a recursive call that receives its indentation explicitly and returns the
//! built node together with the index of the first line it did not consume.
//!
//! A scope ends at the first line indented less than the scope. A line
//! indented more than anything open expects is an error, never absorbed.

use crate::depth::is_opener;
use crate::error::{ParseContext, ParseError, Result};
use crate::flow::parse_flow;
use crate::node::{Mapping, Node};
use crate::scalar::{outside_quotes, strip_quotes, Scalar};
use crate::scanner::{join_flow_value, ScanLine};
use tracing::trace;

/// Parse the whole document. An empty document is an empty mapping.
pub fn parse_document(lines: &[ScanLine], ctx: &ParseContext) -> Result<Node> {
    if let Some(line) = lines.iter().find(|line| line.tab_indent) {
        return Err(malformed(line, ctx));
    }

    let Some(first) = lines.first() else {
        return Ok(Node::Mapping(Mapping::new()));
    };
    if first.indent > 0 {
        return Err(malformed(first, ctx));
    }

    let (node, next) = parse_scope(lines, 0, ctx)?;
    if let Some(line) = lines.get(next) {
        return Err(malformed(line, ctx));
    }
    Ok(node)
}

fn malformed(line: &ScanLine, ctx: &ParseContext) -> ParseError {
    let text = if line.marker { "-" } else { &line.content };
    ParseError::malformed(text, ctx.locate(line.line_num, line.indent))
}

/// Parse the scope whose first line is `lines[i]`, at that line's indent.
fn parse_scope(lines: &[ScanLine], i: usize, ctx: &ParseContext) -> Result<(Node, usize)> {
    let line = &lines[i];
    trace!(line = line.line_num + 1, indent = line.indent, "opening scope");

    if line.marker {
        return parse_sequence(lines, i, line.indent, ctx);
    }
    if split_key(&line.content).is_some() {
        return parse_mapping(lines, i, line.indent, ctx);
    }
    // Text after a list marker is the element itself.
    if let Some(marker_col) = line.marker_col {
        return parse_inline_value(lines, i, &line.content, marker_col, line.indent, ctx);
    }
    Err(malformed(line, ctx))
}

/// Parse consecutive `key: value` lines at `indent`.
fn parse_mapping(
    lines: &[ScanLine],
    mut i: usize,
    indent: usize,
    ctx: &ParseContext,
) -> Result<(Node, usize)> {
    let mut map = Mapping::new();

    while let Some(line) = lines.get(i) {
        if line.indent < indent {
            break;
        }
        if line.indent > indent || line.marker {
            return Err(malformed(line, ctx));
        }

        let Some((key_raw, rest, rest_offset)) = split_key(&line.content) else {
            return Err(malformed(line, ctx));
        };
        let key = strip_quotes(key_raw).to_string();

        let (value, next) = if rest.is_empty() {
            parse_nested_value(lines, i, indent, ctx)?
        } else {
            parse_inline_value(lines, i, rest, indent, indent + rest_offset, ctx)?
        };

        if map.contains_key(&key) {
            return Err(ParseError::DuplicateKey {
                key,
                loc: ctx.locate(line.line_num, line.indent),
            });
        }
        map.insert(key, value);
        i = next;
    }

    Ok((Node::Mapping(map), i))
}

/// Parse the value of `key:` written on the following lines.
fn parse_nested_value(
    lines: &[ScanLine],
    i: usize,
    indent: usize,
    ctx: &ParseContext,
) -> Result<(Node, usize)> {
    match lines.get(i + 1) {
        Some(next) if next.indent > indent => parse_scope(lines, i + 1, ctx),
        // "key:" followed by "- item" lines at the key's own column
        Some(next) if next.indent == indent && next.marker => {
            parse_sequence(lines, i + 1, indent, ctx)
        }
        _ => Ok((Node::Scalar(Scalar::default()), i + 1)),
    }
}

/// Parse a value written on the same line as its key or marker.
fn parse_inline_value(
    lines: &[ScanLine],
    i: usize,
    rest: &str,
    owner_indent: usize,
    col: usize,
    ctx: &ParseContext,
) -> Result<(Node, usize)> {
    if rest.starts_with(is_opener) {
        let (text, next) = join_flow_value(lines, i, rest, col, owner_indent);
        let node = parse_flow(&text, ctx)?;
        return Ok((node, next));
    }
    Ok((Node::Scalar(Scalar::new(rest)), i + 1))
}

/// Parse consecutive list markers at `indent`.
fn parse_sequence(
    lines: &[ScanLine],
    mut i: usize,
    indent: usize,
    ctx: &ParseContext,
) -> Result<(Node, usize)> {
    let mut items = Vec::new();

    while let Some(line) = lines.get(i) {
        if line.indent < indent {
            break;
        }
        if line.indent > indent {
            return Err(malformed(line, ctx));
        }
        if !line.marker {
            break;
        }

        let (item, next) = match lines.get(i + 1) {
            Some(child) if child.indent > indent => parse_scope(lines, i + 1, ctx)?,
            _ => (Node::Scalar(Scalar::default()), i + 1),
        };
        items.push(item);
        i = next;
    }

    Ok((Node::Sequence(items), i))
}

/// Split `key: rest` at the first colon outside quotes that is followed by
/// whitespace or ends the line. Keys cannot contain brackets, so a line that
/// opens a bracket before any such colon is not a key line.
///
/// Returns the raw key, the trimmed rest, and the rest's offset in `content`.
fn split_key(content: &str) -> Option<(&str, &str, usize)> {
    for (i, c) in outside_quotes(content) {
        if is_opener(c) {
            return None;
        }
        if c != ':' {
            continue;
        }
        let after = &content[i + 1..];
        if after.is_empty() || after.starts_with(char::is_whitespace) {
            let key = content[..i].trim();
            if key.is_empty() {
                return None;
            }
            let rest = after.trim_start();
            return Some((key, rest, content.len() - rest.len()));
        }
    }
    None
}
