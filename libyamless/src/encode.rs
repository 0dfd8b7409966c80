//! Render documents as text.
//!
//! Block notation is meant for diagnostics: scalars are written exactly as
//! they were read, so quoting survives, but absent values and empty mappings
//! are not distinguished on the way back in. JSON output uses the inferred
//! scalar types.

use crate::node::{Mapping, Node};
use crate::scalar::{Inferred, Scalar};

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// yamless block notation
    Yamless,
    /// JSON (pretty-printed)
    Json,
}

/// Encode a node to a string in the specified format.
pub fn encode(node: &Node, format: Format) -> String {
    match format {
        Format::Yamless => {
            let lines = encode_block(node, 0);
            if lines.is_empty() {
                String::new()
            } else {
                lines.join("\n") + "\n"
            }
        }
        Format::Json => encode_json(node, 0),
    }
}

// =============================================================================
// Block Encoder
// =============================================================================

fn encode_block(node: &Node, indent: usize) -> Vec<String> {
    let pad = "  ".repeat(indent);

    match node {
        Node::Scalar(s) => vec![format!("{}{}", pad, s.raw())],
        Node::Mapping(map) => encode_block_mapping(map, indent),
        Node::Sequence(items) => {
            if can_inline(items) {
                vec![format!("{}{}", pad, encode_flow(items))]
            } else {
                encode_block_sequence(items, indent)
            }
        }
        Node::Invalid => Vec::new(),
    }
}

fn encode_block_mapping(map: &Mapping, indent: usize) -> Vec<String> {
    let pad = "  ".repeat(indent);
    let mut lines = Vec::new();

    for (k, v) in map {
        let key = encode_key(k);
        match v {
            Node::Scalar(s) if s.is_empty() => lines.push(format!("{}{}:", pad, key)),
            Node::Scalar(s) => lines.push(format!("{}{}: {}", pad, key, s.raw())),
            Node::Sequence(items) if can_inline(items) => {
                lines.push(format!("{}{}: {}", pad, key, encode_flow(items)));
            }
            Node::Mapping(_) | Node::Sequence(_) => {
                // Nested block value: put on next line
                lines.push(format!("{}{}:", pad, key));
                lines.extend(encode_block(v, indent + 1));
            }
            Node::Invalid => {}
        }
    }

    lines
}

fn encode_block_sequence(items: &[Node], indent: usize) -> Vec<String> {
    let pad = "  ".repeat(indent);
    let mut lines = Vec::new();

    for item in items {
        match item {
            Node::Scalar(s) if s.is_empty() => lines.push(format!("{}-", pad)),
            Node::Scalar(s) => lines.push(format!("{}- {}", pad, s.raw())),
            Node::Sequence(inner) if can_inline(inner) => {
                lines.push(format!("{}- {}", pad, encode_flow(inner)));
            }
            Node::Mapping(map) if !map.is_empty() => {
                // First entry shares the marker's line.
                let mut nested = encode_block(item, indent + 1);
                let prefix = format!("{}- ", pad);
                if let Some(first) = nested.first_mut() {
                    first.replace_range(..prefix.len(), &prefix);
                }
                lines.extend(nested);
            }
            Node::Mapping(_) | Node::Sequence(_) => {
                lines.push(format!("{}-", pad));
                lines.extend(encode_block(item, indent + 1));
            }
            Node::Invalid => {}
        }
    }

    lines
}

/// A sequence can be written inline when every leaf is a non-empty scalar.
fn can_inline(items: &[Node]) -> bool {
    items.iter().all(|item| match item {
        Node::Scalar(s) => !s.is_empty(),
        Node::Sequence(inner) => can_inline(inner),
        _ => false,
    })
}

fn encode_flow(items: &[Node]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|item| match item {
            Node::Sequence(inner) => encode_flow(inner),
            Node::Scalar(s) => s.raw().to_string(),
            _ => String::new(),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

fn encode_key(key: &str) -> String {
    let plain = !key.is_empty()
        && key.trim() == key
        && !key.starts_with(['\'', '"', '-', '#'])
        && !key.contains(": ")
        && !key.ends_with(':')
        && !key.contains([' ', '#', '[', ']', '{', '}', '(', ')', ',']);
    if plain {
        key.to_string()
    } else if key.contains('"') {
        format!("'{}'", key)
    } else {
        format!("\"{}\"", key)
    }
}

// =============================================================================
// JSON Encoder
// =============================================================================

fn encode_json(node: &Node, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let pad1 = "  ".repeat(indent + 1);

    match node {
        Node::Scalar(s) => encode_json_scalar(s),
        Node::Invalid => "null".to_string(),
        Node::Sequence(items) => {
            if items.is_empty() {
                "[]".to_string()
            } else {
                let items: Vec<String> = items
                    .iter()
                    .map(|v| format!("{}{}", pad1, encode_json(v, indent + 1)))
                    .collect();
                format!("[\n{}\n{}]", items.join(",\n"), pad)
            }
        }
        Node::Mapping(map) => {
            if map.is_empty() {
                "{}".to_string()
            } else {
                let items: Vec<String> = map
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}{}: {}",
                            pad1,
                            encode_json_string(k),
                            encode_json(v, indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{}}}", items.join(",\n"), pad)
            }
        }
    }
}

fn encode_json_scalar(s: &Scalar) -> String {
    match s.infer() {
        Inferred::Null => "null".to_string(),
        Inferred::Bool(b) => b.to_string(),
        Inferred::Integer(n) => n.to_string(),
        Inferred::Float(f) => {
            if f.is_nan() || f.is_infinite() {
                "null".to_string() // JSON doesn't support NaN/Infinity
            } else {
                let text = format!("{}", f);
                if text.contains(['.', 'e']) {
                    text
                } else {
                    format!("{}.0", text)
                }
            }
        }
        Inferred::Str(text) => encode_json_string(text),
    }
}

fn encode_json_string(s: &str) -> String {
    let mut result = String::from("\"");
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_block_round_trip() {
        let source = "\
name: demo
count: 3
flags: [a, [b, c]]
empty:
nested:
  inner: 'quoted'
items:
  - x: 1
    y: 2
  - plain
  -
    - deep
    - more: 1
";
        let doc = parse(source).unwrap();
        let rendered = encode(&doc, Format::Yamless);
        assert_eq!(parse(&rendered).unwrap(), doc);
    }

    #[test]
    fn test_block_layout() {
        let doc = parse("list:\n  - bla: 1\n    blu: 3\n").unwrap();
        assert_eq!(
            encode(&doc, Format::Yamless),
            "list:\n  - bla: 1\n    blu: 3\n"
        );
        assert_eq!(doc.to_string(), encode(&doc, Format::Yamless));
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("plain_key"), "plain_key");
        assert_eq!(encode_key("with space"), "\"with space\"");
        assert_eq!(encode_key("say \"hi\""), "'say \"hi\"'");
        assert_eq!(encode_key("a: b"), "\"a: b\"");
    }

    #[test]
    fn test_json() {
        let doc = parse("a: 1\nb: [1.5, \"2\", true]\nc:\nd: {}").unwrap();
        assert_eq!(
            encode(&doc, Format::Json),
            "{\n  \"a\": 1,\n  \"b\": [\n    1.5,\n    \"2\",\n    true\n  ],\n  \"c\": null,\n  \"d\": []\n}"
        );
    }

    #[test]
    fn test_json_string_escapes() {
        assert_eq!(encode_json_string("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
    }
}
