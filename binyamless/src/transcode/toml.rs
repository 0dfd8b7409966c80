//! TOML transcoding: render yamless documents as TOML text.
//!
//! Mapping from yamless to TOML:
//!   - absent value         -> error (TOML has no null)
//!   - true/false scalar    -> TOML boolean
//!   - integer scalar       -> TOML integer (if fits in i64, otherwise error)
//!   - float scalar         -> TOML float
//!   - any other scalar     -> TOML string, quotes removed
//!   - Sequence             -> TOML array (mappings inside become inline tables)
//!   - Mapping              -> TOML table, keys in written order
//!
//! TOML requires the top-level value to be a table; any other root errors.

use libyamless::{Inferred, Node, Scalar};
use num_traits::ToPrimitive;
use toml_edit::DocumentMut;

/// Encode a yamless node as a TOML string.
pub fn encode(node: &Node) -> Result<String, String> {
    let Node::Mapping(map) = node else {
        return Err(format!(
            "TOML requires the top-level value to be a mapping, found a {}",
            node.kind_name()
        ));
    };

    let mut doc = DocumentMut::new();
    for (key, value) in map {
        doc[key.as_str()] = node_to_toml(value, key)?;
    }
    Ok(doc.to_string())
}

/// Convert one node; `path` names it in error messages.
fn node_to_toml(node: &Node, path: &str) -> Result<toml_edit::Item, String> {
    match node {
        Node::Scalar(s) => Ok(toml_edit::Item::Value(scalar_to_toml(s, path)?)),
        Node::Sequence(items) => {
            let mut toml_arr = toml_edit::Array::new();
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}.{}", path, i);
                // Tables inside arrays must be inline
                let value = node_to_toml(item, &item_path)?
                    .into_value()
                    .map_err(|_| format!("Cannot place {} in a TOML array", item_path))?;
                toml_arr.push(value);
            }
            Ok(toml_edit::Item::Value(toml_edit::Value::Array(toml_arr)))
        }
        Node::Mapping(map) => {
            let mut table = toml_edit::Table::new();
            for (k, v) in map {
                table.insert(k, node_to_toml(v, &format!("{}.{}", path, k))?);
            }
            Ok(toml_edit::Item::Table(table))
        }
        Node::Invalid => Err(format!("No value at {}", path)),
    }
}

fn scalar_to_toml(scalar: &Scalar, path: &str) -> Result<toml_edit::Value, String> {
    match scalar.infer() {
        Inferred::Null => Err(format!("TOML has no null type; {} has no value", path)),
        Inferred::Bool(b) => Ok(toml_edit::Value::Boolean(toml_edit::Formatted::new(b))),
        Inferred::Integer(n) => {
            let i = n
                .to_i64()
                .ok_or_else(|| format!("Integer {} at {} too large for TOML (i64)", n, path))?;
            Ok(toml_edit::Value::Integer(toml_edit::Formatted::new(i)))
        }
        Inferred::Float(f) => Ok(toml_edit::Value::Float(toml_edit::Formatted::new(f))),
        Inferred::Str(s) => Ok(toml_edit::Value::String(toml_edit::Formatted::new(
            s.to_string(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libyamless::parse;

    #[test]
    fn test_scalars_and_tables() {
        let doc = parse("name: demo\nport: 8080\nratio: 0.5\nserver:\n  tls: true\n").unwrap();
        let text = encode(&doc).unwrap();
        let parsed: DocumentMut = text.parse().unwrap();
        assert_eq!(parsed["name"].as_str(), Some("demo"));
        assert_eq!(parsed["port"].as_integer(), Some(8080));
        assert_eq!(parsed["ratio"].as_float(), Some(0.5));
        assert_eq!(parsed["server"]["tls"].as_bool(), Some(true));
    }

    #[test]
    fn test_arrays_of_mappings_are_inline() {
        let doc = parse("list:\n  - bla: 1\n    blu: 3\n  - bla: 2\n    blu: 4\n").unwrap();
        let text = encode(&doc).unwrap();
        let parsed: DocumentMut = text.parse().unwrap();
        let list = parsed["list"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        let second = list.get(1).unwrap().as_inline_table().unwrap();
        assert_eq!(second.get("blu").and_then(|v| v.as_integer()), Some(4));
    }

    #[test]
    fn test_null_is_rejected() {
        let doc = parse("a:\n  b:\n").unwrap();
        let err = encode(&doc).unwrap_err();
        assert!(err.contains("a.b"), "{}", err);
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let doc = parse("- a\n- b").unwrap();
        assert!(encode(&doc).unwrap_err().contains("sequence"));
    }

    #[test]
    fn test_big_integer_is_rejected() {
        let doc = parse("big: 123456789012345678901234567890").unwrap();
        assert!(encode(&doc).is_err());
    }
}
