//! YAML transcoding: render yamless documents as YAML text.
//!
//! Mapping from yamless to YAML:
//!   - absent value         -> YAML null
//!   - true/false scalar    -> YAML bool
//!   - integer scalar       -> YAML integer (as a string if beyond i64/u64)
//!   - float scalar         -> YAML float (including .nan, .inf, -.inf)
//!   - any other scalar     -> YAML string, quotes removed
//!   - Sequence             -> YAML sequence
//!   - Mapping              -> YAML mapping, keys in written order
//!
//! Scalar types follow `Scalar::infer`, so `"42"` stays a string.

use libyamless::{Inferred, Node, Scalar};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Encode a yamless node as a YAML string.
pub fn encode(node: &Node) -> Result<String, String> {
    let yaml_value = node_to_yaml(node);
    serde_yaml::to_string(&yaml_value).map_err(|e| format!("YAML encode error: {}", e))
}

fn node_to_yaml(node: &Node) -> serde_yaml::Value {
    match node {
        Node::Scalar(s) => scalar_to_yaml(s),
        Node::Sequence(items) => {
            serde_yaml::Value::Sequence(items.iter().map(node_to_yaml).collect())
        }
        Node::Mapping(map) => {
            let mut yaml_map = serde_yaml::Mapping::new();
            for (k, v) in map {
                yaml_map.insert(serde_yaml::Value::String(k.clone()), node_to_yaml(v));
            }
            serde_yaml::Value::Mapping(yaml_map)
        }
        Node::Invalid => serde_yaml::Value::Null,
    }
}

fn scalar_to_yaml(scalar: &Scalar) -> serde_yaml::Value {
    match scalar.infer() {
        Inferred::Null => serde_yaml::Value::Null,
        Inferred::Bool(b) => serde_yaml::Value::Bool(b),
        Inferred::Integer(n) => integer_to_yaml(&n),
        Inferred::Float(f) => serde_yaml::Value::Number(serde_yaml::Number::from(f)),
        Inferred::Str(s) => serde_yaml::Value::String(s.to_string()),
    }
}

fn integer_to_yaml(n: &BigInt) -> serde_yaml::Value {
    // Try to fit in i64 first, then u64
    if let Some(i) = n.to_i64() {
        serde_yaml::Value::Number(serde_yaml::Number::from(i))
    } else if let Some(u) = n.to_u64() {
        serde_yaml::Value::Number(serde_yaml::Number::from(u))
    } else {
        // YAML doesn't have native arbitrary-precision integers
        serde_yaml::Value::String(n.to_string())
    }
}
