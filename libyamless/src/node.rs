//! yamless document tree.

use crate::error::{CoerceError, ParseError};
use crate::scalar::{FromNode, Scalar};
use indexmap::IndexMap;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// Mapping entries, in the order they were written.
pub type Mapping = IndexMap<String, Node>;

static INVALID: Node = Node::Invalid;

/// A node of a parsed document.
///
/// Lookups never fail: indexing a missing key, an out-of-range position, or
/// the wrong kind of node yields [`Node::Invalid`], so paths like
/// `doc["a"]["b"][2]` can be evaluated before checking
/// [`is_valid`](Node::is_valid).
#[derive(Clone, PartialEq)]
pub enum Node {
    /// Leaf text.
    Scalar(Scalar),
    /// Key/value entries.
    Mapping(Mapping),
    /// Ordered elements.
    Sequence(Vec<Node>),
    /// Result of a failed lookup.
    Invalid,
}

impl Node {
    /// Returns `false` only for [`Node::Invalid`].
    pub fn is_valid(&self) -> bool {
        !matches!(self, Node::Invalid)
    }

    /// Returns `false` for [`Node::Invalid`] and for an absent value
    /// (`key:` followed by nothing).
    pub fn is_defined(&self) -> bool {
        match self {
            Node::Invalid => false,
            Node::Scalar(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    /// Number of values this node holds: 1 for a scalar, the entry count for
    /// a mapping, the element count for a sequence, 0 when invalid.
    pub fn size(&self) -> usize {
        match self {
            Node::Scalar(_) => 1,
            Node::Mapping(map) => map.len(),
            Node::Sequence(items) => items.len(),
            Node::Invalid => 0,
        }
    }

    /// Short name of the variant, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(_) => "scalar",
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Invalid => "invalid",
        }
    }

    /// Look up a key in a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Look up a position in a sequence.
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        match self {
            Node::Sequence(items) => items.get(index),
            _ => None,
        }
    }

    /// Follow a dotted path such as `node.nested_list.0.bla`.
    ///
    /// Numeric segments index sequences; every other segment is a key. An
    /// empty path refers to the node itself.
    pub fn pointer(&self, path: &str) -> &Node {
        if path.is_empty() {
            return self;
        }
        path.split('.').fold(self, |node, segment| match node {
            Node::Sequence(_) => match segment.parse::<usize>() {
                Ok(index) => &node[index],
                Err(_) => &INVALID,
            },
            _ => &node[segment],
        })
    }

    /// Returns the scalar if this is a `Scalar`.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the unquoted text if this is a `Scalar`.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().map(Scalar::text)
    }

    /// Returns a reference to the entries if this is a `Mapping`.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns a reference to the elements if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Mapping entries in written order; empty for other nodes.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.as_mapping()
            .into_iter()
            .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Mapping keys in written order; empty for other nodes.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|(k, _)| k)
    }

    /// Sequence elements in order; empty for other nodes.
    pub fn items(&self) -> impl Iterator<Item = &Node> {
        self.as_sequence().into_iter().flatten()
    }

    /// Read this node as `T`.
    ///
    /// # Example
    ///
    /// ```
    /// let doc = libyamless::parse("complex: (1.0, 2.0)\nint: 2").unwrap();
    /// assert_eq!(doc["int"].to::<i32>().unwrap(), 2);
    /// assert_eq!(doc["complex"].to::<(f64, f64)>().unwrap(), (1.0, 2.0));
    /// ```
    pub fn to<T: FromNode>(&self) -> Result<T, CoerceError> {
        T::from_node(self)
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Mapping(Mapping::new())
    }
}

impl Index<&str> for Node {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        self.get(key).unwrap_or(&INVALID)
    }
}

impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        self.get_index(index).unwrap_or(&INVALID)
    }
}

impl FromStr for Node {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(s) => write!(f, "{:?}", s.raw()),
            Node::Mapping(map) => f.debug_map().entries(map).finish(),
            Node::Sequence(items) => f.debug_list().entries(items).finish(),
            Node::Invalid => write!(f, "<invalid>"),
        }
    }
}

/// Renders block notation.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encode::encode(self, crate::encode::Format::Yamless))
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::new(s))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut inner = Mapping::new();
        inner.insert("x".to_string(), Node::from("1"));
        inner.insert("empty".to_string(), Node::from(""));
        let mut root = Mapping::new();
        root.insert(
            "list".to_string(),
            Node::from(vec![Node::from("a"), Node::from(inner)]),
        );
        Node::from(root)
    }

    #[test]
    fn test_missing_paths_are_invalid() {
        let doc = sample();
        for node in [
            &doc["nope"],
            &doc["nope"]["deeper"][3],
            &doc["list"][9],
            &doc["list"]["key"],
            &doc[0],
        ] {
            assert!(!node.is_valid());
            assert!(!node.is_defined());
            assert_eq!(node.size(), 0);
        }
    }

    #[test]
    fn test_is_defined() {
        let doc = sample();
        assert!(doc["list"][1]["x"].is_defined());
        assert!(doc["list"][1]["empty"].is_valid());
        assert!(!doc["list"][1]["empty"].is_defined());
    }

    #[test]
    fn test_pointer() {
        let doc = sample();
        assert_eq!(doc.pointer("list.1.x").as_str(), Some("1"));
        assert_eq!(doc.pointer("list.0").as_str(), Some("a"));
        assert!(!doc.pointer("list.first").is_valid());
        assert_eq!(doc.pointer(""), &doc);
    }

    #[test]
    fn test_sizes() {
        let doc = sample();
        assert_eq!(doc.size(), 1);
        assert_eq!(doc["list"].size(), 2);
        assert_eq!(doc["list"][0].size(), 1);
    }

    #[test]
    fn test_iteration() {
        let doc = sample();
        assert_eq!(doc["list"][1].keys().collect::<Vec<_>>(), ["x", "empty"]);
        assert_eq!(doc["list"].items().count(), 2);
        assert_eq!(doc["list"].keys().count(), 0);
    }

    #[test]
    fn test_to_on_invalid_is_type_mismatch() {
        let doc = sample();
        assert_eq!(
            doc["missing"].to::<i32>(),
            Err(CoerceError::TypeMismatch {
                found: "invalid",
                target: "i32"
            })
        );
        assert!(matches!(
            doc.to::<String>(),
            Err(CoerceError::TypeMismatch {
                found: "mapping",
                ..
            })
        ));
    }

    #[test]
    fn test_single_element_sequence_delegates() {
        let node = Node::from(vec![Node::from("braces")]);
        assert_eq!(node.to::<String>().unwrap(), "braces");
    }

    #[test]
    fn test_tree_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Node>();
    }

    #[test]
    fn test_pair() {
        let node = Node::from(vec![Node::from("1.0"), Node::from("2.0")]);
        assert_eq!(node.to::<(f64, f64)>(), Ok((1.0, 2.0)));
        let node = Node::from(vec![Node::from("1.0")]);
        assert_eq!(
            node.to::<(f64, f64)>(),
            Err(CoerceError::ArityMismatch {
                expected: 2,
                found: 1
            })
        );
    }
}
