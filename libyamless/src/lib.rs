//! yamless parser implementation.
//!
//! yamless is a forgiving, indentation-based configuration format in the
//! spirit of YAML: comments, nested mappings and sequences, inline
//! bracketed lists, and loose quoting. Values are kept as text and converted
//! to a type only when asked.
//!
//! # Parsing Pipeline
//!
//! The parser operates in two phases:
//!
//! 1. **Scanner**: Converts source text into scan lines, removing comments
//!    and blank lines, and extracting indentation and list markers.
//!
//! 2. **Block Parser**: Recursively builds mappings and sequences from the
//!    lines by indentation, handing bracketed values to the flow parser.
//!
//! # Example
//!
//! ```
//! let doc = libyamless::parse("\
//! server:
//!   port: 8080
//!   hosts: [alpha, beta]
//! ").unwrap();
//!
//! assert_eq!(doc["server"]["port"].to::<u16>().unwrap(), 8080);
//! assert_eq!(doc["server"]["hosts"][1].to::<String>().unwrap(), "beta");
//! assert!(!doc["server"]["missing"][0].is_valid());
//! ```

mod block;
mod depth;
mod encode;
mod error;
mod flow;
mod node;
mod scalar;
mod scanner;

pub use depth::BracketDepth;
pub use encode::{encode, Format};
pub use error::{CoerceError, Location, ParseError, Result};
pub use node::{Mapping, Node};
pub use scalar::{parse_bool, strip_quotes, FromNode, FromScalar, Inferred, Scalar};

use tracing::debug;

/// Parse a yamless document from a string.
///
/// # Example
///
/// ```
/// use libyamless::parse;
///
/// let doc = parse("int: 2   # a comment").unwrap();
/// assert_eq!(doc["int"].to::<i32>().unwrap(), 2);
/// ```
pub fn parse(input: &str) -> Result<Node> {
    parse_with_filename(input, None)
}

/// Parse a yamless document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Node> {
    let ctx = error::ParseContext::new(filename);
    debug!(?filename, bytes = input.len(), "parsing");

    // Phase 1: Scan source into lines
    let lines = scanner::scan(input);

    // Phase 2: Build the tree
    let doc = block::parse_document(&lines, &ctx)?;
    debug!(lines = lines.len(), size = doc.size(), "parsed");
    Ok(doc)
}
