//! Error types for yamless parsing and value extraction.

use std::fmt;
use thiserror::Error;

/// Result type for yamless parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Build a location for a zero-based line and column.
    pub fn locate(&self, line: usize, col: usize) -> Location {
        Location {
            line,
            col,
            filename: self.filename.clone(),
        }
    }
}

/// Where in the source an error was detected.
///
/// Line and column are zero-based; they are rendered one-based.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
    pub filename: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " at {}:{}", self.line + 1, self.col + 1)?;
        if let Some(name) = &self.filename {
            write!(f, " of <{}>", name)?;
        }
        Ok(())
    }
}

/// Error raised while building a document. Parsing stops at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A line that no grammar rule accepts at its indentation.
    #[error("Malformed line \"{text}\"{loc}")]
    MalformedLine { text: String, loc: Location },

    /// Bracket depth did not return to zero, or went below zero.
    #[error("Unbalanced brackets{loc}")]
    UnbalancedBrackets { loc: Location },

    /// Nothing between two separators of a flow collection.
    #[error("Empty element in flow collection{loc}")]
    EmptyElement { loc: Location },

    /// A mapping declares the same key twice.
    #[error("Duplicate key \"{key}\"{loc}")]
    DuplicateKey { key: String, loc: Location },
}

impl ParseError {
    /// The source location the error refers to.
    pub fn location(&self) -> &Location {
        match self {
            ParseError::MalformedLine { loc, .. }
            | ParseError::UnbalancedBrackets { loc }
            | ParseError::EmptyElement { loc }
            | ParseError::DuplicateKey { loc, .. } => loc,
        }
    }

    pub(crate) fn malformed(text: &str, loc: Location) -> Self {
        ParseError::MalformedLine {
            text: text.to_string(),
            loc,
        }
    }
}

/// Error raised by typed extraction from a node.
///
/// These never occur during parsing; scalar text is kept verbatim and only
/// interpreted when a caller asks for a type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// Text is not one of the recognized boolean spellings.
    #[error("Cannot read \"{0}\" as a boolean")]
    BoolCoercion(String),

    /// Text is not a number of the requested type.
    #[error("Cannot read \"{text}\" as {target}")]
    NumericCoercion { text: String, target: &'static str },

    /// A pair was requested from a sequence of the wrong length.
    #[error("Expected a sequence of {expected} elements, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// The node's shape cannot hold the requested type at all.
    #[error("Cannot read {found} node as {target}")]
    TypeMismatch {
        found: &'static str,
        target: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let ctx = ParseContext::new(None);
        assert_eq!(ctx.locate(0, 0).to_string(), " at 1:1");
        let ctx = ParseContext::new(Some("app.yml"));
        assert_eq!(ctx.locate(2, 4).to_string(), " at 3:5 of <app.yml>");
    }

    #[test]
    fn test_error_message() {
        let ctx = ParseContext::new(None);
        let err = ParseError::malformed("oops", ctx.locate(2, 1));
        assert_eq!(err.to_string(), "Malformed line \"oops\" at 3:2");
        assert_eq!(err.location().line, 2);
    }
}
