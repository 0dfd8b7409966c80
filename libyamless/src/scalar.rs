//! Scalar classification and typed coercion.
//!
//! Scalars keep the text exactly as written. Interpretation happens only when
//! a caller asks for a type through [`FromNode`], so the same node can be read
//! as an integer in one place and as a string in another.
//!
//! Quoting is lenient: a value that starts with either `'` or `"` and ends
//! with either of them is quoted, even when the two characters differ. There
//! are no escape sequences.

use crate::error::CoerceError;
use crate::node::Node;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use std::iter::Peekable;
use std::str::CharIndices;

/// A leaf value, stored as raw source text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scalar {
    raw: String,
}

impl Scalar {
    /// Create a scalar from its raw (possibly quoted) text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The text as written, quotes included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The text with outer quotes removed.
    pub fn text(&self) -> &str {
        strip_quotes(&self.raw)
    }

    /// Returns `true` if the raw text is quoted.
    pub fn is_quoted(&self) -> bool {
        is_quoted(&self.raw)
    }

    /// Returns `true` for an absent value (`key:` with nothing after it).
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Guess the type a plain reader would see in this scalar.
    ///
    /// Used by encoders that need typed output. Quoted text is always a
    /// string; the lenient boolean spellings (`t`, `1`, ...) are not applied.
    pub fn infer(&self) -> Inferred<'_> {
        if self.raw.is_empty() {
            return Inferred::Null;
        }
        let text = self.text();
        if self.is_quoted() {
            return Inferred::Str(text);
        }
        if is_integer_pattern(text) {
            if let Ok(n) = text.parse::<BigInt>() {
                return Inferred::Integer(n);
            }
        }
        if is_float_pattern(text) {
            if let Ok(f) = text.parse::<f64>() {
                return Inferred::Float(f);
            }
        }
        if text.eq_ignore_ascii_case("true") {
            return Inferred::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Inferred::Bool(false);
        }
        Inferred::Str(text)
    }
}

/// Result of [`Scalar::infer`].
#[derive(Clone, Debug, PartialEq)]
pub enum Inferred<'a> {
    Null,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    Str(&'a str),
}

// ============================================================================
// Quote Handling
// ============================================================================

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Check whether the trimmed text is wrapped in quotes (of either kind).
pub fn is_quoted(s: &str) -> bool {
    let s = s.trim();
    s.len() >= 2 && s.starts_with(is_quote) && s.ends_with(is_quote)
}

/// Remove one pair of outer quotes. The quotes need not match.
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if is_quoted(s) {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// A quote opens a quoted region only where a token can start.
fn opens_quote(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(p) => p.is_whitespace() || matches!(p, ':' | ',' | '[' | '{' | '('),
    }
}

/// A quote closes a quoted region only where a token can end.
fn closes_quote(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(n) => n.is_whitespace() || matches!(n, ':' | ',' | ']' | '}' | ')'),
    }
}

/// Iterator over the characters of a line that lie outside quoted regions.
///
/// Quote characters and everything between them are skipped. A region
/// opened by one kind of quote may be closed by the other kind.
pub(crate) struct OutsideQuotes<'a> {
    chars: Peekable<CharIndices<'a>>,
    prev: Option<char>,
    in_quote: bool,
}

pub(crate) fn outside_quotes(s: &str) -> OutsideQuotes<'_> {
    OutsideQuotes {
        chars: s.char_indices().peekable(),
        prev: None,
        in_quote: false,
    }
}

impl Iterator for OutsideQuotes<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<(usize, char)> {
        loop {
            let (i, c) = self.chars.next()?;
            let next = self.chars.peek().map(|&(_, n)| n);
            let prev = self.prev.replace(c);
            if self.in_quote {
                if is_quote(c) && closes_quote(next) {
                    self.in_quote = false;
                }
                continue;
            }
            if is_quote(c) && opens_quote(prev) {
                self.in_quote = true;
                continue;
            }
            return Some((i, c));
        }
    }
}

// ============================================================================
// Boolean Coercion
// ============================================================================

/// Interpret text as a boolean.
///
/// Accepts `1`/`t`/`true` and `0`/`f`/`false` in any case. Text that merely
/// contains both `true` and `false` resolves to whichever appears first.
pub fn parse_bool(text: &str) -> Result<bool, CoerceError> {
    let lower = text.trim().to_lowercase();
    match lower.as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => match (lower.find("true"), lower.find("false")) {
            (Some(t), Some(f)) => Ok(t < f),
            _ => Err(CoerceError::BoolCoercion(text.to_string())),
        },
    }
}

// ============================================================================
// Number Coercion
// ============================================================================

/// Check if string matches integer pattern: [+-]?\d+
fn is_integer_pattern(s: &str) -> bool {
    let s = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Check if string matches float pattern: [+-]?\d*\.\d*([eE][+-]?\d+)?
/// Also matches exponent-only notation: [+-]?\d+[eE][+-]?\d+
fn is_float_pattern(s: &str) -> bool {
    let s = s
        .strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s);

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(e_pos) => (&s[..e_pos], Some(&s[e_pos + 1..])),
        None => (s, None),
    };

    if let Some(exp) = exponent {
        let exp = exp
            .strip_prefix('+')
            .or_else(|| exp.strip_prefix('-'))
            .unwrap_or(exp);
        if exp.is_empty() || !exp.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }

    if exponent.is_some() && !mantissa.contains('.') {
        return !mantissa.is_empty() && mantissa.chars().all(|c| c.is_ascii_digit());
    }

    let Some((before, after)) = mantissa.split_once('.') else {
        return false;
    };
    !(before.is_empty() && after.is_empty())
        && before.chars().all(|c| c.is_ascii_digit())
        && after.chars().all(|c| c.is_ascii_digit())
}

/// Parse an integer, accepting float spellings of integral values (`2.0`).
fn parse_integer(text: &str) -> Option<BigInt> {
    let text = text.trim();
    if is_integer_pattern(text) {
        return text.parse::<BigInt>().ok();
    }
    let f = text.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        BigInt::from_f64(f)
    } else {
        None
    }
}

fn numeric_error(text: &str, target: &'static str) -> CoerceError {
    CoerceError::NumericCoercion {
        text: text.to_string(),
        target,
    }
}

// ============================================================================
// Extraction Traits
// ============================================================================

/// Types that can be read from the text of a single scalar.
pub trait FromScalar: Sized {
    /// Name used in error messages.
    const TARGET: &'static str;

    fn from_scalar(text: &str) -> Result<Self, CoerceError>;
}

/// Types that can be extracted from a node with [`Node::to`].
pub trait FromNode: Sized {
    fn from_node(node: &Node) -> Result<Self, CoerceError>;
}

/// Find the scalar text behind a node, looking through one-element groups.
fn scalar_text<'a>(node: &'a Node, target: &'static str) -> Result<&'a str, CoerceError> {
    match node {
        Node::Scalar(s) => Ok(s.text()),
        Node::Sequence(items) if items.len() == 1 => scalar_text(&items[0], target),
        other => Err(CoerceError::TypeMismatch {
            found: other.kind_name(),
            target,
        }),
    }
}

macro_rules! impl_from_node_via_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromNode for $t {
                fn from_node(node: &Node) -> Result<Self, CoerceError> {
                    <$t as FromScalar>::from_scalar(scalar_text(node, <$t as FromScalar>::TARGET)?)
                }
            }
        )*
    };
}

macro_rules! impl_from_scalar_int {
    ($($t:ty => $to:ident),* $(,)?) => {
        $(
            impl FromScalar for $t {
                const TARGET: &'static str = stringify!($t);

                fn from_scalar(text: &str) -> Result<Self, CoerceError> {
                    parse_integer(text)
                        .and_then(|n| n.$to())
                        .ok_or_else(|| numeric_error(text, Self::TARGET))
                }
            }
        )*
    };
}

impl_from_scalar_int!(
    i8 => to_i8,
    i16 => to_i16,
    i32 => to_i32,
    i64 => to_i64,
    i128 => to_i128,
    isize => to_isize,
    u8 => to_u8,
    u16 => to_u16,
    u32 => to_u32,
    u64 => to_u64,
    u128 => to_u128,
    usize => to_usize,
);

impl FromScalar for BigInt {
    const TARGET: &'static str = "integer";

    fn from_scalar(text: &str) -> Result<Self, CoerceError> {
        parse_integer(text).ok_or_else(|| numeric_error(text, Self::TARGET))
    }
}

impl FromScalar for f64 {
    const TARGET: &'static str = "f64";

    fn from_scalar(text: &str) -> Result<Self, CoerceError> {
        text.trim()
            .parse::<f64>()
            .map_err(|_| numeric_error(text, Self::TARGET))
    }
}

impl FromScalar for f32 {
    const TARGET: &'static str = "f32";

    fn from_scalar(text: &str) -> Result<Self, CoerceError> {
        text.trim()
            .parse::<f32>()
            .map_err(|_| numeric_error(text, Self::TARGET))
    }
}

impl FromScalar for bool {
    const TARGET: &'static str = "bool";

    fn from_scalar(text: &str) -> Result<Self, CoerceError> {
        parse_bool(text)
    }
}

impl FromScalar for String {
    const TARGET: &'static str = "string";

    fn from_scalar(text: &str) -> Result<Self, CoerceError> {
        Ok(text.to_string())
    }
}

impl_from_node_via_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, BigInt, f32, f64, bool,
    String,
);

/// Pairs, e.g. the `(re, im)` parts of a complex number written `(1.0, 2.0)`.
impl<A: FromNode, B: FromNode> FromNode for (A, B) {
    fn from_node(node: &Node) -> Result<Self, CoerceError> {
        match node {
            Node::Sequence(items) if items.len() == 2 => {
                Ok((A::from_node(&items[0])?, B::from_node(&items[1])?))
            }
            Node::Sequence(items) => Err(CoerceError::ArityMismatch {
                expected: 2,
                found: items.len(),
            }),
            other => Err(CoerceError::TypeMismatch {
                found: other.kind_name(),
                target: "pair",
            }),
        }
    }
}
