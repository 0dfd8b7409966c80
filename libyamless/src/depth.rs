//! Bracket depth tracking for flow collections.
//!
//! `[`, `{` and `(` are interchangeable grouping delimiters, and so are their
//! closers: only the nesting depth matters, never which family opened a
//! group. `{1, 2]` is balanced.

use crate::scalar::outside_quotes;

pub fn is_opener(c: char) -> bool {
    matches!(c, '[' | '{' | '(')
}

pub fn is_closer(c: char) -> bool {
    matches!(c, ']' | '}' | ')')
}

/// Running bracket depth over one flow value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketDepth {
    depth: isize,
    opened: bool,
    underflow: bool,
}

impl BracketDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one character.
    pub fn feed(&mut self, c: char) {
        if is_opener(c) {
            self.depth += 1;
            self.opened = true;
        } else if is_closer(c) {
            self.depth -= 1;
            if self.depth < 0 {
                self.underflow = true;
            }
        }
    }

    /// Account for every bracket of `s` that is not inside quotes.
    pub fn feed_str(&mut self, s: &str) {
        for (_, c) in outside_quotes(s) {
            self.feed(c);
        }
    }

    pub fn depth(&self) -> isize {
        self.depth
    }

    /// More groups were opened than closed so far, and none over-closed.
    pub fn is_open(&self) -> bool {
        self.depth > 0 && !self.underflow
    }

    /// Depth went negative at some point.
    pub fn is_underflow(&self) -> bool {
        self.underflow
    }

    /// Depth is back to zero and never dropped below it.
    pub fn is_balanced(&self) -> bool {
        self.depth == 0 && !self.underflow
    }

    /// At least one group was opened and every group has been closed.
    pub fn is_complete(&self) -> bool {
        self.opened && self.is_balanced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(s: &str) -> BracketDepth {
        let mut depth = BracketDepth::new();
        depth.feed_str(s);
        depth
    }

    #[test]
    fn test_mixed_families_balance() {
        assert!(track("{1.0, 2.0]").is_complete());
        assert!(track("[1.0, 2.0}").is_complete());
        assert!(track("[{braces}, (parentheses), [mixed}]").is_complete());
    }

    #[test]
    fn test_too_many_opens() {
        let depth = track("{{1.0, 2.0}");
        assert!(depth.is_open());
        assert!(!depth.is_balanced());
        assert_eq!(depth.depth(), 1);
    }

    #[test]
    fn test_too_many_closes() {
        let depth = track("{1.0, 2.0}}");
        assert!(depth.is_underflow());
        assert!(!depth.is_open());
        assert!(!depth.is_balanced());
    }

    #[test]
    fn test_close_before_open() {
        // Depth is zero at the end but went negative on the way.
        assert!(!track(")(").is_balanced());
    }

    #[test]
    fn test_quoted_brackets_ignored() {
        assert!(track("['a]', \"(b\"]").is_complete());
    }

    #[test]
    fn test_no_brackets() {
        let depth = track("plain");
        assert!(depth.is_balanced());
        assert!(!depth.is_complete());
    }
}
