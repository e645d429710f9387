//! Source locations within decoded markup text.

use std::fmt;

/// A location in the decoded input text.
///
/// Lines and columns are 1-based and counted in characters; the offset is the
/// 0-based byte index into the (already transcoded, newline-normalised) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number, in characters.
    pub column: usize,
    /// 0-based byte offset.
    pub offset: usize,
}

impl SourcePosition {
    /// The position of the first character of any input.
    pub const START: Self = Self {
        line: 1,
        column: 1,
        offset: 0,
    };

    /// Returns the position immediately after `c`, which was read at `self`.
    #[must_use]
    pub const fn advance(self, c: char) -> Self {
        if c == '\n' {
            Self {
                line: self.line + 1,
                column: 1,
                offset: self.offset + 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
                offset: self.offset + c.len_utf8(),
            }
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_bytes_and_columns() {
        let pos = SourcePosition::START.advance('a').advance('é');
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 3);
        assert_eq!(pos.offset, 3);
    }

    #[test]
    fn test_advance_over_newline() {
        let pos = SourcePosition::START.advance('x').advance('\n');
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.offset, 2);
    }

    #[test]
    fn test_display() {
        let pos = SourcePosition {
            line: 10,
            column: 5,
            offset: 42,
        };
        assert_eq!(pos.to_string(), "10:5");
    }
}
