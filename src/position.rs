//! Source coordinates used to identify a mutation point.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a source file.
///
/// `line` and `column` are 1-based, `offset` is the 0-based byte offset.
/// Ordering is lexicographic over `(line, column, offset)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    pub(crate) fn from_point(point: tree_sitter::Point, offset: usize) -> Self {
        Self {
            line: point.row + 1,
            column: point.column + 1,
            offset,
        }
    }

    /// Same line and column, ignoring the byte offset.
    pub fn same_location(&self, other: &Position) -> bool {
        self.line == other.line && self.column == other.column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line: {}, Column: {}", self.line, self.column)
    }
}
