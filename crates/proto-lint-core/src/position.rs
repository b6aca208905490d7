//! Source positions attached to tree nodes and failures.

use serde::{Deserialize, Serialize};

/// A location in a schema file.
///
/// Positions are computed once by the parser and carried verbatim into
/// every [`Failure`](crate::Failure); the core never recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// File name as given to the parser.
    pub filename: String,
    /// Byte offset from the start of the file.
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(filename: impl Into<String>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            offset,
            line,
            column,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// Position metadata carried by every tree node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Meta {
    /// Position of the first token of the declaration.
    pub pos: Position,
    /// Position of the last token of the declaration (`;` or `}`).
    pub last_pos: Position,
}

impl Meta {
    /// Creates metadata whose start and end are both `pos`.
    #[must_use]
    pub fn at(pos: Position) -> Self {
        Self {
            last_pos: pos.clone(),
            pos,
        }
    }

    /// Creates metadata spanning `pos` to `last_pos`.
    #[must_use]
    pub fn new(pos: Position, last_pos: Position) -> Self {
        Self { pos, last_pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_line_and_column() {
        let pos = Position::new("example.proto", 100, 5, 10);
        assert_eq!(pos.to_string(), "example.proto:5:10");
    }

    #[test]
    fn meta_at_sets_both_ends() {
        let pos = Position::new("a.proto", 3, 1, 4);
        let meta = Meta::at(pos.clone());
        assert_eq!(meta.pos, pos);
        assert_eq!(meta.last_pos, pos);
    }
}
