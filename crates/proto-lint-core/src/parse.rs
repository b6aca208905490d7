//! Seam to the external schema parser.

use crate::position::Position;
use crate::tree::Proto;

/// Error returned when schema text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}: {message}")]
pub struct ParseError {
    /// Where parsing stopped.
    pub position: Position,
    /// Description of the problem.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Parses schema text into a [`Proto`] tree.
///
/// The linter only needs this to re-check text it has just rewritten in
/// fix mode, and to read files from disk in [`Linter::lint_file`].
///
/// [`Linter::lint_file`]: crate::Linter::lint_file
pub trait SchemaParser: Send + Sync {
    /// Parses `source`, recording `filename` in every position.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is not a valid schema file.
    fn parse(&self, filename: &str, source: &str) -> Result<Proto, ParseError>;
}

impl<F> SchemaParser for F
where
    F: Fn(&str, &str) -> Result<Proto, ParseError> + Send + Sync,
{
    fn parse(&self, filename: &str, source: &str) -> Result<Proto, ParseError> {
        self(filename, source)
    }
}
