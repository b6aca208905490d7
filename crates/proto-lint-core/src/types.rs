//! Core types for lint failures, edits, and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

use crate::position::Position;

/// Severity level for lint failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One reported style violation, bound to an exact source position.
///
/// The serialized shape is `{filename, offset, line, column, ruleID,
/// message, severity}`; external reporters depend on these field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Failure {
    /// Position of the offending node.
    #[serde(flatten)]
    pub position: Position,
    /// Identifier of the rule that produced this failure.
    #[serde(rename = "ruleID")]
    pub rule_id: String,
    /// Human-readable message, including the suggested form when known.
    pub message: String,
    /// Severity of this failure.
    pub severity: Severity,
}

impl Failure {
    /// Creates a new failure with [`Severity::Error`].
    #[must_use]
    pub fn new(position: Position, rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            position,
            rule_id: rule_id.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}:{}:{}] {} ({})",
            self.position.filename,
            self.position.line,
            self.position.column,
            self.message,
            self.rule_id
        )
    }
}

/// Converts a Failure to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct FailureDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl FailureDiagnostic {
    /// Attaches a help line shown under the diagnostic.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl From<&Failure> for FailureDiagnostic {
    fn from(f: &Failure) -> Self {
        Self {
            message: format!("[{}] {}", f.rule_id, f.message),
            help: None,
            span: SourceSpan::from((f.position.offset, 0)),
            label_message: f.severity.to_string(),
        }
    }
}

/// A textual replacement over a byte span of the original file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    /// Rule that proposed this edit.
    pub rule_id: String,
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Text that replaces `start..end`.
    pub replacement: String,
}

impl Edit {
    /// Creates an edit replacing `range` with `replacement`.
    #[must_use]
    pub fn replace(
        rule_id: impl Into<String>,
        range: Range<usize>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            start: range.start,
            end: range.end,
            replacement: replacement.into(),
        }
    }

    /// Returns the replaced byte range.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns true if the two edits touch overlapping bytes.
    ///
    /// Two insertions at the same offset also overlap, since their relative
    /// order would be ambiguous.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.start == self.end && other.start == other.end {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for Edit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}..{} -> {:?}",
            self.rule_id, self.start, self.end, self.replacement
        )
    }
}

/// Outcome of linting a single file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReport {
    /// Path of the linted file.
    pub path: PathBuf,
    /// Failures that remain after the run.
    pub failures: Vec<Failure>,
    /// Whether the file was rewritten.
    pub fixed: bool,
}

/// A file that could not be linted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    /// Path of the file.
    pub path: PathBuf,
    /// Error description.
    pub message: String,
}

/// Result of linting a set of files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All failures found, grouped by file in path order.
    pub failures: Vec<Failure>,
    /// Files that could not be linted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FileError>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of files rewritten in fix mode.
    pub files_fixed: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any error-level failures or file errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
            || self
                .failures
                .iter()
                .any(|f| f.severity == Severity::Error)
    }

    /// Counts failures by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.failures
                .iter()
                .filter(|f| f.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Adds a single file's report.
    pub fn push_report(&mut self, report: FileReport) {
        self.failures.extend(report.failures);
        self.files_checked += 1;
        if report.fixed {
            self.files_fixed += 1;
        }
    }
}
