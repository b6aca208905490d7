//! Errors raised by the per-file lint pipeline.
//!
//! Style violations are never errors; they travel as [`Failure`]s.

use std::path::PathBuf;
use thiserror::Error;

use crate::fixer::FixError;
use crate::parse::ParseError;
use crate::registry::RegistryError;
use crate::types::{Edit, Failure};

/// Errors that abort linting of one file.
#[derive(Debug, Error)]
pub enum LintError {
    /// A rule panicked or produced malformed output.
    #[error("rule {rule_id} failed: {message}")]
    RuleFault {
        /// Rule that failed.
        rule_id: String,
        /// What went wrong.
        message: String,
    },

    /// Two proposed edits overlap; the file was left unmodified.
    #[error("conflicting edits: {first} overlaps {second}")]
    EditConflict {
        /// Edit that starts first.
        first: Edit,
        /// Edit that overlaps it.
        second: Edit,
    },

    /// A rule's fix produced text that its own check still rejects.
    #[error("fix for {rule_id} did not resolve {} failure(s): {}", .failures.len(), summarize(.failures))]
    FixVerification {
        /// Rule whose fix disagrees with its check.
        rule_id: String,
        /// Failures that persisted after the fix.
        failures: Vec<Failure>,
    },

    /// The rewritten text no longer parses.
    #[error("fixed text of {filename} failed to parse: {source}")]
    FixReparse {
        /// File being fixed.
        filename: String,
        /// Parser error on the rewritten text.
        source: ParseError,
    },

    /// The original text failed to parse.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// IO error reading or writing a file.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The rule set could not be assembled.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

fn summarize(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<FixError> for LintError {
    fn from(err: FixError) -> Self {
        match err {
            FixError::Conflict { first, second } => Self::EditConflict { first, second },
            FixError::InvalidEdit { edit, reason } => Self::RuleFault {
                message: format!("invalid edit {edit}: {reason}"),
                rule_id: edit.rule_id,
            },
        }
    }
}
