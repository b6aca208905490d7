//! # proto-lint-core
//!
//! Core framework for protobuf schema style linting.
//!
//! This crate provides the foundational traits and types for building
//! schema linters. It includes:
//!
//! - [`Proto`] and the [`tree`] module, the owned tree produced by a parser
//! - [`Rule`] trait for per-node checks with optional fixes
//! - [`Dispatcher`] for walking a tree and invoking rules
//! - [`RuleRegistry`] for resolving rule IDs to instances
//! - [`Linter`] for the check, fix, and re-verify pipeline
//! - [`Failure`] and [`Edit`] for representing findings and corrections
//!
//! ## Example
//!
//! ```ignore
//! use proto_lint_core::Linter;
//!
//! let linter = Linter::builder()
//!     .rule(MyRule::new())
//!     .fix_mode(true)
//!     .build();
//!
//! let report = linter.lint_file(path, &parser)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod linter;
mod parse;
mod position;
mod registry;
mod rule;
mod source;
mod types;

pub mod fixer;
pub mod lexer;
pub mod tree;
pub mod visitor;

/// Utility modules for rule implementations.
pub mod utils;

pub use config::{Config, ConfigError, LintConfig, RuleConfig};
pub use error::LintError;
pub use fixer::{apply_edits, FixError, FixStage};
pub use linter::{FixOutcome, Linter, LinterBuilder};
pub use parse::{ParseError, SchemaParser};
pub use position::{Meta, Position};
pub use registry::{RegistryError, RuleFactory, RuleRegistry};
pub use rule::{Rule, RuleBox, RuleError};
pub use source::{DottedName, NameToken, SourceText};
pub use tree::{Node, NodeKind, Proto, Visitee};
pub use types::{Edit, Failure, FailureDiagnostic, FileError, FileReport, LintResult, Severity};
pub use utils::allowance::{AllowCheck, Allowances};
pub use visitor::{Dispatcher, Finding};
