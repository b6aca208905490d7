//! # proto-lint-rules
//!
//! Built-in lint rules for proto-lint.
//!
//! ## Available Rules
//!
//! | ID | Checks | Fixable |
//! |----|--------|---------|
//! | `SERVICE_NAMES_UPPER_CAMEL_CASE` | Service names are `UpperCamelCase` | yes |
//! | `RPC_NAMES_UPPER_CAMEL_CASE` | RPC names are `UpperCamelCase` | yes |
//! | `MESSAGE_NAMES_UPPER_CAMEL_CASE` | Message names are `UpperCamelCase` | yes |
//! | `FIELD_NAMES_LOWER_SNAKE_CASE` | Field and map field names are `lower_snake_case` | yes |
//! | `ENUM_NAMES_UPPER_CAMEL_CASE` | Enum names are `UpperCamelCase` | yes |
//! | `ENUM_FIELD_NAMES_UPPER_SNAKE_CASE` | Enum value names are `UPPER_SNAKE_CASE` | yes |
//! | `PACKAGE_NAME_LOWER_CASE` | Package names have no uppercase letter | yes |
//! | `ENUM_FIRST_VALUE_ZERO` | The first enum value is `0` | no |
//!
//! ## Usage
//!
//! ```ignore
//! use std::path::Path;
//!
//! use proto_lint_core::Linter;
//! use proto_lint_parser::ProtoParser;
//! use proto_lint_rules::{FieldNamesLowerSnakeCase, RpcNamesUpperCamelCase};
//!
//! let linter = Linter::builder()
//!     .rule(RpcNamesUpperCamelCase::new(true))
//!     .rule(FieldNamesLowerSnakeCase::new(true))
//!     .fix_mode(true)
//!     .build();
//! let report = linter.lint_file(Path::new("api/search.proto"), &ProtoParser)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod enum_field_names;
mod enum_first_value_zero;
mod enum_names;
mod field_names;
mod message_names;
mod naming;
mod package_name;
mod presets;
mod rpc_names;
mod service_names;

pub use enum_field_names::EnumFieldNamesUpperSnakeCase;
pub use enum_first_value_zero::EnumFirstValueZero;
pub use enum_names::EnumNamesUpperCamelCase;
pub use field_names::FieldNamesLowerSnakeCase;
pub use message_names::MessageNamesUpperCamelCase;
pub use package_name::PackageNameLowerCase;
pub use presets::{all_rule_ids, builtin_registry, default_rule_ids, Preset};
pub use rpc_names::RpcNamesUpperCamelCase;
pub use service_names::ServiceNamesUpperCamelCase;

/// Re-export core types for convenience.
pub use proto_lint_core::{Failure, Rule, Severity};
