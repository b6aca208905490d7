//! # proto-lint-parser
//!
//! Parser for `.proto` schema files producing the tree model defined in
//! [`proto_lint_core::tree`].
//!
//! Handles proto2, proto3, and editions files: `syntax`/`edition`,
//! `package`, `import`, `option` (including aggregate values), `message`,
//! fields, `map` fields, `oneof`, `enum`, `service`, `rpc` (with `stream`
//! arguments and option bodies), `reserved`, `extensions`, `extend`, and
//! empty statements.
//!
//! Every node records the position of its first token and of its closing
//! `;` or `}`. Positions are never recomputed downstream, so a failure
//! points exactly where the parser said the declaration starts.
//!
//! ## Example
//!
//! ```ignore
//! use proto_lint_parser::parse_proto;
//!
//! let proto = parse_proto("search.proto", "syntax = \"proto3\";\nmessage SearchRequest {}\n")?;
//! assert_eq!(proto.body.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod parser;

use proto_lint_core::{ParseError, Proto, SchemaParser};
use tracing::debug;

/// The `.proto` parser as a [`SchemaParser`] for the linter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtoParser;

impl SchemaParser for ProtoParser {
    fn parse(&self, filename: &str, source: &str) -> Result<Proto, ParseError> {
        parse_proto(filename, source)
    }
}

/// Parses `source`, recording `filename` in every position.
///
/// # Errors
///
/// Returns the position and description of the first syntax error.
pub fn parse_proto(filename: &str, source: &str) -> Result<Proto, ParseError> {
    let proto = parser::Parser::new(filename, source)?.parse()?;
    debug!(
        "Parsed {} ({} top-level declarations)",
        filename,
        proto.body.len()
    );
    Ok(proto)
}
