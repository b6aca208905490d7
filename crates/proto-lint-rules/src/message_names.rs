//! Rule requiring message names in UpperCamelCase.

use proto_lint_core::utils::Casing;
use proto_lint_core::{NameToken, NodeKind};

use crate::naming::{naming_rule, NamingPolicy};

/// Rule ID for message-names-upper-camel-case.
pub const ID: &str = "MESSAGE_NAMES_UPPER_CAMEL_CASE";

static POLICY: NamingPolicy = NamingPolicy {
    id: ID,
    description: "Verifies that all message names are CamelCase (with an initial capital).",
    kinds: &[NodeKind::Message],
    label: "Message",
    casing: Casing::UpperCamel,
    name_token: NameToken::AfterKeyword("message"),
};

naming_rule! {
    /// Verifies that all message names, nested ones included, are `UpperCamelCase`.
    pub struct MessageNamesUpperCamelCase(POLICY);
}
