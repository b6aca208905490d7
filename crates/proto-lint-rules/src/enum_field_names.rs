//! Rule requiring enum value names in UPPER_SNAKE_CASE.

use proto_lint_core::utils::Casing;
use proto_lint_core::{NameToken, NodeKind};

use crate::naming::{naming_rule, NamingPolicy};

/// Rule ID for enum-field-names-upper-snake-case.
pub const ID: &str = "ENUM_FIELD_NAMES_UPPER_SNAKE_CASE";

static POLICY: NamingPolicy = NamingPolicy {
    id: ID,
    description: "Verifies that all enum field names are CAPITALS_WITH_UNDERSCORES.",
    kinds: &[NodeKind::EnumValue],
    label: "EnumField",
    casing: Casing::UpperSnake,
    name_token: NameToken::Leading,
};

naming_rule! {
    /// Verifies that all enum value names are `UPPER_SNAKE_CASE`.
    pub struct EnumFieldNamesUpperSnakeCase(POLICY);
}
