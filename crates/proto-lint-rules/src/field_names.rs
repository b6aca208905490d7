//! Rule requiring field names in lower_snake_case.
//!
//! Applies to ordinary fields (including those inside `oneof` and `extend`
//! blocks) and to map fields. The field name is the last identifier
//! before `=`, whatever the label and type look like.

use proto_lint_core::utils::Casing;
use proto_lint_core::{NameToken, NodeKind};

use crate::naming::{naming_rule, NamingPolicy};

/// Rule ID for field-names-lower-snake-case.
pub const ID: &str = "FIELD_NAMES_LOWER_SNAKE_CASE";

static POLICY: NamingPolicy = NamingPolicy {
    id: ID,
    description: "Verifies that all field names are underscore_separated_names.",
    kinds: &[NodeKind::Field, NodeKind::MapField],
    label: "Field",
    casing: Casing::LowerSnake,
    name_token: NameToken::BeforeAssign,
};

naming_rule! {
    /// Verifies that all field names are `lower_snake_case`.
    pub struct FieldNamesLowerSnakeCase(POLICY);
}
