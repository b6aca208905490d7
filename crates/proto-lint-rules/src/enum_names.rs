//! Rule requiring enum names in UpperCamelCase.

use proto_lint_core::utils::Casing;
use proto_lint_core::{NameToken, NodeKind};

use crate::naming::{naming_rule, NamingPolicy};

/// Rule ID for enum-names-upper-camel-case.
pub const ID: &str = "ENUM_NAMES_UPPER_CAMEL_CASE";

static POLICY: NamingPolicy = NamingPolicy {
    id: ID,
    description: "Verifies that all enum names are CamelCase (with an initial capital).",
    kinds: &[NodeKind::Enum],
    label: "Enum",
    casing: Casing::UpperCamel,
    name_token: NameToken::AfterKeyword("enum"),
};

naming_rule! {
    /// Verifies that all enum names are `UpperCamelCase`.
    pub struct EnumNamesUpperCamelCase(POLICY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_lint_core::tree::{Enum, Visitee};
    use proto_lint_core::{Proto, Rule};

    #[test]
    fn test_enum_names() {
        let proto = Proto::new(vec![
            Visitee::Enum(Enum {
                name: "Corpus".to_string(),
                ..Enum::default()
            }),
            Visitee::Enum(Enum {
                name: "CORPUS_TYPE".to_string(),
                ..Enum::default()
            }),
        ]);
        let failures = EnumNamesUpperCamelCase::new(false).apply(&proto).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(
            failures[0].message,
            r#"Enum name "CORPUS_TYPE" must be UpperCamelCase like "CorpusType""#
        );
    }
}
