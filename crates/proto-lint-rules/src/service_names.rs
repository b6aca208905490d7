//! Rule requiring service names in UpperCamelCase.
//!
//! ```proto
//! service song_service {}   // fails
//! service SongService {}    // ok
//! ```

use proto_lint_core::utils::Casing;
use proto_lint_core::{NameToken, NodeKind};

use crate::naming::{naming_rule, NamingPolicy};

/// Rule ID for service-names-upper-camel-case.
pub const ID: &str = "SERVICE_NAMES_UPPER_CAMEL_CASE";

static POLICY: NamingPolicy = NamingPolicy {
    id: ID,
    description: "Verifies that all service names are CamelCase (with an initial capital).",
    kinds: &[NodeKind::Service],
    label: "Service",
    casing: Casing::UpperCamel,
    name_token: NameToken::AfterKeyword("service"),
};

naming_rule! {
    /// Verifies that all service names are `UpperCamelCase`.
    pub struct ServiceNamesUpperCamelCase(POLICY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_lint_core::tree::{Service, Visitee};
    use proto_lint_core::{Meta, Position, Proto, Rule};

    #[test]
    fn test_service_names() {
        let proto = Proto::new(vec![
            Visitee::Service(Service {
                name: "SongService".to_string(),
                ..Service::default()
            }),
            Visitee::Service(Service {
                name: "song_service".to_string(),
                meta: Meta::at(Position::new("s.proto", 20, 3, 1)),
                ..Service::default()
            }),
        ]);

        let failures = ServiceNamesUpperCamelCase::new(false).apply(&proto).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].position, Position::new("s.proto", 20, 3, 1));
        assert_eq!(
            failures[0].message,
            r#"Service name "song_service" must be UpperCamelCase like "SongService""#
        );
    }
}
