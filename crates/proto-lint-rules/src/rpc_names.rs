//! Rule requiring RPC names in UpperCamelCase.
//!
//! # Rationale
//!
//! The protobuf style guide names RPC methods like message types:
//! `UpperCamelCase`, with acronyms kept intact. Generated client stubs in
//! most languages follow the declared casing, so a lower-case method name
//! leaks into every consumer.
//!
//! # Detected Patterns
//!
//! ```proto
//! rpc getThing (Req) returns (Resp);   // like "GetThing"
//! rpc RPC_name (Req) returns (Resp);   // like "RPCName"
//! ```

use proto_lint_core::utils::Casing;
use proto_lint_core::{NameToken, NodeKind};

use crate::naming::{naming_rule, NamingPolicy};

/// Rule ID for rpc-names-upper-camel-case.
pub const ID: &str = "RPC_NAMES_UPPER_CAMEL_CASE";

static POLICY: NamingPolicy = NamingPolicy {
    id: ID,
    description: "Verifies that all rpc names are CamelCase (with an initial capital).",
    kinds: &[NodeKind::Rpc],
    label: "RPC",
    casing: Casing::UpperCamel,
    name_token: NameToken::AfterKeyword("rpc"),
};

naming_rule! {
    /// Verifies that all RPC names are `UpperCamelCase`.
    pub struct RpcNamesUpperCamelCase(POLICY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_lint_core::tree::{Rpc, Service, Visitee};
    use proto_lint_core::{Failure, Meta, Position, Proto, Rule};

    fn proto_with_rpc(rpc: Option<Rpc>) -> Proto {
        Proto::new(vec![Visitee::Service(Service {
            body: rpc.into_iter().map(Visitee::Rpc).collect(),
            ..Service::default()
        })])
    }

    fn rpc(name: &str) -> Rpc {
        Rpc {
            name: name.to_string(),
            meta: Meta::at(Position::new("example.proto", 100, 5, 10)),
            ..Rpc::default()
        }
    }

    fn apply(proto: &Proto) -> Vec<Failure> {
        RpcNamesUpperCamelCase::new(false).apply(proto).unwrap()
    }

    #[test]
    fn test_no_failures_without_rpc() {
        assert!(apply(&proto_with_rpc(None)).is_empty());
    }

    #[test]
    fn test_no_failures_for_valid_rpc() {
        assert!(apply(&proto_with_rpc(Some(rpc("RPCName")))).is_empty());
    }

    #[test]
    fn test_lower_camel_case() {
        let failures = apply(&proto_with_rpc(Some(rpc("rpcName"))));
        assert_eq!(
            failures,
            vec![Failure::new(
                Position::new("example.proto", 100, 5, 10),
                ID,
                r#"RPC name "rpcName" must be UpperCamelCase like "RpcName""#,
            )]
        );
    }

    #[test]
    fn test_snake_case() {
        let failures = apply(&proto_with_rpc(Some(rpc("RPC_name"))));
        assert_eq!(
            failures,
            vec![Failure::new(
                Position::new("example.proto", 100, 5, 10),
                ID,
                r#"RPC name "RPC_name" must be UpperCamelCase like "RPCName""#,
            )]
        );
    }

    #[test]
    fn test_metadata() {
        let rule = RpcNamesUpperCamelCase::new(true);
        assert_eq!(rule.id(), "RPC_NAMES_UPPER_CAMEL_CASE");
        assert!(rule.fix_mode());
        assert!(rule.is_fixable());
        assert!(rule.applies_to(NodeKind::Rpc));
        assert!(!rule.applies_to(NodeKind::Service));
        assert_eq!(rule.suggestion("get_http_url"), "GetHttpUrl");
    }
}
