//! Rule trait for defining lint rules.

use crate::error::LintError;
use crate::lexer::LexError;
use crate::source::SourceText;
use crate::tree::{Node, NodeKind, Proto};
use crate::types::{Edit, Failure, Severity};
use crate::visitor::Dispatcher;

/// A per-node style rule.
///
/// The dispatcher hands every node whose kind satisfies [`Rule::applies_to`]
/// to [`Rule::evaluate`]. Rules that can correct their own failures also
/// implement [`Rule::fix`], which is only consulted when the rule was built
/// in fix mode.
///
/// # Example
///
/// ```ignore
/// use proto_lint_core::{Failure, Node, NodeKind, Rule};
///
/// pub struct NoEmptyServices;
///
/// impl Rule for NoEmptyServices {
///     fn id(&self) -> &'static str { "NO_EMPTY_SERVICES" }
///
///     fn applies_to(&self, kind: NodeKind) -> bool { kind == NodeKind::Service }
///
///     fn evaluate(&self, node: Node<'_>) -> Vec<Failure> {
///         match node {
///             Node::Service(s) if s.body.is_empty() => vec![Failure::new(
///                 s.meta.pos.clone(),
///                 self.id(),
///                 format!("Service {:?} declares no RPCs", s.name),
///             )],
///             _ => vec![],
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the stable rule ID (e.g., `RPC_NAMES_UPPER_CAMEL_CASE`).
    fn id(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for failures from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this instance was built to produce fixes.
    fn fix_mode(&self) -> bool {
        false
    }

    /// Whether this rule implements [`Rule::fix`].
    fn is_fixable(&self) -> bool {
        false
    }

    /// Returns true if this rule wants to see nodes of `kind`.
    fn applies_to(&self, kind: NodeKind) -> bool;

    /// Checks a single node and returns any failures found.
    ///
    /// Must not depend on any node other than `node` and its own children.
    fn evaluate(&self, node: Node<'_>) -> Vec<Failure>;

    /// Produces an edit resolving `failure`, which this rule reported for `node`.
    ///
    /// `Ok(None)` means the failure cannot be fixed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the source text does not match the node.
    fn fix(
        &self,
        _source: &SourceText<'_>,
        _node: Node<'_>,
        _failure: &Failure,
    ) -> Result<Option<Edit>, RuleError> {
        Ok(None)
    }

    /// Runs this rule alone over a whole tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule panics while evaluating a node.
    fn apply(&self, proto: &Proto) -> Result<Vec<Failure>, LintError>
    where
        Self: Sized,
    {
        Dispatcher::from_rules(vec![self as &dyn Rule]).failures(proto)
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

impl std::fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.id()).finish()
    }
}

/// Errors a rule can hit while building a fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The token at the node position is not the expected one.
    #[error("expected `{expected}` at offset {offset}, found `{found}`")]
    UnexpectedToken {
        /// Expected token text.
        expected: String,
        /// Token text actually found.
        found: String,
        /// Offset of the found token.
        offset: usize,
    },

    /// The declared name was not found where the node says it is.
    #[error("identifier `{name}` not found in declaration at offset {offset}")]
    NameNotFound {
        /// Name that was looked for.
        name: String,
        /// Offset of the declaration.
        offset: usize,
    },

    /// The node position lies outside the source text.
    #[error("offset {offset} is not a valid position in the source text")]
    PositionOutOfRange {
        /// Offending offset.
        offset: usize,
    },

    /// The source ended inside the declaration.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// The source could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Meta, Position};
    use crate::registry::RegistryError;
    use crate::tree::{Service, Visitee};

    struct NoEmptyServices;

    impl Rule for NoEmptyServices {
        fn id(&self) -> &'static str {
            "NO_EMPTY_SERVICES"
        }

        fn applies_to(&self, kind: NodeKind) -> bool {
            kind == NodeKind::Service
        }

        fn evaluate(&self, node: Node<'_>) -> Vec<Failure> {
            match node {
                Node::Service(s) if s.body.is_empty() => vec![Failure::new(
                    s.meta.pos.clone(),
                    self.id(),
                    format!("Service {:?} declares no RPCs", s.name),
                )],
                _ => vec![],
            }
        }
    }

    #[test]
    fn test_rule_defaults() {
        let rule = NoEmptyServices;
        assert_eq!(rule.id(), "NO_EMPTY_SERVICES");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert!(!rule.fix_mode());
        assert!(!rule.is_fixable());
    }

    #[test]
    fn test_boxed_rules_debug_as_their_id() {
        let rules: Vec<RuleBox> = vec![Box::new(NoEmptyServices)];
        assert_eq!(format!("{rules:?}"), r#"[Rule("NO_EMPTY_SERVICES")]"#);

        let resolved: Result<Vec<RuleBox>, RegistryError> =
            Err(RegistryError::UnknownRule("NOPE".to_string()));
        assert_eq!(
            resolved.unwrap_err(),
            RegistryError::UnknownRule("NOPE".to_string())
        );
    }

    #[test]
    fn test_apply_walks_whole_tree() {
        let pos = Position::new("a.proto", 7, 2, 1);
        let proto = Proto::new(vec![Visitee::Service(Service {
            name: "Empty".to_string(),
            body: vec![],
            meta: Meta::at(pos.clone()),
        })]);

        let failures = NoEmptyServices.apply(&proto).unwrap();
        assert_eq!(
            failures,
            vec![Failure::new(
                pos,
                "NO_EMPTY_SERVICES",
                "Service \"Empty\" declares no RPCs"
            )]
        );
    }
}
