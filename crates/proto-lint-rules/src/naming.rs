//! Shared implementation of the identifier casing rules.
//!
//! Each naming rule is a [`NamingPolicy`]: which node kinds it inspects,
//! the casing it enforces, and where the identifier sits in the
//! declaration. The check and the fix both derive the suggested name from
//! [`Casing::convert`], so the name quoted in a failure message is the name
//! a fix writes.

use proto_lint_core::utils::Casing;
use proto_lint_core::{Edit, Failure, NameToken, Node, NodeKind, RuleError, SourceText};
use tracing::debug;

/// Static description of one naming rule.
#[derive(Debug)]
pub(crate) struct NamingPolicy {
    pub(crate) id: &'static str,
    pub(crate) description: &'static str,
    pub(crate) kinds: &'static [NodeKind],
    /// Word used for the declaration in failure messages (`RPC`, `Field`).
    pub(crate) label: &'static str,
    pub(crate) casing: Casing,
    pub(crate) name_token: NameToken,
}

/// A naming rule instance.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NamingRule {
    policy: &'static NamingPolicy,
    fix_mode: bool,
}

impl NamingRule {
    pub(crate) const fn new(policy: &'static NamingPolicy, fix_mode: bool) -> Self {
        Self { policy, fix_mode }
    }

    pub(crate) fn id(&self) -> &'static str {
        self.policy.id
    }

    pub(crate) fn description(&self) -> &'static str {
        self.policy.description
    }

    pub(crate) fn fix_mode(&self) -> bool {
        self.fix_mode
    }

    pub(crate) fn applies_to(&self, kind: NodeKind) -> bool {
        self.policy.kinds.contains(&kind)
    }

    /// Name this rule would write instead of `name`.
    pub(crate) fn suggestion(&self, name: &str) -> String {
        self.policy.casing.convert(name)
    }

    pub(crate) fn evaluate(&self, node: Node<'_>) -> Vec<Failure> {
        let Some(name) = node.name() else {
            return Vec::new();
        };
        if !self.applies_to(node.kind()) || self.policy.casing.matches(name) {
            return Vec::new();
        }

        vec![Failure::new(
            node.meta().pos.clone(),
            self.policy.id,
            format!(
                "{} name \"{}\" must be {} like \"{}\"",
                self.policy.label,
                name,
                self.policy.casing.description(),
                self.suggestion(name)
            ),
        )]
    }

    pub(crate) fn fix(
        &self,
        source: &SourceText<'_>,
        node: Node<'_>,
    ) -> Result<Option<Edit>, RuleError> {
        let Some(name) = node.name() else {
            return Ok(None);
        };
        let suggestion = self.suggestion(name);
        // Names with no usable words (`_`, `__`) have nothing to rename to.
        if suggestion == name || !self.policy.casing.matches(&suggestion) {
            debug!("{}: no usable suggestion for {:?}", self.policy.id, name);
            return Ok(None);
        }

        let range = source.locate_name(&node.meta().pos, name, self.policy.name_token)?;
        Ok(Some(Edit::replace(self.policy.id, range, suggestion)))
    }
}

/// Declares a public rule type backed by a [`NamingPolicy`].
macro_rules! naming_rule {
    ($(#[$meta:meta])* $vis:vis struct $name:ident($policy:path);) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $name($crate::naming::NamingRule);

        impl $name {
            /// Creates the rule. Fixes are only produced when `fix_mode` is set.
            #[must_use]
            pub fn new(fix_mode: bool) -> Self {
                Self($crate::naming::NamingRule::new(&$policy, fix_mode))
            }

            /// Returns the name a fix would write instead of `name`.
            #[must_use]
            pub fn suggestion(&self, name: &str) -> String {
                self.0.suggestion(name)
            }
        }

        impl ::proto_lint_core::Rule for $name {
            fn id(&self) -> &'static str {
                self.0.id()
            }

            fn description(&self) -> &'static str {
                self.0.description()
            }

            fn fix_mode(&self) -> bool {
                self.0.fix_mode()
            }

            fn is_fixable(&self) -> bool {
                true
            }

            fn applies_to(&self, kind: ::proto_lint_core::NodeKind) -> bool {
                self.0.applies_to(kind)
            }

            fn evaluate(
                &self,
                node: ::proto_lint_core::Node<'_>,
            ) -> Vec<::proto_lint_core::Failure> {
                self.0.evaluate(node)
            }

            fn fix(
                &self,
                source: &::proto_lint_core::SourceText<'_>,
                node: ::proto_lint_core::Node<'_>,
                _failure: &::proto_lint_core::Failure,
            ) -> Result<Option<::proto_lint_core::Edit>, ::proto_lint_core::RuleError> {
                self.0.fix(source, node)
            }
        }
    };
}

pub(crate) use naming_rule;

#[cfg(test)]
mod tests {
    use super::*;
    use proto_lint_core::tree::Message;
    use proto_lint_core::{Meta, Position};

    static MESSAGES: NamingPolicy = NamingPolicy {
        id: "TEST_MESSAGES",
        description: "",
        kinds: &[NodeKind::Message],
        label: "Message",
        casing: Casing::UpperCamel,
        name_token: NameToken::AfterKeyword("message"),
    };

    fn message(name: &str, offset: usize) -> Message {
        Message {
            name: name.to_string(),
            meta: Meta::at(Position::new("m.proto", offset, 1, offset + 1)),
            ..Message::default()
        }
    }

    #[test]
    fn message_and_fix_agree() {
        let source = "message song_server {}";
        let node = message("song_server", 0);
        let rule = NamingRule::new(&MESSAGES, true);

        let failures = rule.evaluate(Node::Message(&node));
        assert_eq!(
            failures[0].message,
            r#"Message name "song_server" must be UpperCamelCase like "SongServer""#
        );

        let edit = rule
            .fix(&SourceText::new("m.proto", source), Node::Message(&node))
            .unwrap()
            .unwrap();
        assert_eq!(edit.range(), 8..19);
        assert_eq!(edit.replacement, "SongServer");
        assert!(failures[0].message.contains(&format!("\"{}\"", edit.replacement)));
    }

    #[test]
    fn unusable_suggestion_is_not_fixed() {
        let node = message("_", 0);
        let rule = NamingRule::new(&MESSAGES, true);
        assert_eq!(rule.evaluate(Node::Message(&node)).len(), 1);
        let edit = rule
            .fix(&SourceText::new("m.proto", "message _ {}"), Node::Message(&node))
            .unwrap();
        assert!(edit.is_none());
    }

    #[test]
    fn mismatched_source_is_an_error() {
        let node = message("song_server", 0);
        let rule = NamingRule::new(&MESSAGES, true);
        let err = rule
            .fix(&SourceText::new("m.proto", "enum song_server {}"), Node::Message(&node))
            .unwrap_err();
        assert!(matches!(err, RuleError::UnexpectedToken { .. }));
    }
}
