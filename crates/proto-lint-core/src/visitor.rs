//! Tree traversal and rule dispatch.
//!
//! A rule that panics is caught with `catch_unwind` and reported as
//! [`LintError::RuleFault`]. The process panic hook is left alone, so the
//! default hook still prints the panic message to stderr before the fault
//! is returned.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::error::LintError;
use crate::rule::{Rule, RuleBox};
use crate::tree::{Node, Proto};
use crate::types::Failure;

/// Visits every node of `proto` in document order.
///
/// Pre-order: the root first, each declaration before its children, and
/// children in source order. Options declared inside an RPC body are
/// visited as children of that RPC.
pub fn walk<'a, F>(proto: &'a Proto, f: &mut F)
where
    F: FnMut(Node<'a>),
{
    walk_node(Node::Proto(proto), f);
}

fn walk_node<'a, F>(node: Node<'a>, f: &mut F)
where
    F: FnMut(Node<'a>),
{
    f(node);
    if let Node::Rpc(rpc) = node {
        for option in &rpc.options {
            walk_node(Node::Option(option), f);
        }
    }
    for child in node.children() {
        walk_node(Node::from(child), f);
    }
}

/// A failure together with the node and rule that produced it.
#[derive(Debug, Clone)]
pub struct Finding<'a> {
    /// Node the failure was reported for.
    pub node: Node<'a>,
    /// Index of the rule in the dispatcher's rule list.
    pub rule_index: usize,
    /// The failure itself.
    pub failure: Failure,
}

/// Hands each node of a tree to every interested rule.
///
/// The dispatcher holds no state between calls; the same instance can be
/// used for any number of trees.
pub struct Dispatcher<'r> {
    rules: Vec<&'r dyn Rule>,
}

impl<'r> Dispatcher<'r> {
    /// Creates a dispatcher over boxed rules, preserving their order.
    #[must_use]
    pub fn new(rules: &'r [RuleBox]) -> Self {
        Self {
            rules: rules.iter().map(|rule| &**rule).collect(),
        }
    }

    /// Creates a dispatcher over borrowed rules, preserving their order.
    #[must_use]
    pub fn from_rules(rules: Vec<&'r dyn Rule>) -> Self {
        Self { rules }
    }

    /// Returns the rules in dispatch order.
    #[must_use]
    pub fn rules(&self) -> &[&'r dyn Rule] {
        &self.rules
    }

    /// Evaluates every rule against every node it applies to.
    ///
    /// Findings are in document order; for one node, in rule order.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::RuleFault`] if a rule panics.
    pub fn dispatch<'a>(&self, proto: &'a Proto) -> Result<Vec<Finding<'a>>, LintError> {
        let mut findings = Vec::new();
        let mut fault = None;

        walk(proto, &mut |node| {
            if fault.is_some() {
                return;
            }
            for (rule_index, rule) in self.rules.iter().enumerate() {
                if !rule.applies_to(node.kind()) {
                    continue;
                }
                match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(node))) {
                    Ok(failures) => {
                        if !failures.is_empty() {
                            debug!(
                                "{} reported {} failure(s) on {}",
                                rule.id(),
                                failures.len(),
                                node.kind()
                            );
                        }
                        findings.extend(failures.into_iter().map(|failure| Finding {
                            node,
                            rule_index,
                            failure,
                        }));
                    }
                    Err(payload) => {
                        fault = Some(LintError::RuleFault {
                            rule_id: rule.id().to_string(),
                            message: panic_message(payload.as_ref()),
                        });
                        return;
                    }
                }
            }
        });

        match fault {
            Some(err) => Err(err),
            None => Ok(findings),
        }
    }

    /// Evaluates the tree and returns only the failures.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::RuleFault`] if a rule panics.
    pub fn failures(&self, proto: &Proto) -> Result<Vec<Failure>, LintError> {
        Ok(self
            .dispatch(proto)?
            .into_iter()
            .map(|finding| finding.failure)
            .collect())
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}
