//! Registry of rule factories keyed by rule ID.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::rule::RuleBox;

/// Builds a fresh rule instance; the argument is the fix-mode flag.
pub type RuleFactory = Arc<dyn Fn(bool) -> RuleBox + Send + Sync>;

/// Errors raised while registering or resolving rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The same ID was registered twice.
    #[error("rule {0} is already registered")]
    DuplicateRule(String),

    /// An enabled ID was never registered.
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// A factory built a rule reporting a different ID than it was registered under.
    #[error("rule registered as {registered} reports id {reported}")]
    IdMismatch {
        /// ID used at registration.
        registered: String,
        /// ID returned by the built rule.
        reported: String,
    },
}

struct Entry {
    id: String,
    factory: RuleFactory,
}

/// Ordered mapping from rule ID to rule factory.
///
/// Resolution always yields rules in registration order, regardless of the
/// order IDs are requested in.
#[derive(Default)]
pub struct RuleRegistry {
    entries: Vec<Entry>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRule`] if `id` is taken.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(bool) -> RuleBox + Send + Sync + 'static,
    {
        let id = id.into();
        if self.contains(&id) {
            return Err(RegistryError::DuplicateRule(id));
        }
        self.entries.push(Entry {
            id,
            factory: Arc::new(factory),
        });
        Ok(())
    }

    /// Returns true if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Registered IDs in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds one instance of every rule in `enabled`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownRule`] for the first ID that was never
    /// registered, or [`RegistryError::IdMismatch`] if a factory misbehaves.
    pub fn resolve(&self, enabled: &[&str], fix_mode: bool) -> Result<Vec<RuleBox>, RegistryError> {
        if let Some(unknown) = enabled.iter().find(|id| !self.contains(id)) {
            return Err(RegistryError::UnknownRule((*unknown).to_string()));
        }
        let wanted: HashSet<&str> = enabled.iter().copied().collect();
        self.resolve_with(|id| wanted.contains(id), fix_mode)
    }

    /// Builds one instance of every registered rule accepted by `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdMismatch`] if a factory builds a rule with
    /// the wrong ID.
    pub fn resolve_with<P>(&self, predicate: P, fix_mode: bool) -> Result<Vec<RuleBox>, RegistryError>
    where
        P: Fn(&str) -> bool,
    {
        self.entries
            .iter()
            .filter(|e| predicate(&e.id))
            .map(|e| {
                let rule = (e.factory)(fix_mode);
                if rule.id() == e.id {
                    Ok(rule)
                } else {
                    Err(RegistryError::IdMismatch {
                        registered: e.id.clone(),
                        reported: rule.id().to_string(),
                    })
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use crate::tree::{Node, NodeKind};
    use crate::types::Failure;

    struct Named {
        id: &'static str,
        fix: bool,
    }

    impl Rule for Named {
        fn id(&self) -> &'static str {
            self.id
        }
        fn fix_mode(&self) -> bool {
            self.fix
        }
        fn applies_to(&self, _kind: NodeKind) -> bool {
            false
        }
        fn evaluate(&self, _node: Node<'_>) -> Vec<Failure> {
            Vec::new()
        }
    }

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        for id in ["A", "B", "C"] {
            registry
                .register(id, move |fix| Box::new(Named { id, fix }) as RuleBox)
                .unwrap();
        }
        registry
    }

    #[test]
    fn resolves_in_registration_order() {
        let rules = registry().resolve(&["C", "A"], false).unwrap();
        let ids: Vec<_> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn passes_fix_mode_to_factories() {
        let rules = registry().resolve(&["B"], true).unwrap();
        assert!(rules[0].fix_mode());
    }

    #[test]
    fn rejects_unknown_ids() {
        let err = registry().resolve(&["A", "NOPE"], false).unwrap_err();
        assert_eq!(err, RegistryError::UnknownRule("NOPE".to_string()));
    }

    #[test]
    fn rejects_duplicate_registration() {
        let mut registry = registry();
        let err = registry
            .register("A", |fix| Box::new(Named { id: "A", fix }) as RuleBox)
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateRule("A".to_string()));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn detects_id_mismatch() {
        let mut registry = RuleRegistry::new();
        registry
            .register("X", |fix| Box::new(Named { id: "Y", fix }) as RuleBox)
            .unwrap();
        let err = registry.resolve(&["X"], false).unwrap_err();
        assert!(matches!(err, RegistryError::IdMismatch { .. }));
    }

    #[test]
    fn resolve_with_predicate() {
        let rules = registry().resolve_with(|id| id != "B", false).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(format!("{:?}", registry()), r#"["A", "B", "C"]"#);
    }
}
