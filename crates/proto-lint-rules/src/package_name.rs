//! Rule requiring package names without uppercase letters.
//!
//! # Rationale
//!
//! Package names become directory paths and namespaces in generated code.
//! Mixed case breaks on case-insensitive filesystems and reads differently
//! per language, so packages are kept entirely lowercase.
//!
//! # Fix
//!
//! Lowercases each part of the dotted name in place: `package Foo.Bar;`
//! becomes `package foo.bar;`. Dots, underscores, and any whitespace or
//! comments between the parts are left as they are.

use proto_lint_core::{Edit, Failure, Node, NodeKind, Rule, RuleError, SourceText};

/// Rule ID for package-name-lower-case.
pub const ID: &str = "PACKAGE_NAME_LOWER_CASE";

/// Verifies that the package name contains no uppercase letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageNameLowerCase {
    fix_mode: bool,
}

impl PackageNameLowerCase {
    /// Creates the rule. Fixes are only produced when `fix_mode` is set.
    #[must_use]
    pub fn new(fix_mode: bool) -> Self {
        Self { fix_mode }
    }

    /// Returns the package name a fix would write.
    #[must_use]
    pub fn suggestion(&self, name: &str) -> String {
        name.to_ascii_lowercase()
    }
}

impl Rule for PackageNameLowerCase {
    fn id(&self) -> &'static str {
        ID
    }

    fn description(&self) -> &'static str {
        "Verifies that the package name doesn't contain any uppercase letters."
    }

    fn fix_mode(&self) -> bool {
        self.fix_mode
    }

    fn is_fixable(&self) -> bool {
        true
    }

    fn applies_to(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Package
    }

    fn evaluate(&self, node: Node<'_>) -> Vec<Failure> {
        let Node::Package(package) = node else {
            return Vec::new();
        };
        if !package.name.chars().any(|c| c.is_ascii_uppercase()) {
            return Vec::new();
        }

        vec![Failure::new(
            package.meta.pos.clone(),
            ID,
            format!(
                "Package name \"{}\" must not contain any uppercase letter. Consider to change like \"{}\".",
                package.name,
                self.suggestion(&package.name)
            ),
        )]
    }

    fn fix(
        &self,
        source: &SourceText<'_>,
        node: Node<'_>,
        _failure: &Failure,
    ) -> Result<Option<Edit>, RuleError> {
        let Node::Package(package) = node else {
            return Ok(None);
        };
        let name = source.locate_dotted_name(&package.meta.pos, "package", &package.name)?;
        let replacement = source.rewrite_dotted_name(&name, |part| self.suggestion(part))?;
        Ok(Some(Edit::replace(ID, name.span, replacement)))
    }
}
