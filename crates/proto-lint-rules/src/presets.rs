//! Rule presets and the built-in registry.

use proto_lint_core::{RegistryError, RuleBox, RuleRegistry};

use crate::{
    enum_field_names, enum_first_value_zero, enum_names, field_names, message_names,
    package_name, rpc_names, service_names, EnumFieldNamesUpperSnakeCase, EnumFirstValueZero,
    EnumNamesUpperCamelCase, FieldNamesLowerSnakeCase, MessageNamesUpperCamelCase,
    PackageNameLowerCase, RpcNamesUpperCamelCase, ServiceNamesUpperCamelCase,
};

type Constructor = fn(bool) -> RuleBox;

/// Every built-in rule in registration order.
const BUILTIN: &[(&str, Constructor)] = &[
    (service_names::ID, service_names_rule),
    (rpc_names::ID, rpc_names_rule),
    (message_names::ID, message_names_rule),
    (field_names::ID, field_names_rule),
    (enum_names::ID, enum_names_rule),
    (enum_field_names::ID, enum_field_names_rule),
    (package_name::ID, package_name_rule),
    (enum_first_value_zero::ID, enum_first_value_zero_rule),
];

fn service_names_rule(fix_mode: bool) -> RuleBox {
    Box::new(ServiceNamesUpperCamelCase::new(fix_mode))
}

fn rpc_names_rule(fix_mode: bool) -> RuleBox {
    Box::new(RpcNamesUpperCamelCase::new(fix_mode))
}

fn message_names_rule(fix_mode: bool) -> RuleBox {
    Box::new(MessageNamesUpperCamelCase::new(fix_mode))
}

fn field_names_rule(fix_mode: bool) -> RuleBox {
    Box::new(FieldNamesLowerSnakeCase::new(fix_mode))
}

fn enum_names_rule(fix_mode: bool) -> RuleBox {
    Box::new(EnumNamesUpperCamelCase::new(fix_mode))
}

fn enum_field_names_rule(fix_mode: bool) -> RuleBox {
    Box::new(EnumFieldNamesUpperSnakeCase::new(fix_mode))
}

fn package_name_rule(fix_mode: bool) -> RuleBox {
    Box::new(PackageNameLowerCase::new(fix_mode))
}

fn enum_first_value_zero_rule(fix_mode: bool) -> RuleBox {
    Box::new(EnumFirstValueZero::new(fix_mode))
}

/// Preset configurations for proto-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every naming rule.
    #[default]
    Default,
    /// Every built-in rule, including check-only ones.
    All,
    /// RPC naming only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Parses a preset name as written in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "all" => Some(Self::All),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the configuration name of this preset.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::All => "all",
            Self::Minimal => "minimal",
        }
    }

    /// Returns the rule IDs enabled by this preset, in registration order.
    #[must_use]
    pub fn ids(self) -> Vec<&'static str> {
        match self {
            Self::Default => default_rule_ids(),
            Self::All => all_rule_ids(),
            Self::Minimal => vec![rpc_names::ID],
        }
    }

    /// Returns fresh instances of the rules for this preset.
    #[must_use]
    pub fn rules(self, fix_mode: bool) -> Vec<RuleBox> {
        let ids = self.ids();
        BUILTIN
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(_, build)| build(fix_mode))
            .collect()
    }
}

/// Returns the IDs of the default rules.
///
/// Includes every naming rule:
/// - `SERVICE_NAMES_UPPER_CAMEL_CASE`
/// - `RPC_NAMES_UPPER_CAMEL_CASE`
/// - `MESSAGE_NAMES_UPPER_CAMEL_CASE`
/// - `FIELD_NAMES_LOWER_SNAKE_CASE`
/// - `ENUM_NAMES_UPPER_CAMEL_CASE`
/// - `ENUM_FIELD_NAMES_UPPER_SNAKE_CASE`
/// - `PACKAGE_NAME_LOWER_CASE`
#[must_use]
pub fn default_rule_ids() -> Vec<&'static str> {
    BUILTIN
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| *id != enum_first_value_zero::ID)
        .collect()
}

/// Returns the IDs of all built-in rules.
#[must_use]
pub fn all_rule_ids() -> Vec<&'static str> {
    BUILTIN.iter().map(|(id, _)| *id).collect()
}

/// Builds a registry holding every built-in rule.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateRule`] if two built-in rules share an ID.
pub fn builtin_registry() -> Result<RuleRegistry, RegistryError> {
    let mut registry = RuleRegistry::new();
    for &(id, build) in BUILTIN {
        registry.register(id, build)?;
    }
    Ok(registry)
}
