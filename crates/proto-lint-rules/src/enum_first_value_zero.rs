//! Rule requiring the first value of every enum to be zero.
//!
//! proto3 uses the first enum value as the default, and it must be `0`.
//! The check is kept for proto2 files too so enums stay portable. This
//! rule only reports: choosing which value becomes the zero value is a
//! schema decision, not a style fix.

use proto_lint_core::{Failure, Node, NodeKind, Rule};

/// Rule ID for enum-first-value-zero.
pub const ID: &str = "ENUM_FIRST_VALUE_ZERO";

/// Verifies that the first value of each enum is numbered zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumFirstValueZero {
    fix_mode: bool,
}

impl EnumFirstValueZero {
    /// Creates the rule. The flag is recorded but never yields fixes.
    #[must_use]
    pub fn new(fix_mode: bool) -> Self {
        Self { fix_mode }
    }
}

impl Rule for EnumFirstValueZero {
    fn id(&self) -> &'static str {
        ID
    }

    fn description(&self) -> &'static str {
        "Verifies that the zero value enum should be the first element."
    }

    fn fix_mode(&self) -> bool {
        self.fix_mode
    }

    fn applies_to(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Enum
    }

    fn evaluate(&self, node: Node<'_>) -> Vec<Failure> {
        let Node::Enum(e) = node else {
            return Vec::new();
        };
        match e.values().next() {
            Some(first) if !is_zero(&first.number) => vec![Failure::new(
                first.meta.pos.clone(),
                ID,
                format!(
                    "The first enum value must be zero, but \"{}\" is {}",
                    first.name, first.number
                ),
            )],
            _ => Vec::new(),
        }
    }
}

/// Returns true for any spelling of zero: `0`, `-0`, `00`, `0x0`.
fn is_zero(number: &str) -> bool {
    let digits = number.trim_start_matches(['-', '+']);
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    !digits.is_empty() && digits.bytes().all(|b| b == b'0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_lint_core::tree::{Enum, EnumValue, OptionStatement, Visitee};
    use proto_lint_core::{Meta, Position, Proto};

    fn value(name: &str, number: &str, offset: usize) -> Visitee {
        Visitee::EnumValue(EnumValue {
            name: name.to_string(),
            number: number.to_string(),
            meta: Meta::at(Position::new("e.proto", offset, 2, 3)),
            ..EnumValue::default()
        })
    }

    fn enumeration(body: Vec<Visitee>) -> Proto {
        Proto::new(vec![Visitee::Enum(Enum {
            name: "Corpus".to_string(),
            body,
            ..Enum::default()
        })])
    }

    #[test]
    fn test_zero_first_passes() {
        let proto = enumeration(vec![
            Visitee::Option(OptionStatement {
                name: "allow_alias".to_string(),
                constant: "true".to_string(),
                ..OptionStatement::default()
            }),
            value("CORPUS_UNSPECIFIED", "0", 40),
            value("CORPUS_WEB", "1", 70),
        ]);
        assert!(EnumFirstValueZero::new(false).apply(&proto).unwrap().is_empty());
    }

    #[test]
    fn test_nonzero_first_fails_at_value() {
        let proto = enumeration(vec![value("CORPUS_WEB", "1", 40), value("CORPUS_UNSPECIFIED", "0", 70)]);
        let failures = EnumFirstValueZero::new(false).apply(&proto).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].position.offset, 40);
        assert_eq!(
            failures[0].message,
            r#"The first enum value must be zero, but "CORPUS_WEB" is 1"#
        );
    }

    #[test]
    fn test_empty_enum_passes() {
        assert!(EnumFirstValueZero::new(false)
            .apply(&enumeration(Vec::new()))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_is_zero() {
        for zero in ["0", "-0", "00", "0x0", "0X00"] {
            assert!(is_zero(zero), "{zero}");
        }
        for nonzero in ["1", "-1", "0x10", "010", ""] {
            assert!(!is_zero(nonzero), "{nonzero}");
        }
    }

    #[test]
    fn test_check_only() {
        let rule = EnumFirstValueZero::new(true);
        assert!(rule.fix_mode());
        assert!(!rule.is_fixable());
    }
}
