//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // proto-lint: allow(RPC_NAMES_UPPER_CAMEL_CASE) reason="generated by a legacy tool"
//! ```
//!
//! A directive applies to its own line and to the line after it.

use std::collections::HashSet;

use crate::types::Failure;

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule IDs that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Line-indexed view of the directives in one file.
#[derive(Debug, Clone, Default)]
pub struct Allowances {
    lines: Vec<Option<AllowDirective>>,
}

impl Allowances {
    /// Scans `content` for directives.
    #[must_use]
    pub fn scan(content: &str) -> Self {
        Self {
            lines: content.lines().map(parse_allow_directive).collect(),
        }
    }

    /// Returns true if no directive was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(Option::is_none)
    }

    /// Checks whether `rule_id` is allowed at `line` (1-indexed).
    #[must_use]
    pub fn check(&self, line: usize, rule_id: &str) -> AllowCheck {
        for check_line in [line.saturating_sub(1), line] {
            if check_line == 0 {
                continue;
            }
            let Some(Some(directive)) = self.lines.get(check_line - 1) else {
                continue;
            };
            if directive.rules.contains(rule_id) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason.clone(),
                };
            }
        }
        AllowCheck::Denied
    }

    /// Returns true if `failure` is suppressed by a directive.
    #[must_use]
    pub fn allows(&self, failure: &Failure) -> bool {
        self.check(failure.position.line, &failure.rule_id)
            .is_allowed()
    }
}

/// Checks source code for an allowance comment covering `line`.
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number to check (1-indexed)
/// * `rule_id` - ID of the rule to check for
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_id: &str) -> AllowCheck {
    Allowances::scan(content).check(line, rule_id)
}

/// Parses an allowance directive from a comment line.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let line = line.trim();

    // The directive may trail a declaration on the same line.
    let comment_start = line.find("//")?;
    let comment_content = line[comment_start + 2..].trim();

    let directive = comment_content.strip_prefix("proto-lint:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules_str = &allow_content[..paren_end];

    let rules: HashSet<String> = rules_str
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest.strip_prefix("reason=").and_then(|reason_part| {
        let reason_part = reason_part.trim();
        let inner = reason_part.strip_prefix('"')?;
        let end = inner.find('"')?;
        Some(inner[..end].to_string())
    });

    Some(AllowDirective { rules, reason })
}
