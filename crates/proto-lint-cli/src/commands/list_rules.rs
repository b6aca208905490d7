//! List rules command implementation.

use proto_lint_rules::{default_rule_ids, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<36} {:<8} Description", "ID", "Fix");
    println!("{}", "-".repeat(100));

    let defaults = default_rule_ids();
    for rule in Preset::All.rules(false) {
        let marker = if defaults.contains(&rule.id()) { "" } else { " (opt-in)" };
        println!(
            "{:<36} {:<8} {}{}",
            rule.id(),
            if rule.is_fixable() { "yes" } else { "no" },
            rule.description(),
            marker
        );
    }

    println!("\nPresets:");
    for preset in [Preset::Default, Preset::All, Preset::Minimal] {
        println!("  {:<9} - {}", preset.name(), preset.ids().join(", "));
    }

    println!("\nUse --rules to run specific rules, e.g.:");
    println!("  proto-lint lint --rules RPC_NAMES_UPPER_CAMEL_CASE,FIELD_NAMES_LOWER_SNAKE_CASE");
    println!("  proto-lint lint --fix api/");
}
