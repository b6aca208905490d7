//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r#"# proto-lint configuration

# Rule set to start from: "default" (naming rules), "all", or "minimal"
preset = "default"

[lint]
# Glob patterns to exclude from linting
exclude = [
    "**/third_party/**",
    "**/vendor/**",
]

# Respect .gitignore files
respect_gitignore = true

# Honor `// proto-lint: allow(RULE_ID) reason="..."` comments
respect_allow_comments = true

# Number of files linted at once (default: one per CPU)
# parallelism = 4

# Rule configurations, keyed by rule ID.
# Each rule can be enabled/disabled and have its severity overridden.

[rules.ENUM_FIRST_VALUE_ZERO]
enabled = true
severity = "warning"

# [rules.PACKAGE_NAME_LOWER_CASE]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(PROJECT_CONFIG_NAMES[0]);
    write_config(config_path, force)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to configure rules", config_path.display());
    println!("  2. Run: proto-lint lint");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_lint_core::{Config, Severity};
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("default"));
        assert!(config.lint.respect_allow_comments);
        assert_eq!(config.lint.exclude.len(), 2);
        assert!(config.is_rule_enabled("ENUM_FIRST_VALUE_ZERO", false));
        assert_eq!(
            config.rule_severity("ENUM_FIRST_VALUE_ZERO"),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("proto-lint.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
