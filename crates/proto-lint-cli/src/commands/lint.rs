//! Lint command implementation.

use anyhow::{bail, Context, Result};
use glob::Pattern;
use proto_lint_core::{Config, LintResult, Linter, RuleBox, RuleRegistry};
use proto_lint_parser::ProtoParser;
use proto_lint_rules::{builtin_registry, Preset};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigLookup;
use crate::OutputFormat;

/// Flags of the lint command.
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Rewrite files in place.
    pub fix: bool,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule IDs overriding the configured rule set.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
}

/// Runs the lint command and returns the printed result.
pub fn run(paths: &[PathBuf], options: &LintOptions, config_path: Option<&Path>) -> Result<LintResult> {
    let project_dir = project_dir(paths);
    let loaded = ConfigLookup::new(&project_dir, config_path).load()?;
    match &loaded.path {
        Some(path) => tracing::debug!("Config from {} ({})", path.display(), loaded.origin),
        None => tracing::debug!("Config: {}", loaded.origin),
    }
    let config = loaded.config;

    let registry = builtin_registry().context("Failed to register built-in rules")?;
    let rules = select_rules(&registry, &config, options.rules.as_deref(), options.fix)?;
    let fixable: HashSet<&'static str> = rules
        .iter()
        .filter(|rule| rule.is_fixable())
        .map(|rule| rule.id())
        .collect();

    let mut exclude = config.lint.exclude.clone();
    exclude.extend(options.exclude.iter().cloned());
    let files = discover_files(paths, &exclude, config.lint.respect_gitignore)?;

    let linter = Linter::builder()
        .rules(rules)
        .fix_mode(options.fix)
        .config(config)
        .build();

    tracing::info!(
        "Linting {} files with {} rules{}",
        files.len(),
        linter.rule_count(),
        if options.fix { " (fix mode)" } else { "" }
    );

    let result = linter.lint_paths(&files, &ProtoParser);
    super::output::print(&result, options.format, &fixable, options.fix)?;
    Ok(result)
}

/// Directory searched for a project config: the first path argument, or
/// its parent when it is a file.
fn project_dir(paths: &[PathBuf]) -> PathBuf {
    match paths.first() {
        Some(path) if path.is_file() => path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        Some(path) => path.clone(),
        None => PathBuf::from("."),
    }
}

/// Picks the rules to run.
///
/// An explicit `--rules` list wins. Otherwise the configured preset
/// (default: [`Preset::Default`]) is adjusted by per-rule `enabled` flags.
fn select_rules(
    registry: &RuleRegistry,
    config: &Config,
    filter: Option<&str>,
    fix_mode: bool,
) -> Result<Vec<RuleBox>> {
    if let Some(filter) = filter {
        let ids: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect();
        return registry
            .resolve(&ids, fix_mode)
            .context("Invalid --rules selection");
    }

    let preset = match config.preset.as_deref() {
        None => Preset::default(),
        Some(name) => match Preset::from_name(name) {
            Some(preset) => preset,
            None => bail!("Unknown preset {name:?} (expected default, all, or minimal)"),
        },
    };

    for id in config.rules.keys() {
        if !registry.contains(id) {
            tracing::warn!("Configuration mentions unknown rule {}", id);
        }
    }

    let preset_ids = preset.ids();
    registry
        .resolve_with(
            |id| config.is_rule_enabled(id, preset_ids.iter().any(|p| *p == id)),
            fix_mode,
        )
        .context("Failed to build rules")
}

/// Expands `paths` into the `.proto` files to lint, sorted.
///
/// Directories are walked with `.gitignore` support. Files named
/// explicitly are linted whatever their extension, unless excluded.
fn discover_files(
    paths: &[PathBuf],
    exclude: &[String],
    respect_gitignore: bool,
) -> Result<Vec<PathBuf>> {
    let patterns = exclude
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern: {p}")))
        .collect::<Result<Vec<_>>>()?;
    let excluded = |root: &Path, path: &Path| {
        let relative = path.strip_prefix(root).unwrap_or(path);
        patterns
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
    };

    let mut files = Vec::new();
    for root in paths {
        if root.is_file() {
            if !excluded(Path::new(""), root) {
                files.push(root.clone());
            }
            continue;
        }
        if !root.exists() {
            bail!("Path does not exist: {}", root.display());
        }

        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(false)
            .git_ignore(respect_gitignore)
            .git_exclude(respect_gitignore)
            .parents(respect_gitignore);

        for entry in builder.build() {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            let path = entry.path();
            let is_proto = path.extension().is_some_and(|ext| ext == "proto");
            if path.is_file() && is_proto && !excluded(root, path) {
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!("Discovered {} files", files.len());
    Ok(files)
}
