//! Per-file lint pipeline: check, fix, re-verify, write.
//!
//! Panics in [`Rule::fix`] are caught like those in evaluation (see
//! [`crate::visitor`]) and become [`LintError::RuleFault`]; the default
//! panic hook still prints them to stderr.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::LintError;
use crate::fixer::{apply_edits, FixStage};
use crate::parse::SchemaParser;
use crate::rule::{Rule, RuleBox};
use crate::source::SourceText;
use crate::tree::Proto;
use crate::types::{Edit, Failure, FileError, FileReport, LintResult};
use crate::utils::allowance::Allowances;
use crate::visitor::{panic_message, Dispatcher, Finding};

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    rules: Vec<RuleBox>,
    fix_mode: bool,
    config: Option<Config>,
    parallelism: Option<usize>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the linter.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the linter.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Rewrites files instead of only reporting (default: false).
    #[must_use]
    pub fn fix_mode(mut self, fix: bool) -> Self {
        self.fix_mode = fix;
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Limits the number of files linted at once.
    #[must_use]
    pub fn parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Builds the linter.
    #[must_use]
    pub fn build(self) -> Linter {
        let config = self.config.unwrap_or_default();
        let parallelism = self.parallelism.or(config.lint.parallelism);
        Linter {
            rules: self.rules,
            fix_mode: self.fix_mode,
            config,
            parallelism,
        }
    }
}

/// Result of fixing one file in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Text after all edits were applied.
    pub text: String,
    /// Failures that remain in `text`.
    pub failures: Vec<Failure>,
    /// Number of distinct edits applied.
    pub edits_applied: usize,
}

impl FixOutcome {
    /// Returns true if any edit was applied.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.edits_applied > 0
    }
}

/// Runs an ordered rule set over schema files.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    rules: Vec<RuleBox>,
    fix_mode: bool,
    config: Config,
    parallelism: Option<usize>,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the linter rewrites files.
    #[must_use]
    pub fn is_fix_mode(&self) -> bool {
        self.fix_mode
    }

    /// Checks a parsed tree and returns every failure in document order.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::RuleFault`] if a rule panics.
    pub fn apply(&self, proto: &Proto) -> Result<Vec<Failure>, LintError> {
        let failures = Dispatcher::new(&self.rules).failures(proto)?;
        Ok(self.apply_severity_overrides(failures))
    }

    /// Fixes `source`, the text `proto` was parsed from, without touching disk.
    ///
    /// Every edit is computed against the original text and applied in one
    /// pass. The result is parsed again and each rule that contributed an
    /// edit must agree that its fixed failures are gone.
    ///
    /// # Errors
    ///
    /// - [`LintError::RuleFault`] if a rule panics or cannot build its edit
    /// - [`LintError::EditConflict`] if two edits overlap
    /// - [`LintError::FixReparse`] if the rewritten text does not parse
    /// - [`LintError::FixVerification`] if a fix left its own failure behind
    pub fn fix(
        &self,
        proto: &Proto,
        source: &str,
        parser: &dyn SchemaParser,
    ) -> Result<FixOutcome, LintError> {
        let filename = proto.filename.as_str();
        debug!("{}: {}", filename, FixStage::Parsed);

        let dispatcher = Dispatcher::new(&self.rules);
        let allowances = self.allowances(source);
        let findings: Vec<Finding<'_>> = dispatcher
            .dispatch(proto)?
            .into_iter()
            .filter(|finding| !allowances.allows(&finding.failure))
            .collect();
        debug!("{}: {} ({} failures)", filename, FixStage::Evaluated, findings.len());

        let text = SourceText::new(filename, source);
        let mut edits = Vec::new();
        let mut fixed = vec![false; findings.len()];
        for (index, finding) in findings.iter().enumerate() {
            let rule = dispatcher.rules()[finding.rule_index];
            if !(rule.fix_mode() && rule.is_fixable()) {
                continue;
            }
            if let Some(edit) = compute_edit(rule, &text, finding)? {
                fixed[index] = true;
                edits.push(edit);
            }
        }
        let edits_applied = edits.iter().collect::<HashSet<&Edit>>().len();
        debug!("{}: {} ({} edits)", filename, FixStage::EditsComputed, edits_applied);

        let failures: Vec<Failure> = findings.iter().map(|f| f.failure.clone()).collect();
        if edits.is_empty() {
            return Ok(FixOutcome {
                text: source.to_string(),
                failures: self.apply_severity_overrides(failures),
                edits_applied: 0,
            });
        }

        let new_text = apply_edits(source, &edits)?;
        debug!("{}: {}", filename, FixStage::Applied);

        let reparsed = parser
            .parse(filename, &new_text)
            .map_err(|source| LintError::FixReparse {
                filename: filename.to_string(),
                source,
            })?;
        let new_allowances = self.allowances(&new_text);
        let remaining: Vec<Failure> = dispatcher
            .failures(&reparsed)?
            .into_iter()
            .filter(|failure| !new_allowances.allows(failure))
            .collect();
        debug!("{}: {}", filename, FixStage::Reverified);

        verify(&dispatcher, &findings, &fixed, &remaining)?;

        Ok(FixOutcome {
            text: new_text,
            failures: self.apply_severity_overrides(remaining),
            edits_applied,
        })
    }

    /// Parses and lints one file held in memory.
    ///
    /// In fix mode the report lists the failures left after fixing, but
    /// nothing is written; use [`Linter::lint_file`] for that.
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not parse or the pipeline fails.
    pub fn lint_source(
        &self,
        filename: &str,
        source: &str,
        parser: &dyn SchemaParser,
    ) -> Result<FileReport, LintError> {
        self.lint_text(filename, source, parser)
            .map(|(report, _)| report)
    }

    /// Lints a file on disk, rewriting it in fix mode.
    ///
    /// The new text goes to a temporary file in the same directory which is
    /// then renamed over the original. On any error the file is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, linted, or written.
    pub fn lint_file(
        &self,
        path: &Path,
        parser: &dyn SchemaParser,
    ) -> Result<FileReport, LintError> {
        debug!("Linting: {}", path.display());

        let source = fs::read_to_string(path).map_err(|source| LintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path.to_string_lossy();
        let (mut report, new_text) = self.lint_text(&filename, &source, parser)?;
        report.path = path.to_path_buf();

        if let Some(text) = new_text {
            write_atomically(path, &text)?;
            debug!("Rewrote {}", path.display());
        }
        Ok(report)
    }

    /// Lints many files in parallel.
    ///
    /// A file that fails is recorded in [`LintResult::errors`] and does not
    /// stop the others. Results are ordered by path.
    pub fn lint_paths(&self, paths: &[PathBuf], parser: &dyn SchemaParser) -> LintResult {
        info!("Linting {} files", paths.len());

        let run = || {
            paths
                .par_iter()
                .map(|path| (path, self.lint_file(path, parser)))
                .collect::<Vec<_>>()
        };
        let mut outcomes = match self.parallelism {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    warn!("Could not build a {threads}-thread pool ({e}); using the global pool");
                    run()
                }
            },
            None => run(),
        };
        outcomes.sort_by(|a, b| a.0.cmp(b.0));

        let mut result = LintResult::new();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(report) => result.push_report(report),
                Err(err) => {
                    warn!("Failed to lint {}: {}", path.display(), err);
                    result.errors.push(FileError {
                        path: path.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            "Lint complete: {} failures in {} files ({} fixed, {} errors)",
            result.failures.len(),
            result.files_checked,
            result.files_fixed,
            result.errors.len()
        );
        result
    }

    /// Shared body of [`Linter::lint_source`] and [`Linter::lint_file`].
    /// Returns the new text when fix mode changed it.
    fn lint_text(
        &self,
        filename: &str,
        source: &str,
        parser: &dyn SchemaParser,
    ) -> Result<(FileReport, Option<String>), LintError> {
        let proto = parser.parse(filename, source)?;

        if self.fix_mode {
            let outcome = self.fix(&proto, source, parser)?;
            let changed = outcome.changed() && outcome.text != source;
            let report = FileReport {
                path: PathBuf::from(filename),
                failures: outcome.failures,
                fixed: changed,
            };
            return Ok((report, changed.then_some(outcome.text)));
        }

        let allowances = self.allowances(source);
        let failures = self
            .apply(&proto)?
            .into_iter()
            .filter(|failure| !allowances.allows(failure))
            .collect();
        let report = FileReport {
            path: PathBuf::from(filename),
            failures,
            fixed: false,
        };
        Ok((report, None))
    }

    fn allowances(&self, source: &str) -> Allowances {
        if self.config.lint.respect_allow_comments {
            Allowances::scan(source)
        } else {
            Allowances::default()
        }
    }

    /// Applies severity overrides from configuration, else the rule default.
    fn apply_severity_overrides(&self, mut failures: Vec<Failure>) -> Vec<Failure> {
        for failure in &mut failures {
            let severity = self.config.rule_severity(&failure.rule_id).or_else(|| {
                self.rules
                    .iter()
                    .find(|rule| rule.id() == failure.rule_id)
                    .map(|rule| rule.default_severity())
            });
            if let Some(severity) = severity {
                failure.severity = severity;
            }
        }
        failures
    }
}

/// Asks `rule` for an edit, turning panics and bad output into faults.
fn compute_edit(
    rule: &dyn Rule,
    text: &SourceText<'_>,
    finding: &Finding<'_>,
) -> Result<Option<Edit>, LintError> {
    let fault = |message: String| LintError::RuleFault {
        rule_id: rule.id().to_string(),
        message,
    };

    let edit = match panic::catch_unwind(AssertUnwindSafe(|| {
        rule.fix(text, finding.node, &finding.failure)
    })) {
        Ok(Ok(edit)) => edit,
        Ok(Err(err)) => return Err(fault(format!("could not fix {}: {err}", finding.failure))),
        Err(payload) => return Err(fault(panic_message(payload.as_ref()))),
    };

    match edit {
        Some(edit) if edit.rule_id != rule.id() => Err(fault(format!(
            "produced an edit attributed to {}",
            edit.rule_id
        ))),
        other => Ok(other),
    }
}

/// Checks that every rule which edited the text no longer reports anything
/// beyond the failures it declined to fix.
fn verify(
    dispatcher: &Dispatcher<'_>,
    findings: &[Finding<'_>],
    fixed: &[bool],
    remaining: &[Failure],
) -> Result<(), LintError> {
    let mut fixing: Vec<&str> = Vec::new();
    for (finding, &was_fixed) in findings.iter().zip(fixed) {
        let id = dispatcher.rules()[finding.rule_index].id();
        if was_fixed && !fixing.contains(&id) {
            fixing.push(id);
        }
    }

    for rule_id in fixing {
        let mut tolerated: HashMap<&str, usize> = HashMap::new();
        for (finding, &was_fixed) in findings.iter().zip(fixed) {
            if !was_fixed && finding.failure.rule_id == rule_id {
                *tolerated.entry(finding.failure.message.as_str()).or_default() += 1;
            }
        }

        let mut persisted = Vec::new();
        for failure in remaining.iter().filter(|f| f.rule_id == rule_id) {
            match tolerated.get_mut(failure.message.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => persisted.push(failure.clone()),
            }
        }

        if !persisted.is_empty() {
            return Err(LintError::FixVerification {
                rule_id: rule_id.to_string(),
                failures: persisted,
            });
        }
    }
    Ok(())
}

fn write_atomically(path: &Path, text: &str) -> Result<(), LintError> {
    let io_error = |source| LintError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(text.as_bytes()).map_err(io_error)?;
    let permissions = fs::metadata(path).map_err(io_error)?.permissions();
    fs::set_permissions(tmp.path(), permissions).map_err(io_error)?;
    tmp.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NodeKind};
    use crate::types::Severity;

    struct Quiet;

    impl Rule for Quiet {
        fn id(&self) -> &'static str {
            "QUIET"
        }
        fn default_severity(&self) -> Severity {
            Severity::Info
        }
        fn applies_to(&self, kind: NodeKind) -> bool {
            kind == NodeKind::Proto
        }
        fn evaluate(&self, node: Node<'_>) -> Vec<Failure> {
            vec![Failure::new(node.meta().pos.clone(), self.id(), "hello")]
        }
    }

    struct PanicsInFix;

    impl Rule for PanicsInFix {
        fn id(&self) -> &'static str {
            "PANICS_IN_FIX"
        }
        fn fix_mode(&self) -> bool {
            true
        }
        fn is_fixable(&self) -> bool {
            true
        }
        fn applies_to(&self, kind: NodeKind) -> bool {
            kind == NodeKind::Proto
        }
        fn evaluate(&self, node: Node<'_>) -> Vec<Failure> {
            vec![Failure::new(node.meta().pos.clone(), self.id(), "always")]
        }
        fn fix(
            &self,
            _source: &SourceText<'_>,
            _node: Node<'_>,
            _failure: &Failure,
        ) -> Result<Option<Edit>, crate::rule::RuleError> {
            panic!("no fix today")
        }
    }

    #[test]
    fn test_panicking_fix_becomes_rule_fault() {
        let linter = Linter::builder().rule(PanicsInFix).fix_mode(true).build();
        let parser = |_: &str, _: &str| -> Result<Proto, crate::parse::ParseError> {
            Ok(Proto::default())
        };
        match linter.fix(&Proto::default(), "", &parser) {
            Err(LintError::RuleFault { rule_id, message }) => {
                assert_eq!(rule_id, "PANICS_IN_FIX");
                assert_eq!(message, "no fix today");
            }
            other => panic!("expected a rule fault, got {other:?}"),
        }
    }

    #[test]
    fn test_builder() {
        let linter = Linter::builder().rule(Quiet).fix_mode(true).build();
        assert_eq!(linter.rule_count(), 1);
        assert!(linter.is_fix_mode());
    }

    #[test]
    fn test_parallelism_falls_back_to_config() {
        let mut config = Config::default();
        config.lint.parallelism = Some(3);
        let linter = Linter::builder().config(config.clone()).build();
        assert_eq!(linter.parallelism, Some(3));

        let linter = Linter::builder().config(config).parallelism(1).build();
        assert_eq!(linter.parallelism, Some(1));
    }

    #[test]
    fn test_default_severity_applied() {
        let linter = Linter::builder().rule(Quiet).build();
        let failures = linter.apply(&Proto::default()).unwrap();
        assert_eq!(failures[0].severity, Severity::Info);
    }

    #[test]
    fn test_severity_override() {
        let config = Config::parse("[rules.QUIET]\nseverity = \"warning\"\n").unwrap();
        let linter = Linter::builder().rule(Quiet).config(config).build();
        let failures = linter.apply(&Proto::default()).unwrap();
        assert_eq!(failures[0].severity, Severity::Warning);
    }

    #[test]
    fn test_write_atomically_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.proto");
        fs::write(&path, "old").unwrap();
        write_atomically(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_fix_outcome_changed() {
        let outcome = FixOutcome {
            text: String::new(),
            failures: Vec::new(),
            edits_applied: 0,
        };
        assert!(!outcome.changed());
    }
}
