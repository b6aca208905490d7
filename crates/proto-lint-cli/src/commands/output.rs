//! Output formatting for lint results.

use anyhow::Result;
use miette::NamedSource;
use proto_lint_core::{Failure, FailureDiagnostic, FileError, LintResult, Severity};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `fixable` holds the IDs of rules that can fix their failures; outside fix
/// mode their diagnostics point at `--fix`.
pub fn print(
    result: &LintResult,
    format: OutputFormat,
    fixable: &HashSet<&'static str>,
    fix_mode: bool,
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result, fixable, fix_mode),
        OutputFormat::Json => println!("{}", to_json(result)?),
        OutputFormat::Compact => {
            for failure in &result.failures {
                println!("{}", compact_line(failure));
            }
            for error in &result.errors {
                println!("{}", compact_error(error));
            }
        }
    }
    Ok(())
}

fn print_text(result: &LintResult, fixable: &HashSet<&'static str>, fix_mode: bool) {
    let mut sources: HashMap<&str, Option<String>> = HashMap::new();

    for failure in &result.failures {
        let filename = failure.position.filename.as_str();
        let source = sources
            .entry(filename)
            .or_insert_with(|| std::fs::read_to_string(filename).ok());

        let mut diagnostic = FailureDiagnostic::from(failure);
        if !fix_mode && fixable.contains(failure.rule_id.as_str()) {
            diagnostic = diagnostic.with_help("run `proto-lint lint --fix` to apply the suggested name");
        }
        let report = miette::Report::new(diagnostic);
        let report = match source {
            Some(text) => report.with_source_code(NamedSource::new(filename, text.clone())),
            None => report,
        };
        println!("{report:?}");
    }

    for error in &result.errors {
        println!(
            "\x1b[31merror\x1b[0m: could not lint {}: {}",
            error.path.display(),
            error.message
        );
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 || !result.errors.is_empty() {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
    if fix_mode {
        println!("Fixed {} file(s)", result.files_fixed);
    }
    if !result.errors.is_empty() {
        println!("{} file(s) could not be linted", result.errors.len());
    }
}

/// JSON document printed by `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    failures: &'a [Failure],
    errors: &'a [FileError],
    summary: Summary,
}

#[derive(Serialize)]
struct Summary {
    files_checked: usize,
    files_fixed: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
}

fn to_json(result: &LintResult) -> Result<String> {
    let (errors, warnings, infos) = result.count_by_severity();
    let report = JsonReport {
        failures: &result.failures,
        errors: &result.errors,
        summary: Summary {
            files_checked: result.files_checked,
            files_fixed: result.files_fixed,
            errors,
            warnings,
            infos,
        },
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn compact_line(failure: &Failure) -> String {
    format!(
        "{}:{}:{}: {} [{}] {}",
        failure.position.filename,
        failure.position.line,
        failure.position.column,
        failure.severity,
        failure.rule_id,
        failure.message,
    )
}

fn compact_error(error: &FileError) -> String {
    format!("{}: {} {}", error.path.display(), Severity::Error, error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_lint_core::Position;
    use std::path::PathBuf;

    fn result() -> LintResult {
        let mut result = LintResult::new();
        result.failures.push(
            Failure::new(
                Position::new("api/a.proto", 40, 4, 3),
                "FIELD_NAMES_LOWER_SNAKE_CASE",
                r#"Field name "songName" must be underscore_separated_names like "song_name""#,
            )
            .with_severity(Severity::Warning),
        );
        result.errors.push(FileError {
            path: PathBuf::from("api/b.proto"),
            message: "parse error".to_string(),
        });
        result.files_checked = 1;
        result
    }

    #[test]
    fn compact_format() {
        let result = result();
        assert_eq!(
            compact_line(&result.failures[0]),
            r#"api/a.proto:4:3: warning [FIELD_NAMES_LOWER_SNAKE_CASE] Field name "songName" must be underscore_separated_names like "song_name""#
        );
        assert_eq!(compact_error(&result.errors[0]), "api/b.proto: error parse error");
    }

    #[test]
    fn json_uses_failure_wire_shape() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&result()).unwrap()).unwrap();
        let failure = &json["failures"][0];
        assert_eq!(failure["filename"], "api/a.proto");
        assert_eq!(failure["offset"], 40);
        assert_eq!(failure["ruleID"], "FIELD_NAMES_LOWER_SNAKE_CASE");
        assert_eq!(failure["severity"], "warning");
        assert_eq!(json["errors"][0]["path"], "api/b.proto");
        assert_eq!(json["summary"]["warnings"], 1);
        assert_eq!(json["summary"]["files_checked"], 1);
    }
}
