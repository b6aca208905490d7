//! Fixture tests running the built-in rules through the real parser.
//!
//! Each rule directory under `tests/testdata/` holds an `invalid.proto`
//! and the text expected after fixing it.

use std::fs;
use std::path::{Path, PathBuf};

use proto_lint_core::{Failure, Linter, RuleBox};
use proto_lint_parser::{parse_proto, ProtoParser};
use proto_lint_rules::{
    EnumFieldNamesUpperSnakeCase, EnumNamesUpperCamelCase, FieldNamesLowerSnakeCase,
    MessageNamesUpperCamelCase, PackageNameLowerCase, Preset, RpcNamesUpperCamelCase,
    ServiceNamesUpperCamelCase,
};

fn testdata(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(relative)
}

fn read(relative: &str) -> String {
    fs::read_to_string(testdata(relative)).unwrap()
}

struct Case {
    dir: &'static str,
    fixed: &'static str,
    rule: fn(bool) -> RuleBox,
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            dir: "rpc_names_upper_camel_case",
            fixed: "upperCamelCase.proto",
            rule: |fix| Box::new(RpcNamesUpperCamelCase::new(fix)) as RuleBox,
        },
        Case {
            dir: "service_names_upper_camel_case",
            fixed: "upperCamelCase.proto",
            rule: |fix| Box::new(ServiceNamesUpperCamelCase::new(fix)) as RuleBox,
        },
        Case {
            dir: "message_names_upper_camel_case",
            fixed: "upperCamelCase.proto",
            rule: |fix| Box::new(MessageNamesUpperCamelCase::new(fix)) as RuleBox,
        },
        Case {
            dir: "field_names_lower_snake_case",
            fixed: "lower_snake_case.proto",
            rule: |fix| Box::new(FieldNamesLowerSnakeCase::new(fix)) as RuleBox,
        },
        Case {
            dir: "enum_names_upper_camel_case",
            fixed: "upperCamelCase.proto",
            rule: |fix| Box::new(EnumNamesUpperCamelCase::new(fix)) as RuleBox,
        },
        Case {
            dir: "enum_field_names_upper_snake_case",
            fixed: "UPPER_SNAKE_CASE.proto",
            rule: |fix| Box::new(EnumFieldNamesUpperSnakeCase::new(fix)) as RuleBox,
        },
        Case {
            dir: "package_name_lower_case",
            fixed: "lowercase.proto",
            rule: |fix| Box::new(PackageNameLowerCase::new(fix)) as RuleBox,
        },
    ]
}

fn linter(case: &Case, fix: bool) -> Linter {
    Linter::builder()
        .rule_box((case.rule)(fix))
        .fix_mode(fix)
        .build()
}

#[test]
fn fixing_invalid_fixture_matches_expected() {
    for case in &cases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.proto");
        fs::write(&path, read(&format!("{}/invalid.proto", case.dir))).unwrap();

        let report = linter(case, true).lint_file(&path, &ProtoParser).unwrap();
        assert!(report.fixed, "{}", case.dir);
        assert!(report.failures.is_empty(), "{}: {:?}", case.dir, report.failures);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            read(&format!("{}/{}", case.dir, case.fixed)),
            "{}",
            case.dir
        );
    }
}

#[test]
fn expected_fixtures_are_clean() {
    for case in &cases() {
        let relative = format!("{}/{}", case.dir, case.fixed);
        let source = read(&relative);

        let report = linter(case, false)
            .lint_source(&relative, &source, &ProtoParser)
            .unwrap();
        assert!(report.failures.is_empty(), "{relative}: {:?}", report.failures);

        let report = linter(case, true)
            .lint_source(&relative, &source, &ProtoParser)
            .unwrap();
        assert!(!report.fixed, "{relative}");
    }
}

#[test]
fn suggestions_match_what_the_fix_writes() {
    for case in &cases() {
        let relative = format!("{}/invalid.proto", case.dir);
        let failures = linter(case, false)
            .lint_source(&relative, &read(&relative), &ProtoParser)
            .unwrap()
            .failures;
        assert!(!failures.is_empty(), "{relative}");

        let fixed = read(&format!("{}/{}", case.dir, case.fixed));
        for failure in &failures {
            let suggestion = suggested_name(failure);
            assert!(
                fixed.contains(suggestion),
                "{relative}: {suggestion} not found in the fixed text"
            );
        }
    }
}

/// Extracts the last quoted word from a failure message.
fn suggested_name(failure: &Failure) -> &str {
    let quoted: Vec<&str> = failure.message.split('"').collect();
    quoted[quoted.len() - 2]
}

#[test]
fn rpc_failures_point_at_the_rpc_keyword() {
    let relative = "rpc_names_upper_camel_case/invalid.proto";
    let case = &cases()[0];
    let failures = linter(case, false)
        .lint_source(relative, &read(relative), &ProtoParser)
        .unwrap()
        .failures;

    let located: Vec<(usize, usize)> = failures
        .iter()
        .map(|f| (f.position.line, f.position.column))
        .collect();
    assert_eq!(located, vec![(4, 3), (5, 3), (8, 3)]);
    assert_eq!(
        failures[1].message,
        r#"RPC name "get_http_url" must be UpperCamelCase like "GetHttpUrl""#
    );
}

#[test]
fn default_preset_fixes_everything_it_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.proto");
    fs::write(&path, read("default_preset/invalid.proto")).unwrap();

    let linter = Linter::builder()
        .rules(Preset::Default.rules(true))
        .fix_mode(true)
        .build();
    let report = linter.lint_file(&path, &ProtoParser).unwrap();
    assert!(report.fixed);
    assert!(report.failures.is_empty(), "{:?}", report.failures);

    let expected = read("default_preset/fixed.proto");
    let once = fs::read_to_string(&path).unwrap();
    assert_eq!(once, expected);

    // A second run has nothing left to do.
    let report = linter.lint_file(&path, &ProtoParser).unwrap();
    assert!(!report.fixed);
    assert_eq!(fs::read_to_string(&path).unwrap(), once);
}

#[test]
fn all_preset_check_output() {
    let relative = "default_preset/invalid.proto";
    let linter = Linter::builder().rules(Preset::All.rules(false)).build();
    let report = linter
        .lint_source("catalog.proto", &read(relative), &ProtoParser)
        .unwrap();

    let lines: Vec<String> = report.failures.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(lines.join("\n"), @r###"
    [catalog.proto:3:1] Package name "Music.Catalog" must not contain any uppercase letter. Consider to change like "music.catalog". (PACKAGE_NAME_LOWER_CASE)
    [catalog.proto:7:1] Service name "catalog_service" must be UpperCamelCase like "CatalogService" (SERVICE_NAMES_UPPER_CAMEL_CASE)
    [catalog.proto:8:3] RPC name "list_songs" must be UpperCamelCase like "ListSongs" (RPC_NAMES_UPPER_CAMEL_CASE)
    [catalog.proto:12:3] Field name "pageSize" must be underscore_separated_names like "page_size" (FIELD_NAMES_LOWER_SNAKE_CASE)
    [catalog.proto:16:3] Field name "songName" must be underscore_separated_names like "song_name" (FIELD_NAMES_LOWER_SNAKE_CASE)
    [catalog.proto:20:1] Enum name "genre_kind" must be UpperCamelCase like "GenreKind" (ENUM_NAMES_UPPER_CAMEL_CASE)
    [catalog.proto:22:3] EnumField name "rockAndRoll" must be CAPITALS_WITH_UNDERSCORES like "ROCK_AND_ROLL" (ENUM_FIELD_NAMES_UPPER_SNAKE_CASE)
    [catalog.proto:27:3] The first enum value must be zero, but "LEGACY" is 1 (ENUM_FIRST_VALUE_ZERO)
    "###);
}

#[test]
fn spaced_package_name_is_fixed_with_the_rest_of_the_file() {
    let source = "syntax = \"proto3\";\npackage Music . /* Kept */ Catalog;\n\nservice catalog_service {}\n";
    let linter = Linter::builder()
        .rules(Preset::All.rules(true))
        .fix_mode(true)
        .build();

    let proto = parse_proto("catalog.proto", source).unwrap();
    let outcome = linter.fix(&proto, source, &ProtoParser).unwrap();
    assert_eq!(
        outcome.text,
        "syntax = \"proto3\";\npackage music . /* Kept */ catalog;\n\nservice CatalogService {}\n"
    );
    assert_eq!(outcome.edits_applied, 2);
    assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
}

#[test]
fn check_only_rule_survives_fix_mode() {
    let source = "enum Kind {\n  KIND_FIRST = 1;\n}\n";
    let linter = Linter::builder()
        .rules(Preset::All.rules(true))
        .fix_mode(true)
        .build();

    let report = linter
        .lint_source("kind.proto", source, &ProtoParser)
        .unwrap();
    assert!(!report.fixed);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].rule_id, "ENUM_FIRST_VALUE_ZERO");
}

#[test]
fn lint_paths_over_fixture_tree() {
    let cases = cases();
    let paths: Vec<PathBuf> = cases
        .iter()
        .map(|case| testdata(&format!("{}/invalid.proto", case.dir)))
        .collect();

    let linter = Linter::builder().rules(Preset::Default.rules(false)).build();
    let first = linter.lint_paths(&paths, &ProtoParser);
    let second = linter.lint_paths(&paths, &ProtoParser);

    assert_eq!(first.files_checked, cases.len());
    assert!(first.errors.is_empty());
    assert!(first.has_errors());
    assert_eq!(first.failures, second.failures);
}
