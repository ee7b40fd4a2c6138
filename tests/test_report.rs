use camino::Utf8Path;
use muter::output;
use muter::report::{xcode_report, AppliedMutationOperator, FileReport, MuterTestReport};
use muter::score::{mutation_score, mutation_score_of_files, NO_SCORE};
use muter::{MutationOperatorKind, MutationPoint, MutationTestOutcome, Position, TestSuiteOutcome};
use pretty_assertions::assert_eq;

use MutationOperatorKind::*;
use TestSuiteOutcome::*;

fn outcome(
    outcome: TestSuiteOutcome,
    operator: MutationOperatorKind,
    path: &str,
) -> MutationTestOutcome {
    MutationTestOutcome::new(
        outcome,
        MutationPoint::new(operator, path, Position::default()),
        operator.description(),
    )
}

fn example_outcomes() -> Vec<MutationTestOutcome> {
    vec![
        outcome(Failed, NegateConditionals, "/tmp/file1.swift"),
        outcome(Failed, NegateConditionals, "/tmp/file1.swift"),
        outcome(Passed, NegateConditionals, "/tmp/file1.swift"),
        outcome(Failed, RemoveSideEffects, "/tmp/file2.swift"),
        outcome(Failed, RemoveSideEffects, "/tmp/file2.swift"),
        outcome(Failed, NegateConditionals, "/tmp/file3.swift"),
        outcome(Passed, NegateConditionals, "/tmp/file3.swift"),
        outcome(Passed, NegateConditionals, "/tmp/file3.swift"),
        outcome(Passed, NegateConditionals, "/tmp/file 4.swift"),
    ]
}

fn applied(
    id: MutationOperatorKind,
    test_suite_outcome: TestSuiteOutcome,
) -> AppliedMutationOperator {
    AppliedMutationOperator {
        id,
        position: Position::default(),
        test_suite_outcome,
    }
}

// --- scores ---

#[test]
fn score_of_empty_list_is_sentinel() {
    assert_eq!(mutation_score(&[]), NO_SCORE);
}

#[test]
fn score_of_only_build_errors_is_sentinel() {
    assert_eq!(mutation_score(&[BuildError]), -1);
}

#[test]
fn score_stays_within_percent_range() {
    let cases: &[&[TestSuiteOutcome]] = &[
        &[Passed],
        &[Failed],
        &[Passed, Failed, Failed],
        &[RuntimeError, BuildError, Passed, Passed],
        &[Failed, Failed, Failed, Passed, Passed, Passed, Passed],
    ];
    for case in cases {
        let score = mutation_score(case);
        assert!((0..=100).contains(&score), "{case:?} scored {score}");
    }
}

#[test]
fn file_scores_group_by_path() {
    let scores = mutation_score_of_files(&example_outcomes());
    let scores: Vec<(&str, i64)> = scores
        .iter()
        .map(|(path, score)| (path.as_str(), *score))
        .collect();
    assert_eq!(
        scores,
        vec![
            ("/tmp/file 4.swift", 0),
            ("/tmp/file1.swift", 66),
            ("/tmp/file2.swift", 100),
            ("/tmp/file3.swift", 33),
        ]
    );
}

// --- report ---

#[test]
fn report_calculates_all_fields() {
    let report = MuterTestReport::new(example_outcomes());

    assert_eq!(report.global_mutation_score, 55);
    assert_eq!(report.total_applied_mutation_operators, 9);
    assert_eq!(
        report.file_reports,
        vec![
            FileReport {
                file_name: "file 4.swift".to_string(),
                file_path: "/tmp/file 4.swift".into(),
                mutation_score: 0,
                applied_operators: vec![applied(NegateConditionals, Passed)],
            },
            FileReport {
                file_name: "file1.swift".to_string(),
                file_path: "/tmp/file1.swift".into(),
                mutation_score: 66,
                applied_operators: vec![
                    applied(NegateConditionals, Failed),
                    applied(NegateConditionals, Failed),
                    applied(NegateConditionals, Passed),
                ],
            },
            FileReport {
                file_name: "file2.swift".to_string(),
                file_path: "/tmp/file2.swift".into(),
                mutation_score: 100,
                applied_operators: vec![
                    applied(RemoveSideEffects, Failed),
                    applied(RemoveSideEffects, Failed),
                ],
            },
            FileReport {
                file_name: "file3.swift".to_string(),
                file_path: "/tmp/file3.swift".into(),
                mutation_score: 33,
                applied_operators: vec![
                    applied(NegateConditionals, Failed),
                    applied(NegateConditionals, Passed),
                    applied(NegateConditionals, Passed),
                ],
            },
        ]
    );
}

#[test]
fn empty_report() {
    let report = MuterTestReport::new(Vec::new());
    assert_eq!(report.global_mutation_score, -1);
    assert_eq!(report.total_applied_mutation_operators, 0);
    assert!(report.file_reports.is_empty());
    assert!(!output::description(&report, false).is_empty());
}

#[test]
fn json_report_has_expected_shape() {
    let report = MuterTestReport::new(example_outcomes());
    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();

    assert_eq!(json["globalMutationScore"], 55);
    assert_eq!(json["totalAppliedMutationOperators"], 9);
    assert_eq!(json["fileReports"].as_array().unwrap().len(), 4);

    let first = &json["fileReports"][0];
    assert_eq!(first["fileName"], "file 4.swift");
    assert_eq!(first["filePath"], "/tmp/file 4.swift");
    assert_eq!(first["mutationScore"], 0);
    assert_eq!(first["appliedOperators"][0]["id"], "negateConditionals");
    assert_eq!(first["appliedOperators"][0]["testSuiteOutcome"], "passed");
    assert_eq!(
        first["appliedOperators"][0]["position"],
        serde_json::json!({"line": 0, "column": 0, "offset": 0})
    );

    let description = json["description"].as_str().unwrap();
    assert!(description.starts_with("Muter finished running!"));
    assert!(description.contains("In total, Muter applied 9 mutation operators."));
    assert!(description.contains("Mutation Score of Test Suite (higher is better): 55/100"));
    assert!(!description.contains('\u{1b}'), "JSON description must be plain text");
}

#[test]
fn text_report_lists_every_applied_operator() {
    let report = MuterTestReport::new(example_outcomes());
    let text = output::description(&report, false);

    assert!(text.contains("Applied Mutation Operators"));
    assert!(text.contains("Mutation Test Scores"));
    assert!(text.contains(
        "file 4.swift   Line: 0, Column: 0   Negate Conditionals         passed"
    ));
    assert_eq!(text.matches("Remove Side Effects").count(), 2);
    assert!(text.contains("file2.swift    2                                 100"));
}

#[test]
fn xcode_report_warns_for_survivors_only() {
    let outcomes = vec![
        MutationTestOutcome::new(
            Passed,
            MutationPoint::new(NegateConditionals, "src/lib.rs", Position::new(3, 10, 42)),
            "Negate Conditionals",
        ),
        MutationTestOutcome::new(
            Failed,
            MutationPoint::new(NegateConditionals, "src/lib.rs", Position::new(5, 4, 80)),
            "Negate Conditionals",
        ),
        MutationTestOutcome::new(
            Passed,
            MutationPoint::new(RemoveSideEffects, "src/store.rs", Position::new(9, 18, 200)),
            "Remove Side Effects",
        ),
    ];

    let report = xcode_report(&outcomes, Utf8Path::new("/project"));
    assert_eq!(
        report,
        "/project/src/lib.rs:3:10: warning: \"Your test suite did not kill this mutant: \
         Changed negateConditionals\"\n\
         /project/src/store.rs:9:18: warning: \"Your test suite did not kill this mutant: \
         Changed removeSideEffects\""
    );
}

#[test]
fn xcode_report_is_empty_without_survivors() {
    let outcomes = vec![outcome(Failed, NegateConditionals, "a.rs")];
    assert_eq!(xcode_report(&outcomes, Utf8Path::new("/project")), "");
}
