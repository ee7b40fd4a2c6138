//! Machine-readable reports built from mutation test outcomes.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mutants::{MutationTestOutcome, TestSuiteOutcome};
use crate::operators::MutationOperatorKind;
use crate::output;
use crate::position::Position;
use crate::score::{mutation_score_of_files, mutation_score_of_outcomes};

pub const REPORT_FILE_NAME: &str = "muter-report.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedMutationOperator {
    pub id: MutationOperatorKind,
    pub position: Position,
    pub test_suite_outcome: TestSuiteOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file_name: String,
    pub file_path: Utf8PathBuf,
    pub mutation_score: i64,
    pub applied_operators: Vec<AppliedMutationOperator>,
}

/// Scores and per-file breakdown of one run. Everything is derived from the
/// outcome list at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuterTestReport {
    pub global_mutation_score: i64,
    pub total_applied_mutation_operators: usize,
    pub file_reports: Vec<FileReport>,
    pub outcomes: Vec<MutationTestOutcome>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    global_mutation_score: i64,
    total_applied_mutation_operators: usize,
    file_reports: &'a [FileReport],
    description: String,
}

impl MuterTestReport {
    pub fn new(outcomes: Vec<MutationTestOutcome>) -> Self {
        let mut file_reports: Vec<FileReport> = mutation_score_of_files(&outcomes)
            .into_iter()
            .map(|(file_path, mutation_score)| {
                let applied_operators = outcomes
                    .iter()
                    .filter(|outcome| outcome.point.file_path == file_path)
                    .map(|outcome| AppliedMutationOperator {
                        id: outcome.point.operator,
                        position: outcome.point.position,
                        test_suite_outcome: outcome.test_suite_outcome,
                    })
                    .collect();
                FileReport {
                    file_name: file_path.file_name().unwrap_or(file_path.as_str()).to_string(),
                    file_path,
                    mutation_score,
                    applied_operators,
                }
            })
            .collect();
        file_reports.sort_by(|a, b| {
            a.file_name
                .cmp(&b.file_name)
                .then_with(|| a.file_path.cmp(&b.file_path))
        });

        Self {
            global_mutation_score: mutation_score_of_outcomes(&outcomes),
            total_applied_mutation_operators: outcomes.len(),
            file_reports,
            outcomes,
        }
    }

    /// The report as pretty-printed JSON. Falls back to an explanatory text
    /// if encoding fails.
    pub fn to_json(&self) -> String {
        let report = JsonReport {
            global_mutation_score: self.global_mutation_score,
            total_applied_mutation_operators: self.total_applied_mutation_operators,
            file_reports: &self.file_reports,
            description: output::description(self, false),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => encoding_failure_message(&e.to_string()),
        }
    }
}

fn encoding_failure_message(error: &str) -> String {
    format!(
        "Muter was unable to encode its report.\n\n\
         If you can reproduce this, please consider filing a bug report\n\
         and include the following:\n\
         *********************\n\
         {error}"
    )
}

/// One IDE warning per surviving mutant, paths joined onto `root`.
pub fn xcode_report(outcomes: &[MutationTestOutcome], root: &Utf8Path) -> String {
    outcomes
        .iter()
        .filter(|outcome| outcome.test_suite_outcome == TestSuiteOutcome::Passed)
        .map(|outcome| {
            format!(
                "{}:{}:{}: warning: \"Your test suite did not kill this mutant: Changed {}\"",
                root.join(&outcome.point.file_path),
                outcome.point.position.line,
                outcome.point.position.column,
                outcome.point.operator.id(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the JSON report into `directory`, returning the file written.
pub fn save_json_report(report: &MuterTestReport, directory: &Utf8Path) -> Result<Utf8PathBuf> {
    let path = directory.join(REPORT_FILE_NAME);
    std::fs::write(&path, report.to_json())?;
    Ok(path)
}
