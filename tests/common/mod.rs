#![allow(dead_code)]

use std::collections::VecDeque;

use camino::{Utf8Path, Utf8PathBuf};
use muter::{
    AbortReason, Configuration, MuterTestReport, MutationOperatorInstance, MutationOperatorKind,
    MutationPoint, Position, Result, Rewrite, TestSuiteOutcome, TestingDelegate,
};

/// Records every call in order and replays a queue of test suite outcomes.
#[derive(Default)]
pub struct DelegateSpy {
    pub method_calls: Vec<&'static str>,
    pub test_suite_outcomes: VecDeque<TestSuiteOutcome>,
    pub configuration_to_return: Option<Configuration>,
    pub backed_up_projects: Vec<Utf8PathBuf>,
    pub backed_up_file_paths: Vec<Utf8PathBuf>,
    pub restored_file_paths: Vec<Utf8PathBuf>,
    pub mutated_file_paths: Vec<Utf8PathBuf>,
    pub mutated_file_contents: Vec<String>,
    pub results_file_names: Vec<String>,
    pub abort_reasons: Vec<AbortReason>,
    pub saved_reports: Vec<(MuterTestReport, Utf8PathBuf)>,
}

impl DelegateSpy {
    pub fn with_outcomes(outcomes: impl IntoIterator<Item = TestSuiteOutcome>) -> Self {
        Self {
            test_suite_outcomes: outcomes.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl TestingDelegate for DelegateSpy {
    fn load_configuration(&mut self) -> Option<Configuration> {
        self.method_calls.push("load_configuration");
        self.configuration_to_return.clone()
    }

    fn backup_project(&mut self, directory: &Utf8Path) -> Result<()> {
        self.method_calls.push("backup_project");
        self.backed_up_projects.push(directory.to_path_buf());
        Ok(())
    }

    fn backup_file(&mut self, path: &Utf8Path) {
        self.method_calls.push("backup_file");
        self.backed_up_file_paths.push(path.to_path_buf());
    }

    fn write_file(&mut self, path: &Utf8Path, contents: &str) {
        self.method_calls.push("write_file");
        self.mutated_file_paths.push(path.to_path_buf());
        self.mutated_file_contents.push(contents.to_string());
    }

    fn run_test_suite(&mut self, results_file_name: &str) -> TestSuiteOutcome {
        self.method_calls.push("run_test_suite");
        self.results_file_names.push(results_file_name.to_string());
        self.test_suite_outcomes
            .pop_front()
            .expect("DelegateSpy ran out of test suite outcomes")
    }

    fn restore_file(&mut self, path: &Utf8Path) {
        self.method_calls.push("restore_file");
        self.restored_file_paths.push(path.to_path_buf());
    }

    fn abort_testing(&mut self, reason: AbortReason) {
        self.method_calls.push("abort_testing");
        self.abort_reasons.push(reason);
    }

    fn save_report(&mut self, report: &MuterTestReport, directory: &Utf8Path) -> Result<()> {
        self.method_calls.push("save_report");
        self.saved_reports.push((report.clone(), directory.to_path_buf()));
        Ok(())
    }
}

pub const MUTANT_CONTENTS: &str = "return";

/// A worklist item whose mutant replaces the whole file with `return`.
pub fn mutation_stub() -> MutationOperatorInstance {
    MutationOperatorInstance::new(
        MutationPoint::new(
            MutationOperatorKind::NegateConditionals,
            "a file path",
            Position::default(),
        ),
        Rewrite {
            start_byte: 0,
            end_byte: 2,
            original: "if".to_string(),
            replacement: MUTANT_CONTENTS.to_string(),
        },
        "if",
    )
}

/// One survivor-or-kill cycle as recorded by the spy.
pub const CYCLE: [&str; 4] = ["backup_file", "write_file", "run_test_suite", "restore_file"];

pub fn expected_calls(mutants: usize) -> Vec<&'static str> {
    let mut calls = vec!["run_test_suite"];
    for _ in 0..mutants {
        calls.extend(CYCLE);
    }
    calls
}

pub fn utf8(dir: &tempfile::TempDir) -> &Utf8Path {
    Utf8Path::from_path(dir.path()).expect("temp dir is UTF-8")
}
