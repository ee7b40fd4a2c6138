//! Mutation score aggregation.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;

use crate::mutants::{MutationTestOutcome, TestSuiteOutcome};

/// Returned when there is nothing to score.
pub const NO_SCORE: i64 = -1;

/// Percentage of countable mutants that were killed, rounded down.
///
/// Build errors are inconclusive and count neither way. Runtime errors count
/// as killed. Returns [`NO_SCORE`] when no outcome is countable.
pub fn mutation_score(outcomes: &[TestSuiteOutcome]) -> i64 {
    let mut killed = 0i64;
    let mut countable = 0i64;
    for outcome in outcomes {
        match outcome {
            TestSuiteOutcome::Failed | TestSuiteOutcome::RuntimeError => {
                killed += 1;
                countable += 1;
            }
            TestSuiteOutcome::Passed => countable += 1,
            TestSuiteOutcome::BuildError => {}
        }
    }

    if countable == 0 {
        return NO_SCORE;
    }
    killed * 100 / countable
}

pub fn mutation_score_of_outcomes(outcomes: &[MutationTestOutcome]) -> i64 {
    let results: Vec<TestSuiteOutcome> =
        outcomes.iter().map(|outcome| outcome.test_suite_outcome).collect();
    mutation_score(&results)
}

/// Score of every file that had at least one mutant, keyed by file path.
pub fn mutation_score_of_files(outcomes: &[MutationTestOutcome]) -> BTreeMap<Utf8PathBuf, i64> {
    let mut by_file: BTreeMap<Utf8PathBuf, Vec<TestSuiteOutcome>> = BTreeMap::new();
    for outcome in outcomes {
        by_file
            .entry(outcome.point.file_path.clone())
            .or_default()
            .push(outcome.test_suite_outcome);
    }
    by_file
        .into_iter()
        .map(|(path, results)| (path, mutation_score(&results)))
        .collect()
}
