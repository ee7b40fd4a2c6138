use std::ops::{Deref, DerefMut};

use camino::Utf8Path;
use tracing::{debug, info, warn};

use crate::delegate::TestingDelegate;
use crate::mutants::{
    AbortReason, MutationOperatorInstance, MutationPoint, MutationTestOutcome, TestSuiteOutcome,
};

pub const MAX_CONSECUTIVE_BUILD_ERRORS: usize = 5;

pub const BASELINE_RESULTS_FILE: &str = "baseline run";

/// Restores a file through the delegate when dropped, so a mutant never
/// outlives its test run, even if the run panics.
struct RestoreGuard<'d, 'p, D: TestingDelegate + ?Sized> {
    delegate: &'d mut D,
    path: &'p Utf8Path,
}

impl<'d, 'p, D: TestingDelegate + ?Sized> RestoreGuard<'d, 'p, D> {
    fn new(delegate: &'d mut D, path: &'p Utf8Path) -> Self {
        delegate.backup_file(path);
        Self { delegate, path }
    }
}

impl<D: TestingDelegate + ?Sized> Deref for RestoreGuard<'_, '_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &*self.delegate
    }
}

impl<D: TestingDelegate + ?Sized> DerefMut for RestoreGuard<'_, '_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut *self.delegate
    }
}

impl<D: TestingDelegate + ?Sized> Drop for RestoreGuard<'_, '_, D> {
    fn drop(&mut self) {
        self.delegate.restore_file(self.path);
    }
}

/// Name under which the test output of one mutant is kept.
pub fn results_file_name(point: &MutationPoint) -> String {
    format!(
        "{}_{}_{}_{}.log",
        point.file_name(),
        point.operator.id(),
        point.position.line,
        point.position.column
    )
}

/// Run the baseline, then every mutant in `worklist` one at a time.
///
/// Each mutant is backed up, written, tested and restored before the next
/// one starts. Returns the outcomes in worklist order, or the reason the run
/// was aborted. On abort `delegate.abort_testing` has already been notified
/// and no outcome is kept.
pub fn perform_mutation_testing<D: TestingDelegate + ?Sized>(
    worklist: &[MutationOperatorInstance],
    delegate: &mut D,
) -> Result<Vec<MutationTestOutcome>, AbortReason> {
    let baseline = delegate.run_test_suite(BASELINE_RESULTS_FILE);
    if baseline != TestSuiteOutcome::Passed {
        warn!("Baseline test run did not pass: {}", baseline);
        delegate.abort_testing(AbortReason::InitialTestingFailed);
        return Err(AbortReason::InitialTestingFailed);
    }
    info!("Baseline passed, testing {} mutants", worklist.len());

    let mut outcomes = Vec::with_capacity(worklist.len());
    let mut consecutive_build_errors = 0;

    for (index, instance) in worklist.iter().enumerate() {
        let point = &instance.point;
        let mutated = instance.mutated_source();
        debug!(
            "Mutant {} diff:\n{}",
            index + 1,
            generate_diff(instance.original_source(), &mutated)
        );

        let outcome = {
            let mut guard = RestoreGuard::new(delegate, &point.file_path);
            guard.write_file(&point.file_path, &mutated);
            guard.run_test_suite(&results_file_name(point))
        };
        info!(
            "[{}/{}] {}:{} {} -> {}",
            index + 1,
            worklist.len(),
            point.file_path,
            point.position.line,
            point.operator,
            outcome
        );

        outcomes.push(MutationTestOutcome::new(outcome, point.clone(), instance.description()));

        if outcome == TestSuiteOutcome::BuildError {
            consecutive_build_errors += 1;
        } else {
            consecutive_build_errors = 0;
        }
        if consecutive_build_errors >= MAX_CONSECUTIVE_BUILD_ERRORS {
            warn!("{} consecutive build errors, giving up", consecutive_build_errors);
            delegate.abort_testing(AbortReason::TooManyBuildErrors);
            return Err(AbortReason::TooManyBuildErrors);
        }
    }

    Ok(outcomes)
}

pub fn generate_diff(original: &str, mutated: &str) -> String {
    use similar::TextDiff;
    let diff = TextDiff::from_lines(original, mutated);
    let mut output = String::new();
    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => {
                output.push_str(&format!("- {}", change));
            }
            similar::ChangeTag::Insert => {
                output.push_str(&format!("+ {}", change));
            }
            _ => {}
        }
    }
    output
}
