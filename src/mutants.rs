use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operators::MutationOperatorKind;
use crate::position::Position;

/// Apply `operator` at `position` inside `file_path` (relative to the project root).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationPoint {
    pub operator: MutationOperatorKind,
    pub file_path: Utf8PathBuf,
    pub position: Position,
}

impl MutationPoint {
    pub fn new(
        operator: MutationOperatorKind,
        file_path: impl Into<Utf8PathBuf>,
        position: Position,
    ) -> Self {
        Self {
            operator,
            file_path: file_path.into(),
            position,
        }
    }

    pub fn file_name(&self) -> &str {
        self.file_path.file_name().unwrap_or(self.file_path.as_str())
    }
}

/// A single byte-range replacement in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub start_byte: usize,
    pub end_byte: usize,
    pub original: String,
    pub replacement: String,
}

/// A discovered mutation point together with the rewrite that produces its mutant.
#[derive(Debug, Clone)]
pub struct MutationOperatorInstance {
    pub point: MutationPoint,
    pub rewrite: Rewrite,
    source: Arc<str>,
}

impl MutationOperatorInstance {
    pub fn new(point: MutationPoint, rewrite: Rewrite, source: impl Into<Arc<str>>) -> Self {
        Self {
            point,
            rewrite,
            source: source.into(),
        }
    }

    pub fn file_path(&self) -> &Utf8Path {
        &self.point.file_path
    }

    pub fn original_source(&self) -> &str {
        &self.source
    }

    /// The complete file contents with this mutation applied.
    pub fn mutated_source(&self) -> String {
        let mut result = String::with_capacity(self.source.len() + self.rewrite.replacement.len());
        result.push_str(&self.source[..self.rewrite.start_byte]);
        result.push_str(&self.rewrite.replacement);
        result.push_str(&self.source[self.rewrite.end_byte..]);
        result
    }

    pub fn description(&self) -> String {
        self.point.operator.description().to_string()
    }
}

/// How one run of the test suite ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestSuiteOutcome {
    /// The mutant survived.
    Passed,
    /// The mutant was killed.
    Failed,
    BuildError,
    RuntimeError,
}

impl TestSuiteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestSuiteOutcome::Passed => "passed",
            TestSuiteOutcome::Failed => "failed",
            TestSuiteOutcome::BuildError => "buildError",
            TestSuiteOutcome::RuntimeError => "runtimeError",
        }
    }
}

impl fmt::Display for TestSuiteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTestOutcome {
    pub test_suite_outcome: TestSuiteOutcome,
    pub point: MutationPoint,
    pub applied_operator_description: String,
}

impl MutationTestOutcome {
    pub fn new(
        test_suite_outcome: TestSuiteOutcome,
        point: MutationPoint,
        description: impl Into<String>,
    ) -> Self {
        Self {
            test_suite_outcome,
            point,
            applied_operator_description: description.into(),
        }
    }
}

/// Why a mutation testing run stopped before the worklist was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AbortReason {
    #[error("the test suite did not pass before any mutant was applied")]
    InitialTestingFailed,
    #[error("too many consecutive build errors")]
    TooManyBuildErrors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutated_source_splices_rewrite() {
        let instance = MutationOperatorInstance::new(
            MutationPoint::new(
                MutationOperatorKind::NegateConditionals,
                "src/lib.rs",
                Position::new(1, 12, 11),
            ),
            Rewrite {
                start_byte: 11,
                end_byte: 13,
                original: "==".to_string(),
                replacement: "!=".to_string(),
            },
            "fn f() { a == b }",
        );
        assert_eq!(instance.mutated_source(), "fn f() { a != b }");
        assert_eq!(instance.original_source(), "fn f() { a == b }");
        assert_eq!(instance.point.file_name(), "lib.rs");
    }

    #[test]
    fn outcomes_serialize_camel_case() {
        assert_eq!(serde_json::to_string(&TestSuiteOutcome::BuildError).unwrap(), "\"buildError\"");
        assert_eq!(
            serde_json::to_string(&AbortReason::InitialTestingFailed).unwrap(),
            "\"initialTestingFailed\""
        );
        assert_eq!(TestSuiteOutcome::RuntimeError.to_string(), "runtimeError");
    }
}
