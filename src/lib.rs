pub mod command;
pub mod config;
mod conditionals;
pub mod copy_tree;
pub mod delegate;
pub mod discovery;
pub mod error;
pub mod grammar;
pub mod mutants;
pub mod operators;
pub mod output;
pub mod position;
pub mod report;
pub mod runner;
pub mod safety;
pub mod score;
mod side_effects;
pub mod syntax;

pub use config::Configuration;
pub use delegate::{ProjectDelegate, TestingDelegate};
pub use error::{MuterError, Result};
pub use mutants::{
    AbortReason, MutationOperatorInstance, MutationPoint, MutationTestOutcome, Rewrite,
    TestSuiteOutcome,
};
pub use operators::{DiscoveryPolicy, MutationOperatorKind};
pub use position::Position;
pub use report::MuterTestReport;
pub use runner::perform_mutation_testing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Rust,
    JavaScript,
    TypeScript,
    Tsx,
}

pub fn detect_language(path: &std::path::Path) -> Option<Language> {
    match path.extension()?.to_str()? {
        "py" => Some(Language::Python),
        "rs" => Some(Language::Rust),
        "js" | "mjs" | "cjs" => Some(Language::JavaScript),
        "ts" | "mts" | "cts" => Some(Language::TypeScript),
        "tsx" | "jsx" => Some(Language::Tsx),
        _ => None,
    }
}
