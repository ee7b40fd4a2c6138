//! The closed set of mutation operators.
//!
//! Every operator is a pair of pure functions over a [`SourceFile`]:
//! `discover` lists the positions where it applies and `rewrite` turns one
//! of those positions into a byte-range replacement.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grammar::Grammar;
use crate::mutants::Rewrite;
use crate::position::Position;
use crate::syntax::{SourceFile, SyntaxNode};
use crate::{conditionals, side_effects};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationOperatorKind {
    NegateConditionals,
    RemoveSideEffects,
}

impl MutationOperatorKind {
    pub const ALL: [MutationOperatorKind; 2] = [
        MutationOperatorKind::NegateConditionals,
        MutationOperatorKind::RemoveSideEffects,
    ];

    /// Identifier used in configuration files and reports.
    pub fn id(&self) -> &'static str {
        match self {
            MutationOperatorKind::NegateConditionals => "negateConditionals",
            MutationOperatorKind::RemoveSideEffects => "removeSideEffects",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MutationOperatorKind::NegateConditionals => "Negate Conditionals",
            MutationOperatorKind::RemoveSideEffects => "Remove Side Effects",
        }
    }

    pub fn default_policy(&self) -> DiscoveryPolicy {
        match self {
            MutationOperatorKind::NegateConditionals => DiscoveryPolicy {
                descend_into_type_declarations: true,
            },
            MutationOperatorKind::RemoveSideEffects => DiscoveryPolicy {
                descend_into_type_declarations: false,
            },
        }
    }

    /// Positions in `file` where this operator applies, in source order.
    pub fn discover(&self, file: &SourceFile, policy: DiscoveryPolicy) -> Vec<Position> {
        let mut positions = match self {
            MutationOperatorKind::NegateConditionals => conditionals::discover(file, policy),
            MutationOperatorKind::RemoveSideEffects => side_effects::discover(file, policy),
        };
        positions.sort();
        positions.dedup();
        positions
    }

    /// The rewrite for a previously discovered `position`, or `None` when
    /// nothing at that position can be mutated.
    pub fn rewrite(&self, file: &SourceFile, position: Position) -> Option<Rewrite> {
        match self {
            MutationOperatorKind::NegateConditionals => conditionals::rewrite(file, position),
            MutationOperatorKind::RemoveSideEffects => side_effects::rewrite(file, position),
        }
    }
}

impl fmt::Display for MutationOperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Per-operator traversal switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryPolicy {
    /// Whether type declarations nested inside a function body are searched.
    pub descend_into_type_declarations: bool,
}

/// Pre-order walk over the parts of a file that hold code under test.
///
/// `visit` receives every node together with whether it sits inside a
/// function. Test scopes are never entered. Type declarations nested in a
/// function are skipped unless the policy allows them.
pub(crate) fn visit_code<'a>(
    node: SyntaxNode<'a>,
    grammar: &Grammar,
    policy: DiscoveryPolicy,
    in_function: bool,
    visit: &mut dyn FnMut(SyntaxNode<'a>, bool),
) {
    if grammar.is_test_scope(&node) {
        return;
    }
    if in_function
        && !policy.descend_into_type_declarations
        && grammar.is_type_declaration(node.kind())
    {
        return;
    }

    visit(node, in_function);

    let in_function = in_function || grammar.is_function(node.kind());
    for child in node.children() {
        visit_code(child, grammar, policy, in_function, visit);
    }
}
