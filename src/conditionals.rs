//! "Negate Conditionals": swap a comparison operator for its negation.
//!
//! The mutation point is the start of the operator token.

use crate::mutants::Rewrite;
use crate::operators::{visit_code, DiscoveryPolicy};
use crate::position::Position;
use crate::syntax::{SourceFile, SyntaxNode};

pub(crate) fn discover(file: &SourceFile, policy: DiscoveryPolicy) -> Vec<Position> {
    operator_tokens(file, policy)
        .iter()
        .map(|(token, _)| token.start())
        .collect()
}

pub(crate) fn rewrite(file: &SourceFile, position: Position) -> Option<Rewrite> {
    let tokens = operator_tokens(
        file,
        DiscoveryPolicy {
            descend_into_type_declarations: true,
        },
    );
    let (token, negated) = tokens
        .iter()
        .find(|(token, _)| token.start() == position)
        .or_else(|| tokens.iter().find(|(token, _)| token.start().same_location(&position)))?;

    let range = token.byte_range();
    Some(Rewrite {
        start_byte: range.start,
        end_byte: range.end,
        original: token.text().to_string(),
        replacement: negated.to_string(),
    })
}

/// Comparison operator tokens paired with their negation.
fn operator_tokens(
    file: &SourceFile,
    policy: DiscoveryPolicy,
) -> Vec<(SyntaxNode<'_>, &'static str)> {
    let grammar = file.language().grammar();
    let mut tokens = Vec::new();
    visit_code(file.root(), grammar, policy, false, &mut |node, _| {
        if !grammar.is_comparison(node.kind()) {
            return;
        }
        for child in node.children() {
            if child.is_named() {
                continue;
            }
            if let Some(negated) = grammar.negation_of(child.text()) {
                tokens.push((child, negated));
            }
        }
    });
    tokens
}
