//! "Remove Side Effects": delete a statement that is only run for its effect.
//!
//! A statement inside a function body is a candidate when it is not a
//! binding, unless it binds to the ignored name `_`, and it calls something:
//! the statement itself is a call, or it calls a method through a member
//! access somewhere below it. Calls that print, panic or end the process are
//! never candidates. A `try` expression over a member access always is.
//!
//! The mutation point is the end position of the statement.

use std::ops::Range;

use crate::grammar::Grammar;
use crate::mutants::Rewrite;
use crate::operators::{visit_code, DiscoveryPolicy};
use crate::position::Position;
use crate::syntax::{SourceFile, SyntaxNode};

struct Candidate<'a> {
    statement: SyntaxNode<'a>,
    block: SyntaxNode<'a>,
}

pub(crate) fn discover(file: &SourceFile, policy: DiscoveryPolicy) -> Vec<Position> {
    candidates(file, policy)
        .iter()
        .map(|candidate| candidate.statement.end())
        .collect()
}

pub(crate) fn rewrite(file: &SourceFile, position: Position) -> Option<Rewrite> {
    let grammar = file.language().grammar();
    let candidates = candidates(
        file,
        DiscoveryPolicy {
            descend_into_type_declarations: true,
        },
    );

    // Exact match first, then any candidate ending on the same line.
    let target = candidates
        .iter()
        .find(|candidate| candidate.statement.end() == position)
        .or_else(|| {
            candidates
                .iter()
                .find(|candidate| candidate.statement.end().line == position.line)
        })?;

    Some(removal(file.source(), target, grammar))
}

fn candidates(file: &SourceFile, policy: DiscoveryPolicy) -> Vec<Candidate<'_>> {
    let grammar = file.language().grammar();
    let mut found = Vec::new();
    visit_code(file.root(), grammar, policy, false, &mut |node, in_function| {
        if !in_function || !grammar.is_block(node.kind()) {
            return;
        }
        for statement in node.named_children() {
            if is_removal_candidate(&statement, grammar) {
                found.push(Candidate { statement, block: node });
            }
        }
    });
    found
}

fn is_removal_candidate(statement: &SyntaxNode<'_>, grammar: &Grammar) -> bool {
    if !grammar.is_simple_statement(statement.kind()) {
        return false;
    }
    // A call directly in a block without a trailing `;` is the block's value.
    if grammar.callee_field(statement.kind()).is_some() && !is_terminated(statement) {
        return false;
    }
    let expression = statement_expression(statement, grammar);

    if let Some(expression) = expression {
        if grammar.is_try(expression.kind())
            && contains(&expression, grammar, &|node| grammar.is_member_access(node.kind()))
        {
            return true;
        }
    }

    let discarded = match binding_discards(statement, expression.as_ref(), grammar) {
        Some(true) => true,
        Some(false) => return false,
        None => false,
    };

    let top = expression.and_then(|expression| peel(expression, grammar));
    if top.is_some_and(|top| grammar.is_control_flow(top.kind())) {
        return false;
    }

    let calls_special = contains(statement, grammar, &|node| {
        callee(node, grammar).is_some_and(|callee| grammar.is_special_callee(callee.text()))
    });
    if calls_special {
        return false;
    }

    let is_call = top.is_some_and(|top| grammar.callee_field(top.kind()).is_some());
    let calls_member = contains(statement, grammar, &|node| {
        callee(node, grammar).is_some_and(|callee| grammar.is_member_access(callee.kind()))
    });

    discarded || is_call || calls_member
}

/// The expression a statement evaluates, or `None` for declarations.
fn statement_expression<'a>(
    statement: &SyntaxNode<'a>,
    grammar: &Grammar,
) -> Option<SyntaxNode<'a>> {
    if grammar.callee_field(statement.kind()).is_some() {
        return Some(*statement);
    }
    if grammar.is_declaration(statement.kind()) {
        return None;
    }
    statement.named_children().into_iter().next()
}

/// Strip `await` and `try` wrappers.
fn peel<'a>(mut expression: SyntaxNode<'a>, grammar: &Grammar) -> Option<SyntaxNode<'a>> {
    while grammar.is_await(expression.kind()) || grammar.is_try(expression.kind()) {
        expression = expression.named_children().into_iter().next()?;
    }
    Some(expression)
}

/// `Some(true)` when the statement binds its value to `_`, `Some(false)` for
/// any other binding, `None` when it binds nothing.
fn binding_discards(
    statement: &SyntaxNode<'_>,
    expression: Option<&SyntaxNode<'_>>,
    grammar: &Grammar,
) -> Option<bool> {
    let target = if grammar.is_declaration(statement.kind()) {
        statement.field("pattern").or_else(|| {
            statement
                .named_children()
                .into_iter()
                .find_map(|declarator| declarator.field("name"))
        })
    } else {
        match expression {
            Some(expression) if grammar.is_assignment(expression.kind()) => {
                expression.field("left")
            }
            _ => return None,
        }
    };
    Some(target.is_some_and(|target| target.text() == "_"))
}

fn callee<'a>(node: &SyntaxNode<'a>, grammar: &Grammar) -> Option<SyntaxNode<'a>> {
    grammar.callee_field(node.kind()).and_then(|field| node.field(field))
}

/// Whether `node` or a descendant matches, without entering nested blocks or closures.
fn contains(
    node: &SyntaxNode<'_>,
    grammar: &Grammar,
    predicate: &dyn Fn(&SyntaxNode<'_>) -> bool,
) -> bool {
    if predicate(node) {
        return true;
    }
    node.children()
        .iter()
        .filter(|child| !grammar.is_boundary(child.kind()))
        .any(|child| contains(child, grammar, predicate))
}

/// The `;` token that directly follows `statement`, if any.
fn terminator<'a>(statement: &SyntaxNode<'a>) -> Option<SyntaxNode<'a>> {
    statement
        .next_sibling()
        .filter(|next| !next.is_named() && next.kind() == ";")
}

fn is_terminated(statement: &SyntaxNode<'_>) -> bool {
    terminator(statement).is_some()
}

fn removal(source: &str, candidate: &Candidate<'_>, grammar: &Grammar) -> Rewrite {
    let statement = candidate.statement;
    let mut range = statement.byte_range();
    if let Some(semicolon) = terminator(&statement) {
        range.end = semicolon.byte_range().end;
    }

    let statements = candidate
        .block
        .named_children()
        .iter()
        .filter(|child| !child.kind().contains("comment"))
        .count();
    if let (Some(filler), 1) = (grammar.empty_block_filler, statements) {
        return Rewrite {
            original: source[range.clone()].to_string(),
            start_byte: range.start,
            end_byte: range.end,
            replacement: filler.to_string(),
        };
    }

    let range = whole_lines(source, range);
    Rewrite {
        original: source[range.clone()].to_string(),
        start_byte: range.start,
        end_byte: range.end,
        replacement: String::new(),
    }
}

/// Widen `range` to full lines when nothing else shares them.
fn whole_lines(source: &str, range: Range<usize>) -> Range<usize> {
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[range.end..]
        .find('\n')
        .map_or(source.len(), |i| range.end + i + 1);

    let before = &source[line_start..range.start];
    let after = &source[range.end..line_end];
    if before.trim().is_empty() && after.trim().is_empty() {
        line_start..line_end
    } else {
        range
    }
}
