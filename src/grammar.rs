//! Node-kind tables that let the operators work on any supported grammar.
//!
//! Operators never match on tree-sitter kinds directly; they ask the
//! [`Grammar`] of the file's language whether a node plays a given role
//! (statement block, call, member access, ...).

use camino::Utf8Path;

use crate::syntax::SyntaxNode;
use crate::Language;

/// How a scope's name marks it as test code.
pub enum NameMatch {
    Exact(&'static str),
    Prefix(&'static str),
    Suffix(&'static str),
}

impl NameMatch {
    fn matches(&self, text: &str) -> bool {
        match *self {
            NameMatch::Exact(expected) => text == expected,
            NameMatch::Prefix(prefix) => text.starts_with(prefix),
            NameMatch::Suffix(suffix) => text.ends_with(suffix),
        }
    }
}

/// A node of `kind` whose `field` text matches `name` holds tests, not code under test.
pub struct TestScope {
    pub kind: &'static str,
    pub field: &'static str,
    pub name: NameMatch,
}

pub struct Grammar {
    /// Declarations whose body is scanned for mutation points.
    pub functions: &'static [&'static str],
    /// Nodes whose named children are statements.
    pub blocks: &'static [&'static str],
    /// Statements that are removal candidates at all (no compound statements).
    pub simple_statements: &'static [&'static str],
    /// Variable declarations. The binding target is the `pattern` field.
    pub declarations: &'static [&'static str],
    /// Assignments. The binding target is the `left` field.
    pub assignments: &'static [&'static str],
    /// Call-like expressions paired with the field naming their callee.
    pub calls: &'static [(&'static str, &'static str)],
    pub member_accesses: &'static [&'static str],
    pub try_expressions: &'static [&'static str],
    /// Wrappers peeled off a statement's expression before classifying it.
    pub await_expressions: &'static [&'static str],
    /// Top-level statement expressions that are never removed.
    pub control_flow: &'static [&'static str],
    /// Nested search for member calls stops at these.
    pub boundaries: &'static [&'static str],
    pub type_declarations: &'static [&'static str],
    /// Parents of comparison operator tokens.
    pub comparisons: &'static [&'static str],
    pub negations: &'static [(&'static str, &'static str)],
    /// Callee substrings of calls that must never be removed.
    pub special_calls: &'static [&'static str],
    pub test_scopes: &'static [TestScope],
    /// Attributes that mark the item they precede as test code.
    pub test_attributes: &'static [NameMatch],
    /// Kinds that may sit between a test attribute and the item it marks.
    pub attribute_kinds: &'static [&'static str],
    /// Directories holding only test code. Files below them are never mutated.
    pub test_directories: &'static [&'static str],
    /// Statement left behind when a block would otherwise become empty.
    pub empty_block_filler: Option<&'static str>,
}

const C_LIKE_NEGATIONS: &[(&str, &str)] = &[
    ("==", "!="),
    ("!=", "=="),
    ("<", ">="),
    (">", "<="),
    ("<=", ">"),
    (">=", "<"),
];

const JS_NEGATIONS: &[(&str, &str)] = &[
    ("===", "!=="),
    ("!==", "==="),
    ("==", "!="),
    ("!=", "=="),
    ("<", ">="),
    (">", "<="),
    ("<=", ">"),
    (">=", "<"),
];

pub const RUST: Grammar = Grammar {
    functions: &["function_item"],
    blocks: &["block"],
    simple_statements: &["expression_statement", "let_declaration", "macro_invocation"],
    declarations: &["let_declaration"],
    assignments: &["assignment_expression", "compound_assignment_expr"],
    calls: &[("call_expression", "function"), ("macro_invocation", "macro")],
    member_accesses: &["field_expression"],
    try_expressions: &["try_expression"],
    await_expressions: &["await_expression"],
    control_flow: &[
        "return_expression",
        "break_expression",
        "continue_expression",
        "yield_expression",
        "if_expression",
        "match_expression",
        "for_expression",
        "while_expression",
        "loop_expression",
        "block",
        "unsafe_block",
        "async_block",
        "const_block",
    ],
    boundaries: &["block", "closure_expression"],
    type_declarations: &[
        "struct_item",
        "enum_item",
        "union_item",
        "impl_item",
        "trait_item",
        "mod_item",
    ],
    comparisons: &["binary_expression"],
    negations: C_LIKE_NEGATIONS,
    special_calls: &["print", "panic", "unreachable", "todo", "unimplemented", "exit", "abort"],
    test_scopes: &[TestScope {
        kind: "mod_item",
        field: "name",
        name: NameMatch::Exact("tests"),
    }],
    test_attributes: &[
        NameMatch::Exact("test"),
        NameMatch::Exact("cfg(test)"),
        NameMatch::Suffix("::test"),
    ],
    attribute_kinds: &["attribute_item", "line_comment", "block_comment"],
    test_directories: &["tests", "benches"],
    empty_block_filler: None,
};

pub const PYTHON: Grammar = Grammar {
    functions: &["function_definition"],
    blocks: &["block"],
    simple_statements: &["expression_statement"],
    declarations: &[],
    assignments: &["assignment", "augmented_assignment"],
    calls: &[("call", "function")],
    member_accesses: &["attribute"],
    try_expressions: &[],
    await_expressions: &["await"],
    control_flow: &["yield"],
    boundaries: &["block", "lambda"],
    type_declarations: &["class_definition"],
    comparisons: &["comparison_operator"],
    negations: C_LIKE_NEGATIONS,
    special_calls: &["print", "exit", "quit", "abort"],
    test_scopes: &[
        TestScope {
            kind: "function_definition",
            field: "name",
            name: NameMatch::Prefix("test_"),
        },
        TestScope {
            kind: "class_definition",
            field: "name",
            name: NameMatch::Prefix("Test"),
        },
    ],
    test_attributes: &[],
    attribute_kinds: &[],
    test_directories: &[],
    empty_block_filler: Some("pass"),
};

pub const JAVASCRIPT: Grammar = Grammar {
    functions: &[
        "function_declaration",
        "generator_function_declaration",
        "method_definition",
        "function_expression",
        "function",
        "generator_function",
        "arrow_function",
    ],
    blocks: &["statement_block"],
    simple_statements: &["expression_statement", "lexical_declaration", "variable_declaration"],
    declarations: &["lexical_declaration", "variable_declaration"],
    assignments: &["assignment_expression", "augmented_assignment_expression"],
    calls: &[("call_expression", "function")],
    member_accesses: &["member_expression"],
    try_expressions: &[],
    await_expressions: &["await_expression"],
    control_flow: &["yield_expression"],
    boundaries: &["statement_block", "arrow_function", "function_expression", "function"],
    type_declarations: &["class_declaration", "class"],
    comparisons: &["binary_expression"],
    negations: JS_NEGATIONS,
    special_calls: &["console.", "process.exit", "process.abort"],
    test_scopes: &[
        TestScope {
            kind: "call_expression",
            field: "function",
            name: NameMatch::Exact("describe"),
        },
        TestScope {
            kind: "call_expression",
            field: "function",
            name: NameMatch::Exact("it"),
        },
        TestScope {
            kind: "call_expression",
            field: "function",
            name: NameMatch::Exact("test"),
        },
    ],
    test_attributes: &[],
    attribute_kinds: &[],
    test_directories: &[],
    empty_block_filler: None,
};

pub const TYPESCRIPT: Grammar = Grammar {
    type_declarations: &[
        "class_declaration",
        "abstract_class_declaration",
        "class",
        "interface_declaration",
        "enum_declaration",
        "type_alias_declaration",
        "internal_module",
        "module",
    ],
    ..JAVASCRIPT
};

impl Grammar {
    pub fn is_function(&self, kind: &str) -> bool {
        self.functions.contains(&kind)
    }

    pub fn is_block(&self, kind: &str) -> bool {
        self.blocks.contains(&kind)
    }

    pub fn is_simple_statement(&self, kind: &str) -> bool {
        self.simple_statements.contains(&kind)
    }

    pub fn is_declaration(&self, kind: &str) -> bool {
        self.declarations.contains(&kind)
    }

    pub fn is_assignment(&self, kind: &str) -> bool {
        self.assignments.contains(&kind)
    }

    /// Field holding the callee when `kind` is a call.
    pub fn callee_field(&self, kind: &str) -> Option<&'static str> {
        self.calls
            .iter()
            .find(|(call, _)| *call == kind)
            .map(|(_, field)| *field)
    }

    pub fn is_member_access(&self, kind: &str) -> bool {
        self.member_accesses.contains(&kind)
    }

    pub fn is_try(&self, kind: &str) -> bool {
        self.try_expressions.contains(&kind)
    }

    pub fn is_await(&self, kind: &str) -> bool {
        self.await_expressions.contains(&kind)
    }

    pub fn is_control_flow(&self, kind: &str) -> bool {
        self.control_flow.contains(&kind)
    }

    pub fn is_boundary(&self, kind: &str) -> bool {
        self.boundaries.contains(&kind)
    }

    pub fn is_type_declaration(&self, kind: &str) -> bool {
        self.type_declarations.contains(&kind)
    }

    pub fn is_comparison(&self, kind: &str) -> bool {
        self.comparisons.contains(&kind)
    }

    pub fn negation_of(&self, operator: &str) -> Option<&'static str> {
        self.negations
            .iter()
            .find(|(op, _)| *op == operator)
            .map(|(_, negated)| *negated)
    }

    pub fn is_special_callee(&self, callee: &str) -> bool {
        self.special_calls.iter().any(|special| callee.contains(special))
    }

    pub fn is_test_scope(&self, node: &SyntaxNode<'_>) -> bool {
        let named_as_test = self.test_scopes.iter().any(|scope| {
            scope.kind == node.kind()
                && node
                    .field(scope.field)
                    .is_some_and(|name| scope.name.matches(name.text()))
        });
        named_as_test || self.has_test_attribute(node)
    }

    /// Whether one of the attributes stacked directly above `node` marks it as test code.
    fn has_test_attribute(&self, node: &SyntaxNode<'_>) -> bool {
        let mut previous = node.prev_sibling();
        while let Some(sibling) = previous {
            if !self.attribute_kinds.contains(&sibling.kind()) {
                return false;
            }
            let marks_test = sibling.named_children().first().is_some_and(|attribute| {
                let text: String = attribute.text().split_whitespace().collect();
                self.test_attributes.iter().any(|name| name.matches(&text))
            });
            if marks_test {
                return true;
            }
            previous = sibling.prev_sibling();
        }
        false
    }

    /// Whether a file at `relative_path` sits below a test-only directory.
    pub fn is_in_test_directory(&self, relative_path: &Utf8Path) -> bool {
        relative_path.parent().is_some_and(|dir| {
            dir.components()
                .any(|component| self.test_directories.contains(&component.as_str()))
        })
    }
}

impl Language {
    pub fn grammar(self) -> &'static Grammar {
        match self {
            Language::Rust => &RUST,
            Language::Python => &PYTHON,
            Language::JavaScript => &JAVASCRIPT,
            Language::TypeScript | Language::Tsx => &TYPESCRIPT,
        }
    }

    pub(crate) fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negations_are_involutions_for_equality() {
        for grammar in [&RUST, &PYTHON, &JAVASCRIPT] {
            assert_eq!(grammar.negation_of("=="), Some("!="));
            assert_eq!(grammar.negation_of("!="), Some("=="));
        }
        assert_eq!(JAVASCRIPT.negation_of("==="), Some("!=="));
        assert_eq!(RUST.negation_of("==="), None);
    }

    #[test]
    fn ordering_operators_negate_to_complement() {
        assert_eq!(RUST.negation_of("<"), Some(">="));
        assert_eq!(RUST.negation_of(">"), Some("<="));
        assert_eq!(RUST.negation_of("<="), Some(">"));
        assert_eq!(RUST.negation_of(">="), Some("<"));
        assert_eq!(RUST.negation_of("+"), None);
    }

    #[test]
    fn special_callees_match_by_substring() {
        assert!(RUST.is_special_callee("println"));
        assert!(RUST.is_special_callee("std::process::exit"));
        assert!(PYTHON.is_special_callee("sys.exit"));
        assert!(JAVASCRIPT.is_special_callee("console.log"));
        assert!(!RUST.is_special_callee("self.store.save"));
    }

    #[test]
    fn typescript_extends_javascript() {
        assert!(TYPESCRIPT.is_type_declaration("interface_declaration"));
        assert!(TYPESCRIPT.is_function("arrow_function"));
        assert_eq!(TYPESCRIPT.callee_field("call_expression"), Some("function"));
        assert!(!JAVASCRIPT.is_type_declaration("interface_declaration"));
    }
}
