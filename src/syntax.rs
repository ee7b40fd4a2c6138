//! Parsed source files and the minimal node handle the operators work against.

use std::ops::Range;
use std::sync::Arc;

use camino::Utf8Path;
use tree_sitter::{Node, Parser, Tree};

use crate::error::{MuterError, Result};
use crate::position::Position;
use crate::Language;

/// A source file together with its syntax tree.
pub struct SourceFile {
    language: Language,
    source: Arc<str>,
    tree: Tree,
}

impl SourceFile {
    /// Parse `source` with the grammar of `language`.
    ///
    /// Trees containing syntax errors are rejected.
    pub fn parse(language: Language, source: impl Into<Arc<str>>, path: &Utf8Path) -> Result<Self> {
        let source = source.into();
        let mut parser = Parser::new();
        parser.set_language(&language.tree_sitter_language())?;

        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| MuterError::Parse { path: path.to_owned() })?;
        if tree.root_node().has_error() {
            return Err(MuterError::Parse { path: path.to_owned() });
        }

        Ok(Self { language, source, tree })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            node: self.tree.root_node(),
            source: &self.source,
        }
    }
}

/// Read-only view of one node in a [`SourceFile`].
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    node: Node<'a>,
    source: &'a str,
}

impl<'a> SyntaxNode<'a> {
    fn wrap(&self, node: Node<'a>) -> Self {
        Self { node, source: self.source }
    }

    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Named nodes are grammar rules; anonymous ones are literal tokens.
    pub fn is_named(&self) -> bool {
        self.node.is_named()
    }

    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|child| self.wrap(child))
            .collect()
    }

    pub fn named_children(&self) -> Vec<SyntaxNode<'a>> {
        self.children().into_iter().filter(|c| c.is_named()).collect()
    }

    pub fn field(&self, name: &str) -> Option<SyntaxNode<'a>> {
        self.node.child_by_field_name(name).map(|child| self.wrap(child))
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode<'a>> {
        self.node.next_sibling().map(|sibling| self.wrap(sibling))
    }

    pub fn prev_sibling(&self) -> Option<SyntaxNode<'a>> {
        self.node.prev_sibling().map(|sibling| self.wrap(sibling))
    }

    pub fn text(&self) -> &'a str {
        self.source.get(self.byte_range()).unwrap_or("")
    }

    pub fn start(&self) -> Position {
        Position::from_point(self.node.start_position(), self.node.start_byte())
    }

    pub fn end(&self) -> Position {
        Position::from_point(self.node.end_position(), self.node.end_byte())
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.node.start_byte()..self.node.end_byte()
    }
}

impl std::fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.kind(), self.start())
    }
}
