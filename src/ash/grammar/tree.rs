//! Parse trees produced by the grammar

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Syntactic category of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// `defmodule Name do ... end`
    ModuleDefinition,
    /// `use Target, options`
    QualifyingDeclaration,
    /// `def name(args) do ... end` and the rest of the def family
    FunctionDefinition,
    /// `keyword [args] do ... end`
    SectionOpener,
    /// `keyword args` without a block
    SimpleMacroCall,
    /// `Module.function(args)`
    QualifiedCall,
    AtomLiteral,
    /// Any other statement
    Expression,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::ModuleDefinition => "module-definition",
            NodeKind::QualifyingDeclaration => "qualifying-declaration",
            NodeKind::FunctionDefinition => "function-definition",
            NodeKind::SectionOpener => "section-opener",
            NodeKind::SimpleMacroCall => "simple-macro-call",
            NodeKind::QualifiedCall => "qualified-call",
            NodeKind::AtomLiteral => "atom-literal",
            NodeKind::Expression => "expression",
        };
        write!(f, "{}", name)
    }
}

/// A classified span of source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Head text: the module path, declaration target, keyword, call path or atom
    pub text: String,
    /// Byte range in the source
    pub span: Range<usize>,
    /// Classified nodes found among the arguments
    pub arguments: Vec<SyntaxNode>,
    /// Statements of the attached `do` block
    pub body: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            arguments: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<SyntaxNode>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_body(mut self, body: Vec<SyntaxNode>) -> Self {
        self.body = body;
        self
    }

    /// Visit this node and every node below it, arguments before body
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SyntaxNode)) {
        visit(self);
        for node in self.arguments.iter().chain(&self.body) {
            node.walk(visit);
        }
    }

    /// Rewrite token-index spans to byte spans.
    ///
    /// Chumsky reports spans as ranges of token indices; `spans[i]` is the byte
    /// range of token `i`.
    pub(crate) fn resolve_spans(&mut self, spans: &[Range<usize>]) {
        let start = spans.get(self.span.start).map_or(0, |r| r.start);
        let end = self
            .span
            .end
            .checked_sub(1)
            .and_then(|last| spans.get(last))
            .map_or(start, |r| r.end);
        self.span = start..end.max(start);
        for node in self.arguments.iter_mut().chain(self.body.iter_mut()) {
            node.resolve_spans(spans);
        }
    }
}

/// One complete reading of the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTree {
    pub nodes: Vec<SyntaxNode>,
}

impl ParseTree {
    /// All nodes of a kind, in source order, at any depth
    pub fn find(&self, kind: NodeKind) -> Vec<&SyntaxNode> {
        let mut found = Vec::new();
        for node in &self.nodes {
            node.walk(&mut |n| {
                if n.kind == kind {
                    found.push(n)
                }
            });
        }
        found.sort_by_key(|n| n.span.start);
        found
    }

    /// Name of the first module definition
    pub fn module_name(&self) -> Option<&str> {
        self.find(NodeKind::ModuleDefinition)
            .first()
            .map(|n| n.text.as_str())
    }

    /// Targets of all qualifying declarations
    pub fn declaration_targets(&self) -> Vec<&str> {
        self.find(NodeKind::QualifyingDeclaration)
            .into_iter()
            .map(|n| n.text.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParseTree {
        let declaration = SyntaxNode::new(NodeKind::QualifyingDeclaration, "Ash.Resource", 15..31)
            .with_arguments(vec![SyntaxNode::new(NodeKind::AtomLiteral, ":blog", 42..47)]);
        let module = SyntaxNode::new(NodeKind::ModuleDefinition, "Blog.Post", 0..60)
            .with_body(vec![declaration]);
        ParseTree { nodes: vec![module] }
    }

    #[test]
    fn test_find_at_any_depth() {
        let tree = sample();
        let atoms = tree.find(NodeKind::AtomLiteral);
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].text, ":blog");
    }

    #[test]
    fn test_module_and_targets() {
        let tree = sample();
        assert_eq!(tree.module_name(), Some("Blog.Post"));
        assert_eq!(tree.declaration_targets(), vec!["Ash.Resource"]);
    }

    #[test]
    fn test_resolve_spans() {
        let mut node = SyntaxNode::new(NodeKind::SimpleMacroCall, "attribute", 1..3)
            .with_arguments(vec![SyntaxNode::new(NodeKind::AtomLiteral, ":a", 2..3)]);
        node.resolve_spans(&[0..4, 5..14, 15..17, 18..25]);
        assert_eq!(node.span, 5..17);
        assert_eq!(node.arguments[0].span, 15..17);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NodeKind::SectionOpener.to_string(), "section-opener");
        assert_eq!(NodeKind::AtomLiteral.to_string(), "atom-literal");
    }
}
