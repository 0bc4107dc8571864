//! The recursive section/detail node
//!
//! Sections, details and child details all share one node type. Depth is a property
//! of the parsed input, not of the type: a section is simply a node at the top of
//! the tree, a detail one level down, and so on without bound.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// A block or statement recovered from DSL source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DslNode {
    /// The keyword that introduced the node (`attributes`, `attribute`, `password`)
    pub keyword: String,
    /// The first name token after the keyword, or an empty string
    pub name: String,
    /// Leading positional arguments, recorded for shapes that take several names
    pub arguments: Vec<String>,
    /// Position of the keyword
    pub position: Position,
    /// Position of the closing `end`; `None` for statements and unterminated blocks
    pub end: Option<Position>,
    /// Whether the node opened a `do ... end` block
    pub is_block: bool,
    pub children: Vec<DslNode>,
}

/// A top-level DSL block
pub type Section = DslNode;

/// A statement or nested block inside a section
pub type Detail = DslNode;

/// A node inside a detail, at any further depth
pub type ChildDetail = DslNode;

impl DslNode {
    /// A node that opened a `do` block. `end` is filled in once the block closes.
    pub fn block(keyword: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self {
            keyword: keyword.into(),
            name: name.into(),
            arguments: Vec::new(),
            position,
            end: None,
            is_block: true,
            children: Vec::new(),
        }
    }

    /// A single-statement node with no nested block
    pub fn statement(
        keyword: impl Into<String>,
        name: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            is_block: false,
            ..Self::block(keyword, name, position)
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Whether a block node reached its closing `end`
    pub fn is_closed(&self) -> bool {
        !self.is_block || self.end.is_some()
    }

    /// `keyword` followed by the name, when there is one
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.keyword.clone()
        } else {
            format!("{} {}", self.keyword, self.name)
        }
    }

    /// First direct child with the given keyword
    pub fn child(&self, keyword: &str) -> Option<&DslNode> {
        self.children.iter().find(|c| c.keyword == keyword)
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DslNode::node_count).sum::<usize>()
    }

    /// Whether the node's source lines cover the given line.
    ///
    /// An unterminated block is treated as extending to the end of the file.
    pub fn covers_line(&self, line: usize) -> bool {
        if line < self.position.line {
            return false;
        }
        match (self.is_block, self.end) {
            (false, _) => line == self.position.line,
            (true, Some(end)) => line <= end.line,
            (true, None) => true,
        }
    }

    /// Sort children (recursively) by source position
    pub(crate) fn sort_by_position(&mut self) {
        self.children.sort_by_key(|c| c.position);
        for child in &mut self.children {
            child.sort_by_position();
        }
    }
}
