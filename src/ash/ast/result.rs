//! The normalized parse result
//!
//! Every strategy returns a [`ParseResult`], so callers never need to know which
//! strategy produced it. `parser_name` is there for diagnostics and tests only.

use super::node::{DslNode, Section};
use super::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of Ash module a file declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Resource,
    Domain,
    TypeEnum,
    Reactor,
    Fragment,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Resource => "resource",
            FileKind::Domain => "domain",
            FileKind::TypeEnum => "type_enum",
            FileKind::Reactor => "reactor",
            FileKind::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// Structural summary of one source file.
///
/// `sections` is always empty when `is_ash_file` is false, and is ordered by
/// source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub is_ash_file: bool,
    pub module_name: String,
    pub kind: Option<FileKind>,
    pub sections: Vec<Section>,
    pub parser_name: String,
}

impl ParseResult {
    /// Result for a file that is not an instance of the DSL
    pub fn not_ash(module_name: impl Into<String>, parser_name: impl Into<String>) -> Self {
        Self {
            is_ash_file: false,
            module_name: module_name.into(),
            kind: None,
            sections: Vec::new(),
            parser_name: parser_name.into(),
        }
    }

    /// First section with the given name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.keyword == name)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.keyword.as_str()).collect()
    }

    /// Total number of nodes across all sections
    pub fn node_count(&self) -> usize {
        self.sections.iter().map(DslNode::node_count).sum()
    }

    /// The chain of nodes (outermost first) whose source lines cover `position`.
    ///
    /// Returns an empty vector when the position is outside every section.
    pub fn node_at(&self, position: Position) -> Vec<&DslNode> {
        let mut path = Vec::new();
        let mut candidates: &[DslNode] = &self.sections;

        // Later siblings win when an unterminated block makes ranges overlap.
        while let Some(node) = candidates
            .iter()
            .rev()
            .find(|n| n.covers_line(position.line))
        {
            path.push(node);
            candidates = &node.children;
        }

        path
    }
}
