//! Multi-tier block extraction
//!
//! Walks the logical lines of a file with a stack of open blocks. Every `do`
//! or `fn` pushes a frame and every `end` pops one, so the stack depth is the
//! nesting counter. Frames are one of:
//!
//! - `Module`: a `defmodule` body; sections are recognised directly inside it
//! - `Node`: a section or detail being collected
//! - `Opaque`: any other block (`if`, `fn`, an unknown macro); nothing inside it is collected
//!
//! Configured mode recognises only the keywords declared for the enclosing
//! node. Generic mode accepts any bare-word keyword at every depth.
//!
//! When input ends with blocks still open, the frames are unwound and every
//! section discovered so far is returned with `end` left unset.

mod lines;

pub(crate) use lines::{logical_lines, LogicalLine};
use lines::MarkerKind;

use crate::ash::ast::{DslNode, Position, Section};
use crate::ash::config::{DetailShape, NameShape, SectionShape};
use crate::ash::declarations::MatchedModule;
use crate::ash::names;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A leading lowercase keyword followed by whitespace, a parenthesis or end of line
static KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z_][A-Za-z0-9_]*[?!]?)(?:\s+|\(|$)").unwrap());

/// Host language constructs that are never DSL keywords
const HOST_KEYWORDS: &[&str] = &[
    "def", "defp", "defmacro", "defmacrop", "defguard", "defguardp", "defdelegate",
    "defstruct", "defexception", "defprotocol", "defimpl", "defoverridable", "defmodule",
    "if", "unless", "case", "cond", "with", "for", "try", "receive", "quote", "unquote",
    "fn", "do", "end", "else", "after", "rescue", "catch", "when", "and", "or", "not",
    "in", "use", "require", "import", "alias",
];

/// Operators that make a leading word an expression rather than a keyword
const EXPRESSION_OPERATORS: &[&str] = &[
    "=", "|>", "<>", "++", "--", "->", "<-", "&&", "||", "!=", "..", "::", "+", "*", "/",
];

/// Extract sections for the modules matched in a file.
///
/// Section vocabularies of all matched modules are merged; when two modules
/// define the same section keyword, the first matched module wins.
pub fn extract_modules(source: &str, matched: &[MatchedModule]) -> Vec<Section> {
    let mut vocabulary: HashMap<&str, &SectionShape> = HashMap::new();
    for module in matched {
        for section in &module.configuration.sections {
            vocabulary.entry(section.keyword.as_str()).or_insert(section);
        }
    }
    if vocabulary.is_empty() {
        return Vec::new();
    }
    Extractor::new(Vocabulary::Configured(vocabulary)).run(source)
}

/// Extract sections without a configuration: any `<word> do` is a section and
/// any keyword inside a section is a detail.
pub fn extract_generic(source: &str) -> Vec<Section> {
    Extractor::new(Vocabulary::Generic).run(source)
}

enum Vocabulary<'c> {
    Configured(HashMap<&'c str, &'c SectionShape>),
    Generic,
}

#[derive(Clone, Copy)]
enum Allowed<'c> {
    Any,
    Shapes(&'c [DetailShape]),
}

enum Frame<'c> {
    Module,
    Opaque,
    Node { node: DslNode, allowed: Allowed<'c> },
}

/// A keyword recognised at the current depth
struct Recognized<'c> {
    node: DslNode,
    allowed: Allowed<'c>,
}

struct Extractor<'c> {
    vocabulary: Vocabulary<'c>,
    stack: Vec<Frame<'c>>,
    sections: Vec<Section>,
}

impl<'c> Extractor<'c> {
    fn new(vocabulary: Vocabulary<'c>) -> Self {
        Self {
            vocabulary,
            stack: Vec::new(),
            sections: Vec::new(),
        }
    }

    fn run(mut self, source: &str) -> Vec<Section> {
        for line in logical_lines(source) {
            self.line(&line);
        }

        if !self.stack.is_empty() {
            debug!(open = self.stack.len(), "input ended inside open blocks, recovering");
        }
        while let Some(frame) = self.stack.pop() {
            if let Frame::Node { node, .. } = frame {
                self.attach(node);
            }
        }

        debug!(sections = self.sections.len(), "extracted sections");
        self.sections
    }

    /// Walk a line marker by marker: `do` pushes a frame, `end` pops one, and the
    /// text between markers is a keyword statement of the innermost frame.
    fn line(&mut self, line: &LogicalLine) {
        let mut cursor = 0;
        for marker in line.markers() {
            match marker.kind {
                MarkerKind::Do => self.open(segment(line, cursor, marker.start), cursor == 0),
                MarkerKind::Fn => {
                    // `change fn changeset, _ -> ...`: keep the detail, skip the body
                    self.statement(segment(line, cursor, line.text.len()));
                    self.stack.push(Frame::Opaque);
                }
                MarkerKind::End => {
                    self.statement(segment(line, cursor, marker.start));
                    self.close(line.position_at(marker.start));
                }
            }
            cursor = marker.end;
        }
        self.statement(segment(line, cursor, line.text.len()));
    }

    fn open(&mut self, segment: Option<Segment>, starts_line: bool) {
        let Some(segment) = segment else {
            self.stack.push(Frame::Opaque);
            return;
        };
        if starts_line {
            self.recover_unclosed_section(&segment);
        }

        if let Some(Recognized { mut node, allowed }) = self.recognize(&segment) {
            node.is_block = true;
            trace!(keyword = %node.keyword, name = %node.name, "block opened");
            self.stack.push(Frame::Node { node, allowed });
        } else if self.at_section_level() && segment.masked.starts_with("defmodule") {
            self.stack.push(Frame::Module);
        } else {
            self.stack.push(Frame::Opaque);
        }
    }

    /// A keyword without a block. Only details are kept; sections always open a block.
    fn statement(&mut self, segment: Option<Segment>) {
        let Some(segment) = segment else {
            return;
        };
        if self.at_section_level() {
            return;
        }
        if let Some(Recognized { node, .. }) = self.recognize(&segment) {
            self.attach(node);
        }
    }

    /// A configured section keyword at the column of the open section means that
    /// section never reached its `end`: unwind it before opening the new one.
    fn recover_unclosed_section(&mut self, segment: &Segment) {
        let Some(keyword) = KEYWORD.captures(segment.masked).and_then(|caps| caps.get(1)) else {
            return;
        };
        let configured = matches!(
            &self.vocabulary,
            Vocabulary::Configured(sections) if sections.contains_key(keyword.as_str())
        );
        let base = self
            .stack
            .iter()
            .rposition(|frame| matches!(frame, Frame::Module))
            .map_or(0, |module| module + 1);
        let aligned = matches!(
            self.stack.get(base),
            Some(Frame::Node { node, .. }) if node.position.column == segment.position.column
        );
        if !configured || !aligned {
            return;
        }

        debug!(
            keyword = keyword.as_str(),
            line = segment.position.line,
            "previous section left open, recovering"
        );
        while self.stack.len() > base {
            if let Some(Frame::Node { node, .. }) = self.stack.pop() {
                self.attach(node);
            }
        }
    }

    /// Sections are recognised at the top of the file or directly in a module body
    fn at_section_level(&self) -> bool {
        matches!(self.stack.last(), None | Some(Frame::Module))
    }

    fn recognize(&self, segment: &Segment) -> Option<Recognized<'c>> {
        let caps = KEYWORD.captures(segment.masked)?;
        let keyword = caps.get(1)?.as_str();
        let rest = segment.text.get(keyword.len()..)?;
        if is_host_keyword(keyword) || is_expression(rest) {
            return None;
        }

        let (shape, allowed) = match self.stack.last() {
            None | Some(Frame::Module) => match &self.vocabulary {
                Vocabulary::Configured(sections) => {
                    let section: &'c SectionShape = sections.get(keyword).copied()?;
                    (NameShape::Single, Allowed::Shapes(&section.details))
                }
                Vocabulary::Generic => (NameShape::Single, Allowed::Any),
            },
            Some(Frame::Node { allowed, .. }) => match *allowed {
                Allowed::Any => (NameShape::Single, Allowed::Any),
                Allowed::Shapes(shapes) => {
                    let detail = shapes.iter().find(|d| d.keyword == keyword)?;
                    (detail.name, Allowed::Shapes(&detail.children))
                }
            },
            Some(Frame::Opaque) => return None,
        };

        let (name, arguments) = names::capture(shape, rest);
        Some(Recognized {
            node: DslNode::statement(keyword, name, segment.position).with_arguments(arguments),
            allowed,
        })
    }

    fn close(&mut self, position: Position) {
        match self.stack.pop() {
            Some(Frame::Node { mut node, .. }) => {
                node.end = Some(position);
                trace!(keyword = %node.keyword, "block closed");
                self.attach(node);
            }
            Some(_) => {}
            None => trace!(line = position.line, "unmatched end ignored"),
        }
    }

    /// Add a finished node to the enclosing node, or to the section list
    fn attach(&mut self, node: DslNode) {
        match self.stack.last_mut() {
            Some(Frame::Node { node: parent, .. }) => parent.children.push(node),
            _ => self.sections.push(node),
        }
    }
}

/// A trimmed stretch of a logical line between block markers
struct Segment<'l> {
    text: &'l str,
    masked: &'l str,
    position: Position,
}

fn segment(line: &LogicalLine, from: usize, to: usize) -> Option<Segment<'_>> {
    let text = line.text.get(from..to)?;
    let lead = text.len() - text.trim_start().len();
    let text = text[lead..].trim_end();
    if text.is_empty() {
        return None;
    }
    let start = from + lead;
    Some(Segment {
        text,
        masked: line.masked.get(start..start + text.len())?,
        position: line.position_at(start),
    })
}

/// Whether a word is a construct of the host language rather than a DSL keyword
pub(crate) fn is_host_keyword(word: &str) -> bool {
    HOST_KEYWORDS.contains(&word)
}

fn is_expression(rest: &str) -> bool {
    let rest = rest.trim_start();
    EXPRESSION_OPERATORS.iter().any(|op| rest.starts_with(op))
}
