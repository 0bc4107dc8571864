//! Grammar-based strategy
//!
//! Classifies the first tree the grammar produces. Section openers in the
//! module body become sections; inside them, section openers become nested
//! blocks and simple macro calls become statements.

use super::interface::ParseStrategy;
use super::normalize::normalize;
use super::simple::{enum_definition, marker_kind};
use crate::ash::ast::{DslNode, FileKind, ParseResult, SourceLocation};
use crate::ash::declarations::Declaration;
use crate::ash::grammar::{self, GrammarError, NodeKind, ParseTree, SyntaxNode};
use crate::ash::names::extract_name;
use tracing::debug;

const END_KEYWORD_LEN: usize = "end".len();

/// Parser backed by the formal grammar
#[derive(Debug, Default, Clone, Copy)]
pub struct GrammarParser;

impl GrammarParser {
    pub const NAME: &'static str = "GrammarParser";

    /// Parse, reporting grammar errors instead of folding them into a non-instance result
    pub fn try_parse(&self, source: &str) -> Result<ParseResult, GrammarError> {
        let trees = grammar::parse(source)?;
        let Some(tree) = trees.first() else {
            debug!("grammar produced no trees");
            return Ok(ParseResult::not_ash("", Self::NAME));
        };
        if trees.len() > 1 {
            debug!(trees = trees.len(), "ambiguous input, classifying the first tree");
        }
        Ok(classify(tree, source))
    }
}

impl ParseStrategy for GrammarParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, source: &str) -> ParseResult {
        self.try_parse(source).unwrap_or_else(|error| {
            debug!(%error, "grammar rejected input");
            ParseResult::not_ash("", Self::NAME)
        })
    }
}

fn classify(tree: &ParseTree, source: &str) -> ParseResult {
    let module_name = tree.module_name().unwrap_or_default().to_string();
    let location = SourceLocation::new(source);

    let marker = tree
        .find(NodeKind::QualifyingDeclaration)
        .into_iter()
        .find_map(|node| Some((node, marker_kind(&node.text)?)));
    let Some((declaration, kind)) = marker else {
        return ParseResult::not_ash(module_name, GrammarParser::NAME);
    };

    // Sections live in the first module body, or at the top of a bare script
    let statements = tree
        .find(NodeKind::ModuleDefinition)
        .first()
        .copied()
        .map_or(tree.nodes.as_slice(), |module| module.body.as_slice());

    let mut sections: Vec<DslNode> = statements
        .iter()
        .filter(|node| node.kind == NodeKind::SectionOpener)
        .map(|node| convert(node, source, &location))
        .collect();

    if kind == FileKind::TypeEnum {
        let declaration = Declaration {
            text: source
                .get(declaration.span.clone())
                .unwrap_or_default()
                .to_string(),
            position: location.byte_to_position(declaration.span.start),
        };
        sections.push(enum_definition(&declaration, source));
    }

    normalize(ParseResult {
        is_ash_file: true,
        module_name,
        kind: Some(kind),
        sections,
        parser_name: GrammarParser::NAME.to_string(),
    })
}

fn convert(node: &SyntaxNode, source: &str, location: &SourceLocation) -> DslNode {
    let position = location.byte_to_position(node.span.start);
    let head_start = (node.span.start + node.text.len()).min(source.len());
    let head_end = location.line_end(node.span.start, source.len()).max(head_start);
    let name = source
        .get(head_start..head_end)
        .map(extract_name)
        .unwrap_or_default();

    if node.kind != NodeKind::SectionOpener {
        return DslNode::statement(&node.text, name, position);
    }

    let mut block = DslNode::block(&node.text, name, position);
    block.end = Some(
        location.byte_to_position(node.span.end.saturating_sub(END_KEYWORD_LEN)),
    );
    block.children = node
        .body
        .iter()
        .filter(|child| {
            matches!(child.kind, NodeKind::SectionOpener | NodeKind::SimpleMacroCall)
        })
        .map(|child| convert(child, source, location))
        .collect();
    block
}
