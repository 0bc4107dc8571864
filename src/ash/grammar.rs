//! Grammar-based tokenizer and parser
//!
//! A logos lexer and a chumsky grammar that recognise the constructs of the
//! host language the DSL is embedded in: module definitions, qualifying
//! declarations, section openers, simple macro calls, qualified calls and atom
//! literals.
//!
//! Parsing is ambiguity-aware. An atom containing `@` has two readings (one
//! atom, or an atom followed by a module attribute), and every reading that
//! parses yields its own tree. For `k` such atoms there are up to `2^k` trees,
//! so the number of atoms read both ways is capped at
//! [`lexer::MAX_AMBIGUOUS_ATOMS`].
//!
//! Outcomes of [`parse`]:
//! - one or more trees: the input is an instance of the grammar
//! - zero trees: the input ended inside an open construct
//! - `Err`: a token or character the grammar cannot accept

pub mod error;
pub mod lexer;
mod parser;
pub mod tokens;
pub mod tree;

pub use error::GrammarError;
pub use lexer::{tokenize_with_spans, TokenSpan};
pub use tokens::Token;
pub use tree::{NodeKind, ParseTree, SyntaxNode};

use lexer::{ends_inside_open_construct, fold_newlines, readings};
use parser::ParserError;
use std::ops::Range;
use tracing::debug;

/// Parse source into every tree the grammar admits
pub fn parse(source: &str) -> Result<Vec<ParseTree>, GrammarError> {
    let tokens = fold_newlines(tokenize_with_spans(source)?);
    let trees = parse_readings(source, &tokens, parser::file(), |mut nodes, spans| {
        for node in &mut nodes {
            node.resolve_spans(spans);
        }
        ParseTree { nodes }
    })?;
    debug!(trees = trees.len(), "grammar parse finished");
    Ok(trees)
}

/// Parse text that should be exactly one atom literal.
///
/// Returns every reading of the text as a single atom; `:foo@bar` has one, and
/// so does `:ok`. Empty input has none.
pub fn parse_atom_literal(text: &str) -> Result<Vec<SyntaxNode>, GrammarError> {
    let tokens = tokenize_with_spans(text)?;
    parse_readings(text, &tokens, parser::atom_literal(), |mut node, spans| {
        node.resolve_spans(spans);
        node
    })
}

/// Whether the text is a valid atom literal
pub fn is_atom_literal(text: &str) -> bool {
    matches!(parse_atom_literal(text), Ok(nodes) if !nodes.is_empty())
}

fn parse_readings<O, R, P, F>(
    source: &str,
    tokens: &[TokenSpan],
    parser: P,
    finish: F,
) -> Result<Vec<R>, GrammarError>
where
    P: chumsky::Parser<TokenSpan, O, Error = ParserError>,
    F: Fn(O, &[Range<usize>]) -> R,
{
    let mut results = Vec::new();
    let mut primary_errors = None;

    for (index, reading) in readings(tokens).into_iter().enumerate() {
        let spans: Vec<Range<usize>> = reading.iter().map(|(_, span)| span.clone()).collect();
        match parser.parse(reading) {
            Ok(output) => results.push(finish(output, &spans)),
            Err(errors) if index == 0 => primary_errors = Some(errors),
            Err(_) => {}
        }
    }

    if !results.is_empty() {
        return Ok(results);
    }
    match primary_errors.and_then(|errors| to_grammar_error(source, errors)) {
        Some(error) if !ends_inside_open_construct(tokens) => Err(error),
        _ => {
            debug!("input ended inside an open construct");
            Ok(Vec::new())
        }
    }
}

/// Convert the first error that found a token. Errors at end of input yield `None`.
fn to_grammar_error(source: &str, errors: Vec<ParserError>) -> Option<GrammarError> {
    errors.into_iter().find_map(|error| {
        let (token, span) = error.found()?.clone();
        let mut expected: Vec<String> = error
            .expected()
            .map(|e| match e {
                Some((t, _)) => t.kind().to_string(),
                None => "end of input".to_string(),
            })
            .collect();
        expected.sort();
        expected.dedup();
        Some(GrammarError::UnexpectedToken {
            token: source
                .get(span.clone())
                .map(str::to_string)
                .unwrap_or_else(|| token.to_string()),
            span,
            expected,
        })
    })
}
