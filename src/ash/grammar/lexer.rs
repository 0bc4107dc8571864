//! Tokenization and token stream transformations
//!
//! Logos produces the raw token stream. Two passes then shape it for the
//! grammar:
//!
//! - `fold_newlines` drops line breaks that do not end a statement (inside
//!   brackets, after a trailing operator or comma, before a leading `|>`)
//! - `readings` expands atoms containing `@` into their alternative readings

use super::error::GrammarError;
use super::tokens::Token;
use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::trace;

/// Type alias for token with span
pub type TokenSpan = (Token, Range<usize>);

/// At most this many `@` atoms are read both ways. Beyond it, the remaining
/// `@` atoms keep their single-atom reading.
pub const MAX_AMBIGUOUS_ATOMS: usize = 8;

static ATTRIBUTE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@[a-z_][A-Za-z0-9_]*$").unwrap());

/// Tokenize source, failing on the first character no token accepts.
///
/// A leading byte order mark is skipped; spans still index into `source`.
pub fn tokenize_with_spans(source: &str) -> Result<Vec<TokenSpan>, GrammarError> {
    let (offset, body) = match source.strip_prefix('\u{feff}') {
        Some(rest) => (source.len() - rest.len(), rest),
        None => (0, source),
    };
    let mut lexer = Token::lexer(body);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let span = span.start + offset..span.end + offset;
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(GrammarError::UnexpectedCharacter {
                    text: lexer.slice().to_string(),
                    span,
                })
            }
        }
    }

    Ok(tokens)
}

#[derive(Clone, Copy, PartialEq)]
enum Nesting {
    Bracket,
    Block,
}

/// Remove line breaks that do not terminate a statement.
///
/// A line break is kept inside `do`/`fn` blocks, even when the block itself
/// sits inside brackets, and dropped inside bare brackets.
pub fn fold_newlines(tokens: Vec<TokenSpan>) -> Vec<TokenSpan> {
    let mut folded: Vec<TokenSpan> = Vec::with_capacity(tokens.len());
    let mut nesting: Vec<Nesting> = Vec::new();

    for (token, span) in tokens {
        match &token {
            t if t.is_open_bracket() => nesting.push(Nesting::Bracket),
            t if t.is_close_bracket() => {
                nesting.pop();
            }
            Token::Do | Token::Fn => nesting.push(Nesting::Block),
            Token::End => {
                nesting.pop();
            }
            _ => {}
        }

        match &token {
            Token::Newline => {
                let inside_brackets = nesting.last() == Some(&Nesting::Bracket);
                let continues = folded.last().map_or(true, |(prev, _)| prev.continues_line());
                if inside_brackets || continues {
                    continue;
                }
            }
            Token::Operator(op) if op == "|>" => {
                if matches!(folded.last(), Some((Token::Newline, _))) {
                    folded.pop();
                }
            }
            _ => {}
        }
        folded.push((token, span));
    }

    folded
}

/// Whether the stream ends with a `do`/`fn` block or a bracket still open
pub fn ends_inside_open_construct(tokens: &[TokenSpan]) -> bool {
    let mut depth: isize = 0;
    for (token, _) in tokens {
        match token {
            t if t.is_open_bracket() => depth += 1,
            t if t.is_close_bracket() => depth -= 1,
            Token::Do | Token::Fn => depth += 1,
            Token::End => depth -= 1,
            _ => {}
        }
    }
    depth > 0
}

/// All readings of a token stream.
///
/// An atom such as `:node@host` reads either as one atom or as the atom `:node`
/// followed by the module attribute `@host`. The first reading is always the
/// stream as lexed.
pub fn readings(tokens: &[TokenSpan]) -> Vec<Vec<TokenSpan>> {
    let ambiguous: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, (token, _))| match token {
            Token::Atom(text) => split_at_attribute(text).is_some(),
            _ => false,
        })
        .map(|(index, _)| index)
        .take(MAX_AMBIGUOUS_ATOMS)
        .collect();

    if !ambiguous.is_empty() {
        trace!(atoms = ambiguous.len(), "expanding ambiguous atom readings");
    }

    let mut variants = Vec::with_capacity(1 << ambiguous.len());
    for mask in 0u32..(1u32 << ambiguous.len()) {
        let mut variant = Vec::with_capacity(tokens.len() + ambiguous.len());
        for (index, (token, span)) in tokens.iter().enumerate() {
            let split = ambiguous
                .iter()
                .position(|&a| a == index)
                .map_or(false, |bit| mask & (1 << bit) != 0);
            match token {
                Token::Atom(text) if split => {
                    if let Some(at) = split_at_attribute(text) {
                        let middle = span.start + at;
                        variant.push((Token::Atom(text[..at].to_string()), span.start..middle));
                        variant.push((Token::ModuleAttribute(text[at..].to_string()), middle..span.end));
                        continue;
                    }
                    variant.push((token.clone(), span.clone()));
                }
                _ => variant.push((token.clone(), span.clone())),
            }
        }
        variants.push(variant);
    }
    variants
}

/// Byte offset of the `@` in an atom whose tail is a valid module attribute
fn split_at_attribute(atom: &str) -> Option<usize> {
    let at = atom.find('@')?;
    ATTRIBUTE_SEGMENT.is_match(&atom[at..]).then_some(at)
}
