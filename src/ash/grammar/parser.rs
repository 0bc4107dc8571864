//! Chumsky grammar over the folded token stream
//!
//! ```text
//! file       := block EOI
//! block      := NL* (statement terminator NL*)*
//! statement  := module | declaration | function | call | expression
//! module     := defmodule ALIAS do_block
//! declaration:= use ALIAS (',' args)?
//! function   := DEF args? do_block?
//! call       := IDENT args? do_block?
//! expression := args do_block?
//! args       := piece+ (',' piece+)*
//! piece      := qualified_call | ATOM | '(' items ')' | '[' items ']' | '{' items '}'
//!             | fn block end | leaf
//! ```
//!
//! Statement-level arguments never contain a bare `do` block, so the block
//! after `attributes do` is attached to the statement. Inside brackets a `do`
//! block is just another piece.
//!
//! Spans in the produced nodes are token-index ranges; the caller resolves them
//! to byte ranges.

use super::lexer::TokenSpan;
use super::tokens::Token;
use super::tree::{NodeKind, SyntaxNode};
use crate::ash::extraction::is_host_keyword;
use chumsky::prelude::*;

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenSpan>;

type Nodes = Vec<SyntaxNode>;

fn flatten(groups: Vec<Nodes>) -> Nodes {
    groups.into_iter().flatten().collect()
}

/// Helper: match a specific token type, ignoring the span
fn token(t: Token) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok == &t).ignored()
}

fn identifier() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Identifier(name) => Ok(name),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some((other, range)))),
    })
}

fn alias() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Alias(path) => Ok(path),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some((other, range)))),
    })
}

/// An atom literal, plain or quoted
pub(crate) fn atom() -> impl Parser<TokenSpan, SyntaxNode, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Atom(text) | Token::QuotedAtom(text) => {
            Ok(SyntaxNode::new(NodeKind::AtomLiteral, text, span))
        }
        other => Err(Simple::expected_input_found(span, Vec::new(), Some((other, range)))),
    })
}

/// Tokens that carry no structure of their own inside an expression
fn leaf() -> impl Parser<TokenSpan, Nodes, Error = ParserError> + Clone {
    filter(|(t, _): &TokenSpan| {
        matches!(
            t,
            Token::Identifier(_)
                | Token::Alias(_)
                | Token::ModuleAttribute(_)
                | Token::KeywordKey(_)
                | Token::Operator(_)
                | Token::Str
                | Token::Heredoc
                | Token::Sigil
                | Token::Number
                | Token::CharLiteral
                | Token::Dot
        )
    })
    .to(Vec::new())
}

/// One piece of an expression, returning the classified nodes found inside it
fn piece<'a, E, B>(inner: E, block: B) -> BoxedParser<'a, TokenSpan, Nodes, ParserError>
where
    E: Parser<TokenSpan, Nodes, Error = ParserError> + Clone + 'a,
    B: Parser<TokenSpan, Nodes, Error = ParserError> + Clone + 'a,
{
    let items = inner
        .separated_by(token(Token::Comma))
        .allow_trailing()
        .map(flatten);

    let parens = items
        .clone()
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen));
    let list = items
        .clone()
        .delimited_by(token(Token::OpenBracket), token(Token::CloseBracket));
    let tuple = items.delimited_by(token(Token::OpenBrace), token(Token::CloseBrace));

    let anonymous_fn = token(Token::Fn)
        .ignore_then(block)
        .then_ignore(token(Token::End));

    let qualified_call = alias()
        .then_ignore(token(Token::Dot))
        .then(identifier())
        .then(parens.clone().or_not())
        .map_with_span(|((module, function), arguments), span| {
            vec![SyntaxNode::new(
                NodeKind::QualifiedCall,
                format!("{}.{}", module, function),
                span,
            )
            .with_arguments(arguments.unwrap_or_default())]
        });

    choice((
        qualified_call,
        atom().map(|node| vec![node]),
        parens,
        list,
        tuple,
        anonymous_fn,
        leaf(),
    ))
    .boxed()
}

/// A sequence of statements
fn block() -> impl Parser<TokenSpan, Nodes, Error = ParserError> + Clone {
    recursive(|block| {
        let do_block = token(Token::Do)
            .ignore_then(block.clone())
            .then_ignore(token(Token::End))
            .boxed();

        // Expressions inside brackets may contain `do` blocks
        let inner = recursive(|inner| {
            piece(inner, block.clone())
                .or(do_block.clone())
                .repeated()
                .at_least(1)
                .map(flatten)
        });

        let args = piece(inner, block.clone())
            .repeated()
            .at_least(1)
            .map(flatten)
            .separated_by(token(Token::Comma))
            .at_least(1)
            .map(flatten)
            .boxed();

        let module_definition = token(Token::Defmodule)
            .ignore_then(alias())
            .then(do_block.clone())
            .map_with_span(|(name, body), span| {
                SyntaxNode::new(NodeKind::ModuleDefinition, name, span).with_body(body)
            });

        let declaration = token(Token::Use)
            .ignore_then(choice((
                alias()
                    .then(token(Token::Comma).ignore_then(args.clone()).or_not())
                    .map(|(target, options)| {
                        (NodeKind::QualifyingDeclaration, target, options.unwrap_or_default())
                    }),
                args.clone()
                    .map(|arguments| (NodeKind::Expression, String::new(), arguments)),
            )))
            .map_with_span(|(kind, text, arguments), span| {
                SyntaxNode::new(kind, text, span).with_arguments(arguments)
            });

        let function_definition = filter(|(t, _): &TokenSpan| matches!(t, Token::Def(_)))
            .ignore_then(identifier().rewind().or_not())
            .then(args.clone().or_not())
            .then(do_block.clone().or_not())
            .map_with_span(|((name, arguments), body), span| {
                SyntaxNode::new(NodeKind::FunctionDefinition, name.unwrap_or_default(), span)
                    .with_arguments(arguments.unwrap_or_default())
                    .with_body(body.unwrap_or_default())
            });

        let call = identifier()
            .then(
                filter(|(t, _): &TokenSpan| matches!(t, Token::Operator(_) | Token::Dot))
                    .rewind()
                    .or_not(),
            )
            .then(args.clone().or_not())
            .then(do_block.clone().or_not())
            .map_with_span(|(((name, operator), arguments), body), span| {
                let kind = if operator.is_some() || is_host_keyword(&name) {
                    NodeKind::Expression
                } else if body.is_some() {
                    NodeKind::SectionOpener
                } else if arguments.is_some() {
                    NodeKind::SimpleMacroCall
                } else {
                    NodeKind::Expression
                };
                SyntaxNode::new(kind, name, span)
                    .with_arguments(arguments.unwrap_or_default())
                    .with_body(body.unwrap_or_default())
            });

        let expression = args
            .then(do_block.or_not())
            .map_with_span(|(mut nodes, body), span| match body {
                None if nodes.len() == 1 => nodes.remove(0),
                body => SyntaxNode::new(NodeKind::Expression, "", span)
                    .with_arguments(nodes)
                    .with_body(body.unwrap_or_default()),
            });

        let statement = choice((
            module_definition,
            declaration,
            function_definition,
            call,
            expression,
        ));

        let terminator = token(Token::Newline)
            .or(token(Token::End).rewind())
            .or(end());

        token(Token::Newline).repeated().ignore_then(
            statement
                .then_ignore(terminator)
                .then_ignore(token(Token::Newline).repeated())
                .repeated(),
        )
    })
}

/// A whole file
pub(crate) fn file() -> impl Parser<TokenSpan, Nodes, Error = ParserError> + Clone {
    block().then_ignore(end())
}

/// A single atom literal and nothing else
pub(crate) fn atom_literal() -> impl Parser<TokenSpan, SyntaxNode, Error = ParserError> + Clone {
    atom().then_ignore(end())
}
