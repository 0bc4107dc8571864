//! Token definitions for the host language grammar
//!
//! Only the lexical categories the grammar distinguishes are tokens of their
//! own. Everything else that can appear inside an expression (operators, string
//! and sigil literals, numbers) is recognised so that it can be skipped over
//! without being interpreted.
use logos::{Lexer, Logos};
use std::fmt;

fn slice(lex: &mut Lexer<Token>) -> String {
    lex.slice().to_string()
}

/// All tokens of the grammar
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[token("defmodule")]
    Defmodule,

    #[token("def", slice)]
    #[token("defp", slice)]
    #[token("defmacro", slice)]
    #[token("defmacrop", slice)]
    #[token("defguard", slice)]
    #[token("defguardp", slice)]
    #[token("defdelegate", slice)]
    #[token("defstruct", slice)]
    #[token("defexception", slice)]
    #[token("defprotocol", slice)]
    #[token("defimpl", slice)]
    #[token("defoverridable", slice)]
    Def(String),

    #[token("use")]
    Use,

    #[token("do")]
    Do,

    #[token("end")]
    End,

    #[token("fn")]
    Fn,

    /// `:name`, `:name?`, `:node@host`; never a dot, never a leading digit or `@`
    #[regex(r":[A-Za-z_][A-Za-z0-9_]*(@[A-Za-z_][A-Za-z0-9_]*)?[?!]?", slice)]
    Atom(String),

    /// `:"any text"`
    #[regex(r#":"([^"\\\n]|\\.)*""#, slice)]
    QuotedAtom(String),

    /// `key:` in a keyword list
    #[regex(r"[a-z_][A-Za-z0-9_]*[?!]?:", slice)]
    KeywordKey(String),

    #[regex(r"[a-z_][A-Za-z0-9_]*[?!]?", slice)]
    Identifier(String),

    /// Dotted module path: `Ash.Resource`
    #[regex(r"[A-Z][A-Za-z0-9_]*(\.[A-Z][A-Za-z0-9_]*)*", slice)]
    Alias(String),

    #[regex(r"@[a-z_][A-Za-z0-9_]*", slice)]
    ModuleAttribute(String),

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    Str,

    #[regex(r#""""([^"]|"[^"]|""[^"])*""""#)]
    #[regex(r"'''([^']|'[^']|''[^'])*'''")]
    Heredoc,

    #[regex(r"~[a-zA-Z]+/([^/\\\n]|\\.)*/[a-zA-Z]*")]
    #[regex(r"~[a-zA-Z]+\|([^|\\\n]|\\.)*\|[a-zA-Z]*")]
    #[regex(r#"~[a-zA-Z]+"([^"\\]|\\.)*"[a-zA-Z]*"#)]
    #[regex(r"~[a-zA-Z]+'([^'\\]|\\.)*'[a-zA-Z]*")]
    #[regex(r"~[a-zA-Z]+\(([^)\\]|\\.)*\)[a-zA-Z]*")]
    #[regex(r"~[a-zA-Z]+\[([^\]\\]|\\.)*\][a-zA-Z]*")]
    #[regex(r"~[a-zA-Z]+\{([^}\\]|\\.)*\}[a-zA-Z]*")]
    #[regex(r"~[a-zA-Z]+<([^>\\]|\\.)*>[a-zA-Z]*")]
    Sigil,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"0x[0-9a-fA-F_]+")]
    Number,

    #[regex(r"\?(\\.|[^\s\\])")]
    CharLiteral,

    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    /// Line break or `;`
    #[token("\n")]
    #[token(";")]
    Newline,

    #[regex(r"[-+*/<>=!&|^~\\%]+", slice)]
    #[token("..", slice)]
    #[token("...", slice)]
    #[token("::", slice)]
    Operator(String),
}

impl Token {
    /// Tokens that open a bracket pair
    pub fn is_open_bracket(&self) -> bool {
        matches!(self, Token::OpenParen | Token::OpenBracket | Token::OpenBrace)
    }

    pub fn is_close_bracket(&self) -> bool {
        matches!(self, Token::CloseParen | Token::CloseBracket | Token::CloseBrace)
    }

    /// Tokens after which an expression continues on the next line
    pub fn continues_line(&self) -> bool {
        matches!(
            self,
            Token::Comma | Token::Operator(_) | Token::KeywordKey(_) | Token::Dot | Token::Newline
        )
    }

    /// Short name of the token kind
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Defmodule => "defmodule",
            Token::Def(_) => "def",
            Token::Use => "use",
            Token::Do => "do",
            Token::End => "end",
            Token::Fn => "fn",
            Token::Atom(_) => "atom",
            Token::QuotedAtom(_) => "quoted_atom",
            Token::KeywordKey(_) => "keyword_key",
            Token::Identifier(_) => "identifier",
            Token::Alias(_) => "alias",
            Token::ModuleAttribute(_) => "module_attribute",
            Token::Str => "string",
            Token::Heredoc => "heredoc",
            Token::Sigil => "sigil",
            Token::Number => "number",
            Token::CharLiteral => "char",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenBracket => "[",
            Token::CloseBracket => "]",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Colon => ":",
            Token::Newline => "newline",
            Token::Operator(_) => "operator",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Def(text)
            | Token::Atom(text)
            | Token::QuotedAtom(text)
            | Token::KeywordKey(text)
            | Token::Identifier(text)
            | Token::Alias(text)
            | Token::ModuleAttribute(text)
            | Token::Operator(text) => write!(f, "{}", text),
            other => write!(f, "{}", other.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Token::lexer(source).filter_map(|r| r.ok()).collect()
    }

    #[test]
    fn test_atoms() {
        assert_eq!(lex(":ok"), vec![Token::Atom(":ok".into())]);
        assert_eq!(lex(":integer?"), vec![Token::Atom(":integer?".into())]);
        assert_eq!(lex(":save!"), vec![Token::Atom(":save!".into())]);
        assert_eq!(lex(":foo@bar"), vec![Token::Atom(":foo@bar".into())]);
        assert_eq!(lex(r#":"with space""#), vec![Token::QuotedAtom(r#":"with space""#.into())]);
    }

    #[test]
    fn test_invalid_atoms_split() {
        assert_eq!(lex(":123"), vec![Token::Colon, Token::Number]);
        assert_eq!(
            lex(":@foo"),
            vec![Token::Colon, Token::ModuleAttribute("@foo".into())]
        );
        assert_eq!(
            lex(":My.Atom"),
            vec![Token::Atom(":My".into()), Token::Dot, Token::Alias("Atom".into())]
        );
    }

    #[test]
    fn test_keywords_beat_identifiers_only_on_exact_match() {
        assert_eq!(lex("do"), vec![Token::Do]);
        assert_eq!(lex("do:"), vec![Token::KeywordKey("do:".into())]);
        assert_eq!(lex("done"), vec![Token::Identifier("done".into())]);
        assert_eq!(lex("end_date"), vec![Token::Identifier("end_date".into())]);
        assert_eq!(lex("defp"), vec![Token::Def("defp".into())]);
        assert_eq!(lex("define"), vec![Token::Identifier("define".into())]);
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            lex("use Ash.Resource, otp_app: :blog"),
            vec![
                Token::Use,
                Token::Alias("Ash.Resource".into()),
                Token::Comma,
                Token::KeywordKey("otp_app:".into()),
                Token::Atom(":blog".into()),
            ]
        );
    }

    #[test]
    fn test_comments_and_literals() {
        assert_eq!(
            lex("description \"has # and do\" # trailing\n"),
            vec![Token::Identifier("description".into()), Token::Str, Token::Newline]
        );
        assert_eq!(lex("~r/^end$/i"), vec![Token::Sigil]);
        assert_eq!(lex("\"\"\"\nbody \"quoted\"\n\"\"\""), vec![Token::Heredoc]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex("x |> y -> z :: t"),
            vec![
                Token::Identifier("x".into()),
                Token::Operator("|>".into()),
                Token::Identifier("y".into()),
                Token::Operator("->".into()),
                Token::Identifier("z".into()),
                Token::Operator("::".into()),
                Token::Identifier("t".into()),
            ]
        );
    }
}
