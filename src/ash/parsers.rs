//! Parsing strategies
//!
//! Three independent strategies recover the section tree of a file, all behind
//! the [`ParseStrategy`] trait and all returning the same normalized
//! [`ParseResult`](crate::ash::ast::ParseResult):
//!
//! - **config** ([`ConfigurationParser`]): matches `use` declarations against the
//!   module registry and extracts only the configured sections and details
//! - **simple** ([`SimpleParser`]): classifies the file from marker declarations
//!   and extracts every `<word> do` block; needs no registry
//! - **grammar** ([`GrammarParser`]): classifies the first tree of the formal grammar
//!
//! **auto** ([`FallbackParser`]) runs config and falls back to simple. Strategies
//! are selected by name through [`ParserRegistry`].

mod configured;
mod fallback;
mod grammar_based;
mod interface;
mod normalize;
mod simple;

pub use configured::ConfigurationParser;
pub use fallback::FallbackParser;
pub use grammar_based::GrammarParser;
pub use interface::{ParseError, ParseStrategy, ParserRegistry};
pub use normalize::normalize;
pub use simple::{marker_kind, SimpleParser};
