//! # ashdsl
//!
//! A structural parser for Ash framework DSL modules.
//!
//! Source files written against the Ash DSL (`use Ash.Resource`, `use Ash.Domain`, ...)
//! are turned into a tree of sections, details and nested child details. Three
//! strategies produce the same [`ParseResult`](ash::ast::ParseResult) shape:
//!
//! - the configuration-driven parser, which only recognises shapes declared in the
//!   module registry,
//! - the regex-based `SimpleParser`, which needs no registry and tolerates broken input,
//! - the grammar-based parser, built on a logos lexer and a chumsky grammar.
//!
//! ## Testing
//!
//! See the [testing module](ash::testing) for the fluent assertion API and the sample
//! files shared by the test suites.

pub mod ash;
