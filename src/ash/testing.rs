//! Testing utilities for parse results
//!
//! Two tools, meant to be used together:
//!
//! 1. **[Samples]** loads the curated `.ex` fixtures under `samples/`, so test
//!    sources are written once and reviewed once.
//! 2. **[assert_result]** checks a whole [`ParseResult`](crate::ash::ast::ParseResult)
//!    tree with a fluent API instead of hand-written index chains.
//!
//! ```rust-example
//! use ashdsl::ash::parsers::{ParseStrategy, SimpleParser};
//! use ashdsl::ash::testing::{assert_result, Samples};
//!
//! let source = Samples::get_string("user_auth.ex").unwrap();
//! assert_result(&SimpleParser.parse(&source))
//!     .is_ash()
//!     .section_named("authentication", |auth| {
//!         auth.child(0, |strategies| {
//!             strategies
//!                 .keyword("strategies")
//!                 .child_count(2)
//!                 .child(0, |password| password.keyword("password").name(":default"))
//!                 .child(1, |magic| magic.keyword("magic_link").name(""))
//!         })
//!     });
//! ```

mod assertions;
mod samples;

pub use assertions::{assert_result, NodeAssertion, ResultAssertion};
pub use samples::Samples;
