//! Output formats for parse results
//!
//! - `outline`: a one-line-per-node tree view
//! - `json` and `yaml`: the serialized [`ParseResult`](crate::ash::ast::ParseResult)

pub mod outline;
pub mod registry;
pub mod structured;

pub use outline::{to_outline_str, OutlineFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use structured::{JsonFormatter, YamlFormatter};
