//! Result tree definitions shared by every parsing strategy
//!
//! ## Modules
//!
//! - `position` - 0-based line/column positions
//! - `location` - Byte offset to line/column conversion
//! - `node` - The recursive section/detail node
//! - `result` - The normalized parse result and file kinds

pub mod location;
pub mod node;
pub mod position;
pub mod result;

pub use location::SourceLocation;
pub use node::{ChildDetail, Detail, DslNode, Section};
pub use position::Position;
pub use result::{FileKind, ParseResult};
