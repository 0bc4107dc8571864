//! Outline formatter
//!
//! One line per node, nesting drawn with box characters:
//!
//! ```text
//! MyApp.Blog.Post (resource)
//! ├─ attributes
//! │ ├─ uuid_primary_key :id
//! │ └─ attribute :title
//! └─ actions
//!   └─ defaults
//! ```
//!
//! Blocks that never reached their `end` are marked `(unclosed)`. With
//! positions enabled each line also carries the 0-based `line:column` of its keyword.

use super::registry::{FormatError, Formatter};
use crate::ash::ast::{DslNode, ParseResult};

pub struct OutlineFormatter {
    pub show_positions: bool,
}

impl Formatter for OutlineFormatter {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn serialize(&self, result: &ParseResult) -> Result<String, FormatError> {
        Ok(to_outline_str(result, self.show_positions))
    }
}

pub fn to_outline_str(result: &ParseResult, show_positions: bool) -> String {
    let module = if result.module_name.is_empty() {
        "<anonymous>"
    } else {
        result.module_name.as_str()
    };

    let mut output = match (result.is_ash_file, result.kind) {
        (false, _) => format!("{} (not an Ash file)\n", module),
        (true, Some(kind)) => format!("{} ({})\n", module, kind),
        (true, None) => format!("{}\n", module),
    };
    append_children(&mut output, &result.sections, "", show_positions);
    output
}

fn append_node(output: &mut String, node: &DslNode, prefix: &str, is_last: bool, show_positions: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!("{}{} {}", prefix, connector, node.label()));
    if show_positions {
        output.push_str(&format!(" @{}", node.position));
    }
    if !node.is_closed() {
        output.push_str(" (unclosed)");
    }
    output.push('\n');

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(output, &node.children, &new_prefix, show_positions);
}

fn append_children(output: &mut String, children: &[DslNode], prefix: &str, show_positions: bool) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(output, child, prefix, is_last, show_positions);
    }
}
