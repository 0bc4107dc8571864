//! Result normalization shared by every strategy

use crate::ash::ast::ParseResult;

/// Bring a result into the shared contract: no sections unless the file is an
/// Ash file, and sections and details in source order.
pub fn normalize(mut result: ParseResult) -> ParseResult {
    if !result.is_ash_file {
        result.sections.clear();
        result.kind = None;
        return result;
    }
    result.sections.sort_by_key(|s| s.position);
    for section in &mut result.sections {
        section.sort_by_position();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ash::ast::{DslNode, FileKind, Position};

    fn result(is_ash_file: bool) -> ParseResult {
        let mut actions = DslNode::block("actions", "", Position::new(9, 2));
        actions
            .children
            .push(DslNode::statement("update", ":publish", Position::new(11, 4)));
        actions
            .children
            .push(DslNode::statement("create", ":create", Position::new(10, 4)));
        ParseResult {
            is_ash_file,
            module_name: "Blog.Post".into(),
            kind: Some(FileKind::Resource),
            sections: vec![actions, DslNode::block("attributes", "", Position::new(3, 2))],
            parser_name: "test".into(),
        }
    }

    #[test]
    fn test_non_ash_has_no_sections() {
        let normalized = normalize(result(false));
        assert!(normalized.sections.is_empty());
        assert_eq!(normalized.kind, None);
        assert_eq!(normalized.module_name, "Blog.Post");
    }

    #[test]
    fn test_source_order() {
        let normalized = normalize(result(true));
        assert_eq!(normalized.section_names(), vec!["attributes", "actions"]);
        let actions = normalized.section("actions").unwrap();
        assert_eq!(actions.children[0].keyword, "create");
        assert_eq!(actions.children[1].keyword, "update");
    }
}
