//! Fluent assertion API for parse results

use crate::ash::ast::{DslNode, FileKind, ParseResult, Position};

/// Create an assertion builder for a parse result
pub fn assert_result(result: &ParseResult) -> ResultAssertion<'_> {
    ResultAssertion { result }
}

fn summarize(nodes: &[DslNode]) -> String {
    nodes
        .iter()
        .map(DslNode::label)
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct ResultAssertion<'a> {
    result: &'a ParseResult,
}

impl<'a> ResultAssertion<'a> {
    pub fn is_ash(self) -> Self {
        assert!(
            self.result.is_ash_file,
            "Expected an Ash file, {} reported `{}` as not one",
            self.result.parser_name,
            self.result.module_name
        );
        self
    }

    /// Assert the file is not an Ash file, which also means it has no sections
    pub fn not_ash(self) -> Self {
        assert!(
            !self.result.is_ash_file,
            "Expected a non-Ash file, {} recognised `{}`",
            self.result.parser_name,
            self.result.module_name
        );
        assert!(
            self.result.sections.is_empty(),
            "Non-Ash result carries sections: [{}]",
            summarize(&self.result.sections)
        );
        self
    }

    pub fn module_name(self, expected: &str) -> Self {
        assert_eq!(
            self.result.module_name, expected,
            "Expected module name '{}', found '{}'",
            expected, self.result.module_name
        );
        self
    }

    pub fn kind(self, expected: FileKind) -> Self {
        assert_eq!(
            self.result.kind,
            Some(expected),
            "Expected kind {}, found {:?}",
            expected,
            self.result.kind
        );
        self
    }

    pub fn parser(self, expected: &str) -> Self {
        assert_eq!(
            self.result.parser_name, expected,
            "Expected result from {}, found {}",
            expected, self.result.parser_name
        );
        self
    }

    pub fn section_count(self, expected: usize) -> Self {
        let actual = self.result.sections.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} sections, found {}: [{}]",
            expected,
            actual,
            summarize(&self.result.sections)
        );
        self
    }

    /// Assert the section keywords, in source order
    pub fn section_names(self, expected: &[&str]) -> Self {
        assert_eq!(
            self.result.section_names(),
            expected,
            "Section names differ"
        );
        self
    }

    /// Assert on a section by index
    pub fn section<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> NodeAssertion<'a>,
    {
        assert!(
            index < self.result.sections.len(),
            "Section index {} out of bounds ({} sections: [{}])",
            index,
            self.result.sections.len(),
            summarize(&self.result.sections)
        );
        assertion(NodeAssertion {
            node: &self.result.sections[index],
            context: format!("sections[{}]", index),
        });
        self
    }

    /// Assert on the first section with the given keyword
    pub fn section_named<F>(self, keyword: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> NodeAssertion<'a>,
    {
        let node = self.result.section(keyword).unwrap_or_else(|| {
            panic!(
                "No section '{}' in [{}]",
                keyword,
                summarize(&self.result.sections)
            )
        });
        assertion(NodeAssertion {
            node,
            context: keyword.to_string(),
        });
        self
    }
}

pub struct NodeAssertion<'a> {
    node: &'a DslNode,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn keyword(self, expected: &str) -> Self {
        assert_eq!(
            self.node.keyword, expected,
            "{}: Expected keyword '{}', found '{}'",
            self.context, expected, self.node.keyword
        );
        self
    }

    /// Assert the extracted name. Pass `""` for nodes without a name.
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.node.name, expected,
            "{}: Expected name '{}', found '{}'",
            self.context, expected, self.node.name
        );
        self
    }

    pub fn arguments(self, expected: &[&str]) -> Self {
        assert_eq!(
            self.node.arguments, expected,
            "{}: Positional arguments differ",
            self.context
        );
        self
    }

    pub fn at(self, line: usize, column: usize) -> Self {
        assert_eq!(
            self.node.position,
            Position::new(line, column),
            "{}: Expected position {}:{}, found {}",
            self.context,
            line,
            column,
            self.node.position
        );
        self
    }

    pub fn is_block(self) -> Self {
        assert!(self.node.is_block, "{}: Expected a block", self.context);
        self
    }

    pub fn is_statement(self) -> Self {
        assert!(!self.node.is_block, "{}: Expected a statement", self.context);
        self
    }

    /// Assert a block reached its `end`
    pub fn closed(self) -> Self {
        assert!(
            self.node.is_block && self.node.end.is_some(),
            "{}: Expected a closed block",
            self.context
        );
        self
    }

    /// Assert a block never reached its `end`
    pub fn unclosed(self) -> Self {
        assert!(
            self.node.is_block && self.node.end.is_none(),
            "{}: Expected an unclosed block, end is {:?}",
            self.context,
            self.node.end
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.children.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.node.children)
        );
        self
    }

    /// Assert on a child by index
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> NodeAssertion<'a>,
    {
        assert!(
            index < self.node.children.len(),
            "{}: Child index {} out of bounds ({} children: [{}])",
            self.context,
            index,
            self.node.children.len(),
            summarize(&self.node.children)
        );
        assertion(NodeAssertion {
            node: &self.node.children[index],
            context: format!("{}.children[{}]", self.context, index),
        });
        self
    }

    /// Assert on the first child with the given keyword
    pub fn child_named<F>(self, keyword: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>) -> NodeAssertion<'a>,
    {
        let node = self.node.child(keyword).unwrap_or_else(|| {
            panic!(
                "{}: No child '{}' in [{}]",
                self.context,
                keyword,
                summarize(&self.node.children)
            )
        });
        assertion(NodeAssertion {
            node,
            context: format!("{}.{}", self.context, keyword),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParseResult {
        let mut strategies = DslNode::block("strategies", "", Position::new(1, 2));
        strategies.end = Some(Position::new(3, 2));
        strategies
            .children
            .push(DslNode::statement("password", ":default", Position::new(2, 4)));
        let mut authentication = DslNode::block("authentication", "", Position::new(0, 0));
        authentication.children.push(strategies);

        ParseResult {
            is_ash_file: true,
            module_name: "MyApp.User".to_string(),
            kind: Some(FileKind::Resource),
            sections: vec![authentication],
            parser_name: "SimpleParser".to_string(),
        }
    }

    #[test]
    fn test_fluent_chain() {
        assert_result(&sample())
            .is_ash()
            .module_name("MyApp.User")
            .kind(FileKind::Resource)
            .section_names(&["authentication"])
            .section(0, |auth| {
                auth.unclosed().child_named("strategies", |s| {
                    s.closed()
                        .at(1, 2)
                        .child_count(1)
                        .child(0, |p| p.is_statement().name(":default"))
                })
            });
    }

    #[test]
    #[should_panic(expected = "Expected name ':other'")]
    fn test_failure_message() {
        assert_result(&sample()).section(0, |auth| {
            auth.child(0, |s| s.child(0, |p| p.name(":other")))
        });
    }

    #[test]
    #[should_panic(expected = "No section 'actions'")]
    fn test_missing_section() {
        assert_result(&sample()).section_named("actions", |a| a);
    }
}
