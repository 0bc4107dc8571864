//! Property-based tests for the parsing strategies
//!
//! Generated documents are resources whose section and detail keywords are
//! prefixed with `x_`, so they never collide with host language keywords.

use ashdsl::ash::config::ModuleRegistry;
use ashdsl::ash::grammar::{self, is_atom_literal};
use ashdsl::ash::names::extract_name;
use ashdsl::ash::parsers::{ParseStrategy, ParserRegistry, SimpleParser};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct GenSection {
    keyword: String,
    details: Vec<(String, String)>,
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{1,8}".prop_map(|word| format!("x_{}", word))
}

fn section_strategy() -> impl Strategy<Value = GenSection> {
    (
        keyword_strategy(),
        prop::collection::vec((keyword_strategy(), "[a-z][a-z0-9_]{0,6}"), 0..5),
    )
        .prop_map(|(keyword, details)| GenSection { keyword, details })
}

fn render(sections: &[GenSection], close: bool) -> String {
    let mut source = String::from("defmodule Gen.Resource do\n  use Ash.Resource\n");
    for section in sections {
        source.push_str(&format!("\n  {} do\n", section.keyword));
        for (keyword, name) in &section.details {
            source.push_str(&format!("    {} :{}\n", keyword, name));
        }
        if close {
            source.push_str("  end\n");
        }
    }
    if close {
        source.push_str("end\n");
    }
    source
}

proptest! {
    #[test]
    fn test_simple_parser_never_panics(input in "\\PC{0,200}") {
        let result = SimpleParser.parse(&input);
        if !result.is_ash_file {
            prop_assert!(result.sections.is_empty());
        }
    }

    #[test]
    fn test_line_noise_never_panics(input in "[a-z:@ \\n(){}\\[\\],.\"#]{0,120}") {
        let parsers = ParserRegistry::with_defaults(ModuleRegistry::shared());
        for strategy in parsers.available() {
            let result = parsers.parse(&strategy, &input).unwrap();
            if !result.is_ash_file {
                prop_assert!(result.sections.is_empty());
            }
        }
        let _ = grammar::parse(&input);
    }

    #[test]
    fn test_idempotent(sections in prop::collection::vec(section_strategy(), 0..4)) {
        let source = render(&sections, true);
        let parsers = ParserRegistry::with_defaults(ModuleRegistry::shared());
        for strategy in parsers.available() {
            let first = parsers.parse(&strategy, &source).unwrap();
            let second = parsers.parse(&strategy, &source).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn test_sections_in_source_order(sections in prop::collection::vec(section_strategy(), 1..5)) {
        let source = render(&sections, true);
        for strategy in ["simple", "grammar"] {
            let parsers = ParserRegistry::with_defaults(ModuleRegistry::shared());
            let result = parsers.parse(strategy, &source).unwrap();
            let expected: Vec<&str> = sections.iter().map(|s| s.keyword.as_str()).collect();
            prop_assert_eq!(result.section_names(), expected);

            for (node, section) in result.sections.iter().zip(&sections) {
                let details: Vec<(String, String)> = node
                    .children
                    .iter()
                    .map(|c| (c.keyword.clone(), c.name.trim_start_matches(':').to_string()))
                    .collect();
                prop_assert_eq!(&details, &section.details);
            }
        }
    }

    #[test]
    fn test_truncated_input_keeps_sections(sections in prop::collection::vec(section_strategy(), 1..4)) {
        let result = SimpleParser.parse(&render(&sections, false));
        prop_assert!(result.is_ash_file);
        prop_assert_eq!(result.sections.len(), 1);
        prop_assert_eq!(&result.sections[0].keyword, &sections[0].keyword);
        prop_assert!(result.sections[0].end.is_none());
    }

    #[test]
    fn test_name_is_first_token(atom in "[a-z_][a-z0-9_]{0,8}", word in "[a-z][a-z0-9_]{0,8}") {
        let atom_first = format!(" :{}, {}", atom, word);
        let word_first = format!(" {}, :{} do", word, atom);
        prop_assert_eq!(extract_name(&atom_first), format!(":{}", atom));
        prop_assert_eq!(extract_name(&word_first), word);
    }

    #[test]
    fn test_atom_acceptance(body in "[a-zA-Z_][a-zA-Z0-9_]{0,10}[?!]?", digits in "[0-9][a-z0-9]{0,5}") {
        let valid = format!(":{}", body);
        let invalid = format!(":{}", digits);
        prop_assert!(is_atom_literal(&valid));
        prop_assert!(!is_atom_literal(&invalid));
    }
}
