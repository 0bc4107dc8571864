//! Regex-based strategy
//!
//! Needs no registry. A file is an Ash file when it declares one of the marker
//! modules (`Ash.Resource`, `Ash.Domain`, `Ash.Api`, a `*.Type.Enum`); every
//! `<word> do` block of such a file becomes a section. Enum modules get one
//! synthetic `enum_definition` section built from their `values:` option.

use super::interface::ParseStrategy;
use super::normalize::normalize;
use crate::ash::ast::{DslNode, FileKind, ParseResult, Section, SourceLocation};
use crate::ash::declarations::{find_declarations, primary_module_name, Declaration};
use crate::ash::extraction::extract_generic;
use crate::ash::names::split_top_level;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// The `values:` option of an enum declaration: a list or a word sigil
static ENUM_VALUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\bvalues:\s*(\[.*\]|~[wW](?:\((.*?)\)|\[(.*?)\]|\{(.*?)\}|<(.*?)>|/(.*?)/|\|(.*?)\|))").unwrap()
});

static ATOM_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:([A-Za-z_][A-Za-z0-9_]*[?!]?)$").unwrap());

static KEYWORD_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*[?!]?):(?:\s|$)").unwrap());

/// The kind of Ash module a marker declaration target denotes
pub fn marker_kind(target: &str) -> Option<FileKind> {
    match target {
        "Ash.Resource" => Some(FileKind::Resource),
        "Ash.Domain" | "Ash.Api" => Some(FileKind::Domain),
        "Ash.Type.Enum" => Some(FileKind::TypeEnum),
        _ if target.ends_with(".Type.Enum") => Some(FileKind::TypeEnum),
        _ => None,
    }
}

/// Tolerant parser driven by marker declarations
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleParser;

impl SimpleParser {
    pub const NAME: &'static str = "SimpleParser";
}

impl ParseStrategy for SimpleParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, source: &str) -> ParseResult {
        let module_name = primary_module_name(source);
        let marker = find_declarations(source).into_iter().find_map(|declaration| {
            let kind = declaration.target().and_then(marker_kind)?;
            Some((declaration, kind))
        });

        let Some((declaration, kind)) = marker else {
            debug!(module = %module_name, "no marker declaration");
            return ParseResult::not_ash(module_name, Self::NAME);
        };

        let mut sections = Vec::new();
        if kind == FileKind::TypeEnum {
            sections.push(enum_definition(&declaration, source));
        }
        sections.extend(extract_generic(source));

        normalize(ParseResult {
            is_ash_file: true,
            module_name,
            kind: Some(kind),
            sections,
            parser_name: Self::NAME.to_string(),
        })
    }
}

/// Build the synthetic `enum_definition` section of an enum declaration.
///
/// Each atom of `values:` becomes a `value` detail, positioned where the value
/// appears in `source`. Keyword lists (`values: [draft: "Draft"]`) and word
/// sigils (`~w(draft published)a`) name the same atoms.
pub(crate) fn enum_definition(declaration: &Declaration, source: &str) -> Section {
    let mut section = DslNode::statement("enum_definition", "", declaration.position);
    let location = SourceLocation::new(source);
    let mut cursor = location.position_to_byte(declaration.position).min(source.len());

    for (value, needle) in enum_values(&declaration.text) {
        let position = match source.get(cursor..).and_then(|rest| rest.find(&needle)) {
            Some(offset) => {
                cursor += offset + needle.len();
                location.byte_to_position(cursor - needle.len())
            }
            None => declaration.position,
        };
        section.children.push(DslNode::statement("value", value, position));
    }

    section
}

/// `(atom, text to look for in source)` for each enum value, in order
fn enum_values(declaration: &str) -> Vec<(String, String)> {
    let Some(caps) = ENUM_VALUES.captures(declaration) else {
        return Vec::new();
    };

    if let Some(words) = (2..=7).find_map(|i| caps.get(i)) {
        return words
            .as_str()
            .split_whitespace()
            .map(|word| (format!(":{word}"), word.to_string()))
            .collect();
    }

    let Some(list) = caps.get(1).map(|m| m.as_str()) else {
        return Vec::new();
    };
    let Some(inner) = list.strip_prefix('[').and_then(list_body) else {
        return Vec::new();
    };

    split_top_level(inner)
        .into_iter()
        .map(str::trim)
        .filter_map(|item| {
            if let Some(caps) = ATOM_VALUE.captures(item) {
                let atom = caps.get(0)?.as_str();
                return Some((atom.to_string(), atom.to_string()));
            }
            let key = KEYWORD_VALUE.captures(item)?.get(1)?.as_str();
            Some((format!(":{key}"), format!("{key}:")))
        })
        .collect()
}

/// The text up to the bracket closing an already opened list
fn list_body(text: &str) -> Option<&str> {
    let mut depth = 1usize;
    let mut quoted = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '[' | '(' | '{' if !quoted => depth += 1,
            ']' | ')' | '}' if !quoted => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..i]);
                }
            }
            _ => {}
        }
    }
    None
}
