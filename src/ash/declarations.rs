//! Module identification
//!
//! Collects the qualifying declarations (`use Target, options`) of a file and
//! matches their targets against the configuration registry. Only the target is
//! compared, and only for exact equality: option lists are ignored entirely,
//! including modules named under `extensions:`.

use crate::ash::ast::Position;
use crate::ash::config::{ModuleConfiguration, ModuleRegistry};
use crate::ash::extraction::logical_lines;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

/// `use Target` with an optional parenthesis, up to the option list
static DECLARATION_TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^use\s*\(?\s*([A-Z][A-Za-z0-9_]*(?:\.[A-Z][A-Za-z0-9_]*)*)\s*(?:[,)]|$)").unwrap()
});

static DECLARATION_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^use[\s(]").unwrap());

static MODULE_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^defmodule\s+([A-Z][A-Za-z0-9_]*(?:\.[A-Z][A-Za-z0-9_]*)*)\s*,?\s*do\b").unwrap()
});

/// A qualifying declaration found in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// The whole statement, continuation lines joined
    pub text: String,
    pub position: Position,
}

impl Declaration {
    /// The dotted target of the declaration, if it has one
    pub fn target(&self) -> Option<&str> {
        declaration_target(&self.text)
    }
}

/// A registry configuration matched by a declaration in the file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedModule<'r> {
    pub declaration_pattern: String,
    pub display_name: String,
    #[serde(skip)]
    pub configuration: &'r ModuleConfiguration,
}

/// Extract the target of a `use` statement.
///
/// Returns `None` when the statement is not a declaration or its target is not
/// a module path (`use unquote(mod)`).
pub fn declaration_target(statement: &str) -> Option<&str> {
    DECLARATION_TARGET
        .captures(statement.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Find every `use` statement in the source, in order
pub fn find_declarations(source: &str) -> Vec<Declaration> {
    logical_lines(source)
        .into_iter()
        .filter(|line| DECLARATION_START.is_match(&line.masked))
        .map(|line| Declaration {
            position: line.position(),
            text: line.text,
        })
        .collect()
}

/// The module name from the first `defmodule` in the source, or an empty string
pub fn primary_module_name(source: &str) -> String {
    logical_lines(source)
        .iter()
        .find_map(|line| {
            MODULE_DEFINITION
                .captures(&line.text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_default()
}

/// Match declarations against the registry.
///
/// Each declaration pattern appears at most once in the output, at the position
/// of its first declaration. Declarations with no configured meaning are dropped.
pub fn identify_configured_modules<'r>(
    declarations: &[String],
    registry: &'r ModuleRegistry,
) -> Vec<MatchedModule<'r>> {
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for declaration in declarations {
        let Some(target) = declaration_target(declaration) else {
            trace!(declaration = %declaration, "not a module declaration");
            continue;
        };
        let Some(configuration) = registry.get(target) else {
            trace!(target = target, "no configuration for declaration");
            continue;
        };
        if !seen.insert(configuration.declaration_pattern.as_str()) {
            continue;
        }
        debug!(pattern = %configuration.declaration_pattern, "identified configured module");
        matched.push(MatchedModule {
            declaration_pattern: configuration.declaration_pattern.clone(),
            display_name: configuration.display_name.clone(),
            configuration,
        });
    }

    matched
}

/// Find the declarations in `source` and match them against the registry
pub fn identify_in_source<'r>(source: &str, registry: &'r ModuleRegistry) -> Vec<MatchedModule<'r>> {
    let statements: Vec<String> = find_declarations(source)
        .into_iter()
        .map(|d| d.text)
        .collect();
    identify_configured_modules(&statements, registry)
}
