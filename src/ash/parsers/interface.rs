//! Strategy interface and registry
//!
//! Each strategy implements [`ParseStrategy`], and the registry selects one by
//! name at runtime.

use crate::ash::ast::ParseResult;
use crate::ash::config::ModuleRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::{ConfigurationParser, FallbackParser, GrammarParser, SimpleParser};

/// Errors from selecting a strategy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Parser '{0}' not found")]
    ParserNotFound(String),
}

/// A parsing strategy.
///
/// `parse` never fails: input a strategy cannot make sense of is reported as a
/// result with `is_ash_file == false`.
pub trait ParseStrategy: Send + Sync {
    /// Name recorded in [`ParseResult::parser_name`]
    fn name(&self) -> &'static str;

    fn parse(&self, source: &str) -> ParseResult;
}

/// Registry of strategies keyed by short name (`auto`, `config`, `simple`, `grammar`)
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn ParseStrategy>>,
}

impl ParserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four built-in strategies sharing one module registry
    pub fn with_defaults(modules: Arc<ModuleRegistry>) -> Self {
        let mut registry = Self::new();
        registry.register("auto", Arc::new(FallbackParser::new(Arc::clone(&modules))));
        registry.register("config", Arc::new(ConfigurationParser::new(modules)));
        registry.register("simple", Arc::new(SimpleParser));
        registry.register("grammar", Arc::new(GrammarParser));
        registry
    }

    /// Register a strategy under a key, replacing any previous one
    pub fn register(&mut self, key: impl Into<String>, parser: Arc<dyn ParseStrategy>) {
        self.parsers.insert(key.into(), parser);
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ParseStrategy>> {
        self.parsers.get(key).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.parsers.contains_key(key)
    }

    /// Registered keys, sorted
    pub fn available(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.parsers.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Parse with the strategy registered under `key`
    pub fn parse(&self, key: &str, source: &str) -> Result<ParseResult, ParseError> {
        let parser = self
            .get(key)
            .ok_or_else(|| ParseError::ParserNotFound(key.to_string()))?;
        Ok(parser.parse(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_available() {
        let registry = ParserRegistry::with_defaults(ModuleRegistry::shared());
        assert_eq!(registry.available(), vec!["auto", "config", "grammar", "simple"]);
    }

    #[test]
    fn test_get_reports_strategy_name() {
        let registry = ParserRegistry::with_defaults(ModuleRegistry::shared());
        assert_eq!(registry.get("simple").unwrap().name(), "SimpleParser");
        assert_eq!(registry.get("config").unwrap().name(), "ConfigurationParser");
        assert_eq!(registry.get("grammar").unwrap().name(), "GrammarParser");
        assert!(!registry.has("regex"));
    }

    #[test]
    fn test_parse_not_found() {
        let registry = ParserRegistry::new();
        match registry.parse("nonexistent", "") {
            Err(ParseError::ParserNotFound(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected ParserNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ParseError::ParserNotFound("x".into()).to_string(),
            "Parser 'x' not found"
        );
    }
}
