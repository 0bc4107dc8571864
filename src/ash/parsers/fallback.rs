//! The `auto` strategy chain

use super::configured::ConfigurationParser;
use super::interface::ParseStrategy;
use super::simple::SimpleParser;
use crate::ash::ast::ParseResult;
use crate::ash::config::ModuleRegistry;
use std::sync::Arc;
use tracing::debug;

/// Runs the configuration-driven parser and falls back to [`SimpleParser`]
/// when it recognises no module or extracts no sections.
pub struct FallbackParser {
    configured: ConfigurationParser,
    simple: SimpleParser,
}

impl FallbackParser {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self {
            configured: ConfigurationParser::new(registry),
            simple: SimpleParser,
        }
    }
}

impl Default for FallbackParser {
    fn default() -> Self {
        Self::new(ModuleRegistry::shared())
    }
}

impl ParseStrategy for FallbackParser {
    fn name(&self) -> &'static str {
        "FallbackParser"
    }

    fn parse(&self, source: &str) -> ParseResult {
        let result = self.configured.parse(source);
        if result.is_ash_file && !result.sections.is_empty() {
            return result;
        }
        debug!(
            module = %result.module_name,
            recognised = result.is_ash_file,
            "configuration found no sections, falling back to {}",
            self.simple.name()
        );
        self.simple.parse(source)
    }
}
