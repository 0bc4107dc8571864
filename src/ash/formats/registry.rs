//! Formatter trait and the registry the command line selects formats from

use crate::ash::ast::ParseResult;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Renders a parse result as text
pub trait Formatter: Send + Sync {
    fn name(&self) -> &'static str;

    fn serialize(&self, result: &ParseResult) -> Result<String, FormatError>;
}

/// Formatters in registration order
#[derive(Default)]
pub struct FormatRegistry {
    formatters: Vec<Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// `outline`, `json` and `yaml`. `show_positions` only changes the outline.
    pub fn with_defaults(show_positions: bool) -> Self {
        let mut registry = Self::default();
        registry.register(super::OutlineFormatter { show_positions });
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry
    }

    /// Add a formatter. One with the same name is replaced in place.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        let formatter: Box<dyn Formatter> = Box::new(formatter);
        match self.formatters.iter_mut().find(|f| f.name() == formatter.name()) {
            Some(existing) => *existing = formatter,
            None => self.formatters.push(formatter),
        }
    }

    pub fn available(&self) -> Vec<&'static str> {
        self.formatters.iter().map(|f| f.name()).collect()
    }

    pub fn serialize(&self, result: &ParseResult, format: &str) -> Result<String, FormatError> {
        self.formatters
            .iter()
            .find(|f| f.name() == format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?
            .serialize(result)
    }
}
