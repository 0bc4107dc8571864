//! JSON and YAML formatters over the serde representation of a result

use super::registry::{FormatError, Formatter};
use crate::ash::ast::ParseResult;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, result: &ParseResult) -> Result<String, FormatError> {
        serde_json::to_string_pretty(result)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn serialize(&self, result: &ParseResult) -> Result<String, FormatError> {
        serde_yaml::to_string(result).map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}
