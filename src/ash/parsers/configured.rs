//! Configuration-driven strategy

use super::interface::ParseStrategy;
use super::normalize::normalize;
use crate::ash::ast::ParseResult;
use crate::ash::config::ModuleRegistry;
use crate::ash::declarations::{identify_in_source, primary_module_name};
use crate::ash::extraction::extract_modules;
use std::sync::Arc;
use tracing::debug;

/// Extracts the sections configured for the modules a file declares
pub struct ConfigurationParser {
    registry: Arc<ModuleRegistry>,
}

impl ConfigurationParser {
    pub const NAME: &'static str = "ConfigurationParser";

    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self { registry }
    }
}

impl Default for ConfigurationParser {
    fn default() -> Self {
        Self::new(ModuleRegistry::shared())
    }
}

impl ParseStrategy for ConfigurationParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, source: &str) -> ParseResult {
        let module_name = primary_module_name(source);
        let matched = identify_in_source(source, &self.registry);
        if matched.is_empty() {
            debug!(module = %module_name, "no configured module declared");
            return ParseResult::not_ash(module_name, Self::NAME);
        }

        let kind = matched.iter().find_map(|m| m.configuration.kind);
        let sections = extract_modules(source, &matched);
        normalize(ParseResult {
            is_ash_file: true,
            module_name,
            kind,
            sections,
            parser_name: Self::NAME.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ash::ast::FileKind;
    use crate::ash::config::{DetailShape, ModuleConfiguration, NameShape, SectionShape};

    const RESOURCE: &str = r#"defmodule MyApp.Accounts.User do
  use Ash.Resource,
    otp_app: :my_app,
    extensions: [AshAuthentication]

  attributes do
    uuid_primary_key :id
    attribute :email, :ci_string, allow_nil?: false
  end

  relationships do
    belongs_to :org, MyApp.Org, allow_nil?: false
  end

  schema do
    field :ignored
  end
end
"#;

    #[test]
    fn test_configured_sections_only() {
        let result = ConfigurationParser::default().parse(RESOURCE);
        assert!(result.is_ash_file);
        assert_eq!(result.kind, Some(FileKind::Resource));
        assert_eq!(result.module_name, "MyApp.Accounts.User");
        assert_eq!(result.parser_name, "ConfigurationParser");
        // `schema` is not an Ash.Resource section
        assert_eq!(result.section_names(), vec!["attributes", "relationships"]);
    }

    #[test]
    fn test_positional_arguments_recorded() {
        let result = ConfigurationParser::default().parse(RESOURCE);
        let belongs_to = &result.section("relationships").unwrap().children[0];
        assert_eq!(belongs_to.name, ":org");
        assert_eq!(belongs_to.arguments, vec![":org", "MyApp.Org"]);

        let attribute = &result.section("attributes").unwrap().children[1];
        assert_eq!(attribute.name, ":email");
        assert!(attribute.arguments.is_empty());
    }

    #[test]
    fn test_unconfigured_file() {
        let result = ConfigurationParser::default()
            .parse("defmodule MyAppWeb.PageController do\n  use MyAppWeb, :controller\nend\n");
        assert!(!result.is_ash_file);
        assert!(result.sections.is_empty());
        assert_eq!(result.module_name, "MyAppWeb.PageController");
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = ModuleRegistry::new();
        registry.register(ModuleConfiguration::new(
            "My.Dsl",
            "My DSL",
            None,
            vec![SectionShape::new(
                "things",
                vec![DetailShape::new("thing", NameShape::Single)],
            )],
        ));
        let parser = ConfigurationParser::new(Arc::new(registry));
        let result = parser.parse("use My.Dsl\nthings do\n  thing :a\n  other :b\nend\n");
        assert!(result.is_ash_file);
        assert_eq!(result.kind, None);
        let things = result.section("things").unwrap();
        assert_eq!(things.children.len(), 1);
        assert_eq!(things.children[0].name, ":a");
    }
}
