//! Module configuration registry
//!
//! A configuration maps a declaration pattern (the exact dotted path written
//! after `use`) to the DSL sections that module defines, and for each section
//! the detail keywords that are legal inside it, recursively.
//!
//! The registry is built once and shared read-only. Parsers receive it as an
//! `Arc<ModuleRegistry>` so a caller can swap in a custom registry for a parse
//! without touching the built-in one.

mod builtin;

use crate::ash::ast::FileKind;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;

/// How the name of a detail is captured from the text after its keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameShape {
    /// No name, e.g. `timestamps()`
    Bare,
    /// One leading name token, e.g. `attribute :title, :string`
    Single,
    /// Several leading positional arguments, e.g. `belongs_to :author, MyApp.User`
    Positional,
}

/// A detail keyword legal inside a section or another detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailShape {
    pub keyword: String,
    pub name: NameShape,
    pub children: Vec<DetailShape>,
}

impl DetailShape {
    pub fn new(keyword: impl Into<String>, name: NameShape) -> Self {
        Self {
            keyword: keyword.into(),
            name,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DetailShape>) -> Self {
        self.children = children;
        self
    }
}

/// A top-level section and the details it accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionShape {
    pub keyword: String,
    pub details: Vec<DetailShape>,
}

impl SectionShape {
    pub fn new(keyword: impl Into<String>, details: Vec<DetailShape>) -> Self {
        Self {
            keyword: keyword.into(),
            details,
        }
    }
}

/// A registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleConfiguration {
    /// Dotted path compared for equality against a `use` target
    pub declaration_pattern: String,
    pub display_name: String,
    pub kind: Option<FileKind>,
    pub sections: Vec<SectionShape>,
}

impl ModuleConfiguration {
    pub fn new(
        declaration_pattern: impl Into<String>,
        display_name: impl Into<String>,
        kind: Option<FileKind>,
        sections: Vec<SectionShape>,
    ) -> Self {
        Self {
            declaration_pattern: declaration_pattern.into(),
            display_name: display_name.into(),
            kind,
            sections,
        }
    }

    /// Find the shape of a top-level section by keyword
    pub fn section(&self, keyword: &str) -> Option<&SectionShape> {
        self.sections.iter().find(|s| s.keyword == keyword)
    }
}

/// Read-only collection of module configurations
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    configurations: Vec<ModuleConfiguration>,
}

static BUILTIN: Lazy<Arc<ModuleRegistry>> = Lazy::new(|| {
    Arc::new(ModuleRegistry {
        configurations: builtin::configurations(),
    })
});

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in Ash configurations
    pub fn builtin() -> Self {
        BUILTIN.as_ref().clone()
    }

    /// The process-wide built-in registry
    pub fn shared() -> Arc<ModuleRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Add a configuration. A configuration with the same declaration pattern
    /// is replaced in place.
    pub fn register(&mut self, configuration: ModuleConfiguration) {
        match self
            .configurations
            .iter_mut()
            .find(|c| c.declaration_pattern == configuration.declaration_pattern)
        {
            Some(existing) => *existing = configuration,
            None => self.configurations.push(configuration),
        }
    }

    /// Look up a configuration by exact declaration pattern
    pub fn get(&self, declaration_pattern: &str) -> Option<&ModuleConfiguration> {
        self.configurations
            .iter()
            .find(|c| c.declaration_pattern == declaration_pattern)
    }

    pub fn configurations(&self) -> &[ModuleConfiguration] {
        &self.configurations
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

/// All configurations of the built-in registry
pub fn get_all_available_configurations() -> &'static [ModuleConfiguration] {
    BUILTIN.configurations()
}
