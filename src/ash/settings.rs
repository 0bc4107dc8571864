//! Settings for the command line tool
//!
//! Precedence, lowest first: the embedded `defaults/ashdsl.default.toml`, an
//! `ashdsl.toml` next to where the tool runs, the `--config` file, then flags.
//! Settings pick a strategy and an output format; they never change what a
//! strategy extracts.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../../defaults/ashdsl.default.toml");

/// Name of the settings file picked up from the working directory
pub const LOCAL_SETTINGS_FILE: &str = "ashdsl.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub parser: ParserSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserSettings {
    pub strategy: StrategyName,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub format: FormatName,
    pub show_positions: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl LoggingSettings {
    /// Filter directive for the given `-v` count. Each `-v` raises the level
    /// one step above the configured one, up to `trace`.
    pub fn directive(&self, verbosity: u8) -> &str {
        match verbosity {
            0 => self.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Key of a strategy in the parser registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    Auto,
    Config,
    Simple,
    Grammar,
}

impl StrategyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyName::Auto => "auto",
            StrategyName::Config => "config",
            StrategyName::Simple => "simple",
            StrategyName::Grammar => "grammar",
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a format in the format registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatName {
    Outline,
    Json,
    Yaml,
}

impl FormatName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatName::Outline => "outline",
            FormatName::Json => "json",
            FormatName::Yaml => "yaml",
        }
    }
}

impl fmt::Display for FormatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer `ashdsl.toml` from `dir` if there is one
    pub fn with_local_settings(self, dir: impl AsRef<Path>) -> Self {
        self.layer(&dir.as_ref().join(LOCAL_SETTINGS_FILE), false)
    }

    /// Layer a file named on the command line; building fails if it is missing
    pub fn with_settings_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    pub fn with_strategy(self, strategy: &str) -> Result<Self, SettingsError> {
        self.set("parser.strategy", strategy)
    }

    pub fn with_format(self, format: &str) -> Result<Self, SettingsError> {
        self.set("output.format", format)
    }

    pub fn with_positions(self) -> Result<Self, SettingsError> {
        self.set("output.show_positions", true)
    }

    pub fn build(self) -> Result<Settings, SettingsError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    fn set<V: Into<ValueKind>>(mut self, key: &str, value: V) -> Result<Self, SettingsError> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_embedded_defaults() {
        let settings = Loader::new().build().unwrap();
        assert_eq!(settings.parser.strategy, StrategyName::Auto);
        assert_eq!(settings.output.format, FormatName::Outline);
        assert!(!settings.output.show_positions);
        assert_eq!(settings.logging.directive(0), "warn");
    }

    #[test]
    fn test_local_settings_are_optional() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Loader::new().with_local_settings(dir.path()).build().unwrap();
        assert_eq!(settings.parser.strategy, StrategyName::Auto);

        write(dir.path(), LOCAL_SETTINGS_FILE, "[parser]\nstrategy = \"simple\"\n");
        let settings = Loader::new().with_local_settings(dir.path()).build().unwrap();
        assert_eq!(settings.parser.strategy, StrategyName::Simple);
        assert_eq!(settings.output.format, FormatName::Outline);
    }

    #[test]
    fn test_precedence() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            LOCAL_SETTINGS_FILE,
            "[parser]\nstrategy = \"simple\"\n[output]\nformat = \"yaml\"\n",
        );
        let explicit = write(dir.path(), "team.toml", "[output]\nformat = \"json\"\n");

        let settings = Loader::new()
            .with_local_settings(dir.path())
            .with_settings_file(&explicit)
            .build()
            .unwrap();
        assert_eq!(settings.parser.strategy, StrategyName::Simple);
        assert_eq!(settings.output.format, FormatName::Json);

        let settings = Loader::new()
            .with_local_settings(dir.path())
            .with_settings_file(&explicit)
            .with_strategy("grammar")
            .unwrap()
            .with_positions()
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(settings.parser.strategy, StrategyName::Grammar);
        assert!(settings.output.show_positions);
    }

    #[test]
    fn test_missing_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Loader::new()
            .with_settings_file(dir.path().join("absent.toml"))
            .build();
        assert!(matches!(result, Err(SettingsError::Config(_))));
    }

    #[test]
    fn test_unknown_names_rejected() {
        let result = Loader::new().with_strategy("magic").unwrap().build();
        assert!(matches!(result, Err(SettingsError::Config(_))));
        let result = Loader::new().with_format("html").unwrap().build();
        assert!(matches!(result, Err(SettingsError::Config(_))));
    }

    #[test]
    fn test_verbosity_directive() {
        let logging = LoggingSettings {
            level: "info".into(),
        };
        assert_eq!(logging.directive(0), "info");
        assert_eq!(logging.directive(1), "debug");
        assert_eq!(logging.directive(4), "trace");
    }
}
