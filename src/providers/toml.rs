// toml.rs - TOML configuration file provider

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::ini::scope_to_section;
use super::traits::{BoxError, ConfigMap, ConfigValue, Provider};
use super::ParseError;

/// Provider for TOML files, optionally scoped to one table
#[derive(Debug, Clone, Default)]
pub struct TomlProvider {
    section: Option<String>,
}

impl TomlProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only return the entries of the named top-level table
    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Parse TOML text that has already been read into memory
    pub fn parse_str(&self, content: &str) -> Result<ConfigMap, ParseError> {
        let table: toml::Table = toml::from_str(content)?;
        let config: ConfigMap = table
            .into_iter()
            .map(|(key, value)| (key, ConfigValue::from(value)))
            .collect();
        match &self.section {
            None => Ok(config),
            Some(name) => scope_to_section(config, name),
        }
    }
}

impl Provider for TomlProvider {
    fn provide(&self, file_path: &Path, command_name: &str) -> Result<ConfigMap, BoxError> {
        let content = match fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %file_path.display(), command = command_name, "configuration file not found, using empty configuration");
                String::new()
            }
            Err(e) => {
                return Err(ParseError::Io {
                    path: file_path.to_path_buf(),
                    source: e,
                }
                .into())
            }
        };
        Ok(self.parse_str(&content)?)
    }
}

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ConfigValue::String(s),
            toml::Value::Integer(i) => ConfigValue::Integer(i),
            toml::Value::Float(f) => ConfigValue::Float(f),
            toml::Value::Boolean(b) => ConfigValue::Boolean(b),
            toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                ConfigValue::List(items.into_iter().map(ConfigValue::from).collect())
            }
            toml::Value::Table(table) => ConfigValue::Table(
                table
                    .into_iter()
                    .map(|(key, value)| (key, ConfigValue::from(value)))
                    .collect(),
            ),
        }
    }
}
