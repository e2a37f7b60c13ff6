// traits.rs - Core traits and types for the provider system

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

/// Error type returned by providers and chained callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Flat (or nested, for sections and subcommands) option-name to value table.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A single value read from a configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Table(ConfigMap),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(val) => Some(*val),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, ConfigValue::Table(_))
    }

    /// Textual default values clap should see for this value.
    ///
    /// Lists expand to one entry per element; tables have no argument form.
    pub fn to_default_values(&self) -> Option<Vec<String>> {
        match self {
            ConfigValue::Table(_) => None,
            ConfigValue::List(items) => items
                .iter()
                .map(|item| match item {
                    ConfigValue::List(_) | ConfigValue::Table(_) => None,
                    scalar => Some(scalar.to_string()),
                })
                .collect(),
            scalar => Some(vec![scalar.to_string()]),
        }
    }
}

impl Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Boolean(val) => write!(f, "{}", val),
            ConfigValue::Integer(val) => write!(f, "{}", val),
            // Whole floats keep a fraction so they still read as floats.
            ConfigValue::Float(val) if val.is_finite() && val.fract() == 0.0 => write!(f, "{:.1}", val),
            ConfigValue::Float(val) => write!(f, "{}", val),
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
            ConfigValue::Table(table) => {
                let parts: Vec<String> = table.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(val: &str) -> Self {
        ConfigValue::String(val.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(val: String) -> Self {
        ConfigValue::String(val)
    }
}

impl From<i64> for ConfigValue {
    fn from(val: i64) -> Self {
        ConfigValue::Integer(val)
    }
}

impl From<f64> for ConfigValue {
    fn from(val: f64) -> Self {
        ConfigValue::Float(val)
    }
}

impl From<bool> for ConfigValue {
    fn from(val: bool) -> Self {
        ConfigValue::Boolean(val)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(val: ConfigMap) -> Self {
        ConfigValue::Table(val)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(val: Vec<T>) -> Self {
        ConfigValue::List(val.into_iter().map(Into::into).collect())
    }
}

/// Reads a configuration file and returns the defaults it defines
pub trait Provider: Send + Sync {
    /// Parse `file_path` for the command called `command_name`.
    fn provide(&self, file_path: &Path, command_name: &str) -> Result<ConfigMap, BoxError>;
}

impl<F> Provider for F
where
    F: Fn(&Path, &str) -> Result<ConfigMap, BoxError> + Send + Sync,
{
    fn provide(&self, file_path: &Path, command_name: &str) -> Result<ConfigMap, BoxError> {
        self(file_path, command_name)
    }
}
