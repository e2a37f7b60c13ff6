// context.rs - Per-invocation resolution state

use crate::providers::{ConfigMap, ConfigValue};

/// State threaded through one command invocation.
///
/// Holds the invoked command name and the default-value table that is
/// applied to the command's arguments before the final parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionContext {
    pub info_name: String,
    pub default_map: ConfigMap,
}

impl ResolutionContext {
    pub fn new(info_name: impl Into<String>) -> Self {
        Self {
            info_name: info_name.into(),
            default_map: ConfigMap::new(),
        }
    }

    /// Seed the default-value table before configuration is loaded
    pub fn with_defaults(mut self, defaults: ConfigMap) -> Self {
        self.default_map = defaults;
        self
    }

    /// Merge `config` into the default-value table; keys in `config` win.
    pub fn merge(&mut self, config: ConfigMap) {
        self.default_map.extend(config);
    }

    pub fn default_for(&self, key: &str) -> Option<&ConfigValue> {
        self.default_map.get(key)
    }

    /// Render the default-value table as TOML
    pub fn dump_defaults(&self) -> Result<String, String> {
        toml::to_string_pretty(&self.default_map)
            .map_err(|e| format!("Failed to serialize defaults: {}", e))
    }
}
