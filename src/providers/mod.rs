// mod.rs - Configuration providers module root

pub mod ini;
pub mod literal;
pub mod toml;
pub mod traits;

use std::path::PathBuf;

// Re-export main types for convenience
pub use self::ini::IniProvider;
pub use self::toml::TomlProvider;
pub use traits::{BoxError, ConfigMap, ConfigValue, Provider};

/// Failures raised by the built-in providers
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: invalid literal: {message}")]
    Literal { line: usize, message: String },

    #[error("section '{0}' not found")]
    MissingSection(String),

    #[error(transparent)]
    Toml(#[from] ::toml::de::Error),
}

/// The provider used when none is configured: INI syntax, literal values, no section.
pub fn default_provider() -> IniProvider {
    IniProvider::new()
}
