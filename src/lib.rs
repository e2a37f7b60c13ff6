// lib.rs - clapconf library root

//! # clapconf - configuration file defaults for clap commands
//!
//! Adds a `--config FILE` option to a [`clap::Command`]. The file is read
//! before any other argument is resolved and its entries become the
//! defaults of the matching arguments, so values given on the command line
//! still win.
//!
//! ## Features
//!
//! - **Eager loading**: the configuration is read once, before the final parse
//! - **Default location**: `<config dir>/<command>/config` when no flag is given
//! - **Pluggable providers**: INI-style files with typed literals, TOML, or any closure
//! - **Section scoping**: read a single section as a flat table
//! - **Subcommands**: nested tables supply defaults for subcommands
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use clap::{value_parser, Arg, Command};
//! use clapconf::prelude::*;
//!
//! let cmd = Command::new("mytool")
//!     .arg(Arg::new("count").long("count").value_parser(value_parser!(u32)));
//!
//! // Reads e.g. ~/.config/mytool/config, or the file given with --config
//! let matches = ConfigOption::new().install(cmd).get_matches();
//! let count = matches.get_one::<u32>("count");
//! # let _ = count;
//! ```

pub mod cli;
pub mod error;
pub mod providers;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{ConfigOption, ConfiguredCommand, PathRules, Resolution, ResolutionContext};
    pub use crate::error::{Error, Result};
    pub use crate::providers::{BoxError, ConfigMap, ConfigValue, IniProvider, Provider, TomlProvider};
}

// Re-export main types at the root level for convenience
pub use cli::{ConfigOption, ConfiguredCommand, Resolution, ResolutionContext};
pub use error::{Error, Result};
pub use providers::{ConfigMap, ConfigValue, IniProvider, Provider, TomlProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
