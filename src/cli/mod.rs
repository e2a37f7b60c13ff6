// mod.rs - CLI module

pub mod app_dir;
pub mod command;
pub mod context;
pub mod merge;
pub mod option;
pub mod validation;

// Re-export main types for convenience
pub use app_dir::app_dir;
pub use command::{ConfiguredCommand, Resolution};
pub use context::ResolutionContext;
pub use merge::apply_defaults;
pub use option::{Callback, ConfigOption};
pub use validation::PathRules;
