// option.rs - The --config option and its resolution callback

use std::fmt;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};
use tracing::{debug, info};

use crate::cli::app_dir::app_dir;
use crate::cli::command::ConfiguredCommand;
use crate::cli::context::ResolutionContext;
use crate::cli::validation::PathRules;
use crate::error::{Error, Result};
use crate::providers::{default_provider, BoxError, Provider};

/// Callback chained after configuration loading.
///
/// Receives the context (with the configuration already merged), the option
/// itself and the effective path; its return value replaces the path.
pub type Callback = Box<
    dyn Fn(&ResolutionContext, &ConfigOption, Option<PathBuf>) -> std::result::Result<Option<PathBuf>, BoxError>
        + Send
        + Sync,
>;

pub const DEFAULT_FLAG: &str = "--config";
pub const DEFAULT_FILE_NAME: &str = "config";
pub const DEFAULT_HELP: &str = "Read configuration from FILE.";

/// Builder for a configuration-file option
///
/// `ConfigOption::new()` loads `<app dir>/<command>/config` even when the
/// flag is absent. `ConfigOption::base()` has no file name, so nothing is
/// loaded automatically and the option is a plain path option.
pub struct ConfigOption {
    decls: Vec<String>,
    command_name: Option<String>,
    config_file_name: Option<String>,
    provider: Box<dyn Provider>,
    rules: PathRules,
    help: String,
    value_name: String,
    expose_value: bool,
    force_posix: bool,
    config_root: Option<PathBuf>,
    callback: Option<Callback>,
}

impl ConfigOption {
    /// Option without automatic loading
    pub fn base() -> Self {
        Self {
            decls: vec![DEFAULT_FLAG.to_string()],
            command_name: None,
            config_file_name: None,
            provider: Box::new(default_provider()),
            rules: PathRules::default(),
            help: DEFAULT_HELP.to_string(),
            value_name: "FILE".to_string(),
            expose_value: false,
            force_posix: false,
            config_root: None,
            callback: None,
        }
    }

    /// Option that loads `config` from the application directory by default
    pub fn new() -> Self {
        Self::base().config_file_name(DEFAULT_FILE_NAME)
    }

    /// Flag declarations such as `--config`, `-c`, or a bare argument id.
    ///
    /// The first declaration names the option in error messages.
    pub fn flags<I, S>(mut self, decls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let decls: Vec<String> = decls.into_iter().map(Into::into).collect();
        if !decls.is_empty() {
            self.decls = decls;
        }
        self
    }

    pub fn command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = Some(name.into());
        self
    }

    pub fn config_file_name(mut self, name: impl Into<String>) -> Self {
        self.config_file_name = Some(name.into());
        self
    }

    pub fn provider<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.provider = Box::new(provider);
        self
    }

    pub fn path_rules(mut self, rules: PathRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn exists(mut self, yes: bool) -> Self {
        self.rules.exists = yes;
        self
    }

    pub fn file_okay(mut self, yes: bool) -> Self {
        self.rules.file_okay = yes;
        self
    }

    pub fn dir_okay(mut self, yes: bool) -> Self {
        self.rules.dir_okay = yes;
        self
    }

    pub fn writable(mut self, yes: bool) -> Self {
        self.rules.writable = yes;
        self
    }

    pub fn readable(mut self, yes: bool) -> Self {
        self.rules.readable = yes;
        self
    }

    pub fn resolve_path(mut self, yes: bool) -> Self {
        self.rules.resolve_path = yes;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = name.into();
        self
    }

    /// Report the effective path in the resolution result
    pub fn expose_value(mut self, yes: bool) -> Self {
        self.expose_value = yes;
        self
    }

    /// Use `~/.<command>` rather than the platform configuration directory
    pub fn force_posix(mut self, yes: bool) -> Self {
        self.force_posix = yes;
        self
    }

    /// Look for `<root>/<command>/<file name>` instead of the platform directory
    pub fn config_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config_root = Some(root.into());
        self
    }

    /// Chain a callback to run after the configuration has been merged
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ResolutionContext, &ConfigOption, Option<PathBuf>) -> std::result::Result<Option<PathBuf>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Name used in error messages (the first declaration)
    pub fn option_name(&self) -> &str {
        &self.decls[0]
    }

    /// Argument id: a bare declaration, else the first long flag in snake case.
    pub fn id(&self) -> String {
        if let Some(bare) = self.decls.iter().find(|d| !d.starts_with('-')) {
            return bare.clone();
        }
        if let Some(long) = self.decls.iter().find_map(|d| d.strip_prefix("--")) {
            return long.replace('-', "_");
        }
        self.decls[0].trim_start_matches('-').to_string()
    }

    pub fn is_exposed(&self) -> bool {
        self.expose_value
    }

    /// Build the clap argument for this option
    pub fn arg(&self) -> Arg {
        let mut arg = Arg::new(self.id())
            .value_name(self.value_name.clone())
            .help(self.help.clone())
            .value_parser(value_parser!(PathBuf))
            .action(ArgAction::Set);

        let mut has_long = false;
        let mut has_short = false;
        for decl in &self.decls {
            if let Some(long) = decl.strip_prefix("--") {
                arg = if has_long {
                    arg.visible_alias(long.to_string())
                } else {
                    arg.long(long.to_string())
                };
                has_long = true;
            } else if let Some(short) = decl.strip_prefix('-') {
                let Some(c) = short.chars().next() else { continue };
                arg = if has_short { arg.visible_short_alias(c) } else { arg.short(c) };
                has_short = true;
            }
        }
        arg
    }

    /// Attach this option to `cmd`
    pub fn install(self, cmd: Command) -> ConfiguredCommand {
        ConfiguredCommand::new(cmd, self)
    }

    /// Command name used for the configuration directory
    pub fn effective_command_name(&self, ctx: &ResolutionContext) -> String {
        self.command_name.clone().unwrap_or_else(|| ctx.info_name.clone())
    }

    /// Path read when the flag is not given, if automatic loading is enabled
    pub fn default_path(&self, ctx: &ResolutionContext) -> Option<PathBuf> {
        let file_name = self.config_file_name.as_ref()?;
        let command_name = self.effective_command_name(ctx);
        let dir = match &self.config_root {
            Some(root) => root.join(&command_name),
            None => app_dir(&command_name, self.force_posix),
        };
        Some(dir.join(file_name))
    }

    /// Resolve the option for one invocation.
    ///
    /// `value` is the path given on the command line, if any. With a file
    /// name configured, the provider's mapping is merged into the context's
    /// default-value table. The chained callback, when present, decides the
    /// returned value.
    pub fn resolve(&self, ctx: &mut ResolutionContext, value: Option<PathBuf>) -> Result<Option<PathBuf>> {
        let value = match value {
            Some(path) => Some(self.rules.check(self.option_name(), &path)?),
            None => None,
        };

        let Some(default_path) = self.default_path(ctx) else {
            return self.chain(ctx, value);
        };

        let command_name = self.effective_command_name(ctx);
        debug!(default = %default_path.display(), command = %command_name, "computed default configuration path");
        let path = value.unwrap_or(default_path);

        let config = self
            .provider
            .provide(&path, &command_name)
            .map_err(|e| Error::bad_option_usage(self.option_name(), format!("Error reading configuration file: {}", e)))?;

        info!(path = %path.display(), keys = config.len(), "loaded configuration");
        ctx.merge(config);
        self.chain(ctx, Some(path))
    }

    fn chain(&self, ctx: &ResolutionContext, value: Option<PathBuf>) -> Result<Option<PathBuf>> {
        match &self.callback {
            Some(callback) => callback(ctx, self, value).map_err(Error::Callback),
            None => Ok(value),
        }
    }
}

impl Default for ConfigOption {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOption")
            .field("decls", &self.decls)
            .field("command_name", &self.command_name)
            .field("config_file_name", &self.config_file_name)
            .field("rules", &self.rules)
            .field("expose_value", &self.expose_value)
            .field("force_posix", &self.force_posix)
            .field("config_root", &self.config_root)
            .field("callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ConfigMap, ConfigValue};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    fn recording_provider(seen: Arc<Mutex<Vec<(PathBuf, String)>>>) -> impl Provider {
        move |path: &Path, name: &str| -> std::result::Result<ConfigMap, BoxError> {
            seen.lock().unwrap().push((path.to_path_buf(), name.to_string()));
            let mut map = ConfigMap::new();
            map.insert("who".to_string(), ConfigValue::from("World"));
            Ok(map)
        }
    }

    #[test]
    fn test_id_from_decls() {
        assert_eq!(ConfigOption::new().id(), "config");
        assert_eq!(ConfigOption::new().flags(["--config-file", "-c"]).id(), "config_file");
        assert_eq!(ConfigOption::new().flags(["-c", "settings"]).id(), "settings");
        assert_eq!(ConfigOption::new().flags(["-c", "settings"]).option_name(), "-c");
    }

    #[test]
    fn test_arg_shape() {
        let arg = ConfigOption::new().flags(["--config", "-c"]).arg();
        assert_eq!(arg.get_long(), Some("config"));
        assert_eq!(arg.get_short(), Some('c'));
        assert_eq!(arg.get_help().map(|h| h.to_string()), Some(DEFAULT_HELP.to_string()));
    }

    #[test]
    fn test_resolve_uses_default_path() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let option = ConfigOption::new()
            .config_root("/cfg")
            .provider(recording_provider(seen.clone()));
        let mut ctx = ResolutionContext::new("cli");

        let value = option.resolve(&mut ctx, None).unwrap();
        let expected = PathBuf::from("/cfg").join("cli").join("config");
        assert_eq!(value, Some(expected.clone()));
        assert_eq!(seen.lock().unwrap().as_slice(), &[(expected, "cli".to_string())]);
        assert_eq!(ctx.default_for("who"), Some(&ConfigValue::from("World")));
    }

    #[test]
    fn test_command_name_override() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let option = ConfigOption::new()
            .command_name("other")
            .config_root("/cfg")
            .provider(recording_provider(seen.clone()));
        let mut ctx = ResolutionContext::new("cli");
        option.resolve(&mut ctx, None).unwrap();

        let (path, name) = seen.lock().unwrap()[0].clone();
        assert_eq!(name, "other");
        assert!(path.starts_with(PathBuf::from("/cfg").join("other")));
    }

    #[test]
    fn test_base_option_does_not_load() {
        let option = ConfigOption::base().provider(|_: &Path, _: &str| -> std::result::Result<ConfigMap, BoxError> {
            panic!("provider must not run without a file name")
        });
        let mut ctx = ResolutionContext::new("cli");
        assert_eq!(option.resolve(&mut ctx, None).unwrap(), None);
        assert!(ctx.default_map.is_empty());
    }

    #[test]
    fn test_provider_failure_is_bad_option_usage() {
        let option = ConfigOption::new()
            .config_root("/cfg")
            .provider(|_: &Path, _: &str| -> std::result::Result<ConfigMap, BoxError> { Err("Provider".into()) });
        let mut ctx = ResolutionContext::new("cli");
        let err = option.resolve(&mut ctx, None).unwrap_err();
        match err {
            Error::BadOptionUsage { option, message } => {
                assert_eq!(option, "--config");
                assert_eq!(message, "Error reading configuration file: Provider");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(ctx.default_map.is_empty());
    }

    #[test]
    fn test_callback_chained_after_merge() {
        let option = ConfigOption::new()
            .config_root("/cfg")
            .provider(recording_provider(Arc::new(Mutex::new(Vec::new()))))
            .callback(|ctx, option, value| {
                assert_eq!(option.option_name(), "--config");
                assert!(ctx.default_for("who").is_some());
                assert!(value.is_some());
                Ok(Some(PathBuf::from("bar")))
            });
        let mut ctx = ResolutionContext::new("cli");
        assert_eq!(option.resolve(&mut ctx, None).unwrap(), Some(PathBuf::from("bar")));
    }

    #[test]
    fn test_callback_error_passes_through() {
        let option = ConfigOption::base().callback(|_, _, _| Err("callback failed".into()));
        let mut ctx = ResolutionContext::new("cli");
        let err = option.resolve(&mut ctx, Some(PathBuf::from("foo"))).unwrap_err();
        assert!(matches!(err, Error::Callback(_)));
        assert_eq!(err.to_string(), "callback failed");
    }
}
