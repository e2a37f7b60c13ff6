// command.rs - Eager configuration loading around a clap command

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{ArgMatches, Command, CommandFactory, FromArgMatches};
use tracing::debug;

use crate::cli::context::ResolutionContext;
use crate::cli::merge::apply_defaults;
use crate::cli::option::ConfigOption;
use crate::error::{Error, Result};
use crate::providers::ConfigMap;

/// A clap command with a configuration option attached
///
/// Resolution runs in two passes: a lenient parse that only extracts the
/// configuration path, then the option's callback and the default merge,
/// then a strict parse against the command with its new defaults.
#[derive(Debug)]
pub struct ConfiguredCommand {
    cmd: Command,
    option: ConfigOption,
    seed: ConfigMap,
}

/// Outcome of a successful resolution
#[derive(Debug)]
pub struct Resolution {
    pub matches: ArgMatches,
    pub context: ResolutionContext,
    value: Option<PathBuf>,
}

impl Resolution {
    /// The effective configuration path, when the option exposes it
    pub fn config_value(&self) -> Option<&Path> {
        self.value.as_deref()
    }
}

impl ConfiguredCommand {
    pub fn new(cmd: Command, option: ConfigOption) -> Self {
        let cmd = cmd.arg(option.arg());
        Self {
            cmd,
            option,
            seed: ConfigMap::new(),
        }
    }

    /// Build from a derived parser
    pub fn for_parser<P: CommandFactory>(option: ConfigOption) -> Self {
        Self::new(P::command(), option)
    }

    /// Defaults in place before the configuration file is read; the file wins on conflicts
    pub fn with_defaults(mut self, defaults: ConfigMap) -> Self {
        self.seed = defaults;
        self
    }

    pub fn command(&self) -> &Command {
        &self.cmd
    }

    pub fn option(&self) -> &ConfigOption {
        &self.option
    }

    /// Resolve `args` (including the binary name), returning errors.
    pub fn try_resolve_from<I, T>(&self, args: I) -> Result<Resolution>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let id = self.option.id();

        let explicit = self.eager_value(&args, &id);
        let mut context = ResolutionContext::new(self.cmd.get_name()).with_defaults(self.seed.clone());
        let value = self.option.resolve(&mut context, explicit)?;

        let mut cmd = self.cmd.clone();
        if let Some(default_path) = self.option.default_path(&context) {
            let shown = default_path.to_string_lossy().into_owned();
            cmd = cmd.mut_arg(&id, |arg| arg.default_value(shown));
        }
        let cmd = apply_defaults(cmd, &context.default_map, self.option.option_name(), &id)?;

        let matches = cmd.try_get_matches_from(args)?;
        let value = if self.option.is_exposed() { value } else { None };
        Ok(Resolution {
            matches,
            context,
            value,
        })
    }

    /// Resolve the process arguments, returning errors
    pub fn try_resolve(&self) -> Result<Resolution> {
        self.try_resolve_from(std::env::args_os())
    }

    /// Resolve the process arguments, exiting on error
    pub fn resolve(&self) -> Resolution {
        self.try_resolve().unwrap_or_else(|e| e.exit_with(&self.cmd))
    }

    pub fn try_get_matches_from<I, T>(&self, args: I) -> Result<ArgMatches>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(self.try_resolve_from(args)?.matches)
    }

    /// Parse the process arguments into matches, exiting on error
    pub fn get_matches(&self) -> ArgMatches {
        self.resolve().matches
    }

    /// Resolve `args` and build a derived parser from the matches
    pub fn try_parse_from<P, I, T>(&self, args: I) -> Result<P>
    where
        P: FromArgMatches,
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut resolution = self.try_resolve_from(args)?;
        P::from_arg_matches_mut(&mut resolution.matches).map_err(Error::from)
    }

    /// Parse the process arguments into a derived parser, exiting on error
    pub fn parse<P: FromArgMatches>(&self) -> P {
        self.try_parse_from(std::env::args_os())
            .unwrap_or_else(|e| e.exit_with(&self.cmd))
    }

    /// Read only the configuration path, ignoring every other error.
    fn eager_value(&self, args: &[OsString], id: &str) -> Option<PathBuf> {
        let lenient = self
            .cmd
            .clone()
            .ignore_errors(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .disable_help_subcommand(true);
        match lenient.try_get_matches_from(args) {
            Ok(matches) => matches.try_get_one::<PathBuf>(id).ok().flatten().cloned(),
            Err(e) => {
                debug!(kind = ?e.kind(), "eager pass could not read the configuration option");
                None
            }
        }
    }
}
