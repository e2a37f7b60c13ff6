// merge.rs - Apply the default-value table to a clap command

use clap::Command;
use tracing::debug;

use crate::cli::validation::check_default_values;
use crate::error::{Error, Result};
use crate::providers::ConfigMap;

/// Install `defaults` as argument defaults on `cmd`.
///
/// Keys matching an argument id become that argument's default values,
/// so values given on the command line still take precedence. Table values
/// whose key names a subcommand are applied to that subcommand. Other keys
/// are ignored. `option` is the configuration flag reported on failure and
/// `skip` the id of the configuration argument itself.
///
/// A required argument with a configured default is no longer required.
pub fn apply_defaults(mut cmd: Command, defaults: &ConfigMap, option: &str, skip: &str) -> Result<Command> {
    // Value parsers implied by an action are only filled in by a build.
    let mut built = cmd.clone();
    built.build();

    for (key, value) in defaults {
        if key == skip {
            continue;
        }

        let arg = built.get_arguments().find(|a| a.get_id().as_str() == key.as_str());
        if let Some(arg) = arg {
            let values = value.to_default_values().ok_or_else(|| {
                Error::bad_option_usage(
                    option,
                    format!("'{}' in configuration file cannot be a table or nested list", key),
                )
            })?;
            check_default_values(arg, &values).map_err(|reason| {
                Error::bad_option_usage(option, format!("'{}' in configuration file: {}", key, reason))
            })?;

            debug!(command = cmd.get_name(), arg = %key, ?values, "applying default from configuration");
            cmd = cmd.mut_arg(key, |a| a.default_values(values).required(false));
            continue;
        }

        if let Some(table) = value.as_table() {
            if let Some(sub) = cmd.find_subcommand(key).cloned() {
                let sub = apply_defaults(sub, table, option, skip)?;
                cmd = cmd.mut_subcommand(key, |_| sub);
                continue;
            }
        }

        debug!(command = cmd.get_name(), key = %key, "ignoring configuration key with no matching argument");
    }
    Ok(cmd)
}
