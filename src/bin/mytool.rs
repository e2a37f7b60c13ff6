// mytool.rs - Greeting tool whose defaults come from a configuration file

use clap::{FromArgMatches, Parser};
use clapconf::{ConfigOption, ConfiguredCommand, ResolutionContext};
use tracing_subscriber::EnvFilter;

/// Print a greeting, with defaults read from a configuration file
#[derive(Parser, Debug)]
#[command(name = "mytool", version)]
struct Args {
    /// number of greetings to print
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// who to greet
    #[arg(long, default_value = "World")]
    who: String,

    /// print the greeting in upper case
    #[arg(long)]
    shout: bool,

    /// print the defaults loaded from the configuration file as TOML and exit
    #[arg(long)]
    show_config: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut option = ConfigOption::new().flags(["--config", "-c"]);
    if let Some(root) = std::env::var_os("MYTOOL_CONFIG_ROOT") {
        option = option.config_root(root);
    }

    let resolution = ConfiguredCommand::for_parser::<Args>(option).resolve();
    let args = Args::from_arg_matches(&resolution.matches).unwrap_or_else(|e| e.exit());

    if let Err(e) = run_main(&args, &resolution.context) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_main(args: &Args, context: &ResolutionContext) -> Result<(), String> {
    if args.show_config {
        print!("{}", context.dump_defaults()?);
        return Ok(());
    }

    let greeting = format!("Hello {}!", args.who);
    let greeting = if args.shout { greeting.to_uppercase() } else { greeting };
    for _ in 0..args.count {
        println!("{}", greeting);
    }
    Ok(())
}
