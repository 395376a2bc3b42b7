mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{CacheCommands, Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "DOCTEMPLATE_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Fill(args) => commands::fill::run(args, cli.verbose),
        Commands::Scan { template, json } => commands::scan::run(template, json),
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Show { template, json } => {
                commands::cache::show(template, json, cli.verbose)
            }
            CacheCommands::Clear { template } => commands::cache::clear(template, cli.verbose),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
