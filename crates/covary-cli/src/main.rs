//! Covary CLI: the `covary` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("COVARY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tables { json } => commands::tables::run(json),

        Commands::Store {
            array,
            value,
            declared_array,
            declared_value,
            index,
            length,
            json,
        } => commands::store::run(commands::store::Args {
            array,
            value,
            declared_array,
            declared_value,
            index,
            length,
            json,
        }),

        Commands::Conformance { config, json } => commands::conformance::run(config, json),

        Commands::Validate { json } => commands::validate::run(json),
    }
}
