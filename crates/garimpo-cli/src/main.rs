//! Garimpo CLI - cleaning pipeline for e-commerce record batches.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "garimpo=debug" } else { "garimpo=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Process {
            input,
            csv_dir,
            output,
            max_rows,
            iqr_factor,
            pretty,
        } => commands::process::run(input, csv_dir, output, max_rows, iqr_factor, pretty),

        Commands::Serve { port, max_rows } => commands::serve::run(port, max_rows),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
