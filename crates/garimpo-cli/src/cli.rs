//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Garimpo: cleaning pipeline for e-commerce record batches
#[derive(Parser)]
#[command(name = "garimpo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline over a payload file and write the result
    Process {
        /// Path to a JSON payload file ({"orders": [...], ...})
        #[arg(value_name = "FILE", conflicts_with = "csv_dir")]
        input: Option<PathBuf>,

        /// Directory of per-entity CSV files (entity inferred from file name)
        #[arg(long, value_name = "DIR")]
        csv_dir: Option<PathBuf>,

        /// Output path for the result JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Combined row-count limit across all entities
        #[arg(long, default_value = "10000")]
        max_rows: usize,

        /// IQR multiplier for outlier capping
        #[arg(long, default_value = "1.5")]
        iqr_factor: f64,

        /// Pretty-print the result JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Serve the pipeline over HTTP (POST /process)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3141")]
        port: u16,

        /// Combined row-count limit across all entities
        #[arg(long, default_value = "10000")]
        max_rows: usize,
    },
}
