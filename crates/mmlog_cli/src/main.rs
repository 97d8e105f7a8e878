//! mmlog CLI
//!
//! Command-line tools for inspecting mmlog region files.
//!
//! # Commands
//!
//! - `stat` - Display header and usage information for a region file
//! - `dump` - Print the records of a region file

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// mmlog region file inspection tools.
#[derive(Parser)]
#[command(name = "mmlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display header and usage information for a region file
    Stat {
        /// Path to the region backing file
        file: PathBuf,
    },

    /// Print the records of a region file
    Dump {
        /// Path to the region backing file
        file: PathBuf,

        /// Maximum number of records to print (from the end)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Prefix each record with its index
        #[arg(short, long)]
        numbered: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Stat { file } => commands::stat::run(&file)?,
        Commands::Dump {
            file,
            limit,
            numbered,
        } => commands::dump::run(&file, limit, numbered)?,
    }

    Ok(())
}
