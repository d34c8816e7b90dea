//! Bookcase CLI
//!
//! Command-line tools for Bookcase catalog maintenance.
//!
//! # Commands
//!
//! - `inspect` - Display catalog statistics
//! - `verify` - Verify catalog integrity

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bookcase command-line catalog tools.
#[derive(Parser)]
#[command(name = "bookcase")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the catalog data directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display catalog statistics
    Inspect {
        /// List every book with its score
        #[arg(short, long)]
        books: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify catalog integrity
    Verify,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { books, format } => {
            let path = cli.path.ok_or("Catalog path required for inspect")?;
            commands::inspect::run(&path, books, &format)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Catalog path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Version => {
            println!("Bookcase CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Bookcase Core v{}", bookcase_core::VERSION);
        }
    }

    Ok(())
}
