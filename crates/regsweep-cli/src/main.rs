//! RegSweep CLI
//!
//! Command-line interface for RegSweep

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "regsweep")]
#[command(about = "RegSweep - Registry inventory and .reg export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk a snapshot and export the matching values as .reg text
    Query(commands::query::QueryArgs),
    /// Validate snapshot and plan files
    Validate(commands::validate::ValidateArgs),
    /// List the root keys and their aliases
    Roots,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query(args) => commands::query::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Roots => commands::roots::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
