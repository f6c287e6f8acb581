//! geodiff CLI
//!
//! Command-line interface for the geodiff change log

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "geodiff")]
#[command(about = "geodiff - Change audit log for versioned geographic entities", long_about = None)]
struct Cli {
    /// Logging profile: dev, prod (JSON) or test
    #[arg(long, global = true, default_value = "dev")]
    log_profile: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or migrate a database
    Init(commands::init::InitArgs),
    /// Apply a JSON-lines change stream
    Apply(commands::apply::ApplyArgs),
    /// Changeset operations
    Changeset(commands::changeset::ChangesetArgs),
}

fn main() {
    let cli = Cli::parse();

    let profile = match cli.log_profile.parse() {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    geodiff_core::logging_facility::init(profile);

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Apply(args) => commands::apply::execute(args),
        Commands::Changeset(args) => commands::changeset::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
