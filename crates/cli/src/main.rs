//! Cooperativa CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! coop-cli migrate
//!
//! # Check a farmer seed file without touching the database
//! coop-cli seed farmers crates/cli/data/farmers.yaml --dry-run
//!
//! # Enroll every farmer in a seed file
//! coop-cli seed farmers crates/cli/data/farmers.yaml
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed farmers` - Enroll farmers from a YAML file

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "coop-cli")]
#[command(author, version, about = "Cooperativa CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database from YAML files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Enroll farmers (person + farmer rows) from a YAML file
    Farmers {
        /// Path to the YAML file
        file: String,

        /// Validate the file without connecting to the database
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Farmers { file, dry_run } => {
                commands::seed::farmers(&file, dry_run).await?;
            }
        },
    }
    Ok(())
}
