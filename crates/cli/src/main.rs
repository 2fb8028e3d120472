//! Bazaar CLI - Database migrations and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bazaar-cli migrate
//!
//! # Load categories and products from a YAML catalog
//! bazaar-cli seed catalog.yaml
//!
//! # Remove revocation entries for tokens that have expired anyway
//! bazaar-cli tokens purge
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog from YAML
//! - `tokens purge` - Garbage-collect the revocation ledger

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed categories and products from a YAML file
    Seed {
        /// Path to the catalog file
        file: String,
    },
    /// Maintain the token revocation ledger
    Tokens {
        #[command(subcommand)]
        action: TokensAction,
    },
}

#[derive(Subcommand)]
enum TokensAction {
    /// Delete entries whose token has already expired
    Purge,
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
        Commands::Seed { file } => commands::seed::catalog(&file).await?,
        Commands::Tokens { action } => match action {
            TokensAction::Purge => commands::tokens::purge().await?,
        },
    }
    Ok(())
}
