//! Fournil CLI - Database migrations and production planning tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! fournil-cli migrate
//!
//! # Production summary of today's orders for one client
//! fournil-cli summary --client-id 12 --date today
//!
//! # Per-article totals over a date range
//! fournil-cli summary --start-date 2026-03-01 --end-date 2026-03-07 --by-article
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `summary` - Compute the production summary and print it as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fournil-cli")]
#[command(author, version, about = "Fournil back-office CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Compute the production summary and print it as JSON
    Summary {
        /// Only show orders of this client
        #[arg(long)]
        client_id: Option<i32>,

        /// Order day: `today`, `yesterday` or `YYYY-MM-DD`
        #[arg(long, conflicts_with_all = ["start_date", "end_date"])]
        date: Option<String>,

        /// First order day of the range (inclusive)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Last order day of the range (inclusive)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Print per-article totals instead of per-order lines
        #[arg(long)]
        by_article: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fournil_cli=info,fournil_admin=warn".into()),
        )
        .init();

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
        Commands::Summary {
            client_id,
            date,
            start_date,
            end_date,
            by_article,
        } => {
            let args = commands::summary::SummaryArgs {
                client_id,
                date,
                start_date,
                end_date,
                by_article,
            };
            commands::summary::run(&args).await?;
        }
    }
    Ok(())
}
