//! Command line interface.
//!
//! Without a subcommand the terminal site runs. The `quotes` commands give
//! staff a view of submitted requests.

use crate::domain::{StoredQuote, display_quote_id};
use crate::infrastructure::{AppConfig, ConfigError, CsvExporter, RestQuoteStore, StoreError};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "quote-wizard", about = "Request a freight quote from the terminal")]
#[command(version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the terminal site with the quote form (default)
    Tui,
    /// Inspect and update submitted quotes
    Quotes(QuotesArgs),
}

#[derive(Debug, Args)]
pub struct QuotesArgs {
    #[command(subcommand)]
    pub command: QuotesCommand,
}

#[derive(Debug, Subcommand)]
pub enum QuotesCommand {
    /// List submitted quotes, newest first
    List {
        /// Write CSV to stdout instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Change the status of a quote
    SetStatus {
        /// Full quote id
        id: String,
        /// New status, e.g. contacted or closed
        status: String,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("status must not be empty")]
    EmptyStatus,
}

/// Runs a `quotes` subcommand against the configured store.
pub async fn run_quotes(args: QuotesArgs, config: &AppConfig) -> Result<(), CommandError> {
    let store = RestQuoteStore::new(&config.store)?;
    let stdout = io::stdout();

    match args.command {
        QuotesCommand::List { csv } => {
            let quotes = store.list_quotes().await?;
            info!(count = quotes.len(), "fetched quotes");
            if csv {
                CsvExporter::write_quotes(&quotes, stdout.lock())?;
            } else {
                write_table(&quotes, &mut stdout.lock())?;
            }
        }
        QuotesCommand::SetStatus { id, status } => {
            let status = status.trim();
            if status.is_empty() {
                return Err(CommandError::EmptyStatus);
            }
            let updated = store.update_quote_status(&id, status).await?;
            info!(%id, status, "updated quote status");
            writeln!(
                stdout.lock(),
                "Quote {} is now {}",
                display_quote_id(updated.id.as_deref()),
                updated.status.as_deref().unwrap_or(status)
            )?;
        }
    }
    Ok(())
}

/// Writes quotes as a fixed-width table.
pub fn write_table<W: Write>(quotes: &[StoredQuote], out: &mut W) -> io::Result<()> {
    if quotes.is_empty() {
        return writeln!(out, "No quotes yet");
    }

    writeln!(
        out,
        "{:<10} {:<12} {:<30} {:<16} {:>8} {:<20} {:<10}",
        "ID", "STATUS", "ROUTE", "CARGO", "KG", "CONTACT", "PICKUP"
    )?;
    for quote in quotes {
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        let route = format!("{} → {}", text(&quote.pickup_city), text(&quote.delivery_city));
        let weight = quote
            .weight
            .map(|w| w.to_string())
            .unwrap_or_else(|| "-".to_string());
        let pickup = quote
            .preferred_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<10} {:<12} {:<30} {:<16} {:>8} {:<20} {:<10}",
            display_quote_id(quote.id.as_deref()),
            text(&quote.status),
            route,
            text(&quote.cargo_type),
            weight,
            text(&quote.customer_name),
            pickup
        )?;
    }
    Ok(())
}
