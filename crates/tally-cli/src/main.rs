//! Tally CLI - Financial analytics over a transaction ledger
//!
//! Usage:
//!   tally --ledger tx.csv summary              Income, expenses, savings rate
//!   tally --ledger tx.csv budget --from 2024-03-01 --to 2024-03-31
//!   tally --ledger tx.csv recommend --as-of 2024-03-31
//!   tally --ledger tx.csv call get_spending_summary --args '{"category": "food"}'

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    // Listing tools needs no ledger
    if let Commands::Tools = cli.command {
        return commands::cmd_tools_list(cli.json);
    }

    let session = commands::open_session(
        &cli.ledger,
        cli.config.as_deref(),
        cli.as_of.as_deref(),
        cli.json,
    )?;

    match cli.command {
        Commands::Transactions { filter, limit } => {
            commands::cmd_transactions(&session, &filter.to_filter()?, limit)
        }
        Commands::Summary { filter } => commands::cmd_summary(&session, &filter.to_filter()?),
        Commands::Analysis { filter } => commands::cmd_analysis(&session, &filter.to_filter()?),
        Commands::Categories { filter } => {
            commands::cmd_categories(&session, &filter.to_filter()?)
        }
        Commands::Merchants { filter, limit } => {
            commands::cmd_merchants(&session, &filter.to_filter()?, limit)
        }
        Commands::Accounts { filter } => commands::cmd_accounts(&session, &filter.to_filter()?),
        Commands::Trends {
            filter,
            granularity,
        } => commands::cmd_trends(&session, &filter.to_filter()?, &granularity),
        Commands::Budget { filter } => commands::cmd_budget(&session, &filter.to_filter()?),
        Commands::Recommend { filter } => {
            commands::cmd_recommend(&session, &filter.to_filter()?)
        }
        Commands::Chart { chart_type, filter } => {
            commands::cmd_chart(&session, &filter.to_filter()?, &chart_type)
        }
        Commands::Tools => commands::cmd_tools_list(cli.json),
        Commands::Call { name, args } => commands::cmd_call(&session, &name, args.as_deref()),
    }
}
