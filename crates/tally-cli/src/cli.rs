//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tally_core::TransactionFilter;

/// Tally - Analyze spending from a transaction ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Financial analytics over a CSV or JSON transaction ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger file (.csv or .json)
    #[arg(long, default_value = "transactions.csv", global = true)]
    pub ledger: PathBuf,

    /// Config file (defaults to ~/.local/share/tally/config/tally.toml, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Reference date for recommendations (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    pub as_of: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Transaction filter shared by the report commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Category substring (case-insensitive)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Transaction type: expense or income
    #[arg(short = 't', long = "type")]
    pub transaction_type: Option<String>,

    /// Merchant substring (case-insensitive)
    #[arg(short, long)]
    pub merchant: Option<String>,

    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> tally_core::Result<TransactionFilter> {
        TransactionFilter::from_args(
            self.category.as_deref(),
            self.transaction_type.as_deref(),
            self.merchant.as_deref(),
            self.from.as_deref(),
            self.to.as_deref(),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List transactions matching the filter
    Transactions {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum rows to print
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Income, expenses, net income and savings rate
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Full spending analysis (summary, categories, months, merchants, accounts)
    Analysis {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Expense totals by category
    Categories {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Expense totals by merchant
    Merchants {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum merchants to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Expense totals by account type
    Accounts {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending trends over time
    Trends {
        #[command(flatten)]
        filter: FilterArgs,

        /// Granularity: daily, weekly, monthly
        #[arg(short, long, default_value = "monthly")]
        granularity: String,
    },

    /// Spending against the budget table
    Budget {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending recommendations (last 30 days unless --from/--to are given)
    Recommend {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Chart-ready data for an external renderer
    Chart {
        /// Chart type: category_breakdown, spending_trend, budget_vs_actual, merchant_analysis
        #[arg(default_value = "category_breakdown")]
        chart_type: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List available tools and their argument schemas
    Tools,

    /// Call a tool by name with JSON arguments
    Call {
        /// Tool name (see `tally tools`)
        name: String,

        /// JSON object of arguments
        #[arg(short, long)]
        args: Option<String>,
    },
}
