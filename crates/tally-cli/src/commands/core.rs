//! Shared command utilities
//!
//! This module contains:
//! - `open_session` - Load config and ledger, build the engine
//! - `parse_reference_date` - Resolve `--as-of` against today
//! - `print_json` - JSON output for `--json`

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{parse_date, AnalyticsEngine, Config, Ledger};

/// Everything a command needs: the ledger, the engine and output options
pub struct Session {
    pub ledger: Ledger,
    pub engine: AnalyticsEngine,
    pub reference_date: NaiveDate,
    pub json: bool,
}

/// Load config and ledger once for the lifetime of the process
pub fn open_session(
    ledger_path: &Path,
    config_path: Option<&Path>,
    as_of: Option<&str>,
    json: bool,
) -> Result<Session> {
    let config = Config::load(config_path).context("Failed to load config")?;
    let ledger = Ledger::load(ledger_path)
        .with_context(|| format!("Failed to load ledger {}", ledger_path.display()))?;
    let reference_date = parse_reference_date(as_of)?;

    tracing::debug!(
        transactions = ledger.len(),
        budgets = config.budgets.len(),
        %reference_date,
        "Session ready"
    );

    Ok(Session {
        ledger,
        engine: AnalyticsEngine::new(config),
        reference_date,
        json,
    })
}

/// `--as-of` date, or today in local time
pub fn parse_reference_date(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => parse_date(s).context("Invalid --as-of date format (use YYYY-MM-DD)"),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Pretty-print any serializable value
pub fn print_json(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
