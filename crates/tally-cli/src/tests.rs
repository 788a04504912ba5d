//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use tally_core::test_utils::sample_csv;
use tally_core::TransactionFilter;
use tempfile::TempDir;

use crate::cli::FilterArgs;
use crate::commands::{self, truncate, Session};

/// Write the sample ledger to a temp dir; keep the dir alive for the test
fn write_sample_ledger() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transactions.csv");
    std::fs::write(&path, sample_csv()).unwrap();
    (dir, path)
}

fn setup_session(json: bool) -> (TempDir, Session) {
    let (dir, path) = write_sample_ledger();
    let session = commands::open_session(&path, None, Some("2024-01-31"), json).unwrap();
    (dir, session)
}

// ========== Session Tests ==========

#[test]
fn test_open_session_loads_ledger() {
    let (_dir, session) = setup_session(false);
    assert_eq!(session.ledger.len(), 11);
    assert_eq!(
        session.reference_date,
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    );
}

#[test]
fn test_open_session_missing_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::open_session(&dir.path().join("missing.csv"), None, None, false);
    assert!(result.is_err());
}

#[test]
fn test_open_session_explicit_config() {
    let (dir, path) = write_sample_ledger();
    let config_path = dir.path().join("tally.toml");
    std::fs::write(
        &config_path,
        "[[budget]]\ncategory = \"Groceries\"\nmonthly_limit = \"100\"\n",
    )
    .unwrap();

    let session = commands::open_session(&path, Some(&config_path), None, false).unwrap();
    assert_eq!(session.engine.config().budgets.len(), 1);

    let missing = dir.path().join("nope.toml");
    assert!(commands::open_session(&path, Some(&missing), None, false).is_err());
}

#[test]
fn test_parse_reference_date() {
    assert_eq!(
        commands::parse_reference_date(Some("2024-03-15")).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    );
    assert!(commands::parse_reference_date(Some("03/15/2024")).is_err());
    assert!(commands::parse_reference_date(None).is_ok());
}

// ========== Filter Args Tests ==========

#[test]
fn test_filter_args_to_filter() {
    let args = FilterArgs {
        category: Some("groceries".to_string()),
        transaction_type: Some("expense".to_string()),
        merchant: None,
        from: Some("2024-01-01".to_string()),
        to: Some("".to_string()),
    };
    let filter = args.to_filter().unwrap();
    assert_eq!(filter.category.as_deref(), Some("groceries"));
    assert!(filter.end_date.is_none());

    let bad = FilterArgs {
        transaction_type: Some("refund".to_string()),
        ..Default::default()
    };
    assert!(bad.to_filter().is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_report_commands_table_output() {
    let (_dir, session) = setup_session(false);
    let all = TransactionFilter::new();

    assert!(commands::cmd_transactions(&session, &all, 5).is_ok());
    assert!(commands::cmd_summary(&session, &all).is_ok());
    assert!(commands::cmd_analysis(&session, &all).is_ok());
    assert!(commands::cmd_categories(&session, &all).is_ok());
    assert!(commands::cmd_merchants(&session, &all, 3).is_ok());
    assert!(commands::cmd_accounts(&session, &all).is_ok());
    assert!(commands::cmd_budget(&session, &all).is_ok());
    assert!(commands::cmd_recommend(&session, &all).is_ok());
}

#[test]
fn test_report_commands_json_output() {
    let (_dir, session) = setup_session(true);
    let groceries = TransactionFilter::new().category("groceries");

    assert!(commands::cmd_summary(&session, &groceries).is_ok());
    assert!(commands::cmd_trends(&session, &groceries, "weekly").is_ok());
    assert!(commands::cmd_chart(&session, &groceries, "merchant_analysis").is_ok());
}

#[test]
fn test_report_empty_selection() {
    let (_dir, session) = setup_session(false);
    let nothing = TransactionFilter::new().merchant("no such merchant");

    assert!(commands::cmd_transactions(&session, &nothing, 10).is_ok());
    assert!(commands::cmd_categories(&session, &nothing).is_ok());
    assert!(commands::cmd_trends(&session, &nothing, "daily").is_ok());
    assert!(commands::cmd_chart(&session, &nothing, "spending_trend").is_ok());
}

#[test]
fn test_cmd_trends_invalid_granularity() {
    let (_dir, session) = setup_session(false);
    let result = commands::cmd_trends(&session, &TransactionFilter::new(), "hourly");
    assert!(result.is_err());
}

#[test]
fn test_cmd_chart_invalid_type() {
    let (_dir, session) = setup_session(false);
    let result = commands::cmd_chart(&session, &TransactionFilter::new(), "pie");
    assert!(result.is_err());
}

// ========== Tool Command Tests ==========

#[test]
fn test_cmd_tools_list() {
    assert!(commands::cmd_tools_list(false).is_ok());
    assert!(commands::cmd_tools_list(true).is_ok());
}

#[test]
fn test_cmd_call() {
    let (_dir, session) = setup_session(false);

    assert!(commands::cmd_call(&session, "get_spending_summary", None).is_ok());
    assert!(commands::cmd_call(
        &session,
        "get_budget_analysis",
        Some(r#"{"start_date": "2024-01-01", "end_date": "2024-01-31"}"#)
    )
    .is_ok());
}

#[test]
fn test_cmd_call_failures() {
    let (_dir, session) = setup_session(false);

    assert!(commands::cmd_call(&session, "get_weather", None).is_err());
    assert!(commands::cmd_call(&session, "get_transactions", Some("not json")).is_err());
    assert!(commands::cmd_call(&session, "get_transactions", Some(r#"{"colour": "red"}"#)).is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("Whole Foods Market", 10), "Whole F...");
    assert_eq!(truncate("Café Crème Brûlée", 8), "Café ...");
}
