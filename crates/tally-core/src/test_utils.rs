//! Test utilities for tally-core
//!
//! Shared ledger fixtures for unit tests, integration tests and the CLI.
//!
//! The sample ledger spans January and early February 2024:
//!
//! | id  | date       | amount  | category       | type    | merchant            | account     |
//! |-----|------------|---------|----------------|---------|---------------------|-------------|
//! | T01 | 2024-01-01 | 125.50  | Groceries      | expense | Whole Foods Market  | checking    |
//! | T02 | 2024-01-01 | 45.00   | Transportation | expense | Uber                | checking    |
//! | T03 | 2024-01-01 | 2500.00 | Income         | income  | Employer Inc        | checking    |
//! | T04 | 2024-01-03 | 18.00   | Food & Dining  | expense | Starbucks Coffee    | credit_card |
//! | T05 | 2024-01-08 | 80.25   | Groceries      | expense | Whole Foods Market  | credit_card |
//! | T06 | 2024-01-10 | 60.00   | Entertainment  | expense | AMC Theatres        | credit_card |
//! | T07 | 2024-01-15 | 1200.00 | Rent           | expense | Property Management | checking    |
//! | T08 | 2024-01-20 | 310.00  | Shopping       | expense | Amazon              | credit_card |
//! | T09 | 2024-02-01 | 2500.00 | Income         | income  | Employer Inc        | checking    |
//! | T10 | 2024-02-02 | 150.00  | Groceries      | expense | Whole Foods Market  | checking    |
//! | T11 | 2024-02-05 | 22.00   | Food & Dining  | expense |                     |             |

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::Ledger;
use crate::models::{Transaction, TransactionType};

/// Shorthand for a calendar date
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Expense transaction with no merchant or account
pub fn expense(id: &str, date: NaiveDate, amount: Decimal, category: &str) -> Transaction {
    Transaction::new(id, date, amount, category, TransactionType::Expense)
}

/// Income transaction with no merchant or account
pub fn income(id: &str, date: NaiveDate, amount: Decimal, category: &str) -> Transaction {
    Transaction::new(id, date, amount, category, TransactionType::Income)
}

fn money(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Transactions of the sample ledger, in ledger order
pub fn sample_transactions() -> Vec<Transaction> {
    let row = |id: &str,
               d: NaiveDate,
               amount: &str,
               category: &str,
               kind: TransactionType,
               merchant: &str,
               account: &str| {
        Transaction::new(id, d, money(amount), category, kind)
            .with_merchant(merchant)
            .with_account_type(account)
            .with_description(format!("{} - {}", merchant, category))
    };
    use TransactionType::{Expense, Income};

    vec![
        row("T01", date(2024, 1, 1), "125.50", "Groceries", Expense, "Whole Foods Market", "checking"),
        row("T02", date(2024, 1, 1), "45.00", "Transportation", Expense, "Uber", "checking"),
        row("T03", date(2024, 1, 1), "2500.00", "Income", Income, "Employer Inc", "checking"),
        row("T04", date(2024, 1, 3), "18.00", "Food & Dining", Expense, "Starbucks Coffee", "credit_card"),
        row("T05", date(2024, 1, 8), "80.25", "Groceries", Expense, "Whole Foods Market", "credit_card"),
        row("T06", date(2024, 1, 10), "60.00", "Entertainment", Expense, "AMC Theatres", "credit_card"),
        row("T07", date(2024, 1, 15), "1200.00", "Rent", Expense, "Property Management", "checking"),
        row("T08", date(2024, 1, 20), "310.00", "Shopping", Expense, "Amazon", "credit_card"),
        row("T09", date(2024, 2, 1), "2500.00", "Income", Income, "Employer Inc", "checking"),
        row("T10", date(2024, 2, 2), "150.00", "Groceries", Expense, "Whole Foods Market", "checking"),
        expense("T11", date(2024, 2, 5), money("22.00"), "Food & Dining")
            .with_description("Lunch"),
    ]
}

/// The sample ledger described in the module docs
pub fn sample_ledger() -> Ledger {
    Ledger::new(sample_transactions()).unwrap()
}

/// The sample ledger in CSV export format
pub fn sample_csv() -> String {
    let mut out = String::from(
        "transaction_id,date,amount,category,description,transaction_type,merchant,account_type\n",
    );
    for tx in sample_transactions() {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            tx.id,
            tx.date,
            tx.amount,
            tx.category,
            tx.description,
            tx.kind,
            tx.merchant.unwrap_or_default(),
            tx.account_type.unwrap_or_default(),
        ));
    }
    out
}

/// A ledger with the same merchant repeated `count` times, one per day from `start`
pub fn repeated_merchant(merchant: &str, count: u32, amount: Decimal, start: NaiveDate) -> Vec<Transaction> {
    (0..count)
        .map(|i| {
            expense(
                &format!("{}-{}", merchant, i),
                start + chrono::Duration::days(i64::from(i)),
                amount,
                "Food & Dining",
            )
            .with_merchant(merchant)
        })
        .collect()
}
