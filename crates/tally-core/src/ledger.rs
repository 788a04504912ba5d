//! Ledger snapshots and ingestion
//!
//! A [`Ledger`] is the validated, read-only set of transactions every
//! analytic runs against. Loaders accept the CSV export format
//! (`transaction_id,date,amount,category,description,transaction_type,merchant,account_type`)
//! and JSON (a bare array, or an object with a `transactions` array).

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{parse_date, Transaction, TransactionType};

/// Immutable, validated collection of transactions in ledger order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Build a ledger, rejecting invalid records and duplicate ids
    pub fn new(transactions: Vec<Transaction>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(transactions.len());
        for tx in &transactions {
            tx.validate()?;
            if !seen.insert(tx.id.as_str()) {
                return Err(Error::DuplicateTransaction(tx.id.clone()));
            }
        }
        Ok(Self { transactions })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Earliest and latest transaction dates
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.transactions.iter().map(|t| t.date).min()?;
        let last = self.transactions.iter().map(|t| t.date).max()?;
        Some((first, last))
    }

    /// Load a ledger file, choosing the parser from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        let ledger = match ext.as_deref() {
            Some("csv") => Self::from_csv_reader(std::fs::File::open(path)?)?,
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            _ => {
                return Err(Error::InvalidData(format!(
                    "Unsupported ledger file: {} (expected .csv or .json)",
                    path.display()
                )))
            }
        };

        debug!(
            path = %path.display(),
            transactions = ledger.len(),
            "Loaded ledger"
        );
        Ok(ledger)
    }

    /// Parse the CSV export format
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut transactions = Vec::new();
        for (index, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result?;
            // Header is line 1
            let line = index + 2;
            transactions.push(row.into_transaction().map_err(|e| {
                Error::InvalidData(format!("CSV line {}: {}", line, e))
            })?);
        }

        Self::new(transactions)
    }

    /// Parse a JSON ledger: either `[...]` or `{"transactions": [...]}`
    ///
    /// Records are decoded one at a time so errors name the failing record.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let records = match serde_json::from_str::<Value>(s)? {
            Value::Array(records) => records,
            Value::Object(mut doc) => match doc.remove("transactions") {
                Some(Value::Array(records)) => records,
                _ => {
                    return Err(Error::InvalidData(
                        "JSON ledger object needs a \"transactions\" array".into(),
                    ))
                }
            },
            _ => {
                return Err(Error::InvalidData(
                    "JSON ledger must be an array or an object with \"transactions\"".into(),
                ))
            }
        };

        let transactions = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                serde_json::from_value::<Transaction>(record).map_err(|e| {
                    Error::InvalidData(format!("JSON record {}: {}", index + 1, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(transactions)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

/// Raw CSV row; fields are parsed explicitly so errors name the bad value
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "id")]
    transaction_id: String,
    date: String,
    amount: String,
    category: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(alias = "type")]
    transaction_type: String,
    #[serde(default)]
    merchant: Option<String>,
    #[serde(default)]
    account_type: Option<String>,
}

impl CsvRow {
    fn into_transaction(self) -> Result<Transaction> {
        let date = parse_date(&self.date)?;
        let amount: Decimal = self
            .amount
            .parse()
            .map_err(|_| Error::InvalidAmount(self.amount.clone()))?;
        let kind: TransactionType = self.transaction_type.parse().map_err(Error::InvalidData)?;

        Ok(Transaction {
            id: self.transaction_id,
            date,
            amount,
            category: self.category,
            merchant: self.merchant.filter(|m| !m.is_empty()),
            kind,
            account_type: self.account_type.filter(|a| !a.is_empty()),
            description: self.description.unwrap_or_default(),
        })
    }
}
