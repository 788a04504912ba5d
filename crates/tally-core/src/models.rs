//! Domain models for Tally

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest amount accepted on a transaction or budget limit
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Most decimal places accepted on an amount or budget limit
pub const MAX_AMOUNT_SCALE: u32 = 4;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: expense, income)",
                s
            )),
        }
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger entry
///
/// Amounts are never negative; `kind` says which way the money moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(alias = "transaction_id")]
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(rename = "type", alias = "transaction_type")]
    pub kind: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    /// Create a transaction with the required fields
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
        category: impl Into<String>,
        kind: TransactionType,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            category: category.into(),
            merchant: None,
            kind,
            account_type: None,
            description: String::new(),
        }
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = Some(account_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Check the record-level invariants enforced at ingestion
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidData("Transaction id must not be empty".into()));
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(Error::NegativeAmount {
                id: self.id.clone(),
                amount: self.amount,
            });
        }
        check_amount(self.amount).map_err(|reason| Error::AmountOutOfRange {
            id: self.id.clone(),
            reason,
        })?;
        Ok(())
    }
}

/// Keep money inside the range every sum and ratio over a ledger can hold
///
/// Amounts are capped at [`MAX_AMOUNT`] with at most [`MAX_AMOUNT_SCALE`]
/// decimal places, so totals cannot overflow and no non-zero divisor is
/// small enough to overflow a quotient.
pub fn check_amount(value: Decimal) -> std::result::Result<(), String> {
    if value > Decimal::from(MAX_AMOUNT) {
        return Err(format!("{} exceeds the maximum of {}", value, MAX_AMOUNT));
    }
    if value.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(format!(
            "{} has more than {} decimal places",
            value, MAX_AMOUNT_SCALE
        ));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date, rejecting anything else
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Parse an optional date argument; empty strings count as absent
pub fn parse_date_opt(s: Option<&str>) -> Result<Option<NaiveDate>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(date_str) => parse_date(date_str).map(Some),
    }
}

/// Report period info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportPeriod {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Inclusive number of days covered by the period (0 if inverted)
    pub fn days(&self) -> i64 {
        let days = (self.to - self.from).num_days() + 1;
        days.max(0)
    }
}
