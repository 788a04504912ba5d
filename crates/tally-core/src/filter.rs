//! Transaction filter builder
//!
//! Every analytic runs on a filtered view of the ledger. Supplied predicates
//! are combined with AND; absent ones are no-ops, so an empty filter is the
//! identity. Text predicates (category, merchant) are case-insensitive
//! substring matches: "food" matches "Food & Dining".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{parse_date_opt, Transaction, TransactionType};

/// Filter over ledger transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Blank text predicates count as absent
fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl TransactionFilter {
    /// Create an empty (identity) filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from raw string arguments, validating dates and type
    pub fn from_args(
        category: Option<&str>,
        transaction_type: Option<&str>,
        merchant: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self> {
        let transaction_type = match transaction_type.map(str::trim) {
            None | Some("") => None,
            Some(t) => Some(t.parse::<TransactionType>().map_err(Error::InvalidFilter)?),
        };

        let filter = Self {
            category: normalize_text(category.map(str::to_string)),
            transaction_type,
            merchant: normalize_text(merchant.map(str::to_string)),
            start_date: parse_date_opt(start_date)?,
            end_date: parse_date_opt(end_date)?,
        };
        filter.validate()?;
        Ok(filter)
    }

    /// Set category filter (substring, case-insensitive)
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize_text(Some(category.into()));
        self
    }

    /// Set transaction type filter
    pub fn transaction_type(mut self, kind: TransactionType) -> Self {
        self.transaction_type = Some(kind);
        self
    }

    /// Set merchant filter (substring, case-insensitive)
    pub fn merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = normalize_text(Some(merchant.into()));
        self
    }

    /// Set inclusive lower date bound
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Set inclusive upper date bound
    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Set both date bounds, or clear them
    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        match range {
            Some((from, to)) => {
                self.start_date = Some(from);
                self.end_date = Some(to);
            }
            None => {
                self.start_date = None;
                self.end_date = None;
            }
        }
        self
    }

    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.transaction_type.is_none()
            && self.merchant.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Reject inverted date ranges
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(Error::InvalidFilter(format!(
                    "start_date {} is after end_date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Check whether a single transaction passes every predicate
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(ref category) = self.category {
            if !contains_ignore_case(&tx.category, category) {
                return false;
            }
        }

        if let Some(kind) = self.transaction_type {
            if tx.kind != kind {
                return false;
            }
        }

        if let Some(ref merchant) = self.merchant {
            match tx.merchant.as_deref() {
                Some(m) if contains_ignore_case(m, merchant) => {}
                _ => return false,
            }
        }

        if let Some(start) = self.start_date {
            if tx.date < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if tx.date > end {
                return false;
            }
        }

        true
    }

    /// Apply the filter, keeping ledger order
    pub fn apply<'a, I>(&self, transactions: I) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions.into_iter().filter(|t| self.matches(t)).collect()
    }
}
