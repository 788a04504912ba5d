//! Error types for Tally

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Negative amount {amount} on transaction {id}; direction is carried by the type")]
    NegativeAmount { id: String, amount: Decimal },

    #[error("Amount out of range on transaction {id}: {reason}")]
    AmountOutOfRange { id: String, reason: String },

    #[error("Duplicate transaction id: {0}")]
    DuplicateTransaction(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown chart type: {0}")]
    UnknownChart(String),
}

pub type Result<T> = std::result::Result<T, Error>;
