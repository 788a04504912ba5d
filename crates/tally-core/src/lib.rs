//! Tally Core Library
//!
//! Financial analytics over a ledger of dated transactions:
//! - Ledger ingestion from CSV and JSON
//! - Transaction filter stage
//! - Spending summary, category/merchant/account breakdowns, trends
//! - Budget compliance evaluation
//! - Rule-based spending recommendations
//! - Chart-ready data series
//! - Named tool boundary with JSON arguments and schemas
//! - TOML configuration with embedded defaults

pub mod analytics;
pub mod budget;
pub mod charts;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod models;
pub mod recommend;
pub mod tools;

/// Shared ledger fixtures for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{
    AccountTotal, CategoryTotal, Granularity, MerchantAnalysis, MerchantTotal, SpendingAnalysis,
    SpendingSummary, TransactionList, TrendAnalysis, TrendMetrics, TrendPoint,
};
pub use budget::{
    BudgetAnalysis, BudgetEntry, BudgetEvaluator, BudgetStatus, BudgetTable, ComplianceStatus,
};
pub use charts::{ChartBuilder, ChartData, ChartSeries, ChartType};
pub use config::{BudgetRules, ChartConfig, Config, RecommendationConfig};
pub use engine::AnalyticsEngine;
pub use error::{Error, Result};
pub use filter::TransactionFilter;
pub use ledger::Ledger;
pub use models::{parse_date, parse_date_opt, ReportPeriod, Transaction, TransactionType};
pub use recommend::{
    AnalysisWindow, Recommendation, RecommendationDetail, RecommendationEngine,
    RecommendationKind, RecommendationReport, Severity,
};
pub use tools::{call_tool, list_tools, ToolDefinition, ToolResponse};
