//! Recommendation engine
//!
//! An ordered list of independent rules, each evaluated on the same analysis
//! window. Output order is fixed by registration order:
//! - Overspending alerts (budget table order)
//! - Frequent purchase alerts (merchant breakdown order)
//! - High daily spending
//! - Low savings rate

mod engine;
mod rules;
mod types;

pub use engine::{AnalysisWindow, RecommendationEngine, Rule, RuleContext};
pub use rules::{FrequentPurchasesRule, HighDailySpendingRule, LowSavingsRateRule, OverspendingRule};
pub use types::{
    Recommendation, RecommendationDetail, RecommendationKind, RecommendationReport, Severity,
};
