//! Core types for the recommendation engine

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How urgent a recommendation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which rule produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    OverspendingAlert,
    FrequentPurchases,
    HighDailySpending,
    LowSavingsRate,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::OverspendingAlert => "overspending_alert",
            RecommendationKind::FrequentPurchases => "frequent_purchases",
            RecommendationKind::HighDailySpending => "high_daily_spending",
            RecommendationKind::LowSavingsRate => "low_savings_rate",
        }
    }

    /// Output order of the built-in rules
    pub fn all() -> &'static [RecommendationKind] {
        &[
            RecommendationKind::OverspendingAlert,
            RecommendationKind::FrequentPurchases,
            RecommendationKind::HighDailySpending,
            RecommendationKind::LowSavingsRate,
        ]
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rule-specific structured data, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationDetail {
    OverspendingAlert {
        category: String,
        budget: Decimal,
        spent: Decimal,
        overage: Decimal,
        /// Per-day cut that would have closed the gap over the window
        daily_reduction: Decimal,
    },
    FrequentPurchases {
        merchant: String,
        total_spent: Decimal,
        count: usize,
    },
    HighDailySpending {
        avg_daily_spending: Decimal,
        threshold: Decimal,
    },
    LowSavingsRate {
        /// Fraction of income saved over the window
        savings_rate: Decimal,
        target_rate: Decimal,
        total_income: Decimal,
        total_expenses: Decimal,
    },
}

impl RecommendationDetail {
    pub fn kind(&self) -> RecommendationKind {
        match self {
            RecommendationDetail::OverspendingAlert { .. } => RecommendationKind::OverspendingAlert,
            RecommendationDetail::FrequentPurchases { .. } => RecommendationKind::FrequentPurchases,
            RecommendationDetail::HighDailySpending { .. } => RecommendationKind::HighDailySpending,
            RecommendationDetail::LowSavingsRate { .. } => RecommendationKind::LowSavingsRate,
        }
    }
}

/// A single advisory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub detail: RecommendationDetail,
    /// Category or merchant the advice is about (empty for ledger-wide rules)
    pub subject: String,
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

impl Recommendation {
    pub fn new(
        detail: RecommendationDetail,
        severity: Severity,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        let subject = match &detail {
            RecommendationDetail::OverspendingAlert { category, .. } => category.clone(),
            RecommendationDetail::FrequentPurchases { merchant, .. } => merchant.clone(),
            _ => String::new(),
        };
        Self {
            detail,
            subject,
            message: message.into(),
            suggestion: suggestion.into(),
            severity,
        }
    }

    pub fn kind(&self) -> RecommendationKind {
        self.detail.kind()
    }
}

/// Recommendations for one analysis window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub days_in_period: i64,
    pub total_recommendations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_severity_serializes_lowercase() {
        for s in [Severity::Low, Severity::Medium, Severity::High] {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, format!("\"{}\"", s));
            assert_eq!(serde_json::from_str::<Severity>(&json).unwrap(), s);
        }
    }

    #[test]
    fn test_recommendation_serializes_flat() {
        let rec = Recommendation::new(
            RecommendationDetail::FrequentPurchases {
                merchant: "Starbucks".into(),
                total_spent: dec!(42.00),
                count: 6,
            },
            Severity::Medium,
            "msg",
            "tip",
        );
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["kind"], "frequent_purchases");
        assert_eq!(value["merchant"], "Starbucks");
        assert_eq!(value["count"], 6);
        assert_eq!(value["subject"], "Starbucks");
        assert_eq!(value["severity"], "medium");
        assert_eq!(rec.kind(), RecommendationKind::FrequentPurchases);
    }
}
