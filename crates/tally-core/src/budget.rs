//! Budget table and compliance evaluation
//!
//! Budgeted categories are matched exactly against transaction categories.
//! Categories missing from the table are unbudgeted and never over budget.

use std::collections::{HashMap, HashSet};
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::percentage;
use crate::error::{Error, Result};
use crate::models::{check_amount, Transaction};

/// Monthly spending limit for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub category: String,
    pub monthly_limit: Decimal,
}

impl BudgetEntry {
    pub fn new(category: impl Into<String>, monthly_limit: Decimal) -> Self {
        Self {
            category: category.into(),
            monthly_limit,
        }
    }
}

/// Ordered budget entries with unique categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BudgetTable {
    entries: Vec<BudgetEntry>,
}

impl BudgetTable {
    /// Build a table, rejecting duplicate categories and negative limits
    pub fn new(entries: Vec<BudgetEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.category.trim().is_empty() {
                return Err(Error::Config("budget category must not be empty".into()));
            }
            if entry.monthly_limit.is_sign_negative() && !entry.monthly_limit.is_zero() {
                return Err(Error::Config(format!(
                    "budget for '{}' is negative: {}",
                    entry.category, entry.monthly_limit
                )));
            }
            check_amount(entry.monthly_limit).map_err(|reason| {
                Error::Config(format!("budget for '{}': {}", entry.category, reason))
            })?;
            if !seen.insert(entry.category.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate budget category: {}",
                    entry.category
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[BudgetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all limits
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.monthly_limit).sum()
    }
}

impl<'de> Deserialize<'de> for BudgetTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<BudgetEntry>::deserialize(deserializer)?;
        BudgetTable::new(entries).map_err(serde::de::Error::custom)
    }
}

/// Budget compliance classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    OverBudget,
    OnTrack,
    UnderBudget,
    NoSpending,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::OverBudget => "over_budget",
            ComplianceStatus::OnTrack => "on_track",
            ComplianceStatus::UnderBudget => "under_budget",
            ComplianceStatus::NoSpending => "no_spending",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending against one budgeted category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage_used: Decimal,
    pub status: ComplianceStatus,
}

/// Per-category statuses plus overall totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAnalysis {
    pub categories: Vec<BudgetStatus>,
    pub total_budget: Decimal,
    /// All expenses in the set, budgeted or not
    pub total_spent: Decimal,
    pub overall_remaining: Decimal,
}

impl BudgetAnalysis {
    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetStatus> {
        self.categories
            .iter()
            .filter(|s| s.status == ComplianceStatus::OverBudget)
    }
}

/// Expense totals keyed by exact category name
pub fn spent_by_category<'a>(transactions: &[&'a Transaction]) -> HashMap<&'a str, Decimal> {
    let mut spent: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.is_expense()) {
        *spent.entry(tx.category.as_str()).or_default() += tx.amount;
    }
    spent
}

/// Classifies spending against the budget table
#[derive(Debug, Clone)]
pub struct BudgetEvaluator {
    on_track_ratio: Decimal,
}

impl Default for BudgetEvaluator {
    fn default() -> Self {
        Self {
            on_track_ratio: Decimal::new(8, 1),
        }
    }
}

impl BudgetEvaluator {
    pub fn new(on_track_ratio: Decimal) -> Self {
        Self { on_track_ratio }
    }

    /// Classify spending for one category; rules apply in order
    pub fn classify(&self, budget: Decimal, spent: Decimal) -> ComplianceStatus {
        if spent.is_zero() {
            ComplianceStatus::NoSpending
        } else if spent > budget {
            ComplianceStatus::OverBudget
        } else if spent < budget * self.on_track_ratio {
            ComplianceStatus::UnderBudget
        } else {
            ComplianceStatus::OnTrack
        }
    }

    pub fn status(&self, category: &str, budget: Decimal, spent: Decimal) -> BudgetStatus {
        BudgetStatus {
            category: category.to_string(),
            budget,
            spent,
            remaining: budget - spent,
            percentage_used: percentage(spent, budget),
            status: self.classify(budget, spent),
        }
    }

    /// Evaluate every budgeted category, in table order
    pub fn evaluate(&self, table: &BudgetTable, transactions: &[&Transaction]) -> BudgetAnalysis {
        let spent = spent_by_category(transactions);

        let categories: Vec<BudgetStatus> = table
            .entries()
            .iter()
            .map(|entry| {
                let category_spent = spent
                    .get(entry.category.as_str())
                    .copied()
                    .unwrap_or_default();
                self.status(&entry.category, entry.monthly_limit, category_spent)
            })
            .collect();

        let total_budget = table.total();
        let total_spent: Decimal = spent.values().copied().sum();

        tracing::debug!(
            categories = categories.len(),
            over_budget = categories
                .iter()
                .filter(|s| s.status == ComplianceStatus::OverBudget)
                .count(),
            "Budget evaluation complete"
        );

        BudgetAnalysis {
            categories,
            total_budget,
            total_spent,
            overall_remaining: total_budget - total_spent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TransactionFilter;
    use crate::test_utils::{date, expense, income, sample_ledger};
    use rust_decimal_macros::dec;

    fn table(entries: &[(&str, Decimal)]) -> BudgetTable {
        BudgetTable::new(
            entries
                .iter()
                .map(|(c, l)| BudgetEntry::new(*c, *l))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_groceries_example() {
        let txs = vec![
            expense("1", date(2024, 1, 1), dec!(125.50), "Groceries"),
            income("2", date(2024, 1, 1), dec!(2500.00), "Income"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let analysis = BudgetEvaluator::default().evaluate(&table(&[("Groceries", dec!(400))]), &refs);

        let groceries = &analysis.categories[0];
        assert_eq!(groceries.budget, dec!(400));
        assert_eq!(groceries.spent, dec!(125.50));
        assert_eq!(groceries.remaining, dec!(274.50));
        assert_eq!(groceries.status, ComplianceStatus::UnderBudget);
        assert_eq!(analysis.total_spent, dec!(125.50));
        assert_eq!(analysis.overall_remaining, dec!(274.50));
    }

    #[test]
    fn test_zero_budget_with_spending_is_over() {
        let evaluator = BudgetEvaluator::default();
        assert_eq!(evaluator.classify(Decimal::ZERO, dec!(10)), ComplianceStatus::OverBudget);
        let status = evaluator.status("Income", Decimal::ZERO, dec!(10));
        assert_eq!(status.percentage_used, Decimal::ZERO);
    }

    #[test]
    fn test_classification_boundaries() {
        let evaluator = BudgetEvaluator::default();
        assert_eq!(evaluator.classify(dec!(100), dec!(0)), ComplianceStatus::NoSpending);
        assert_eq!(evaluator.classify(dec!(100), dec!(79.99)), ComplianceStatus::UnderBudget);
        assert_eq!(evaluator.classify(dec!(100), dec!(80)), ComplianceStatus::OnTrack);
        assert_eq!(evaluator.classify(dec!(100), dec!(100)), ComplianceStatus::OnTrack);
        assert_eq!(evaluator.classify(dec!(100), dec!(100.01)), ComplianceStatus::OverBudget);
    }

    #[test]
    fn test_custom_on_track_ratio() {
        let evaluator = BudgetEvaluator::new(dec!(0.5));
        assert_eq!(evaluator.classify(dec!(100), dec!(60)), ComplianceStatus::OnTrack);
    }

    #[test]
    fn test_every_budget_category_once_in_order() {
        let ledger = sample_ledger();
        let all = TransactionFilter::new().apply(&ledger);
        let table = table(&[
            ("Rent", dec!(1200)),
            ("Healthcare", dec!(100)),
            ("Groceries", dec!(400)),
            ("Shopping", dec!(250)),
            ("Entertainment", dec!(150)),
        ]);
        let analysis = BudgetEvaluator::default().evaluate(&table, &all);

        let names: Vec<_> = analysis.categories.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Healthcare", "Groceries", "Shopping", "Entertainment"]);

        let statuses: Vec<_> = analysis.categories.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                ComplianceStatus::OnTrack,
                ComplianceStatus::NoSpending,
                ComplianceStatus::OnTrack,
                ComplianceStatus::OverBudget,
                ComplianceStatus::UnderBudget,
            ]
        );
        assert_eq!(analysis.total_budget, dec!(2100));
        assert_eq!(analysis.total_spent, dec!(2010.75));
        assert_eq!(analysis.overall_remaining, dec!(89.25));
        assert_eq!(analysis.over_budget().count(), 1);
    }

    #[test]
    fn test_category_match_is_exact() {
        let txs = vec![expense("1", date(2024, 1, 1), dec!(50), "groceries")];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let analysis =
            BudgetEvaluator::default().evaluate(&table(&[("Groceries", dec!(400))]), &refs);
        assert_eq!(analysis.categories[0].status, ComplianceStatus::NoSpending);
        assert_eq!(analysis.total_spent, dec!(50));
    }

    #[test]
    fn test_table_validation() {
        assert!(BudgetTable::new(vec![
            BudgetEntry::new("A", dec!(1)),
            BudgetEntry::new("A", dec!(2)),
        ])
        .is_err());
        assert!(BudgetTable::new(vec![BudgetEntry::new("A", dec!(-1))]).is_err());
        assert!(BudgetTable::new(vec![BudgetEntry::new("  ", dec!(1))]).is_err());
    }

    #[test]
    fn test_table_rejects_limits_out_of_range() {
        let tiny = BudgetTable::new(vec![BudgetEntry::new(
            "Groceries",
            dec!(0.0000000000000000000000000001),
        )]);
        assert!(matches!(tiny, Err(Error::Config(_))));

        let huge = BudgetTable::new(vec![BudgetEntry::new("Groceries", Decimal::MAX)]);
        assert!(matches!(huge, Err(Error::Config(_))));
    }

    #[test]
    fn test_smallest_limit_against_largest_spend() {
        let txs = vec![
            expense("1", date(2024, 1, 1), dec!(1000000000000), "Groceries"),
            expense("2", date(2024, 1, 2), dec!(1000000000000), "Groceries"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let analysis =
            BudgetEvaluator::default().evaluate(&table(&[("Groceries", dec!(0.0001))]), &refs);

        let groceries = &analysis.categories[0];
        assert_eq!(groceries.status, ComplianceStatus::OverBudget);
        assert_eq!(groceries.percentage_used, dec!(2000000000000000000));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ComplianceStatus::OverBudget).unwrap();
        assert_eq!(json, "\"over_budget\"");
        let back: ComplianceStatus = serde_json::from_str("\"no_spending\"").unwrap();
        assert_eq!(back, ComplianceStatus::NoSpending);
    }
}
