//! Recommendation Engine - runs registered rules over an analysis window

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{round2, SpendingSummary};
use crate::budget::BudgetTable;
use crate::config::RecommendationConfig;
use crate::error::{Error, Result};
use crate::models::Transaction;

use super::rules::{
    FrequentPurchasesRule, HighDailySpendingRule, LowSavingsRateRule, OverspendingRule,
};
use super::types::{Recommendation, RecommendationKind, RecommendationReport};

/// Inclusive date range the rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The trailing `days` ending at (and including) `end`
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self::new(end - Duration::days(span), end)
    }

    /// Pick the window from the caller's dates
    ///
    /// Both dates: used as given. Start only: runs to the reference date.
    /// End only: the trailing window ending there. Neither: the trailing
    /// window ending at the reference date.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        reference_date: NaiveDate,
        window_days: u32,
    ) -> Result<Self> {
        let window = match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            (Some(start), None) => Self::new(start, reference_date),
            (None, Some(end)) => Self::trailing(end, window_days),
            (None, None) => Self::trailing(reference_date, window_days),
        };

        if window.start > window.end {
            return Err(Error::InvalidFilter(format!(
                "analysis window starts {} after it ends {}",
                window.start, window.end
            )));
        }
        Ok(window)
    }

    /// Inclusive day count
    pub fn days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }
}

/// Everything a rule may look at
pub struct RuleContext<'a> {
    pub window: AnalysisWindow,
    /// Transactions inside the window (after the caller's other filters)
    pub transactions: Vec<&'a Transaction>,
    pub summary: SpendingSummary,
    pub budgets: &'a BudgetTable,
    pub config: &'a RecommendationConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        window: AnalysisWindow,
        transactions: Vec<&'a Transaction>,
        budgets: &'a BudgetTable,
        config: &'a RecommendationConfig,
    ) -> Self {
        let summary = SpendingSummary::from_transactions(&transactions);
        Self {
            window,
            transactions,
            summary,
            budgets,
            config,
        }
    }

    pub fn days_in_period(&self) -> i64 {
        self.window.days()
    }

    /// `amount / days_in_period`, rounded; 0 for an empty window
    pub fn per_day(&self, amount: Decimal) -> Decimal {
        let days = self.days_in_period();
        if days <= 0 {
            return Decimal::ZERO;
        }
        round2(amount / Decimal::from(days))
    }
}

/// Trait for recommendation rules
pub trait Rule: Send + Sync {
    /// Kind of recommendation this rule emits
    fn kind(&self) -> RecommendationKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Inspect the window and emit zero or more recommendations
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation>;
}

/// Runs rules in registration order; no rule suppresses another
pub struct RecommendationEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    /// Create an engine with the built-in rules
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(OverspendingRule));
        engine.register(Box::new(FrequentPurchasesRule));
        engine.register(Box::new(HighDailySpendingRule));
        engine.register(Box::new(LowSavingsRateRule));

        engine
    }

    /// Register a rule; it runs after those already registered
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Run every rule and collect the report
    pub fn run(&self, ctx: &RuleContext<'_>) -> RecommendationReport {
        let mut recommendations = vec![];

        for rule in &self.rules {
            let found = rule.evaluate(ctx);
            tracing::debug!(
                rule = rule.name(),
                kind = rule.kind().as_str(),
                count = found.len(),
                "Rule evaluation complete"
            );
            recommendations.extend(found);
        }

        RecommendationReport {
            total_recommendations: recommendations.len(),
            recommendations,
            window_start: ctx.window.start,
            window_end: ctx.window.end,
            days_in_period: ctx.days_in_period(),
        }
    }

    /// Kinds of the registered rules, in order
    pub fn rule_kinds(&self) -> Vec<RecommendationKind> {
        self.rules.iter().map(|r| r.kind()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetEntry;
    use crate::recommend::{RecommendationDetail, Severity};
    use crate::test_utils::{date, expense, income, repeated_merchant};
    use rust_decimal_macros::dec;

    #[test]
    fn test_engine_creation() {
        let engine = RecommendationEngine::new();
        assert_eq!(engine.rule_kinds(), RecommendationKind::all().to_vec());
    }

    #[test]
    fn test_window_resolution() {
        let today = date(2024, 1, 31);

        let w = AnalysisWindow::resolve(None, None, today, 30).unwrap();
        assert_eq!(w, AnalysisWindow::new(date(2024, 1, 2), today));
        assert_eq!(w.days(), 30);

        let w = AnalysisWindow::resolve(Some(date(2024, 1, 20)), None, today, 30).unwrap();
        assert_eq!(w, AnalysisWindow::new(date(2024, 1, 20), today));
        assert_eq!(w.days(), 12);

        let w = AnalysisWindow::resolve(None, Some(date(2024, 1, 10)), today, 7).unwrap();
        assert_eq!(w, AnalysisWindow::new(date(2024, 1, 4), date(2024, 1, 10)));

        let w =
            AnalysisWindow::resolve(Some(date(2024, 1, 1)), Some(date(2024, 1, 1)), today, 30)
                .unwrap();
        assert_eq!(w.days(), 1);

        assert!(AnalysisWindow::resolve(Some(date(2024, 2, 5)), None, today, 30).is_err());
    }

    #[test]
    fn test_rules_emit_in_fixed_order() {
        let budgets = BudgetTable::new(vec![BudgetEntry::new("Food & Dining", dec!(20))]).unwrap();
        let config = RecommendationConfig::default();

        // Trips every rule: 960 spent over 6 days against 1000 income
        let mut txs = repeated_merchant("Starbucks", 6, dec!(10), date(2024, 1, 1));
        txs.push(expense("big", date(2024, 1, 2), dec!(900), "Rent"));
        txs.push(income("pay", date(2024, 1, 1), dec!(1000), "Income"));

        let window = AnalysisWindow::new(date(2024, 1, 1), date(2024, 1, 6));
        let ctx = RuleContext::new(window, txs.iter().collect(), &budgets, &config);
        let report = RecommendationEngine::new().run(&ctx);

        let kinds: Vec<_> = report.recommendations.iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, RecommendationKind::all().to_vec());
        assert_eq!(report.total_recommendations, 4);
        assert_eq!(report.days_in_period, 6);
    }

    /// Flags every window that has any transactions at all
    struct AnyActivityRule;

    impl Rule for AnyActivityRule {
        fn kind(&self) -> RecommendationKind {
            RecommendationKind::HighDailySpending
        }

        fn name(&self) -> &'static str {
            "AnyActivity"
        }

        fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
            if ctx.transactions.is_empty() {
                return vec![];
            }
            vec![Recommendation::new(
                RecommendationDetail::HighDailySpending {
                    avg_daily_spending: ctx.per_day(ctx.summary.total_expenses),
                    threshold: Decimal::ZERO,
                },
                Severity::Low,
                format!("{} says hello", self.name()),
                "Nothing to do".to_string(),
            )]
        }
    }

    #[test]
    fn test_registered_rule_runs_last() {
        let budgets = BudgetTable::default();
        let config = RecommendationConfig::default();
        let txs = vec![expense("1", date(2024, 1, 1), dec!(30), "Misc")];
        let window = AnalysisWindow::new(date(2024, 1, 1), date(2024, 1, 3));
        let ctx = RuleContext::new(window, txs.iter().collect(), &budgets, &config);

        let mut engine = RecommendationEngine::new();
        engine.register(Box::new(AnyActivityRule));
        assert_eq!(engine.rule_kinds().len(), 5);

        let report = engine.run(&ctx);
        let last = report.recommendations.last().unwrap();
        assert_eq!(last.message, "AnyActivity says hello");
        assert_eq!(last.severity, Severity::Low);
    }

    #[test]
    fn test_empty_window_is_quiet() {
        let budgets = BudgetTable::default();
        let config = RecommendationConfig::default();
        let window = AnalysisWindow::new(date(2024, 1, 1), date(2024, 1, 30));
        let ctx = RuleContext::new(window, vec![], &budgets, &config);
        let report = RecommendationEngine::new().run(&ctx);
        assert!(report.recommendations.is_empty());
        assert_eq!(report.days_in_period, 30);
    }
}
