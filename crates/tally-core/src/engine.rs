//! Analytics Engine - one entry point per operation
//!
//! Every operation validates the filter, narrows the ledger, and hands the
//! result to the matching aggregator. Nothing is cached between calls.

use chrono::NaiveDate;
use tracing::debug;

use crate::analytics::{
    account_breakdown, bucket, category_breakdown, merchant_breakdown, AccountTotal,
    CategoryTotal, Granularity, MerchantAnalysis, SpendingAnalysis, SpendingSummary,
    TransactionList, TrendAnalysis,
};
use crate::budget::{BudgetAnalysis, BudgetEvaluator};
use crate::charts::{ChartBuilder, ChartData, ChartType};
use crate::config::Config;
use crate::error::Result;
use crate::filter::TransactionFilter;
use crate::ledger::Ledger;
use crate::models::Transaction;
use crate::recommend::{AnalysisWindow, RecommendationEngine, RecommendationReport, RuleContext};

/// Stateless facade over the aggregators, budget evaluator, rules and charts
pub struct AnalyticsEngine {
    config: Config,
    evaluator: BudgetEvaluator,
    rules: RecommendationEngine,
    charts: ChartBuilder,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AnalyticsEngine {
    pub fn new(config: Config) -> Self {
        Self {
            evaluator: BudgetEvaluator::new(config.budget_rules.on_track_ratio),
            rules: RecommendationEngine::new(),
            charts: ChartBuilder::new(config.charts.clone()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn select<'a>(
        &self,
        operation: &str,
        ledger: &'a Ledger,
        filter: &TransactionFilter,
    ) -> Result<Vec<&'a Transaction>> {
        filter.validate()?;
        let selected = filter.apply(ledger);
        debug!(
            operation,
            matched = selected.len(),
            total = ledger.len(),
            "Applied filter"
        );
        Ok(selected)
    }

    /// Filtered transactions with count and total
    pub fn transactions(&self, ledger: &Ledger, filter: &TransactionFilter) -> Result<TransactionList> {
        let selected = self.select("transactions", ledger, filter)?;
        Ok(TransactionList::new(&selected, filter))
    }

    pub fn spending_summary(
        &self,
        ledger: &Ledger,
        filter: &TransactionFilter,
    ) -> Result<SpendingSummary> {
        let selected = self.select("spending_summary", ledger, filter)?;
        Ok(SpendingSummary::from_transactions(&selected))
    }

    /// Summary, categories, monthly trend, top merchants and accounts in one pass
    pub fn spending_analysis(
        &self,
        ledger: &Ledger,
        filter: &TransactionFilter,
    ) -> Result<SpendingAnalysis> {
        let selected = self.select("spending_analysis", ledger, filter)?;

        let mut top_merchants = merchant_breakdown(&selected);
        top_merchants.truncate(self.config.charts.top_merchants);

        Ok(SpendingAnalysis {
            summary: SpendingSummary::from_transactions(&selected),
            category_breakdown: category_breakdown(&selected),
            monthly_trend: bucket(&selected, Granularity::Monthly),
            top_merchants,
            account_breakdown: account_breakdown(&selected),
        })
    }

    pub fn category_breakdown(
        &self,
        ledger: &Ledger,
        filter: &TransactionFilter,
    ) -> Result<Vec<CategoryTotal>> {
        let selected = self.select("category_breakdown", ledger, filter)?;
        Ok(category_breakdown(&selected))
    }

    pub fn merchant_analysis(
        &self,
        ledger: &Ledger,
        filter: &TransactionFilter,
    ) -> Result<MerchantAnalysis> {
        let selected = self.select("merchant_analysis", ledger, filter)?;
        Ok(MerchantAnalysis::from_transactions(&selected))
    }

    pub fn account_breakdown(
        &self,
        ledger: &Ledger,
        filter: &TransactionFilter,
    ) -> Result<Vec<AccountTotal>> {
        let selected = self.select("account_breakdown", ledger, filter)?;
        Ok(account_breakdown(&selected))
    }

    pub fn trend_analysis(&self, ledger: &Ledger, filter: &TransactionFilter) -> Result<TrendAnalysis> {
        let selected = self.select("trend_analysis", ledger, filter)?;
        Ok(TrendAnalysis::from_transactions(&selected))
    }

    pub fn budget_analysis(
        &self,
        ledger: &Ledger,
        filter: &TransactionFilter,
    ) -> Result<BudgetAnalysis> {
        let selected = self.select("budget_analysis", ledger, filter)?;
        Ok(self.evaluator.evaluate(&self.config.budgets, &selected))
    }

    /// Run the recommendation rules over the analysis window
    ///
    /// The filter's dates pick the window (see [`AnalysisWindow::resolve`]);
    /// its other predicates still apply.
    pub fn recommendations(
        &self,
        ledger: &Ledger,
        filter: &TransactionFilter,
        reference_date: NaiveDate,
    ) -> Result<RecommendationReport> {
        filter.validate()?;
        let window = AnalysisWindow::resolve(
            filter.start_date,
            filter.end_date,
            reference_date,
            self.config.recommendations.window_days,
        )?;

        let windowed = filter.clone().date_range(Some((window.start, window.end)));
        let selected = self.select("recommendations", ledger, &windowed)?;

        let ctx = RuleContext::new(
            window,
            selected,
            &self.config.budgets,
            &self.config.recommendations,
        );
        let report = self.rules.run(&ctx);

        debug!(
            window_start = %window.start,
            window_end = %window.end,
            count = report.total_recommendations,
            "Recommendations generated"
        );
        Ok(report)
    }

    /// Chart-ready data for one chart type
    pub fn chart(
        &self,
        ledger: &Ledger,
        filter: &TransactionFilter,
        chart_type: ChartType,
    ) -> Result<ChartData> {
        let selected = self.select(chart_type.as_str(), ledger, filter)?;

        let chart = match chart_type {
            ChartType::CategoryBreakdown => {
                self.charts.category_breakdown(&category_breakdown(&selected))
            }
            ChartType::SpendingTrend => self
                .charts
                .spending_trend(&bucket(&selected, Granularity::Daily)),
            ChartType::BudgetVsActual => self
                .charts
                .budget_vs_actual(&self.evaluator.evaluate(&self.config.budgets, &selected)),
            ChartType::MerchantAnalysis => {
                self.charts.merchant_analysis(&merchant_breakdown(&selected))
            }
        };
        Ok(chart)
    }
}
