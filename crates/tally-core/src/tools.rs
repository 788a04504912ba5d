//! Tool boundary for Tally
//!
//! Every engine operation is exposed as a named tool taking JSON arguments.
//! [`call_tool`] never fails: computation errors come back as
//! `{"success": false, "error": "..."}` and results as
//! `{"success": true, "data": ...}`. [`list_tools`] describes every tool
//! with a JSON Schema of its arguments.
//!
//! All tools are read-only over the ledger snapshot they are given.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analytics::{
    AccountTotal, CategoryTotal, MerchantAnalysis, SpendingAnalysis, SpendingSummary,
    TransactionList, TrendAnalysis,
};
use crate::budget::BudgetAnalysis;
use crate::charts::{ChartData, ChartType};
use crate::engine::AnalyticsEngine;
use crate::error::{Error, Result};
use crate::filter::TransactionFilter;
use crate::ledger::Ledger;
use crate::recommend::RecommendationReport;

// =============================================================================
// Envelope
// =============================================================================

/// Tagged result of a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Name, description and argument schema of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

// =============================================================================
// Shared filter arguments
// =============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FilterParams {
    /// Category substring (case-insensitive)
    #[schemars(description = "Filter by category (case-insensitive substring, e.g. \"food\")")]
    pub category: Option<String>,

    /// Transaction type
    #[serde(rename = "type")]
    #[schemars(description = "Filter by transaction type: expense or income")]
    pub transaction_type: Option<String>,

    /// Merchant substring (case-insensitive)
    #[schemars(description = "Filter by merchant (case-insensitive substring)")]
    pub merchant: Option<String>,

    /// Inclusive start date
    #[schemars(description = "Start date (YYYY-MM-DD), inclusive")]
    pub start_date: Option<String>,

    /// Inclusive end date
    #[schemars(description = "End date (YYYY-MM-DD), inclusive")]
    pub end_date: Option<String>,
}

impl FilterParams {
    pub fn to_filter(&self) -> Result<TransactionFilter> {
        TransactionFilter::from_args(
            self.category.as_deref(),
            self.transaction_type.as_deref(),
            self.merchant.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }
}

// =============================================================================
// get_transactions
// =============================================================================

pub fn get_transactions(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
) -> Result<TransactionList> {
    engine.transactions(ledger, &params.to_filter()?)
}

// =============================================================================
// get_spending_analysis / get_spending_summary
// =============================================================================

pub fn get_spending_analysis(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
) -> Result<SpendingAnalysis> {
    engine.spending_analysis(ledger, &params.to_filter()?)
}

pub fn get_spending_summary(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
) -> Result<SpendingSummary> {
    engine.spending_summary(ledger, &params.to_filter()?)
}

// =============================================================================
// Breakdowns
// =============================================================================

pub fn get_category_breakdown(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
) -> Result<Vec<CategoryTotal>> {
    engine.category_breakdown(ledger, &params.to_filter()?)
}

pub fn get_merchant_analysis(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
) -> Result<MerchantAnalysis> {
    engine.merchant_analysis(ledger, &params.to_filter()?)
}

pub fn get_account_breakdown(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
) -> Result<Vec<AccountTotal>> {
    engine.account_breakdown(ledger, &params.to_filter()?)
}

// =============================================================================
// get_trend_analysis
// =============================================================================

pub fn get_trend_analysis(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
) -> Result<TrendAnalysis> {
    engine.trend_analysis(ledger, &params.to_filter()?)
}

// =============================================================================
// get_budget_analysis
// =============================================================================

pub fn get_budget_analysis(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
) -> Result<BudgetAnalysis> {
    engine.budget_analysis(ledger, &params.to_filter()?)
}

// =============================================================================
// get_spending_recommendations
// =============================================================================

pub fn get_spending_recommendations(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: FilterParams,
    reference_date: NaiveDate,
) -> Result<RecommendationReport> {
    engine.recommendations(ledger, &params.to_filter()?, reference_date)
}

// =============================================================================
// generate_chart
// =============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ChartParams {
    #[schemars(
        description = "Chart type: category_breakdown (default), spending_trend, budget_vs_actual, merchant_analysis"
    )]
    pub chart_type: Option<String>,

    #[schemars(description = "Filter by category (case-insensitive substring)")]
    pub category: Option<String>,

    #[serde(rename = "type")]
    #[schemars(description = "Filter by transaction type: expense or income")]
    pub transaction_type: Option<String>,

    #[schemars(description = "Filter by merchant (case-insensitive substring)")]
    pub merchant: Option<String>,

    #[schemars(description = "Start date (YYYY-MM-DD), inclusive")]
    pub start_date: Option<String>,

    #[schemars(description = "End date (YYYY-MM-DD), inclusive")]
    pub end_date: Option<String>,
}

pub fn generate_chart(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    params: ChartParams,
) -> Result<ChartData> {
    let chart_type = match params.chart_type.as_deref().map(str::trim) {
        None | Some("") => ChartType::CategoryBreakdown,
        Some(name) => name.parse::<ChartType>().map_err(Error::UnknownChart)?,
    };

    let filter = TransactionFilter::from_args(
        params.category.as_deref(),
        params.transaction_type.as_deref(),
        params.merchant.as_deref(),
        params.start_date.as_deref(),
        params.end_date.as_deref(),
    )?;

    engine.chart(ledger, &filter, chart_type)
}

// =============================================================================
// Dispatch
// =============================================================================

/// Names of every tool, in listing order
pub const TOOL_NAMES: &[&str] = &[
    "get_transactions",
    "get_spending_analysis",
    "get_spending_summary",
    "get_category_breakdown",
    "get_merchant_analysis",
    "get_account_breakdown",
    "get_trend_analysis",
    "get_budget_analysis",
    "get_spending_recommendations",
    "generate_chart",
];

fn parse_args<T>(tool: &str, args: Value) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match args {
        Value::Null => Ok(T::default()),
        args => serde_json::from_value(args)
            .map_err(|e| Error::InvalidData(format!("Invalid arguments for {}: {}", tool, e))),
    }
}

fn to_data<T: Serialize>(result: Result<T>) -> Result<Value> {
    Ok(serde_json::to_value(result?)?)
}

fn dispatch(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    name: &str,
    args: Value,
    reference_date: NaiveDate,
) -> Result<Value> {
    match name {
        "get_transactions" => to_data(get_transactions(engine, ledger, parse_args(name, args)?)),
        "get_spending_analysis" => {
            to_data(get_spending_analysis(engine, ledger, parse_args(name, args)?))
        }
        "get_spending_summary" => {
            to_data(get_spending_summary(engine, ledger, parse_args(name, args)?))
        }
        "get_category_breakdown" => {
            to_data(get_category_breakdown(engine, ledger, parse_args(name, args)?))
        }
        "get_merchant_analysis" => {
            to_data(get_merchant_analysis(engine, ledger, parse_args(name, args)?))
        }
        "get_account_breakdown" => {
            to_data(get_account_breakdown(engine, ledger, parse_args(name, args)?))
        }
        "get_trend_analysis" => to_data(get_trend_analysis(engine, ledger, parse_args(name, args)?)),
        "get_budget_analysis" => {
            to_data(get_budget_analysis(engine, ledger, parse_args(name, args)?))
        }
        "get_spending_recommendations" => to_data(get_spending_recommendations(
            engine,
            ledger,
            parse_args(name, args)?,
            reference_date,
        )),
        "generate_chart" => to_data(generate_chart(engine, ledger, parse_args(name, args)?)),
        _ => Err(Error::UnknownTool(name.to_string())),
    }
}

/// Run a tool by name and wrap the outcome in the response envelope
pub fn call_tool(
    engine: &AnalyticsEngine,
    ledger: &Ledger,
    name: &str,
    args: Value,
    reference_date: NaiveDate,
) -> ToolResponse {
    match dispatch(engine, ledger, name, args, reference_date) {
        Ok(data) => {
            tracing::debug!(tool = name, "Tool call complete");
            ToolResponse::ok(data)
        }
        Err(e) => {
            tracing::warn!(tool = name, error = %e, "Tool call failed");
            ToolResponse::err(e.to_string())
        }
    }
}

// =============================================================================
// Tool Definitions
// =============================================================================

/// Describe every tool with its argument schema
pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "get_transactions",
            "List transactions filtered by category, type, merchant, or date range. \
             Returns the matches with total count and total amount.",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "get_spending_analysis",
            "Comprehensive spending analysis: summary, category breakdown, monthly trend, \
             top merchants, and account breakdown.",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "get_spending_summary",
            "Total income, total expenses, net income, and savings rate.",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "get_category_breakdown",
            "Expense totals by category, largest first.",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "get_merchant_analysis",
            "Spending patterns by merchant: totals, counts, averages, and first/last dates.",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "get_account_breakdown",
            "Expense totals by account type.",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "get_trend_analysis",
            "Daily, weekly, and monthly spending trends with growth and volatility metrics.",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "get_budget_analysis",
            "Spending against the budget table with per-category status.",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "get_spending_recommendations",
            "Recommendations for the analysis window (last 30 days unless dates are given).",
            schemars::schema_for!(FilterParams).into(),
        ),
        ToolDefinition::new(
            "generate_chart",
            "Chart-ready data series (category_breakdown, spending_trend, budget_vs_actual, \
             merchant_analysis) and the image path for an external renderer.",
            schemars::schema_for!(ChartParams).into(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, sample_ledger};
    use serde_json::json;

    fn call(name: &str, args: Value) -> ToolResponse {
        let engine = AnalyticsEngine::default();
        let ledger = sample_ledger();
        call_tool(&engine, &ledger, name, args, date(2024, 1, 31))
    }

    #[test]
    fn test_list_tools_matches_names() {
        let tools = list_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, TOOL_NAMES);
        for tool in &tools {
            assert!(!tool.description.is_empty());
            assert!(tool.input_schema.is_object(), "{} schema", tool.name);
        }
    }

    #[test]
    fn test_every_tool_succeeds_without_args() {
        for name in TOOL_NAMES {
            let response = call(name, Value::Null);
            assert!(response.success, "{} failed: {:?}", name, response.error);
            assert!(response.data.is_some());

            let response = call(name, json!({}));
            assert!(response.success, "{} failed with empty args", name);
        }
    }

    #[test]
    fn test_get_transactions_filters() {
        let response = call("get_transactions", json!({"category": "food", "merchant": ""}));
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data["total_count"], 2);
        assert_eq!(data["total_amount"], "40.00");
        assert_eq!(data["filters_applied"]["category"], "food");
    }

    #[test]
    fn test_budget_tool_output() {
        let response = call(
            "get_budget_analysis",
            json!({"start_date": "2024-01-01", "end_date": "2024-01-31"}),
        );
        let data = response.data.unwrap();
        let shopping = data["categories"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["category"] == "Shopping")
            .unwrap();
        assert_eq!(shopping["status"], "over_budget");
    }

    #[test]
    fn test_unknown_tool() {
        let response = call("delete_everything", json!({}));
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.error.unwrap().contains("delete_everything"));
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let response = call("get_spending_summary", json!({"categroy": "food"}));
        assert!(!response.success);
        assert!(response.error.unwrap().contains("categroy"));
    }

    #[test]
    fn test_bad_date_and_inverted_range() {
        let response = call("get_trend_analysis", json!({"start_date": "2024-02-30"}));
        assert!(!response.success);

        let response = call(
            "get_spending_analysis",
            json!({"start_date": "2024-03-01", "end_date": "2024-01-01"}),
        );
        assert!(!response.success);
    }

    #[test]
    fn test_generate_chart() {
        let response = call("generate_chart", json!({"chart_type": "spending_trend"}));
        let data = response.data.unwrap();
        assert_eq!(data["chart_type"], "spending_trend");
        assert_eq!(data["output_path"], "charts/spending_trend.png");

        let response = call("generate_chart", json!({"chart_type": "radar"}));
        assert!(!response.success);
        assert!(response.error.unwrap().contains("radar"));
    }

    #[test]
    fn test_recommendations_use_reference_date() {
        let response = call("get_spending_recommendations", Value::Null);
        let data = response.data.unwrap();
        assert_eq!(data["window_start"], "2024-01-02");
        assert_eq!(data["window_end"], "2024-01-31");
        assert_eq!(data["total_recommendations"], 2);
        assert_eq!(data["recommendations"][0]["kind"], "overspending_alert");
    }

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ToolResponse::ok(json!({"a": 1}))).unwrap();
        assert_eq!(ok, json!({"success": true, "data": {"a": 1}}));
        let err = serde_json::to_value(ToolResponse::err("boom")).unwrap();
        assert_eq!(err, json!({"success": false, "error": "boom"}));
    }
}
