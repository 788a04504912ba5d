//! Report command implementations

use anyhow::Result;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tally_core::{
    ChartType, ComplianceStatus, Granularity, ReportPeriod, Severity, SpendingSummary,
    TransactionFilter, TrendPoint,
};

use super::{print_json, truncate, Session};

/// Period covered by a report: the filter's dates, padded out by the ledger's
fn report_period(session: &Session, filter: &TransactionFilter) -> Option<ReportPeriod> {
    let bounds = session.ledger.date_bounds();
    let from = filter.start_date.or(bounds.map(|(first, _)| first))?;
    let to = filter.end_date.or(bounds.map(|(_, last)| last))?;
    Some(ReportPeriod::new(from, to))
}

fn print_header(title: &str, session: &Session, filter: &TransactionFilter) {
    println!();
    println!("{}", title);
    if let Some(period) = report_period(session, filter) {
        println!(
            "   Period: {} to {} ({} days)",
            period.from,
            period.to,
            period.days()
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
}

fn print_summary_lines(summary: &SpendingSummary) {
    println!(
        "   Income:        ${:>10.2}  ({} transactions)",
        summary.total_income, summary.income_count
    );
    println!(
        "   Expenses:      ${:>10.2}  ({} transactions)",
        summary.total_expenses, summary.expense_count
    );
    println!("   Net income:    ${:>10.2}", summary.net_income);
    println!("   Savings rate:   {:>10.2}%", summary.savings_rate);
}

fn print_trend_rows(points: &[TrendPoint]) {
    let max = points.iter().map(|p| p.amount).max().unwrap_or_default();

    println!("   {:21} │ {:>10} │ {:>5} │", "Period", "Amount", "Count");
    println!("   ──────────────────────┼────────────┼───────┼──────────────────────");
    for point in points {
        let bar_len = if max.is_zero() {
            0
        } else {
            (point.amount * Decimal::from(20) / max)
                .round()
                .to_usize()
                .unwrap_or(0)
        };
        println!(
            "   {:21} │ {:>10.2} │ {:>5} │ {}",
            point.period,
            point.amount,
            point.transaction_count,
            "█".repeat(bar_len)
        );
    }
}

pub fn cmd_transactions(session: &Session, filter: &TransactionFilter, limit: usize) -> Result<()> {
    let list = session.engine.transactions(&session.ledger, filter)?;
    if session.json {
        return print_json(serde_json::to_value(&list)?);
    }

    print_header("📋 Transactions", session, filter);
    if list.transactions.is_empty() {
        println!("   No transactions match these filters.");
        return Ok(());
    }

    println!(
        "   {:10} │ {:>10} │ {:7} │ {:18} │ {:20}",
        "Date", "Amount", "Type", "Category", "Merchant"
    );
    println!("   ───────────┼────────────┼─────────┼────────────────────┼─────────────────────");
    for tx in list.transactions.iter().take(limit) {
        println!(
            "   {:10} │ {:>10.2} │ {:7} │ {:18} │ {:20}",
            tx.date.to_string(),
            tx.amount,
            tx.kind.as_str(),
            truncate(&tx.category, 18),
            truncate(tx.merchant.as_deref().unwrap_or("-"), 20)
        );
    }

    if list.total_count > limit {
        println!("   ... and {} more", list.total_count - limit);
    }
    println!();
    println!(
        "   {} transactions, total ${:.2}",
        list.total_count, list.total_amount
    );
    Ok(())
}

pub fn cmd_summary(session: &Session, filter: &TransactionFilter) -> Result<()> {
    let summary = session.engine.spending_summary(&session.ledger, filter)?;
    if session.json {
        return print_json(serde_json::to_value(&summary)?);
    }

    print_header("📊 Spending Summary", session, filter);
    print_summary_lines(&summary);
    Ok(())
}

pub fn cmd_analysis(session: &Session, filter: &TransactionFilter) -> Result<()> {
    let analysis = session.engine.spending_analysis(&session.ledger, filter)?;
    if session.json {
        return print_json(serde_json::to_value(&analysis)?);
    }

    print_header("📊 Spending Analysis", session, filter);
    print_summary_lines(&analysis.summary);

    if !analysis.category_breakdown.is_empty() {
        println!();
        println!("   🏷️  Categories");
        for cat in &analysis.category_breakdown {
            println!(
                "   {:25} │ {:>10.2} │ {:>6.2}%",
                truncate(&cat.category, 25),
                cat.total_amount,
                cat.percentage
            );
        }
    }

    if !analysis.monthly_trend.is_empty() {
        println!();
        println!("   📈 Monthly");
        print_trend_rows(&analysis.monthly_trend);
    }

    if !analysis.top_merchants.is_empty() {
        println!();
        println!("   🏪 Top Merchants");
        for m in &analysis.top_merchants {
            println!(
                "   {:25} │ {:>10.2} │ {:>3}x",
                truncate(&m.merchant, 25),
                m.total_spent,
                m.transaction_count
            );
        }
    }

    if !analysis.account_breakdown.is_empty() {
        println!();
        println!("   💳 Accounts");
        for a in &analysis.account_breakdown {
            println!(
                "   {:25} │ {:>10.2} │ {:>3}x",
                truncate(&a.account_type, 25),
                a.total_amount,
                a.transaction_count
            );
        }
    }
    Ok(())
}

pub fn cmd_categories(session: &Session, filter: &TransactionFilter) -> Result<()> {
    let categories = session.engine.category_breakdown(&session.ledger, filter)?;
    if session.json {
        return print_json(serde_json::to_value(&categories)?);
    }

    print_header("🏷️  Spending by Category", session, filter);
    if categories.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!(
        "   {:25} │ {:>10} │ {:>7} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼─────────┼───────");
    for cat in &categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>6.2}% │ {:>5}",
            truncate(&cat.category, 25),
            cat.total_amount,
            cat.percentage,
            cat.transaction_count
        );
    }
    Ok(())
}

pub fn cmd_merchants(session: &Session, filter: &TransactionFilter, limit: usize) -> Result<()> {
    let analysis = session.engine.merchant_analysis(&session.ledger, filter)?;
    if session.json {
        return print_json(serde_json::to_value(&analysis)?);
    }

    print_header("🏪 Top Merchants", session, filter);
    if analysis.merchants.is_empty() {
        println!("   No merchant spending found in this period.");
        return Ok(());
    }

    println!(
        "   {} merchants, total ${:.2}",
        analysis.total_merchants, analysis.total_spent
    );
    println!();
    println!(
        "   {:3} {:25} │ {:>10} │ {:>5} │ {:>8} │ {:16}",
        "#", "Merchant", "Total", "Count", "Avg", "Category"
    );
    println!("   ──────────────────────────────┼────────────┼───────┼──────────┼─────────────────");
    for (i, m) in analysis.merchants.iter().take(limit).enumerate() {
        println!(
            "   {:3} {:25} │ {:>10.2} │ {:>5} │ {:>8.2} │ {:16}",
            i + 1,
            truncate(&m.merchant, 25),
            m.total_spent,
            m.transaction_count,
            m.avg_amount,
            truncate(&m.category, 16)
        );
    }
    Ok(())
}

pub fn cmd_accounts(session: &Session, filter: &TransactionFilter) -> Result<()> {
    let accounts = session.engine.account_breakdown(&session.ledger, filter)?;
    if session.json {
        return print_json(serde_json::to_value(&accounts)?);
    }

    print_header("💳 Spending by Account", session, filter);
    if accounts.is_empty() {
        println!("   No account spending found in this period.");
        return Ok(());
    }

    println!("   {:25} │ {:>10} │ {:>5}", "Account", "Amount", "Count");
    println!("   ──────────────────────────┼────────────┼───────");
    for a in &accounts {
        println!(
            "   {:25} │ {:>10.2} │ {:>5}",
            truncate(&a.account_type, 25),
            a.total_amount,
            a.transaction_count
        );
    }
    Ok(())
}

pub fn cmd_trends(session: &Session, filter: &TransactionFilter, granularity: &str) -> Result<()> {
    let granularity: Granularity = granularity.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let trends = session.engine.trend_analysis(&session.ledger, filter)?;
    if session.json {
        return print_json(serde_json::to_value(&trends)?);
    }

    print_header(
        &format!("📈 Spending Trends ({})", granularity),
        session,
        filter,
    );
    let points = trends.series(granularity);
    if points.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    print_trend_rows(points);

    let metrics = &trends.trend_metrics;
    println!();
    println!("   Avg daily:      ${:>10.2}", metrics.avg_daily_spending);
    println!("   Avg weekly:     ${:>10.2}", metrics.avg_weekly_spending);
    println!("   Avg monthly:    ${:>10.2}", metrics.avg_monthly_spending);
    println!("   Monthly growth:  {:>10.2}%", metrics.avg_monthly_growth_pct);
    println!("   Volatility:      {:>10.2}", metrics.spending_volatility);
    Ok(())
}

pub fn cmd_budget(session: &Session, filter: &TransactionFilter) -> Result<()> {
    let analysis = session.engine.budget_analysis(&session.ledger, filter)?;
    if session.json {
        return print_json(serde_json::to_value(&analysis)?);
    }

    print_header("🎯 Budget Analysis", session, filter);
    println!(
        "   {:20} │ {:>10} │ {:>10} │ {:>10} │ {:>7} │ Status",
        "Category", "Budget", "Spent", "Remaining", "Used"
    );
    println!("   ─────────────────────┼────────────┼────────────┼────────────┼─────────┼────────────");
    for s in &analysis.categories {
        let icon = match s.status {
            ComplianceStatus::OverBudget => "🔴",
            ComplianceStatus::OnTrack => "🟡",
            ComplianceStatus::UnderBudget => "🟢",
            ComplianceStatus::NoSpending => "⚪",
        };
        println!(
            "   {:20} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>6.2}% │ {} {}",
            truncate(&s.category, 20),
            s.budget,
            s.spent,
            s.remaining,
            s.percentage_used,
            icon,
            s.status
        );
    }
    println!();
    println!(
        "   Total budget ${:.2}, spent ${:.2}, remaining ${:.2}",
        analysis.total_budget, analysis.total_spent, analysis.overall_remaining
    );

    let over: Vec<_> = analysis.over_budget().map(|s| s.category.as_str()).collect();
    if !over.is_empty() {
        println!("   ⚠️  Over budget: {}", over.join(", "));
    }
    Ok(())
}

pub fn cmd_recommend(session: &Session, filter: &TransactionFilter) -> Result<()> {
    let report = session
        .engine
        .recommendations(&session.ledger, filter, session.reference_date)?;
    if session.json {
        return print_json(serde_json::to_value(&report)?);
    }

    println!();
    println!("💡 Recommendations");
    println!(
        "   Window: {} to {} ({} days)",
        report.window_start, report.window_end, report.days_in_period
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if report.recommendations.is_empty() {
        println!("   ✅ Nothing to flag in this window.");
        return Ok(());
    }

    for rec in &report.recommendations {
        let icon = match rec.severity {
            Severity::High => "🔴",
            Severity::Medium => "🟡",
            Severity::Low => "🔵",
        };
        println!();
        println!("   {} [{}] {}", icon, rec.kind(), rec.subject);
        println!("      {}", rec.message);
        println!("      → {}", rec.suggestion);
    }
    println!();
    println!("   {} recommendation(s)", report.total_recommendations);
    Ok(())
}

pub fn cmd_chart(session: &Session, filter: &TransactionFilter, chart_type: &str) -> Result<()> {
    let chart_type: ChartType = chart_type.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let chart = session.engine.chart(&session.ledger, filter, chart_type)?;
    if session.json {
        return print_json(serde_json::to_value(&chart)?);
    }

    println!();
    println!("📉 {}", chart.title);
    println!("   Output: {}", chart.output_path);
    println!("   ─────────────────────────────────────────────────────────────");
    if chart.labels.is_empty() {
        println!("   No data to chart.");
        return Ok(());
    }

    print!("   {:25}", "Label");
    for series in &chart.series {
        print!(" │ {:>12}", truncate(&series.name, 12));
    }
    println!();
    for (i, label) in chart.labels.iter().enumerate() {
        print!("   {:25}", truncate(label, 25));
        for series in &chart.series {
            print!(" │ {:>12.2}", series.values.get(i).copied().unwrap_or_default());
        }
        println!();
    }
    Ok(())
}
