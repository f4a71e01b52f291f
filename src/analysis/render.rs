use rust_decimal::Decimal;

use crate::format::{format_amount, format_pct, rule, truncate};
use crate::ledger::DATE_FORMAT;

use super::{Analysis, CategoryBreakdown, MonthBreakdown};

pub(crate) const NOTHING_TO_ANALYZE: &str =
    "No transactions to analyze. Load or add some transactions first.";

const CATEGORY_WIDTH: usize = 20;

/// Console layout for an analysis.
pub(crate) fn render(analysis: &Analysis) -> String {
    let mut lines = vec![
        String::new(),
        "FINANCIAL ANALYSIS".to_string(),
        rule('='),
    ];

    let totals = &analysis.totals;
    section(&mut lines, "OVERALL SUMMARY");
    lines.push(format!("Total Transactions: {}", totals.count));
    lines.push(format!(
        "Total Debits:       {:<16} {}",
        format_amount(totals.debits),
        format_pct(totals.debit_pct())
    ));
    lines.push(format!(
        "Total Credits:      {:<16} {}",
        format_amount(totals.credits),
        format_pct(totals.credit_pct())
    ));
    lines.push(format!("Total Amount:       {}", format_amount(totals.total)));
    lines.push(format!("Net Balance:        {}", format_amount(totals.net)));

    section(&mut lines, "TRANSACTIONS");
    lines.push(format!(
        "{:<6} {:<12} {:>14} {:<8} {:>10}  Description",
        "ID", "Date", "Amount", "Type", "% of Total"
    ));
    lines.push(rule('-'));
    for t in &analysis.transactions {
        let kind = if t.amount < Decimal::ZERO {
            "debit"
        } else {
            "credit"
        };
        lines.push(format!(
            "{:<6} {:<12} {:>14} {:<8} {:>10}  {}",
            t.id,
            t.date.format(DATE_FORMAT).to_string(),
            format_amount(t.amount),
            kind,
            format_pct(t.pct),
            t.description
        ));
    }

    section(&mut lines, "CATEGORY BREAKDOWN");
    category_table(&mut lines, &analysis.categories, "% of Total");

    section(&mut lines, "MONTHLY ANALYSIS");
    for (i, month) in analysis.months.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        month_block(&mut lines, month);
    }

    section(&mut lines, "SPENDING PATTERNS");
    if analysis.top_spending.is_empty() {
        lines.push("No spending recorded.".to_string());
    } else {
        lines.push("Top Spending Categories:".to_string());
        for top in &analysis.top_spending {
            lines.push(format!(
                "{:<width$} {:>14} {:>10}",
                truncate(&top.key, CATEGORY_WIDTH),
                format_amount(top.amount),
                format_pct(top.pct),
                width = CATEGORY_WIDTH
            ));
        }
    }

    lines.push(String::new());
    lines.push(rule('='));
    lines.join("\n")
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push(rule('-'));
}

fn category_table(lines: &mut Vec<String>, categories: &[CategoryBreakdown], pct_header: &str) {
    lines.push(format!(
        "{:<width$} {:<8} {:>14} {:>14} {:>14} {:>10} {:>11} {:>12}",
        "Category",
        "Type",
        "Debits",
        "Credits",
        "Net",
        pct_header,
        "% of Debits",
        "% of Credits",
        width = CATEGORY_WIDTH
    ));
    for c in categories {
        lines.push(format!(
            "{:<width$} {:<8} {:>14} {:>14} {:>14} {:>10} {:>11} {:>12}",
            truncate(&c.key, CATEGORY_WIDTH),
            c.kind.as_str(),
            format_amount(c.debits),
            format_amount(c.credits),
            format_amount(c.sum),
            format_pct(c.pct),
            format_pct(c.debit_pct),
            format_pct(c.credit_pct),
            width = CATEGORY_WIDTH
        ));
    }
}

fn month_block(lines: &mut Vec<String>, month: &MonthBreakdown) {
    let t = &month.totals;
    lines.push(format!("{} ({} transactions)", month.label(), t.count));
    lines.push(format!(
        "  Debits:  {:<16} {}",
        format_amount(t.debits),
        format_pct(t.debit_pct())
    ));
    lines.push(format!(
        "  Credits: {:<16} {}",
        format_amount(t.credits),
        format_pct(t.credit_pct())
    ));
    lines.push(format!("  Net:     {}", format_amount(t.net)));
    category_table(lines, &month.categories, "% of Month");
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
