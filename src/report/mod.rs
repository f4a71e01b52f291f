use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::analysis::{percentage, Totals};
use crate::format::{format_amount, format_pct, rule};
use crate::ledger::DATE_FORMAT;
use crate::models::Transaction;
use crate::storage::write_atomically;

/// Build the plain-text report: overall summary, credits and debits listed
/// by date, and the calendar month containing `today`.
pub(crate) fn build_report(
    transactions: &[Transaction],
    today: NaiveDate,
    generated_at: NaiveDateTime,
) -> String {
    let totals = Totals::of(transactions);
    let mut lines = vec!["FINANCIAL TRANSACTION REPORT".to_string(), rule('=')];

    lines.push(String::new());
    lines.push("SUMMARY".to_string());
    lines.push(rule('-'));
    lines.push(format!("Total Transactions: {}", totals.count));
    lines.push(format!("Total Amount: {}", format_amount(totals.total)));

    lines.push(String::new());
    lines.push("TOTALS AND PERCENTAGES".to_string());
    totals_table(&mut lines, &totals, "Net Balance");

    lines.push(String::new());
    lines.push("TRANSACTIONS BY TYPE".to_string());
    lines.push(rule('-'));
    let (mut credits, mut debits): (Vec<&Transaction>, Vec<&Transaction>) =
        transactions.iter().partition(|t| !t.is_debit());
    credits.sort_by_key(|t| (t.date, t.id));
    debits.sort_by_key(|t| (t.date, t.id));
    listing(&mut lines, "CREDIT TRANSACTIONS (Money In):", &credits);
    listing(&mut lines, "DEBIT TRANSACTIONS (Money Out):", &debits);

    let month = Totals::of(
        transactions
            .iter()
            .filter(|t| t.date.year() == today.year() && t.date.month() == today.month()),
    );
    lines.push(String::new());
    lines.push("MONTHLY SUMMARY".to_string());
    lines.push(rule('-'));
    lines.push(format!(
        "Current Month ({}/{}):",
        today.month(),
        today.year()
    ));
    totals_table(&mut lines, &month, "Net");

    lines.push(String::new());
    lines.push(rule('='));
    lines.push(format!(
        "Report generated on: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(String::new());
    lines.join("\n")
}

fn totals_table(lines: &mut Vec<String>, totals: &Totals, net_label: &str) {
    lines.push(rule('-'));
    lines.push(format!("{:<15} {:<15} {:<15}", "Category", "Amount", "Percentage"));
    lines.push(rule('-'));
    lines.push(format!(
        "{:<15} {:<15} {}",
        "Debits",
        format_amount(totals.debits),
        format_pct(totals.debit_pct())
    ));
    lines.push(format!(
        "{:<15} {:<15} {}",
        "Credits",
        format_amount(totals.credits),
        format_pct(totals.credit_pct())
    ));
    lines.push(format!(
        "{:<15} {:<15} {}",
        net_label,
        format_amount(totals.net),
        net_pct(totals)
    ));
}

/// Net as a share of the total keeps its sign, so a deficit shows as a
/// negative percentage.
fn net_pct(totals: &Totals) -> String {
    let pct = percentage(totals.net.abs(), totals.total);
    if totals.net.is_sign_negative() && !pct.is_zero() {
        format!("-{}", format_pct(pct))
    } else {
        format_pct(pct)
    }
}

fn listing(lines: &mut Vec<String>, title: &str, txns: &[&Transaction]) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push(rule('-'));
    lines.push(format!("{:<12} {:<15} {}", "Date", "Amount", "Description"));
    lines.push(rule('-'));
    if txns.is_empty() {
        lines.push("(none)".to_string());
    }
    for t in txns {
        lines.push(format!(
            "{:<12} {:<15} {}",
            t.date.format(DATE_FORMAT).to_string(),
            format_amount(t.abs_amount()),
            t.description
        ));
    }
}

/// Write the report in one step; a failed write leaves any previous
/// report in place.
pub(crate) fn write_report(path: &Path, text: &str) -> Result<()> {
    write_atomically(path, |file| {
        file.write_all(text.as_bytes())
            .context("Failed to write report")
    })
    .with_context(|| format!("Failed to write report file: {}", path.display()))?;
    info!(path = %path.display(), "report written");
    Ok(())
}
