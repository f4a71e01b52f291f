use rust_decimal::Decimal;

use crate::ledger::DATE_FORMAT;
use crate::models::Transaction;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"$1,234,567.89"`, `-5` → `"-$5.00"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let mut abs = val.abs().round_dp(2);
    abs.rescale(2);
    let formatted = abs.to_string();
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO && abs > Decimal::ZERO {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// A percentage rounded to one decimal place with a trailing `%`.
pub(crate) fn format_pct(pct: Decimal) -> String {
    let mut p = pct.round_dp(1);
    p.rescale(1);
    format!("{p}%")
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// A horizontal rule for the plain-text tables.
pub(crate) fn rule(ch: char) -> String {
    ch.to_string().repeat(80)
}

/// Plain table of transactions in storage order. With `indexed`, the
/// first column is the position used by update and delete.
pub(crate) fn transaction_table(txns: &[Transaction], indexed: bool) -> String {
    let mut lines = vec![rule('-')];
    let header = format!("{:<12} {:<14} {:<8} Description", "Date", "Amount", "Type");
    lines.push(if indexed {
        format!("{:<8} {header}", "Index")
    } else {
        header
    });
    lines.push(rule('-'));
    for (i, t) in txns.iter().enumerate() {
        let row = format!(
            "{:<12} {:<14} {:<8} {}",
            t.date.format(DATE_FORMAT).to_string(),
            format_amount(t.abs_amount()),
            t.txn_type().as_str(),
            t.description
        );
        lines.push(if indexed {
            format!("{i:<8} {row}")
        } else {
            row
        });
    }
    lines.push(rule('-'));
    lines.join("\n")
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
