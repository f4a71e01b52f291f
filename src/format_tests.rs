#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("gas", 20), "gas");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_category() {
    assert_eq!(
        truncate("monthly gym membership fee", 20),
        "monthly gym members…"
    );
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-$42.50");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_amount_pads_and_rounds() {
    assert_eq!(format_amount(dec!(5)), "$5.00");
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
    assert_eq!(format_amount(dec!(50.126)), "$50.13");
}

#[test]
fn test_format_amount_tiny_negative_is_not_signed() {
    assert_eq!(format_amount(dec!(-0.001)), "$0.00");
}

// ── format_pct ────────────────────────────────────────────────

#[test]
fn test_format_pct() {
    assert_eq!(format_pct(dec!(33.3333)), "33.3%");
    assert_eq!(format_pct(dec!(66.6666)), "66.7%");
    assert_eq!(format_pct(dec!(100)), "100.0%");
    assert_eq!(format_pct(dec!(0)), "0.0%");
}

#[test]
fn test_rule_width() {
    assert_eq!(rule('-').chars().count(), 80);
}

// ── transaction_table ─────────────────────────────────────────

fn table_rows() -> Vec<Transaction> {
    vec![
        Transaction {
            id: 10,
            date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            amount: dec!(100),
            description: "Paycheck".into(),
        },
        Transaction {
            id: 11,
            date: NaiveDate::from_ymd_opt(2024, 3, 21).unwrap(),
            amount: dec!(-50),
            description: "Gas".into(),
        },
    ]
}

#[test]
fn test_transaction_table_plain() {
    let table = transaction_table(&table_rows(), false);
    assert!(table.contains("2024-03-20   $100.00        credit   Paycheck"));
    assert!(table.contains("2024-03-21   $50.00         debit    Gas"));
    assert!(!table.contains("Index"));
}

#[test]
fn test_transaction_table_indexed_uses_positions() {
    let table = transaction_table(&table_rows(), true);
    assert!(table.contains("Index"));
    assert!(table.contains("0        2024-03-20"));
    assert!(table.contains("1        2024-03-21"));
}
