#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn txn(id: u64, date: &str, amount: Decimal, desc: &str) -> Transaction {
    Transaction {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount,
        description: desc.into(),
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        txn(3, "2024-03-05", dec!(-40.00), "Groceries"),
        txn(1, "2024-02-01", dec!(2000.00), "Paycheck"),
        txn(2, "2024-02-03", dec!(-800.00), "Rent"),
        txn(5, "2024-03-15", dec!(-25.50), "groceries"),
        txn(4, "2024-03-01", dec!(2000.00), "Paycheck"),
        txn(6, "2024-03-20", dec!(15.00), "Groceries"),
        txn(7, "2023-12-24", dec!(-60.00), "Gifts"),
    ]
}

fn category<'a>(analysis: &'a Analysis, key: &str) -> &'a CategoryBreakdown {
    analysis.categories.iter().find(|c| c.key == key).unwrap()
}

// ── percentage ────────────────────────────────────────────────

#[test]
fn test_percentage_basic() {
    assert_eq!(percentage(dec!(25), dec!(100)), dec!(25));
    assert_eq!(percentage(dec!(50), dec!(150)).round_dp(1), dec!(33.3));
}

#[test]
fn test_percentage_zero_denominator() {
    assert_eq!(percentage(dec!(10), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(percentage(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
}

// ── analyze ───────────────────────────────────────────────────

#[test]
fn test_empty_ledger_is_nothing_to_analyze() {
    assert!(analyze(&[]).is_none());
}

#[test]
fn test_worked_example() {
    let txns = vec![
        txn(1, "2024-03-20", dec!(-50), "Gas"),
        txn(2, "2024-03-20", dec!(100), "Paycheck"),
    ];
    let a = analyze(&txns).unwrap();
    assert_eq!(a.totals.debits, dec!(50));
    assert_eq!(a.totals.credits, dec!(100));
    assert_eq!(a.totals.total, dec!(150));
    assert_eq!(a.totals.net, dec!(50));

    let gas = category(&a, "gas");
    assert_eq!(gas.kind, TxnType::Debit);
    assert_eq!(gas.sum, dec!(-50));
    assert_eq!(gas.pct.round_dp(1), dec!(33.3));

    let pay = category(&a, "paycheck");
    assert_eq!(pay.kind, TxnType::Credit);
    assert_eq!(pay.sum, dec!(100));
    assert_eq!(pay.pct.round_dp(1), dec!(66.7));
}

#[test]
fn test_global_totals() {
    let a = analyze(&sample()).unwrap();
    assert_eq!(a.totals.count, 7);
    assert_eq!(a.totals.debits, dec!(925.50));
    assert_eq!(a.totals.credits, dec!(4015.00));
    assert_eq!(a.totals.total, dec!(4940.50));
    assert_eq!(a.totals.net, dec!(3089.50));
}

#[test]
fn test_categories_partition_net() {
    let a = analyze(&sample()).unwrap();
    let sum: Decimal = a.categories.iter().map(|c| c.sum).sum();
    assert_eq!(sum, a.totals.net);
    assert_eq!(sum, a.totals.credits - a.totals.debits);
    assert_eq!(a.totals.debits + a.totals.credits, a.totals.total);
}

#[test]
fn test_category_keys_are_case_folded_and_sorted() {
    let a = analyze(&sample()).unwrap();
    let keys: Vec<&str> = a.categories.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["gifts", "groceries", "paycheck", "rent"]);

    let groceries = category(&a, "groceries");
    assert_eq!(groceries.count, 3);
    assert_eq!(groceries.debits, dec!(65.50));
    assert_eq!(groceries.credits, dec!(15.00));
    assert_eq!(groceries.sum, dec!(-50.50));
    assert_eq!(groceries.kind, TxnType::Debit);
}

#[test]
fn test_trailing_whitespace_is_a_distinct_category() {
    let txns = vec![
        txn(1, "2024-03-20", dec!(-5), "Coffee"),
        txn(2, "2024-03-21", dec!(-5), "Coffee "),
    ];
    let a = analyze(&txns).unwrap();
    assert_eq!(a.categories.len(), 2);
}

#[test]
fn test_transactions_sorted_by_id_with_share() {
    let a = analyze(&sample()).unwrap();
    let ids: Vec<u64> = a.transactions.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    let rent = &a.transactions[1];
    assert_eq!(rent.pct, percentage(dec!(800), dec!(4940.50)));
}

#[test]
fn test_months_most_recent_first() {
    let a = analyze(&sample()).unwrap();
    let labels: Vec<String> = a.months.iter().map(|m| m.label()).collect();
    assert_eq!(labels, vec!["2024-03", "2024-02", "2023-12"]);
}

#[test]
fn test_month_scoped_totals_and_categories() {
    let a = analyze(&sample()).unwrap();
    let march = &a.months[0];
    assert_eq!(march.totals.count, 4);
    assert_eq!(march.totals.debits, dec!(65.50));
    assert_eq!(march.totals.credits, dec!(2015.00));
    assert_eq!(march.totals.total, dec!(2080.50));
    assert_eq!(march.totals.net, dec!(1949.50));

    let keys: Vec<&str> = march.categories.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["groceries", "paycheck"]);
    let paycheck = &march.categories[1];
    assert_eq!(paycheck.pct, percentage(dec!(2000), dec!(2080.50)));

    let month_sum: Decimal = march.categories.iter().map(|c| c.sum).sum();
    assert_eq!(month_sum, march.totals.net);
}

#[test]
fn test_category_shares_of_debits_and_credits() {
    let a = analyze(&sample()).unwrap();
    let groceries = category(&a, "groceries");
    assert_eq!(groceries.debit_pct, percentage(dec!(65.50), dec!(925.50)));
    assert_eq!(groceries.credit_pct, percentage(dec!(15.00), dec!(4015.00)));

    let paycheck = category(&a, "paycheck");
    assert_eq!(paycheck.debit_pct, Decimal::ZERO);
    assert_eq!(paycheck.credit_pct, percentage(dec!(4000.00), dec!(4015.00)));

    let march = &a.months[0];
    assert_eq!(march.categories[0].debit_pct, dec!(100));
    assert_eq!(
        march.categories[0].credit_pct,
        percentage(dec!(15.00), dec!(2015.00))
    );
}

#[test]
fn test_category_shares_zero_without_debits() {
    let txns = vec![txn(1, "2024-03-20", dec!(100), "Paycheck")];
    let a = analyze(&txns).unwrap();
    assert_eq!(a.categories[0].debit_pct, Decimal::ZERO);
    assert_eq!(a.categories[0].credit_pct, dec!(100));
}

#[test]
fn test_top_spending_ranked_and_limited() {
    let a = analyze(&sample()).unwrap();
    let keys: Vec<&str> = a.top_spending.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["rent", "groceries", "gifts"]);
    assert_eq!(a.top_spending[0].amount, dec!(800));
    assert_eq!(a.top_spending[0].pct, percentage(dec!(800), dec!(925.50)));
}

#[test]
fn test_top_spending_ties_break_by_key() {
    let txns = vec![
        txn(1, "2024-03-01", dec!(-10), "Zoo"),
        txn(2, "2024-03-01", dec!(-10), "Art"),
        txn(3, "2024-03-01", dec!(-10), "Movies"),
        txn(4, "2024-03-01", dec!(-10), "Bus"),
    ];
    let a = analyze(&txns).unwrap();
    let keys: Vec<&str> = a.top_spending.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["art", "bus", "movies"]);
}

#[test]
fn test_top_spending_skips_credit_only_categories() {
    let txns = vec![
        txn(1, "2024-03-01", dec!(100), "Paycheck"),
        txn(2, "2024-03-02", dec!(-5), "Coffee"),
    ];
    let a = analyze(&txns).unwrap();
    assert_eq!(a.top_spending.len(), 1);
    assert_eq!(a.top_spending[0].key, "coffee");
    assert_eq!(a.top_spending[0].pct, dec!(100));
}

#[test]
fn test_all_zero_amounts_yield_zero_percent() {
    let txns = vec![
        txn(1, "2024-03-01", Decimal::ZERO, "Nothing"),
        txn(2, "2024-04-01", Decimal::ZERO, "Also nothing"),
    ];
    let a = analyze(&txns).unwrap();
    assert_eq!(a.totals.total, Decimal::ZERO);
    assert_eq!(a.totals.debit_pct(), Decimal::ZERO);
    assert_eq!(a.totals.credit_pct(), Decimal::ZERO);
    assert!(a.transactions.iter().all(|t| t.pct.is_zero()));
    assert!(a.categories.iter().all(|c| c.pct.is_zero()));
    assert!(a
        .months
        .iter()
        .flat_map(|m| m.categories.iter())
        .all(|c| c.pct.is_zero()));
    assert!(a.top_spending.is_empty());
    assert!(a.categories.iter().all(|c| c.kind == TxnType::Credit));
}

#[test]
fn test_percentages_within_bounds() {
    let a = analyze(&sample()).unwrap();
    let hundred = dec!(100);
    let in_range = |p: Decimal| p >= Decimal::ZERO && p <= hundred;
    assert!(a.transactions.iter().all(|t| in_range(t.pct)));
    assert!(a.categories.iter().all(|c| in_range(c.pct)));
    assert!(a
        .categories
        .iter()
        .all(|c| in_range(c.debit_pct) && in_range(c.credit_pct)));
    assert!(a.top_spending.iter().all(|t| in_range(t.pct)));
    for m in &a.months {
        assert!(in_range(m.totals.debit_pct()));
        assert!(in_range(m.totals.credit_pct()));
        assert!(m.categories.iter().all(|c| in_range(c.pct)));
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let txns = sample();
    assert_eq!(analyze(&txns), analyze(&txns));
}

#[test]
fn test_analysis_independent_of_storage_order() {
    let txns = sample();
    let mut reversed = txns.clone();
    reversed.reverse();
    assert_eq!(analyze(&txns), analyze(&reversed));
}
