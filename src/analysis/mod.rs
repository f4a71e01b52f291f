//! Aggregation over a snapshot of the ledger.
//!
//! [`analyze`] is pure: it borrows the transactions, never mutates them,
//! and returns a structured [`Analysis`]. Text layout lives in
//! [`render`](self::render).

mod render;

pub(crate) use render::{render, NOTHING_TO_ANALYZE};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{Transaction, TxnType};

/// How many categories the spending summary lists.
pub(crate) const TOP_SPENDING: usize = 3;

/// `part` as a percentage of `whole`. A zero (or negative) denominator
/// gives zero rather than an error.
pub(crate) fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Debit/credit totals over some scope (whole ledger or one month).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Totals {
    pub(crate) count: usize,
    /// Sum of debit magnitudes, always >= 0.
    pub(crate) debits: Decimal,
    pub(crate) credits: Decimal,
    /// `debits + credits`: the denominator for every "% of total".
    pub(crate) total: Decimal,
    /// `credits - debits`.
    pub(crate) net: Decimal,
}

impl Totals {
    pub(crate) fn of<'a, I>(txns: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals = Self::default();
        for txn in txns {
            totals.count += 1;
            if txn.is_debit() {
                totals.debits += txn.abs_amount();
            } else if txn.is_credit() {
                totals.credits += txn.amount;
            }
        }
        totals.total = totals.debits + totals.credits;
        totals.net = totals.credits - totals.debits;
        totals
    }

    pub(crate) fn debit_pct(&self) -> Decimal {
        percentage(self.debits, self.total)
    }

    pub(crate) fn credit_pct(&self) -> Decimal {
        percentage(self.credits, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransactionShare {
    pub(crate) id: u64,
    pub(crate) date: NaiveDate,
    pub(crate) amount: Decimal,
    pub(crate) description: String,
    /// `|amount|` as a share of the total.
    pub(crate) pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryBreakdown {
    /// Lowercased description.
    pub(crate) key: String,
    pub(crate) count: usize,
    pub(crate) debits: Decimal,
    pub(crate) credits: Decimal,
    /// Signed: `credits - debits`.
    pub(crate) sum: Decimal,
    pub(crate) kind: TxnType,
    /// `|sum|` as a share of the enclosing scope's total.
    pub(crate) pct: Decimal,
    /// This category's debits as a share of the scope's debits.
    pub(crate) debit_pct: Decimal,
    /// This category's credits as a share of the scope's credits.
    pub(crate) credit_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthBreakdown {
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) totals: Totals,
    /// Percentages here are of the month's total.
    pub(crate) categories: Vec<CategoryBreakdown>,
}

impl MonthBreakdown {
    /// `YYYY-MM`
    pub(crate) fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TopSpending {
    pub(crate) key: String,
    /// Summed debit magnitude.
    pub(crate) amount: Decimal,
    /// Share of total debits.
    pub(crate) pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Analysis {
    pub(crate) totals: Totals,
    /// Ordered by id.
    pub(crate) transactions: Vec<TransactionShare>,
    /// Ordered by key.
    pub(crate) categories: Vec<CategoryBreakdown>,
    /// Most recent month first.
    pub(crate) months: Vec<MonthBreakdown>,
    /// At most [`TOP_SPENDING`] entries, largest first.
    pub(crate) top_spending: Vec<TopSpending>,
}

/// Aggregate a snapshot. Returns `None` when there is nothing to analyze.
pub(crate) fn analyze(txns: &[Transaction]) -> Option<Analysis> {
    if txns.is_empty() {
        return None;
    }

    let totals = Totals::of(txns);

    let mut transactions: Vec<TransactionShare> = txns
        .iter()
        .map(|t| TransactionShare {
            id: t.id,
            date: t.date,
            amount: t.amount,
            description: t.description.clone(),
            pct: percentage(t.abs_amount(), totals.total),
        })
        .collect();
    transactions.sort_by_key(|t| t.id);

    let all: Vec<&Transaction> = txns.iter().collect();
    let categories = categorize(&all, &totals);
    let months = by_month(txns);
    let top_spending = top_spending(&categories, totals.debits);

    debug!(
        count = totals.count,
        categories = categories.len(),
        months = months.len(),
        "analysis complete"
    );

    Some(Analysis {
        totals,
        transactions,
        categories,
        months,
        top_spending,
    })
}

/// Group by lowercased description. Percentages are relative to `scope`,
/// the totals of the same transactions.
fn categorize(txns: &[&Transaction], scope: &Totals) -> Vec<CategoryBreakdown> {
    let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for txn in txns {
        groups.entry(txn.category_key()).or_default().push(txn);
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let t = Totals::of(members.iter().copied());
            let kind = if t.net < Decimal::ZERO {
                TxnType::Debit
            } else {
                TxnType::Credit
            };
            CategoryBreakdown {
                key,
                count: t.count,
                debits: t.debits,
                credits: t.credits,
                sum: t.net,
                kind,
                pct: percentage(t.net.abs(), scope.total),
                debit_pct: percentage(t.debits, scope.debits),
                credit_pct: percentage(t.credits, scope.credits),
            }
        })
        .collect()
}

fn by_month(txns: &[Transaction]) -> Vec<MonthBreakdown> {
    let mut groups: BTreeMap<(i32, u32), Vec<&Transaction>> = BTreeMap::new();
    for txn in txns {
        groups
            .entry((txn.date.year(), txn.date.month()))
            .or_default()
            .push(txn);
    }

    groups
        .into_iter()
        .rev()
        .map(|((year, month), members)| {
            let totals = Totals::of(members.iter().copied());
            let categories = categorize(&members, &totals);
            MonthBreakdown {
                year,
                month,
                totals,
                categories,
            }
        })
        .collect()
}

/// Categories ranked by how much was spent in them. Categories with no
/// debits are left out; equal amounts fall back to key order.
fn top_spending(categories: &[CategoryBreakdown], total_debits: Decimal) -> Vec<TopSpending> {
    let mut ranked: Vec<&CategoryBreakdown> = categories
        .iter()
        .filter(|c| c.debits > Decimal::ZERO)
        .collect();
    ranked.sort_by(|a, b| b.debits.cmp(&a.debits).then_with(|| a.key.cmp(&b.key)));

    ranked
        .into_iter()
        .take(TOP_SPENDING)
        .map(|c| TopSpending {
            key: c.key.clone(),
            amount: c.debits,
            pct: percentage(c.debits, total_debits),
        })
        .collect()
}

#[cfg(test)]
mod tests;
