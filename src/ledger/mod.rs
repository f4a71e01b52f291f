use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::LedgerError;
use crate::models::{NewTransaction, Transaction, TxnType};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest accepted magnitude. Keeps every running total far from
/// `Decimal::MAX`.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Raw, unvalidated fields for a transaction as typed by the user.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransactionInput {
    pub(crate) date: String,
    pub(crate) amount: String,
    pub(crate) txn_type: Option<String>,
    pub(crate) description: String,
}

impl TransactionInput {
    /// Check every field and produce a typed transaction. When a type is
    /// given it decides the sign; otherwise the amount keeps its own sign.
    pub(crate) fn validate(&self) -> Result<NewTransaction, LedgerError> {
        let date = parse_date(&self.date)?;
        let amount = parse_decimal(&self.amount)?;
        let amount = match self.txn_type.as_deref() {
            Some(raw) => TxnType::parse(raw)
                .ok_or_else(|| LedgerError::InvalidType(raw.to_string()))?
                .apply_sign(amount),
            None => amount,
        };
        Ok(NewTransaction {
            date,
            amount,
            description: self.description.clone(),
        })
    }
}

/// The in-memory ledger for one session. Owns every transaction and the
/// counter ids are drawn from.
#[derive(Debug, Clone)]
pub(crate) struct Ledger {
    transactions: Vec<Transaction>,
    next_id: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_id: 1,
        }
    }

    pub(crate) fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn len(&self) -> usize {
        self.transactions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub(crate) fn get(&self, position: i64) -> Result<&Transaction, LedgerError> {
        let idx = self.checked_index(position)?;
        Ok(&self.transactions[idx])
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Replace the whole ledger with freshly loaded rows. The id counter
    /// keeps counting up so ids handed out earlier in the session are
    /// never seen again.
    pub(crate) fn replace_all(&mut self, rows: Vec<NewTransaction>) -> usize {
        self.transactions.clear();
        for row in rows {
            self.push(row);
        }
        self.transactions.len()
    }

    pub(crate) fn add(&mut self, input: &TransactionInput) -> Result<u64, LedgerError> {
        let new = input.validate()?;
        let id = self.push(new);
        debug!(id, "added transaction");
        Ok(id)
    }

    /// Replace the record at `position` wholesale. Its id is kept.
    pub(crate) fn update(
        &mut self,
        position: i64,
        input: &TransactionInput,
    ) -> Result<&Transaction, LedgerError> {
        let idx = self.checked_index(position)?;
        let new = input.validate()?;
        let slot = &mut self.transactions[idx];
        *slot = Transaction::from_new(slot.id, new);
        debug!(id = slot.id, position, "updated transaction");
        Ok(&self.transactions[idx])
    }

    pub(crate) fn remove(&mut self, position: i64) -> Result<Transaction, LedgerError> {
        let idx = self.checked_index(position)?;
        let removed = self.transactions.remove(idx);
        debug!(id = removed.id, position, "removed transaction");
        Ok(removed)
    }

    fn push(&mut self, new: NewTransaction) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.transactions.push(Transaction::from_new(id, new));
        id
    }

    fn checked_index(&self, position: i64) -> Result<usize, LedgerError> {
        usize::try_from(position)
            .ok()
            .filter(|&i| i < self.transactions.len())
            .ok_or(LedgerError::IndexOutOfRange {
                index: position,
                len: self.transactions.len(),
            })
    }
}

/// Parse a user-supplied position. Negative numbers parse fine here and
/// are rejected by the bounds check.
pub(crate) fn parse_position(s: &str) -> Result<i64, LedgerError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| LedgerError::InvalidIndex(s.trim().to_string()))
}

fn date_shape() -> Option<&'static Regex> {
    static SHAPE: OnceLock<Option<Regex>> = OnceLock::new();
    SHAPE
        .get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").ok())
        .as_ref()
}

/// Strict `YYYY-MM-DD`: zero-padded fields and a real calendar day.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = s.trim();
    let shaped = date_shape().map_or(true, |re| re.is_match(trimmed));
    if !shaped {
        return Err(LedgerError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(trimmed.to_string()))
}

/// Parse an amount, tolerating a leading `$` and thousands separators.
/// Magnitudes above [`MAX_AMOUNT`] are rejected.
pub(crate) fn parse_decimal(s: &str) -> Result<Decimal, LedgerError> {
    let raw = s.trim();
    let cleaned = raw.replace(['$', ','], "");
    if cleaned.is_empty() {
        return Err(LedgerError::InvalidAmount(raw.to_string()));
    }
    let value =
        Decimal::from_str(&cleaned).map_err(|_| LedgerError::InvalidAmount(raw.to_string()))?;
    if value.abs() > MAX_AMOUNT {
        return Err(LedgerError::AmountOutOfRange(raw.to_string()));
    }
    Ok(value)
}
