use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TxnType {
    Credit,
    Debit,
}

impl TxnType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }

    /// Sign a magnitude: credits are positive, debits negative.
    pub(crate) fn apply_sign(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount.abs(),
            Self::Debit => -amount.abs(),
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction that has been validated but not yet given an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewTransaction {
    pub(crate) date: NaiveDate,
    pub(crate) amount: Decimal,
    pub(crate) description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transaction {
    pub(crate) id: u64,
    pub(crate) date: NaiveDate,
    /// Signed: negative is money out, positive is money in.
    pub(crate) amount: Decimal,
    pub(crate) description: String,
}

impl Transaction {
    pub(crate) fn from_new(id: u64, new: NewTransaction) -> Self {
        Self {
            id,
            date: new.date,
            amount: new.amount,
            description: new.description,
        }
    }

    pub(crate) fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub(crate) fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub(crate) fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    pub(crate) fn txn_type(&self) -> TxnType {
        if self.is_debit() {
            TxnType::Debit
        } else {
            TxnType::Credit
        }
    }

    /// Grouping key used by the analysis: the description, lowercased and
    /// otherwise untouched.
    pub(crate) fn category_key(&self) -> String {
        self.description.to_lowercase()
    }
}
