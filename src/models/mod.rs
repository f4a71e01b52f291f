mod transaction;

pub(crate) use transaction::{NewTransaction, Transaction, TxnType};
