use anyhow::{Context, Result};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{info, warn};

use super::write_atomically;
use crate::ledger::{parse_date, parse_decimal, DATE_FORMAT};
use crate::models::{NewTransaction, Transaction, TxnType};

pub(crate) const HEADER: [&str; 4] = ["Date", "Amount", "Type", "Description"];

/// A row that could not be turned into a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowError {
    /// 1-based line in the file.
    pub(crate) line: u64,
    pub(crate) reason: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

#[derive(Debug, Default)]
pub(crate) struct LoadOutcome {
    pub(crate) rows: Vec<NewTransaction>,
    pub(crate) skipped: Vec<RowError>,
    /// The file did not exist; `rows` is empty.
    pub(crate) missing: bool,
}

pub(crate) struct CsvStore;

impl CsvStore {
    /// Read every parseable row. Bad rows are collected into `skipped`
    /// and never abort the load. A missing file is an empty ledger.
    pub(crate) fn load(path: &Path) -> Result<LoadOutcome> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "ledger file not found, starting empty");
                return Ok(LoadOutcome {
                    missing: true,
                    ..LoadOutcome::default()
                });
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to open ledger file: {}", path.display()))
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(file);

        let headers = rdr
            .headers()
            .context("Failed to read ledger header")?
            .clone();
        if !header_matches(&headers) {
            warn!(
                path = %path.display(),
                found = ?headers.iter().collect::<Vec<_>>(),
                "unexpected ledger header, reading columns positionally"
            );
        }

        let mut outcome = LoadOutcome::default();
        for result in rdr.records() {
            match result {
                Ok(record) => {
                    let line = record.position().map_or(0, |p| p.line());
                    match parse_record(&record) {
                        Ok(row) => outcome.rows.push(row),
                        Err(reason) => outcome.skipped.push(RowError { line, reason }),
                    }
                }
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    outcome.skipped.push(RowError {
                        line,
                        reason: e.to_string(),
                    });
                }
            }
        }

        for skip in &outcome.skipped {
            info!(path = %path.display(), line = skip.line, reason = %skip.reason, "skipped ledger row");
        }
        info!(
            path = %path.display(),
            loaded = outcome.rows.len(),
            skipped = outcome.skipped.len(),
            "ledger loaded"
        );
        Ok(outcome)
    }

    /// Rewrite the whole file. On error the previous file is untouched.
    pub(crate) fn save(path: &Path, transactions: &[Transaction]) -> Result<usize> {
        write_atomically(path, |file| {
            let mut wtr = csv::Writer::from_writer(file);
            wtr.write_record(HEADER)
                .context("Failed to write ledger header")?;
            for txn in transactions {
                wtr.write_record([
                    txn.date.format(DATE_FORMAT).to_string(),
                    disk_amount(txn.abs_amount()),
                    txn.txn_type().as_str().to_string(),
                    txn.description.clone(),
                ])
                .with_context(|| format!("Failed to write transaction {}", txn.id))?;
            }
            wtr.flush().context("Failed to flush ledger file")?;
            Ok(())
        })
        .with_context(|| format!("Failed to save ledger: {}", path.display()))?;
        info!(path = %path.display(), count = transactions.len(), "ledger saved");
        Ok(transactions.len())
    }
}

fn header_matches(headers: &StringRecord) -> bool {
    headers.len() >= HEADER.len()
        && headers
            .iter()
            .zip(HEADER)
            .all(|(found, expected)| found.trim().eq_ignore_ascii_case(expected))
}

/// Turn one `Date,Amount,Type,Description` record into a signed
/// transaction. Fields past the fourth are taken to be an unquoted
/// description that contained commas.
fn parse_record(record: &StringRecord) -> std::result::Result<NewTransaction, String> {
    if record.len() < HEADER.len() {
        return Err(format!(
            "expected {} fields, found {}",
            HEADER.len(),
            record.len()
        ));
    }

    let date = parse_date(&record[0]).map_err(|e| e.to_string())?;
    let magnitude = parse_decimal(&record[1]).map_err(|e| e.to_string())?;
    if magnitude.is_sign_negative() && !magnitude.is_zero() {
        return Err(format!(
            "amount '{}' must be unsigned on disk; the type gives the direction",
            record[1].trim()
        ));
    }
    let txn_type = TxnType::parse(&record[2])
        .ok_or_else(|| format!("invalid type '{}': expected 'credit' or 'debit'", &record[2]))?;
    let description = record.iter().skip(3).collect::<Vec<_>>().join(",");

    Ok(NewTransaction {
        date,
        amount: txn_type.apply_sign(magnitude),
        description,
    })
}

/// Unsigned magnitude with at least two decimal places.
fn disk_amount(magnitude: Decimal) -> String {
    let mut m = magnitude;
    if m.scale() < 2 {
        m.rescale(2);
    }
    m.to_string()
}

#[cfg(test)]
#[path = "csv_store_tests.rs"]
mod tests;
