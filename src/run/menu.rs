use anyhow::{Context, Result};
use chrono::Local;
use std::io::{BufRead, Write};
use tracing::{debug, error, info};

use crate::analysis::{analyze, render, Totals, NOTHING_TO_ANALYZE};
use crate::config::Config;
use crate::error::LedgerError;
use crate::format::{format_amount, transaction_table};
use crate::ledger::{parse_date, parse_position, Ledger, TransactionInput};
use crate::report::{build_report, write_report};
use crate::storage::CsvStore;

const UNSAVED_NOTE: &str =
    "Note: Changes are not saved to file until you choose option 7 (Save Transactions)";

const MENU: &str = "\nSmart Personal Finance Analyzer\n\
1. Load Transactions\n\
2. Add Transaction\n\
3. View Transactions\n\
4. Update Transaction\n\
5. Delete Transaction\n\
6. Analyze Finances\n\
7. Save Transactions\n\
8. Generate Report\n\
9. Exit";

/// Run the interactive menu on the process's stdin/stdout.
pub(crate) fn as_menu(config: &Config) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), config.clone());
    session.run()
}

/// One interactive session: owns the ledger and talks over any
/// reader/writer pair.
pub(crate) struct Session<R, W> {
    input: R,
    out: W,
    config: Config,
    ledger: Ledger,
    /// In-memory changes not yet written by option 7.
    dirty: bool,
}

enum Flow {
    Continue,
    Exit,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub(crate) fn new(input: R, out: W, config: Config) -> Self {
        Self {
            input,
            out,
            config,
            ledger: Ledger::new(),
            dirty: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[cfg(test)]
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.out
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        info!(ledger = %self.config.ledger_path.display(), "session started");
        loop {
            writeln!(self.out, "{MENU}")?;
            let Some(choice) = self.read_line("Select an option: ")? else {
                self.warn_unsaved()?;
                break;
            };
            match self.dispatch(choice.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => {
                    error!(error = %format!("{e:#}"), choice = choice.trim(), "action failed");
                    writeln!(self.out, "\nError: {e:#}")?;
                }
            }
        }
        info!("session ended");
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.load()?,
            "2" => self.add()?,
            "3" => self.view()?,
            "4" => self.update()?,
            "5" => self.delete()?,
            "6" => self.analyze()?,
            "7" => self.save()?,
            "8" => self.generate_report()?,
            "9" => {
                self.warn_unsaved()?;
                writeln!(self.out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
            _ => writeln!(self.out, "Invalid choice. Please try again.")?,
        }
        Ok(Flow::Continue)
    }

    // ── Actions ───────────────────────────────────────────────

    fn load(&mut self) -> Result<()> {
        if self.dirty {
            writeln!(self.out, "\nDiscarding unsaved changes.")?;
        }
        let outcome = CsvStore::load(&self.config.ledger_path)?;
        if outcome.missing {
            writeln!(
                self.out,
                "\nNo transaction file found at {}. Starting with an empty list.",
                self.config.ledger_path.display()
            )?;
        }
        for skip in &outcome.skipped {
            writeln!(self.out, "Skipped {skip}")?;
        }
        let count = self.ledger.replace_all(outcome.rows);
        self.dirty = false;
        debug!(count, next_id = self.ledger.next_id(), "ledger replaced from file");

        if self.ledger.is_empty() {
            if !outcome.missing {
                writeln!(self.out, "\nNo transactions found in the file.")?;
            }
            return Ok(());
        }
        writeln!(self.out, "\nLoaded Transactions:")?;
        writeln!(self.out, "{}", transaction_table(self.ledger.list(), false))?;
        writeln!(self.out, "Total transactions loaded: {count}")?;
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        writeln!(self.out, "\nAdding new transaction...")?;
        let Some(input) = self.prompt_transaction("Enter date (format: 2024-03-20): ")? else {
            return Ok(());
        };
        match self.ledger.add(&input) {
            Ok(id) => {
                self.dirty = true;
                if let Some(txn) = self.ledger.list().last() {
                    writeln!(
                        self.out,
                        "\nTransaction added: {} - {} - {} (id {id})",
                        txn.date.format("%Y-%m-%d"),
                        format_amount(txn.amount),
                        txn.description
                    )?;
                }
                let totals = Totals::of(self.ledger.list());
                writeln!(self.out, "Total transactions: {}", totals.count)?;
                writeln!(self.out, "Total debits: {}", format_amount(totals.debits))?;
                writeln!(self.out, "Total credits: {}", format_amount(totals.credits))?;
                writeln!(self.out, "\n{UNSAVED_NOTE}")?;
            }
            Err(e) => self.report_invalid(&e)?,
        }
        Ok(())
    }

    fn view(&mut self) -> Result<()> {
        if self.ledger.is_empty() {
            writeln!(
                self.out,
                "\nNo transactions loaded. Please select option 1 to load transactions first."
            )?;
            return Ok(());
        }
        writeln!(self.out, "\nTransaction List:")?;
        writeln!(self.out, "{}", transaction_table(self.ledger.list(), false))?;
        writeln!(self.out, "Total transactions: {}", self.ledger.len())?;
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let Some(position) = self.pick_position("update")? else {
            return Ok(());
        };
        let Some(input) = self.prompt_transaction("Enter new date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        match self.ledger.update(position, &input).map(|txn| txn.id) {
            Ok(id) => {
                self.dirty = true;
                writeln!(self.out, "\nTransaction {id} updated successfully!")?;
                writeln!(self.out, "{UNSAVED_NOTE}")?;
            }
            Err(e) => self.report_invalid(&e)?,
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(position) = self.pick_position("delete")? else {
            return Ok(());
        };
        match self.ledger.remove(position) {
            Ok(removed) => {
                self.dirty = true;
                writeln!(
                    self.out,
                    "\nTransaction deleted: {} - {} - {}",
                    removed.date.format("%Y-%m-%d"),
                    format_amount(removed.amount),
                    removed.description
                )?;
                writeln!(self.out, "{UNSAVED_NOTE}")?;
            }
            Err(e) => self.report_invalid(&e)?,
        }
        Ok(())
    }

    fn analyze(&mut self) -> Result<()> {
        match analyze(self.ledger.list()) {
            Some(analysis) => writeln!(self.out, "{}", render(&analysis))?,
            None => writeln!(self.out, "\n{NOTHING_TO_ANALYZE}")?,
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let count = CsvStore::save(&self.config.ledger_path, self.ledger.list())?;
        self.dirty = false;
        writeln!(self.out, "\nTransactions saved successfully!")?;
        writeln!(self.out, "Total transactions saved: {count}")?;

        let now = Local::now().naive_local();
        let text = build_report(self.ledger.list(), now.date(), now);
        match write_report(&self.config.report_path, &text) {
            Ok(()) => writeln!(
                self.out,
                "Report generated in {}",
                self.config.report_path.display()
            )?,
            Err(e) => {
                info!(error = %format!("{e:#}"), "report not written after save");
                writeln!(self.out, "Report could not be written: {e:#}")?;
            }
        }
        Ok(())
    }

    fn generate_report(&mut self) -> Result<()> {
        let now = Local::now().naive_local();
        let text = build_report(self.ledger.list(), now.date(), now);
        write_report(&self.config.report_path, &text)?;
        writeln!(self.out, "\n{text}")?;
        writeln!(
            self.out,
            "Report written to {}",
            self.config.report_path.display()
        )?;
        Ok(())
    }

    // ── Prompts ───────────────────────────────────────────────

    /// Print `label`, read one line. `None` once input is exhausted.
    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn require_line(&mut self, label: &str) -> Result<String> {
        self.read_line(label)?
            .ok_or_else(|| anyhow::anyhow!("input ended before the operation finished"))
    }

    /// Ask for all four fields. The date is checked as soon as it is
    /// entered so a bad date doesn't make the user type the rest.
    fn prompt_transaction(&mut self, date_label: &str) -> Result<Option<TransactionInput>> {
        let date = self.require_line(date_label)?;
        if let Err(e) = parse_date(&date) {
            self.report_invalid(&e)?;
            return Ok(None);
        }
        let amount = self.require_line("Enter amount: ")?;
        let txn_type = self.require_line("Enter type (credit/debit, blank to use the amount's sign): ")?;
        let description = self.require_line("Enter description: ")?;
        Ok(Some(TransactionInput {
            date,
            amount,
            txn_type: Some(txn_type).filter(|t| !t.trim().is_empty()),
            description,
        }))
    }

    /// Show the indexed table and read a valid position.
    fn pick_position(&mut self, verb: &str) -> Result<Option<i64>> {
        if self.ledger.is_empty() {
            writeln!(
                self.out,
                "\nNo transactions to {verb}. Please add some transactions first."
            )?;
            return Ok(None);
        }
        writeln!(self.out, "\nCurrent Transactions:")?;
        writeln!(self.out, "{}", transaction_table(self.ledger.list(), true))?;
        let raw = self.require_line(&format!("\nEnter the index of the transaction to {verb}: "))?;
        let checked = parse_position(&raw).and_then(|p| self.ledger.get(p).map(|_| p));
        match checked {
            Ok(p) => Ok(Some(p)),
            Err(e) => {
                self.report_invalid(&e)?;
                Ok(None)
            }
        }
    }

    fn report_invalid(&mut self, e: &LedgerError) -> Result<()> {
        debug!(error = %e, "rejected input");
        writeln!(self.out, "Error: {e}")?;
        Ok(())
    }

    fn warn_unsaved(&mut self) -> Result<()> {
        if self.dirty {
            writeln!(
                self.out,
                "Warning: you have unsaved changes that were not written to {}.",
                self.config.ledger_path.display()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "menu_tests.rs"]
mod tests;
