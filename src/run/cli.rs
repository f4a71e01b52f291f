use anyhow::Result;
use chrono::Local;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::analysis::{analyze, render, NOTHING_TO_ANALYZE};
use crate::config::{shellexpand, Config};
use crate::ledger::Ledger;
use crate::report::{build_report, write_report};
use crate::storage::CsvStore;

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_command(args, config, &mut out)
}

fn run_command<W: Write>(args: &[String], config: &Config, out: &mut W) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage(out)?;
        return Ok(());
    };
    info!(command = command.as_str(), "running command");
    match command.as_str() {
        "list" | "ls" => cli_list(config, out),
        "analyze" => cli_analyze(config, out),
        "report" => cli_report(&args[1..], config, out),
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "finledger {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "finledger - personal finance ledger and analyzer")?;
    writeln!(out)?;
    writeln!(out, "Usage: finledger [options] [command]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  (none)                        Start the interactive menu")?;
    writeln!(out, "  list                          Print the ledger")?;
    writeln!(out, "  analyze                       Print the financial analysis")?;
    writeln!(out, "  report [path]                 Write the report (default: --report path)")?;
    writeln!(out, "  --help, -h                    Show this help")?;
    writeln!(out, "  --version, -V                 Show version")?;
    writeln!(out)?;
    writeln!(out, "Options:")?;
    writeln!(out, "  --file, -f <path>             Ledger CSV (env FINLEDGER_FILE)")?;
    writeln!(out, "  --report, -r <path>           Report file (env FINLEDGER_REPORT)")?;
    writeln!(out, "  --log-dir <path>              Log directory (env FINLEDGER_LOG_DIR)")?;
    Ok(())
}

/// Load the configured ledger file, echoing skipped rows to stderr.
fn load_ledger(config: &Config) -> Result<Ledger> {
    let outcome = CsvStore::load(&config.ledger_path)?;
    if outcome.missing {
        eprintln!(
            "Warning: no transaction file at {}",
            config.ledger_path.display()
        );
    }
    for skip in &outcome.skipped {
        eprintln!("Warning: skipped {skip}");
    }
    let mut ledger = Ledger::new();
    ledger.replace_all(outcome.rows);
    Ok(ledger)
}

fn cli_list<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let ledger = load_ledger(config)?;
    if ledger.is_empty() {
        writeln!(out, "No transactions")?;
        return Ok(());
    }
    writeln!(
        out,
        "{}",
        crate::format::transaction_table(ledger.list(), true)
    )?;
    writeln!(out, "Total transactions: {}", ledger.len())?;
    Ok(())
}

fn cli_analyze<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let ledger = load_ledger(config)?;
    match analyze(ledger.list()) {
        Some(analysis) => writeln!(out, "{}", render(&analysis))?,
        None => writeln!(out, "{NOTHING_TO_ANALYZE}")?,
    }
    Ok(())
}

fn cli_report<W: Write>(args: &[String], config: &Config, out: &mut W) -> Result<()> {
    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| config.report_path.clone());

    let ledger = load_ledger(config)?;
    let now = Local::now().naive_local();
    let text = build_report(ledger.list(), now.date(), now);
    write_report(&path, &text)?;
    writeln!(
        out,
        "Report for {} transactions written to {}",
        ledger.len(),
        path.display()
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
