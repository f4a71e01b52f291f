use anyhow::Result;
use std::path::PathBuf;

pub(crate) const DEFAULT_LEDGER_FILE: &str = "financial_transactions.csv";
pub(crate) const DEFAULT_REPORT_FILE: &str = "report.txt";

pub(crate) const ENV_LEDGER_FILE: &str = "FINLEDGER_FILE";
pub(crate) const ENV_REPORT_FILE: &str = "FINLEDGER_REPORT";
pub(crate) const ENV_LOG_DIR: &str = "FINLEDGER_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) ledger_path: PathBuf,
    pub(crate) report_path: PathBuf,
    pub(crate) log_dir: PathBuf,
}

impl Config {
    /// Resolve settings from command-line flags, then environment, then
    /// defaults. Returns the config and the arguments left once the flags
    /// have been removed (the command and its operands).
    pub(crate) fn resolve<F>(args: &[String], env: F) -> Result<(Self, Vec<String>)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ledger = None;
        let mut report = None;
        let mut log_dir = None;
        let mut rest = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let slot = match arg.as_str() {
                "--file" | "-f" => &mut ledger,
                "--report" | "-r" => &mut report,
                "--log-dir" => &mut log_dir,
                _ => {
                    rest.push(arg.clone());
                    continue;
                }
            };
            let value = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("{arg} requires a path"))?;
            *slot = Some(value.clone());
        }

        let pick = |flag: Option<String>, var: &str| flag.or_else(|| env(var).filter(|v| !v.is_empty()));

        let config = Self {
            ledger_path: pick(ledger, ENV_LEDGER_FILE)
                .map(|p| PathBuf::from(shellexpand(&p)))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_FILE)),
            report_path: pick(report, ENV_REPORT_FILE)
                .map(|p| PathBuf::from(shellexpand(&p)))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE)),
            log_dir: pick(log_dir, ENV_LOG_DIR)
                .map(|p| PathBuf::from(shellexpand(&p)))
                .unwrap_or_else(default_log_dir),
        };
        Ok((config, rest))
    }
}

fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "finledger", "finledger")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
