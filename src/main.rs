mod analysis;
mod config;
mod error;
mod format;
mod ledger;
mod logging;
mod models;
mod report;
mod run;
mod storage;

use anyhow::Result;
use tracing::debug;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, rest) = config::Config::resolve(&args, |key| std::env::var(key).ok())?;
    logging::init(&config.log_dir);
    debug!(?config, "configuration resolved");

    if rest.is_empty() {
        run::as_menu(&config)
    } else {
        run::as_cli(&rest, &config)
    }
}
