use chrono::Local;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console verbosity is controlled by this variable; defaults to `warn`
/// so the menu output stays readable.
pub(crate) const ENV_LOG_FILTER: &str = "FINLEDGER_LOG";

/// `finledger_YYYY-MM-DD.log`: one file per day, appended to.
pub(crate) fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!(
        "finledger_{}.log",
        Local::now().format("%Y-%m-%d")
    ))
}

/// Install the global subscriber: stderr filtered by `FINLEDGER_LOG`, plus
/// a debug-level file in `log_dir`. If the file can't be opened, logging
/// continues on stderr alone.
pub(crate) fn init(log_dir: &Path) {
    let console_filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let (file_layer, file_error) = match open_log_file(log_dir) {
        Ok(file) => {
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    let installed = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .is_ok();

    if let (true, Some(e)) = (installed, file_error) {
        warn!(dir = %log_dir.display(), error = %e, "file logging disabled");
    }
}

fn open_log_file(log_dir: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(log_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(log_dir))
}
