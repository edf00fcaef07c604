//! Tracing setup
//!
//! The terminal belongs to the UI, so log output goes to a file. Filtering
//! follows `LUX_WIDGET_LOG` (same syntax as `RUST_LOG`), defaulting to `info`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LUX_WIDGET_LOG";

/// Install a file-backed subscriber
///
/// Returns `false` when the log file cannot be opened or a global subscriber
/// is already installed; the widget then runs without logging.
pub fn init_file_tracing(path: &Path) -> bool {
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return false;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
