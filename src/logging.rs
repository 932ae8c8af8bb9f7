//! Debug log sink.
//!
//! The terminal is owned by the renderer, so diagnostics go to a file named by
//! `COMBO_TUI_WRITE_LOG` and are never written to stdout or stderr.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;
use crate::error::{Error, Result};

pub const LOG_FILTER_ENV: &str = "COMBO_TUI_LOG";

/// Filter used when `COMBO_TUI_LOG` is unset.
pub fn default_filter(config: &EnvConfig) -> &'static str {
    if config.debug {
        "combo_tui=trace"
    } else {
        "combo_tui=debug"
    }
}

/// Installs a file-backed `tracing` subscriber.
///
/// Returns `Ok(false)` without installing anything when no log file is configured.
pub fn init_debug_log(config: &EnvConfig) -> Result<bool> {
    let Some(path) = config.write_log.as_deref() else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::LogFile {
            path: path.to_string(),
            source,
        })?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| Error::LogInit(err.to_string()))?;

    tracing::debug!(path, "debug log initialized");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::{default_filter, init_debug_log};
    use crate::config::EnvConfig;
    use crate::error::Error;

    #[test]
    fn no_log_file_means_no_subscriber() {
        assert!(!init_debug_log(&EnvConfig::default()).expect("no-op init"));
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let config = EnvConfig {
            write_log: Some("/nonexistent-dir/combo_tui/debug.log".to_string()),
            ..EnvConfig::default()
        };
        let err = init_debug_log(&config).expect_err("missing directory");
        assert!(matches!(err, Error::LogFile { .. }));
    }

    #[test]
    fn debug_flag_raises_default_verbosity() {
        let config = EnvConfig {
            debug: true,
            ..EnvConfig::default()
        };
        assert_eq!(default_filter(&config), "combo_tui=trace");
        assert_eq!(default_filter(&EnvConfig::default()), "combo_tui=debug");
    }
}
