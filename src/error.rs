//! Crate error type for the fallible operations around the widgets.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    LogInit(String),

    #[error("invalid catalog payload: {0}")]
    Catalog(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
