//! Error type shared by the whole public API.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("missing XML node: {0}")]
    MissingNode(String),

    #[error("{} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("journal was not read from a path, cannot save")]
    NoAssociatedPath,

    #[error("unknown locale for ledger options: {0}, supported are en, de")]
    UnsupportedLocale(String),

    #[error("malformed amount: '{0}'")]
    MalformedAmount(String),

    #[error("malformed date: '{0}'")]
    MalformedDate(String),

    #[error("invalid date format pattern: '{0}'")]
    InvalidDateFormat(String),

    #[error("posting currency {posting} doesn't match assignment currency {assignment}")]
    CurrencyMismatch { posting: String, assignment: String },

    #[error("unknown transaction state: '{0}'")]
    UnknownState(String),

    #[error("ledger invocation failed: {message}: {stderr}")]
    EngineInvocation { message: String, stderr: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
