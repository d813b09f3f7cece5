//! The module contains the errors the ledger can throw.
//!
//! The errors are:
//!
//! - [`Storage`] thrown when a backing document is unreadable or invalid.
//! - [`NotFound`] thrown when a member or year is not found.
//! - [`Capacity`] thrown when all subscription slots are taken.
//!
//!  [`Storage`]: LedgerError::Storage
//!  [`NotFound`]: LedgerError::NotFound
//!  [`Capacity`]: LedgerError::Capacity
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("\"{0}\" already present!")]
    Duplicate(String),
    #[error("No free slots: {0}")]
    Capacity(String),
    #[error("Invalid settings: {0}")]
    Configuration(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid member name: {0}")]
    InvalidName(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(String),
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
