// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors surfaced by the ledger engine.
//!
//! - [`Validation`] for bad month keys, blank names and non-positive amounts.
//! - [`NotFound`] when a mutation targets a record that does not exist.
//! - [`UnsupportedVersion`] and [`Decode`] abort a backup import untouched.
//! - [`Storage`] wraps SQLite failures; the engine never retries.
//!
//! [`Validation`]: LedgerError::Validation
//! [`NotFound`]: LedgerError::NotFound
//! [`UnsupportedVersion`]: LedgerError::UnsupportedVersion
//! [`Decode`]: LedgerError::Decode
//! [`Storage`]: LedgerError::Storage
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
    #[error("unsupported backup version {0}")]
    UnsupportedVersion(i64),
    #[error("could not decode backup: {0}")]
    Decode(String),
    #[error("could not encode export: {0}")]
    Encode(String),
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Decode(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        LedgerError::Encode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
