// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month summary for display surfaces that must not open the live database.
//!
//! Readers poll the last file written by [`write_snapshot`]; the file is only
//! ever replaced whole.

use crate::error::{LedgerError, Result};
use crate::query::{net, total_expense, total_income, TransactionQuery};
use crate::store::Store;
use crate::utils::MonthKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSnapshot {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
    pub currency_code: String,
}

pub fn month_snapshot(store: &Store, month_key: &str) -> Result<MonthSnapshot> {
    let month = MonthKey::parse(month_key)?;
    let txs = TransactionQuery::new(store).in_month(&month, None)?;
    Ok(MonthSnapshot {
        month: month.to_string(),
        income: total_income(&txs),
        expense: total_expense(&txs),
        net: net(&txs),
        currency_code: store.preferences()?.currency,
    })
}

pub fn current_snapshot(store: &Store) -> Result<MonthSnapshot> {
    month_snapshot(store, &MonthKey::current().to_string())
}

/// Writes next to the target and renames over it.
pub fn write_snapshot(snapshot: &MonthSnapshot, path: &Path) -> Result<()> {
    let body = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| LedgerError::Encode(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), month = %snapshot.month, "snapshot refreshed");
    Ok(())
}

/// Last snapshot written, if any.
pub fn read_snapshot(path: &Path) -> Result<Option<MonthSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let body = fs::read(path)?;
    Ok(Some(serde_json::from_slice(&body)?))
}

/// Recomputes the current month and replaces the snapshot file.
pub fn refresh(store: &Store, path: &Path) -> Result<MonthSnapshot> {
    let snapshot = current_snapshot(store)?;
    write_snapshot(&snapshot, path)?;
    Ok(snapshot)
}
