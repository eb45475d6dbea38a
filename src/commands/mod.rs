// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, PaymentMethod};
use crate::store::Store;
use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub mod backup;
pub mod budgets;
pub mod categories;
pub mod exporter;
pub mod goals;
pub mod payment_methods;
pub mod prefs;
pub mod reports;
pub mod templates;
pub mod transactions;

/// What every command handler gets to work with.
pub struct Context<'a> {
    pub store: &'a Store,
    pub snapshot_path: PathBuf,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a Store, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            snapshot_path: snapshot_path.into(),
        }
    }

    /// Keeps the month snapshot in step after a transaction changes.
    /// A failed write is logged, never fatal.
    pub fn refresh_snapshot(&self) {
        if let Err(err) = crate::snapshot::refresh(self.store, &self.snapshot_path) {
            tracing::warn!(path = %self.snapshot_path.display(), %err, "snapshot refresh failed");
        }
    }

    pub fn category(&self, name_or_id: &str) -> Result<Category> {
        self.store
            .find_category(name_or_id)?
            .ok_or_else(|| anyhow!("Unknown category '{}'", name_or_id))
    }

    pub fn payment_method(&self, name_or_id: &str) -> Result<PaymentMethod> {
        self.store
            .find_payment_method(name_or_id)?
            .ok_or_else(|| anyhow!("Unknown payment method '{}'", name_or_id))
    }
}

pub(crate) fn json_flags(m: &clap::ArgMatches) -> (bool, bool) {
    (m.get_flag("json"), m.get_flag("jsonl"))
}

/// `--month` when given, otherwise the current month.
pub(crate) fn month_or_current(m: &clap::ArgMatches) -> String {
    m.get_one::<String>("month")
        .cloned()
        .unwrap_or_else(|| crate::utils::MonthKey::current().to_string())
}
