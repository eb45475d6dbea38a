// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The record store: canonical entity collections behind one SQLite connection.
//!
//! Reads go straight to the connection. Every mutation runs inside
//! [`Store::write`], which commits before returning or rolls back when the
//! closure fails, so no reader ever sees half of a change.

use crate::db;
use crate::error::{LedgerError, Result};
use crate::models::{
    Budget, Category, Goal, PaymentMethod, Preferences, Template, Transaction,
};
use crate::utils::{normalize_currency, MonthKey};
use chrono::{NaiveDateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::Path;
use uuid::Uuid;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::debug!(path = %path.display(), "opened ledger database");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        db::init_schema(&conn)?;
        let store = Self { conn };
        if store.write(|c| Ok(db::seed_if_needed(c)?))? {
            tracing::info!("seeded default categories, payment methods and templates");
        }
        Ok(store)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Runs `f` inside one SQLite transaction.
    pub fn write<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    // ── transactions ───────────────────────────────────────────

    pub fn create_transaction(&self, tx: &Transaction) -> Result<()> {
        validate_transaction(tx)?;
        let mut tx = tx.clone();
        tx.currency = normalize_currency(&tx.currency)?;
        self.write(|c| Ok(db::insert_transaction(c, &tx)?))?;
        tracing::debug!(id = %tx.id, amount = %tx.amount, "created transaction");
        Ok(())
    }

    pub fn transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        Ok(db::transaction_by_id(&self.conn, id)?)
    }

    /// All transactions, newest first.
    pub fn all_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(db::select_transactions(&self.conn, None, None, None)?)
    }

    /// Persists an edit and refreshes `updated_at` on the caller's copy.
    pub fn update_transaction(&self, tx: &mut Transaction) -> Result<()> {
        validate_transaction(tx)?;
        tx.currency = normalize_currency(&tx.currency)?;
        tx.updated_at = Utc::now();
        let changed = self.write(|c| Ok(db::update_transaction(c, tx)?))?;
        if changed == 0 {
            return Err(LedgerError::not_found("transaction", tx.id));
        }
        Ok(())
    }

    pub fn delete_transaction(&self, id: Uuid) -> Result<()> {
        let removed = self.write(|c| Ok(db::delete_transaction(c, id)?))?;
        if removed == 0 {
            return Err(LedgerError::not_found("transaction", id));
        }
        Ok(())
    }

    /// Copies a transaction under a fresh id, dated `at`.
    pub fn duplicate_transaction(&self, id: Uuid, at: NaiveDateTime) -> Result<Transaction> {
        let source = self
            .transaction(id)?
            .ok_or_else(|| LedgerError::not_found("transaction", id))?;
        let mut copy = Transaction::new(
            source.r#type,
            source.amount,
            &source.currency,
            source.category_id,
            at,
        )
        .with_note(source.note)
        .with_tags(source.tags);
        copy.payment_method_id = source.payment_method_id;
        self.create_transaction(&copy)?;
        Ok(copy)
    }

    // ── categories ─────────────────────────────────────────────

    pub fn create_category(&self, category: &Category) -> Result<()> {
        require_name(&category.name, "category")?;
        self.write(|c| Ok(db::insert_category(c, category)?))
    }

    pub fn category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(db::category_by_id(&self.conn, id)?)
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        Ok(db::all_categories(&self.conn)?)
    }

    pub fn update_category(&self, category: &Category) -> Result<()> {
        require_name(&category.name, "category")?;
        let changed = self.write(|c| Ok(db::update_category(c, category)?))?;
        if changed == 0 {
            return Err(LedgerError::not_found("category", category.id));
        }
        Ok(())
    }

    /// Transactions, budgets and templates that point at the category are left in place.
    pub fn delete_category(&self, id: Uuid) -> Result<()> {
        let category = self
            .category(id)?
            .ok_or_else(|| LedgerError::not_found("category", id))?;
        if category.is_system {
            return Err(LedgerError::validation(format!(
                "'{}' is a system category and cannot be deleted",
                category.name
            )));
        }
        self.write(|c| Ok(db::delete_category(c, id)?))?;
        Ok(())
    }

    pub fn category_name(&self, id: Uuid) -> Result<String> {
        Ok(self
            .category(id)?
            .map(|c| c.name)
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()))
    }

    /// Case-insensitive lookup by name, falling back to parsing an id.
    pub fn find_category(&self, name_or_id: &str) -> Result<Option<Category>> {
        let needle = name_or_id.trim();
        let cats = self.categories()?;
        if let Some(c) = cats.iter().find(|c| c.name.eq_ignore_ascii_case(needle)) {
            return Ok(Some(c.clone()));
        }
        Ok(Uuid::parse_str(needle)
            .ok()
            .and_then(|id| cats.into_iter().find(|c| c.id == id)))
    }

    // ── payment methods ────────────────────────────────────────

    pub fn create_payment_method(&self, pm: &PaymentMethod) -> Result<()> {
        require_name(&pm.name, "payment method")?;
        self.write(|c| Ok(db::insert_payment_method(c, pm)?))
    }

    pub fn payment_method(&self, id: Uuid) -> Result<Option<PaymentMethod>> {
        Ok(db::payment_method_by_id(&self.conn, id)?)
    }

    pub fn payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        Ok(db::all_payment_methods(&self.conn)?)
    }

    pub fn update_payment_method(&self, pm: &PaymentMethod) -> Result<()> {
        require_name(&pm.name, "payment method")?;
        let changed = self.write(|c| Ok(db::update_payment_method(c, pm)?))?;
        if changed == 0 {
            return Err(LedgerError::not_found("payment method", pm.id));
        }
        Ok(())
    }

    pub fn delete_payment_method(&self, id: Uuid) -> Result<()> {
        let removed = self.write(|c| Ok(db::delete_payment_method(c, id)?))?;
        if removed == 0 {
            return Err(LedgerError::not_found("payment method", id));
        }
        Ok(())
    }

    /// Empty when unset or when the payment method no longer exists.
    pub fn payment_method_name(&self, id: Option<Uuid>) -> Result<String> {
        let Some(id) = id else {
            return Ok(String::new());
        };
        Ok(self.payment_method(id)?.map(|pm| pm.name).unwrap_or_default())
    }

    pub fn find_payment_method(&self, name_or_id: &str) -> Result<Option<PaymentMethod>> {
        let needle = name_or_id.trim();
        let pms = self.payment_methods()?;
        if let Some(pm) = pms.iter().find(|pm| pm.name.eq_ignore_ascii_case(needle)) {
            return Ok(Some(pm.clone()));
        }
        Ok(Uuid::parse_str(needle)
            .ok()
            .and_then(|id| pms.into_iter().find(|pm| pm.id == id)))
    }

    // ── budgets ────────────────────────────────────────────────

    pub fn budget(&self, category_id: Uuid, month: &MonthKey) -> Result<Option<Budget>> {
        Ok(db::budget_for(&self.conn, category_id, &month.to_string())?)
    }

    pub fn budgets_for_month(&self, month: &MonthKey) -> Result<Vec<Budget>> {
        Ok(db::budgets_for_month(&self.conn, &month.to_string())?)
    }

    pub fn budgets(&self) -> Result<Vec<Budget>> {
        Ok(db::all_budgets(&self.conn)?)
    }

    pub fn delete_budget(&self, id: Uuid) -> Result<()> {
        let removed = self.write(|c| Ok(db::delete_budget(c, id)?))?;
        if removed == 0 {
            return Err(LedgerError::not_found("budget", id));
        }
        Ok(())
    }

    // ── goals ──────────────────────────────────────────────────

    pub fn create_goal(&self, goal: &Goal) -> Result<()> {
        require_name(&goal.name, "goal")?;
        require_positive(goal.target_amount, "goal target")?;
        self.write(|c| Ok(db::insert_goal(c, goal)?))
    }

    pub fn goal(&self, id: Uuid) -> Result<Option<Goal>> {
        Ok(db::goal_by_id(&self.conn, id)?)
    }

    pub fn goals(&self) -> Result<Vec<Goal>> {
        Ok(db::all_goals(&self.conn)?)
    }

    pub fn update_goal(&self, goal: &Goal) -> Result<()> {
        require_name(&goal.name, "goal")?;
        require_positive(goal.target_amount, "goal target")?;
        let changed = self.write(|c| Ok(db::update_goal(c, goal)?))?;
        if changed == 0 {
            return Err(LedgerError::not_found("goal", goal.id));
        }
        Ok(())
    }

    /// Saved amounts only ever grow through this call.
    pub fn add_to_goal(&self, id: Uuid, amount: Decimal) -> Result<Goal> {
        require_positive(amount, "goal contribution")?;
        self.write(|c| {
            let mut goal =
                db::goal_by_id(c, id)?.ok_or_else(|| LedgerError::not_found("goal", id))?;
            goal.current_amount += amount;
            db::update_goal(c, &goal)?;
            Ok(goal)
        })
    }

    pub fn delete_goal(&self, id: Uuid) -> Result<()> {
        let removed = self.write(|c| Ok(db::delete_goal(c, id)?))?;
        if removed == 0 {
            return Err(LedgerError::not_found("goal", id));
        }
        Ok(())
    }

    // ── templates ──────────────────────────────────────────────

    pub fn create_template(&self, template: &Template) -> Result<()> {
        require_name(&template.name, "template")?;
        require_positive(template.amount, "template amount")?;
        self.write(|c| Ok(db::insert_template(c, template)?))
    }

    pub fn template(&self, id: Uuid) -> Result<Option<Template>> {
        Ok(db::template_by_id(&self.conn, id)?)
    }

    pub fn templates(&self) -> Result<Vec<Template>> {
        Ok(db::all_templates(&self.conn)?)
    }

    pub fn update_template(&self, template: &Template) -> Result<()> {
        require_name(&template.name, "template")?;
        require_positive(template.amount, "template amount")?;
        let changed = self.write(|c| Ok(db::update_template(c, template)?))?;
        if changed == 0 {
            return Err(LedgerError::not_found("template", template.id));
        }
        Ok(())
    }

    pub fn delete_template(&self, id: Uuid) -> Result<()> {
        let removed = self.write(|c| Ok(db::delete_template(c, id)?))?;
        if removed == 0 {
            return Err(LedgerError::not_found("template", id));
        }
        Ok(())
    }

    /// Stamps out a new transaction from a template, in the preferred currency.
    pub fn stamp_template(&self, id: Uuid, at: NaiveDateTime) -> Result<Transaction> {
        let template = self
            .template(id)?
            .ok_or_else(|| LedgerError::not_found("template", id))?;
        let prefs = self.preferences()?;
        let mut tx = Transaction::new(
            template.r#type,
            template.amount,
            &prefs.currency,
            template.category_id,
            at,
        )
        .with_note(template.name.clone());
        tx.payment_method_id = template.payment_method_id;
        tx.template_id = Some(template.id);
        self.create_transaction(&tx)?;
        Ok(tx)
    }

    // ── preferences ────────────────────────────────────────────

    pub fn preferences(&self) -> Result<Preferences> {
        Ok(db::load_preferences(&self.conn)?.unwrap_or_default())
    }

    pub fn update_preferences(&self, prefs: &Preferences) -> Result<()> {
        let mut prefs = prefs.clone();
        prefs.currency = normalize_currency(&prefs.currency)?;
        self.write(|c| Ok(db::save_preferences(c, &prefs)?))
    }

    /// Wipes every record, preferences included, and seeds the defaults again.
    pub fn reset_all(&self) -> Result<()> {
        self.write(|c| {
            db::wipe_all(c)?;
            db::seed_defaults(c)?;
            Ok(())
        })?;
        tracing::info!("ledger reset to seed data");
        Ok(())
    }
}

fn validate_transaction(tx: &Transaction) -> Result<()> {
    require_positive(tx.amount, "transaction amount")
}

pub(crate) fn require_positive(amount: Decimal, what: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "{} must be positive, got {}",
            what, amount
        )));
    }
    Ok(())
}

pub(crate) fn require_non_negative(amount: Decimal, what: &str) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "{} cannot be negative, got {}",
            what, amount
        )));
    }
    Ok(())
}

pub(crate) fn require_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::validation(format!("{} name is required", what)));
    }
    Ok(())
}
