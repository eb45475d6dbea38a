// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite schema, seed data and row-level statements.
//!
//! Everything here works on a plain `&Connection` so the same statements run
//! against the live connection and inside an open `rusqlite::Transaction`.

use crate::models::{
    Budget, Category, Goal, PaymentMethod, Preferences, Template, Theme, Transaction,
    TransactionType,
};
use chrono::{NaiveDateTime, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use rust_decimal::Decimal;
use uuid::Uuid;

pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Groceries", "cart.fill", "green"),
    ("Transport", "car.fill", "blue"),
    ("Coffee", "cup.and.saucer.fill", "brown"),
    ("Rent", "house.fill", "indigo"),
    ("Health", "heart.fill", "red"),
    ("Shopping", "bag.fill", "purple"),
    ("Entertainment", "ticket.fill", "orange"),
    ("Education", "book.fill", "teal"),
    ("Travel", "airplane", "cyan"),
    ("Bills", "doc.text.fill", "gray"),
    ("Salary", "banknote.fill", "green"),
    ("Freelance", "laptopcomputer", "blue"),
    ("Other", "ellipsis.circle.fill", "gray"),
];

pub const DEFAULT_PAYMENT_METHODS: &[(&str, &str)] = &[
    ("Cash", "banknote"),
    ("Card", "creditcard"),
    ("Transfer", "arrow.left.arrow.right"),
];

// (name, type, amount in cents, index into DEFAULT_CATEGORIES)
const DEFAULT_TEMPLATES: &[(&str, TransactionType, i64, usize)] = &[
    ("Coffee", TransactionType::Expense, 500, 2),
    ("Taxi", TransactionType::Expense, 1500, 1),
    ("Groceries", TransactionType::Expense, 5000, 0),
    ("Salary", TransactionType::Income, 300000, 10),
];

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS categories(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        icon TEXT NOT NULL,
        color TEXT NOT NULL,
        is_system INTEGER NOT NULL DEFAULT 0,
        sort_order INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS payment_methods(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        icon TEXT NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0
    );

    -- references are plain ids: deleting a category or payment method leaves them dangling
    CREATE TABLE IF NOT EXISTS transactions(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL CHECK(type IN ('expense','income')),
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        category_id TEXT NOT NULL,
        date TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        payment_method_id TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        template_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    -- one row per (category_id, month) is kept by the upsert path, not by a constraint
    CREATE TABLE IF NOT EXISTS budgets(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        category_id TEXT NOT NULL,
        month TEXT NOT NULL,
        limit_amount TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_budgets_month ON budgets(month, category_id);

    CREATE TABLE IF NOT EXISTS goals(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        target_amount TEXT NOT NULL,
        target_date TEXT NOT NULL,
        current_amount TEXT NOT NULL DEFAULT '0',
        sort_order INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS templates(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('expense','income')),
        amount TEXT NOT NULL,
        category_id TEXT NOT NULL,
        payment_method_id TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS preferences(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        currency TEXT NOT NULL,
        reminders_enabled INTEGER NOT NULL,
        reminder_time TEXT NOT NULL,
        haptics_enabled INTEGER NOT NULL,
        theme TEXT NOT NULL,
        budgets_enabled INTEGER NOT NULL,
        onboarding_completed INTEGER NOT NULL
    );
    "#,
    )
}

/// Seeds system categories, payment methods, templates and preferences on a fresh store.
pub fn seed_if_needed(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(false);
    }
    seed_defaults(conn)?;
    Ok(true)
}

pub fn seed_defaults(conn: &Connection) -> rusqlite::Result<()> {
    let mut category_ids = Vec::with_capacity(DEFAULT_CATEGORIES.len());
    for (index, (name, icon, color)) in DEFAULT_CATEGORIES.iter().enumerate() {
        let mut cat = Category::new(name, icon, color, index as i64);
        cat.is_system = true;
        insert_category(conn, &cat)?;
        category_ids.push(cat.id);
    }
    for (index, (name, icon)) in DEFAULT_PAYMENT_METHODS.iter().enumerate() {
        insert_payment_method(conn, &PaymentMethod::new(name, icon, index as i64))?;
    }
    save_preferences(conn, &Preferences::default())?;
    for (index, (name, kind, cents, cat_index)) in DEFAULT_TEMPLATES.iter().enumerate() {
        let Some(category_id) = category_ids.get(*cat_index) else {
            continue;
        };
        let template = Template::new(
            name,
            *kind,
            Decimal::new(*cents, 2),
            *category_id,
            index as i64,
        );
        insert_template(conn, &template)?;
    }
    Ok(())
}

/// Drops every record, preferences included.
pub fn wipe_all(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "DELETE FROM transactions;
         DELETE FROM budgets;
         DELETE FROM goals;
         DELETE FROM templates;
         DELETE FROM categories;
         DELETE FROM payment_methods;
         DELETE FROM preferences;",
    )
}

/// Drops everything a backup restore replaces; preferences survive.
pub fn wipe_records(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "DELETE FROM transactions;
         DELETE FROM budgets;
         DELETE FROM goals;
         DELETE FROM templates;
         DELETE FROM categories;
         DELETE FROM payment_methods;",
    )
}

// ── column decoding ────────────────────────────────────────────

fn conversion_err<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn uuid_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = r.get(idx)?;
    Uuid::parse_str(&s).map_err(|e| conversion_err(idx, e))
}

fn opt_uuid_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let s: Option<String> = r.get(idx)?;
    s.map(|s| Uuid::parse_str(&s).map_err(|e| conversion_err(idx, e)))
        .transpose()
}

fn decimal_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.parse::<Decimal>().map_err(|e| conversion_err(idx, e))
}

fn type_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<TransactionType> {
    let s: String = r.get(idx)?;
    s.parse::<TransactionType>()
        .map_err(|e| conversion_err(idx, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn tags_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let s: String = r.get(idx)?;
    serde_json::from_str(&s).map_err(|e| conversion_err(idx, e))
}

fn tags_json(tags: &[String]) -> rusqlite::Result<String> {
    serde_json::to_string(tags).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn opt_id(id: Option<Uuid>) -> Option<String> {
    id.map(|id| id.to_string())
}

// ── transactions ───────────────────────────────────────────────

const TX_COLUMNS: &str = "id, type, amount, currency, category_id, date, note, \
     payment_method_id, tags, template_id, created_at, updated_at";

fn transaction_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: uuid_at(r, 0)?,
        r#type: type_at(r, 1)?,
        amount: decimal_at(r, 2)?,
        currency: r.get(3)?,
        category_id: uuid_at(r, 4)?,
        date: r.get(5)?,
        note: r.get(6)?,
        payment_method_id: opt_uuid_at(r, 7)?,
        tags: tags_at(r, 8)?,
        template_id: opt_uuid_at(r, 9)?,
        created_at: r.get(10)?,
        updated_at: r.get(11)?,
    })
}

pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> rusqlite::Result<()> {
    let tags = tags_json(&tx.tags)?;
    conn.execute(
        "INSERT INTO transactions(id, type, amount, currency, category_id, date, note, \
         payment_method_id, tags, template_id, created_at, updated_at) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            tx.id.to_string(),
            tx.r#type.as_str(),
            tx.amount.to_string(),
            tx.currency,
            tx.category_id.to_string(),
            tx.date,
            tx.note,
            opt_id(tx.payment_method_id),
            tags,
            opt_id(tx.template_id),
            tx.created_at,
            tx.updated_at
        ],
    )?;
    Ok(())
}

pub fn update_transaction(conn: &Connection, tx: &Transaction) -> rusqlite::Result<usize> {
    let tags = tags_json(&tx.tags)?;
    conn.execute(
        "UPDATE transactions SET type=?2, amount=?3, currency=?4, category_id=?5, date=?6, \
         note=?7, payment_method_id=?8, tags=?9, template_id=?10, updated_at=?11 WHERE id=?1",
        params![
            tx.id.to_string(),
            tx.r#type.as_str(),
            tx.amount.to_string(),
            tx.currency,
            tx.category_id.to_string(),
            tx.date,
            tx.note,
            opt_id(tx.payment_method_id),
            tags,
            opt_id(tx.template_id),
            tx.updated_at
        ],
    )
}

pub fn transaction_by_id(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Transaction>> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", TX_COLUMNS);
    conn.query_row(&sql, params![id.to_string()], transaction_from_row)
        .optional()
}

pub fn transaction_exists(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM transactions WHERE id=?1)",
        params![id.to_string()],
        |r| r.get(0),
    )
}

/// Date window and type narrowing happen in SQL; the rest of the filter runs in memory.
/// Newest first, equal timestamps in insertion order.
pub fn select_transactions(
    conn: &Connection,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    r#type: Option<TransactionType>,
) -> rusqlite::Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", TX_COLUMNS);
    let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(start) = start {
        sql.push_str(" AND date >= ?");
        params_vec.push(Box::new(start));
    }
    if let Some(end) = end {
        sql.push_str(" AND date <= ?");
        params_vec.push(Box::new(end));
    }
    if let Some(kind) = r#type {
        sql.push_str(" AND type = ?");
        params_vec.push(Box::new(kind.as_str()));
    }
    sql.push_str(" ORDER BY date DESC, seq ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())),
        transaction_from_row,
    )?;
    rows.collect()
}

pub fn delete_transaction(conn: &Connection, id: Uuid) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM transactions WHERE id=?1",
        params![id.to_string()],
    )
}

// ── categories ─────────────────────────────────────────────────

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: uuid_at(r, 0)?,
        name: r.get(1)?,
        icon: r.get(2)?,
        color: r.get(3)?,
        is_system: r.get(4)?,
        sort_order: r.get(5)?,
    })
}

pub fn insert_category(conn: &Connection, c: &Category) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO categories(id, name, icon, color, is_system, sort_order) VALUES (?1,?2,?3,?4,?5,?6)",
        params![c.id.to_string(), c.name, c.icon, c.color, c.is_system, c.sort_order],
    )?;
    Ok(())
}

pub fn update_category(conn: &Connection, c: &Category) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE categories SET name=?2, icon=?3, color=?4, sort_order=?5 WHERE id=?1",
        params![c.id.to_string(), c.name, c.icon, c.color, c.sort_order],
    )
}

pub fn category_by_id(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, icon, color, is_system, sort_order FROM categories WHERE id=?1",
        params![id.to_string()],
        category_from_row,
    )
    .optional()
}

pub fn all_categories(conn: &Connection) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, icon, color, is_system, sort_order FROM categories ORDER BY sort_order, seq",
    )?;
    let rows = stmt.query_map([], category_from_row)?;
    rows.collect()
}

pub fn category_ids(conn: &Connection) -> rusqlite::Result<Vec<Uuid>> {
    let mut stmt = conn.prepare("SELECT id FROM categories")?;
    let rows = stmt.query_map([], |r| uuid_at(r, 0))?;
    rows.collect()
}

pub fn delete_category(conn: &Connection, id: Uuid) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM categories WHERE id=?1", params![id.to_string()])
}

// ── payment methods ────────────────────────────────────────────

fn payment_method_from_row(r: &Row<'_>) -> rusqlite::Result<PaymentMethod> {
    Ok(PaymentMethod {
        id: uuid_at(r, 0)?,
        name: r.get(1)?,
        icon: r.get(2)?,
        sort_order: r.get(3)?,
    })
}

pub fn insert_payment_method(conn: &Connection, pm: &PaymentMethod) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO payment_methods(id, name, icon, sort_order) VALUES (?1,?2,?3,?4)",
        params![pm.id.to_string(), pm.name, pm.icon, pm.sort_order],
    )?;
    Ok(())
}

pub fn update_payment_method(conn: &Connection, pm: &PaymentMethod) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE payment_methods SET name=?2, icon=?3, sort_order=?4 WHERE id=?1",
        params![pm.id.to_string(), pm.name, pm.icon, pm.sort_order],
    )
}

pub fn payment_method_by_id(
    conn: &Connection,
    id: Uuid,
) -> rusqlite::Result<Option<PaymentMethod>> {
    conn.query_row(
        "SELECT id, name, icon, sort_order FROM payment_methods WHERE id=?1",
        params![id.to_string()],
        payment_method_from_row,
    )
    .optional()
}

pub fn all_payment_methods(conn: &Connection) -> rusqlite::Result<Vec<PaymentMethod>> {
    let mut stmt = conn
        .prepare("SELECT id, name, icon, sort_order FROM payment_methods ORDER BY sort_order, seq")?;
    let rows = stmt.query_map([], payment_method_from_row)?;
    rows.collect()
}

pub fn payment_method_ids(conn: &Connection) -> rusqlite::Result<Vec<Uuid>> {
    let mut stmt = conn.prepare("SELECT id FROM payment_methods")?;
    let rows = stmt.query_map([], |r| uuid_at(r, 0))?;
    rows.collect()
}

pub fn delete_payment_method(conn: &Connection, id: Uuid) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM payment_methods WHERE id=?1",
        params![id.to_string()],
    )
}

// ── budgets ────────────────────────────────────────────────────

fn budget_from_row(r: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: uuid_at(r, 0)?,
        category_id: uuid_at(r, 1)?,
        month: r.get(2)?,
        limit: decimal_at(r, 3)?,
    })
}

pub fn insert_budget(conn: &Connection, b: &Budget) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO budgets(id, category_id, month, limit_amount) VALUES (?1,?2,?3,?4)",
        params![
            b.id.to_string(),
            b.category_id.to_string(),
            b.month,
            b.limit.to_string()
        ],
    )?;
    Ok(())
}

pub fn update_budget_limit(conn: &Connection, id: Uuid, limit: Decimal) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE budgets SET limit_amount=?2 WHERE id=?1",
        params![id.to_string(), limit.to_string()],
    )
}

/// First budget row for the pair, in insertion order.
pub fn budget_for(
    conn: &Connection,
    category_id: Uuid,
    month: &str,
) -> rusqlite::Result<Option<Budget>> {
    conn.query_row(
        "SELECT id, category_id, month, limit_amount FROM budgets \
         WHERE category_id=?1 AND month=?2 ORDER BY seq LIMIT 1",
        params![category_id.to_string(), month],
        budget_from_row,
    )
    .optional()
}

pub fn budgets_for_month(conn: &Connection, month: &str) -> rusqlite::Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, category_id, month, limit_amount FROM budgets WHERE month=?1 ORDER BY seq",
    )?;
    let rows = stmt.query_map(params![month], budget_from_row)?;
    rows.collect()
}

pub fn all_budgets(conn: &Connection) -> rusqlite::Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, category_id, month, limit_amount FROM budgets ORDER BY month DESC, seq",
    )?;
    let rows = stmt.query_map([], budget_from_row)?;
    rows.collect()
}

pub fn budget_exists(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM budgets WHERE id=?1)",
        params![id.to_string()],
        |r| r.get(0),
    )
}

pub fn delete_budget(conn: &Connection, id: Uuid) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM budgets WHERE id=?1", params![id.to_string()])
}

// ── goals ──────────────────────────────────────────────────────

fn goal_from_row(r: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: uuid_at(r, 0)?,
        name: r.get(1)?,
        target_amount: decimal_at(r, 2)?,
        target_date: r.get(3)?,
        current_amount: decimal_at(r, 4)?,
        sort_order: r.get(5)?,
    })
}

pub fn insert_goal(conn: &Connection, g: &Goal) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO goals(id, name, target_amount, target_date, current_amount, sort_order) \
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            g.id.to_string(),
            g.name,
            g.target_amount.to_string(),
            g.target_date,
            g.current_amount.to_string(),
            g.sort_order
        ],
    )?;
    Ok(())
}

pub fn update_goal(conn: &Connection, g: &Goal) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE goals SET name=?2, target_amount=?3, target_date=?4, current_amount=?5, \
         sort_order=?6 WHERE id=?1",
        params![
            g.id.to_string(),
            g.name,
            g.target_amount.to_string(),
            g.target_date,
            g.current_amount.to_string(),
            g.sort_order
        ],
    )
}

pub fn goal_by_id(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Goal>> {
    conn.query_row(
        "SELECT id, name, target_amount, target_date, current_amount, sort_order \
         FROM goals WHERE id=?1",
        params![id.to_string()],
        goal_from_row,
    )
    .optional()
}

pub fn goal_exists(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM goals WHERE id=?1)",
        params![id.to_string()],
        |r| r.get(0),
    )
}

pub fn all_goals(conn: &Connection) -> rusqlite::Result<Vec<Goal>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, target_amount, target_date, current_amount, sort_order \
         FROM goals ORDER BY sort_order, seq",
    )?;
    let rows = stmt.query_map([], goal_from_row)?;
    rows.collect()
}

pub fn delete_goal(conn: &Connection, id: Uuid) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM goals WHERE id=?1", params![id.to_string()])
}

// ── templates ──────────────────────────────────────────────────

fn template_from_row(r: &Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        id: uuid_at(r, 0)?,
        name: r.get(1)?,
        r#type: type_at(r, 2)?,
        amount: decimal_at(r, 3)?,
        category_id: uuid_at(r, 4)?,
        payment_method_id: opt_uuid_at(r, 5)?,
        sort_order: r.get(6)?,
    })
}

pub fn insert_template(conn: &Connection, t: &Template) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO templates(id, name, type, amount, category_id, payment_method_id, sort_order) \
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            t.id.to_string(),
            t.name,
            t.r#type.as_str(),
            t.amount.to_string(),
            t.category_id.to_string(),
            opt_id(t.payment_method_id),
            t.sort_order
        ],
    )?;
    Ok(())
}

pub fn update_template(conn: &Connection, t: &Template) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE templates SET name=?2, type=?3, amount=?4, category_id=?5, \
         payment_method_id=?6, sort_order=?7 WHERE id=?1",
        params![
            t.id.to_string(),
            t.name,
            t.r#type.as_str(),
            t.amount.to_string(),
            t.category_id.to_string(),
            opt_id(t.payment_method_id),
            t.sort_order
        ],
    )
}

pub fn template_by_id(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Template>> {
    conn.query_row(
        "SELECT id, name, type, amount, category_id, payment_method_id, sort_order \
         FROM templates WHERE id=?1",
        params![id.to_string()],
        template_from_row,
    )
    .optional()
}

pub fn template_exists(conn: &Connection, id: Uuid) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM templates WHERE id=?1)",
        params![id.to_string()],
        |r| r.get(0),
    )
}

pub fn all_templates(conn: &Connection) -> rusqlite::Result<Vec<Template>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, amount, category_id, payment_method_id, sort_order \
         FROM templates ORDER BY sort_order, seq",
    )?;
    let rows = stmt.query_map([], template_from_row)?;
    rows.collect()
}

pub fn delete_template(conn: &Connection, id: Uuid) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM templates WHERE id=?1", params![id.to_string()])
}

// ── preferences ────────────────────────────────────────────────

pub fn load_preferences(conn: &Connection) -> rusqlite::Result<Option<Preferences>> {
    conn.query_row(
        "SELECT currency, reminders_enabled, reminder_time, haptics_enabled, theme, \
         budgets_enabled, onboarding_completed FROM preferences WHERE id=1",
        [],
        |r| {
            let theme: String = r.get(4)?;
            let reminder_time: NaiveTime = r.get(2)?;
            Ok(Preferences {
                currency: r.get(0)?,
                reminders_enabled: r.get(1)?,
                reminder_time,
                haptics_enabled: r.get(3)?,
                theme: Theme::from_stored(&theme),
                budgets_enabled: r.get(5)?,
                onboarding_completed: r.get(6)?,
            })
        },
    )
    .optional()
}

pub fn save_preferences(conn: &Connection, p: &Preferences) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO preferences(id, currency, reminders_enabled, reminder_time, haptics_enabled, \
         theme, budgets_enabled, onboarding_completed) VALUES (1,?1,?2,?3,?4,?5,?6,?7)
         ON CONFLICT(id) DO UPDATE SET currency=excluded.currency,
            reminders_enabled=excluded.reminders_enabled,
            reminder_time=excluded.reminder_time,
            haptics_enabled=excluded.haptics_enabled,
            theme=excluded.theme,
            budgets_enabled=excluded.budgets_enabled,
            onboarding_completed=excluded.onboarding_completed",
        params![
            p.currency,
            p.reminders_enabled,
            p.reminder_time,
            p.haptics_enabled,
            p.theme.as_str(),
            p.budgets_enabled,
            p.onboarding_completed
        ],
    )?;
    Ok(())
}
