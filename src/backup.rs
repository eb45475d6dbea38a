// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Versioned JSON backups and flat CSV exports.
//!
//! Amounts cross this boundary as JSON numbers and are parsed straight back
//! into decimals; nothing inside the engine sums floats.

use crate::db;
use crate::error::{LedgerError, Result};
use crate::models::{
    Budget, Category, Goal, PaymentMethod, Template, Transaction, TransactionType,
};
use crate::store::{
    require_name, require_non_negative, require_positive, Store, UNKNOWN_CATEGORY,
};
use crate::utils::{normalize_currency, MonthKey};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub const BACKUP_VERSION: i64 = 1;

pub const CSV_HEADER: [&str; 7] = [
    "Date",
    "Type",
    "Category",
    "Amount",
    "Note",
    "Payment Method",
    "Tags",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: i64,
    pub export_date: DateTime<Utc>,
    pub transactions: Vec<TransactionRecord>,
    pub categories: Vec<CategoryRecord>,
    pub budgets: Vec<BudgetRecord>,
    pub goals: Vec<GoalRecord>,
    pub templates: Vec<TemplateRecord>,
    pub payment_methods: Vec<PaymentMethodRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    pub r#type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency_code: String,
    pub category_id: Uuid,
    #[serde(with = "iso_datetime")]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub payment_method_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub icon_name: String,
    pub color_key: String,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub category_id: Uuid,
    pub month_key: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(with = "iso_date")]
    pub target_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_amount: Decimal,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: Uuid,
    pub name: String,
    pub r#type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category_id: Uuid,
    #[serde(default)]
    pub payment_method_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRecord {
    pub id: Uuid,
    pub name: String,
    pub icon_name: String,
    #[serde(default)]
    pub sort_order: i64,
}

/// What an import actually wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub transactions: usize,
    pub categories: usize,
    pub budgets: usize,
    pub goals: usize,
    pub templates: usize,
    pub payment_methods: usize,
    pub skipped_categories: usize,
    pub skipped_payment_methods: usize,
    /// Records inserted under a fresh id because theirs was already taken.
    pub reassigned_ids: usize,
}

/// Unknown type strings import as expenses.
fn parse_type(raw: &str) -> TransactionType {
    raw.parse().unwrap_or(TransactionType::Expense)
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            r#type: tx.r#type.as_str().to_string(),
            amount: tx.amount,
            currency_code: tx.currency.clone(),
            category_id: tx.category_id,
            date: tx.date,
            note: tx.note.clone(),
            payment_method_id: tx.payment_method_id,
            tags: tx.tags.clone(),
            template_id: tx.template_id,
            created_at: Some(tx.created_at),
            updated_at: Some(tx.updated_at),
        }
    }
}

impl TransactionRecord {
    fn into_transaction(self, id: Uuid, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            r#type: parse_type(&self.r#type),
            amount: self.amount,
            currency: self.currency_code,
            category_id: self.category_id,
            date: self.date,
            note: self.note,
            payment_method_id: self.payment_method_id,
            tags: self.tags,
            template_id: self.template_id,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

impl From<&Category> for CategoryRecord {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            icon_name: c.icon.clone(),
            color_key: c.color.clone(),
            is_system: c.is_system,
            sort_order: c.sort_order,
        }
    }
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            icon: r.icon_name,
            color: r.color_key,
            is_system: r.is_system,
            sort_order: r.sort_order,
        }
    }
}

impl From<&Budget> for BudgetRecord {
    fn from(b: &Budget) -> Self {
        Self {
            id: Some(b.id),
            category_id: b.category_id,
            month_key: b.month.clone(),
            limit: b.limit,
        }
    }
}

impl From<&Goal> for GoalRecord {
    fn from(g: &Goal) -> Self {
        Self {
            id: g.id,
            name: g.name.clone(),
            target_amount: g.target_amount,
            target_date: g.target_date,
            current_amount: g.current_amount,
            sort_order: g.sort_order,
        }
    }
}

impl From<&Template> for TemplateRecord {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            r#type: t.r#type.as_str().to_string(),
            amount: t.amount,
            category_id: t.category_id,
            payment_method_id: t.payment_method_id,
            sort_order: t.sort_order,
        }
    }
}

impl From<&PaymentMethod> for PaymentMethodRecord {
    fn from(pm: &PaymentMethod) -> Self {
        Self {
            id: pm.id,
            name: pm.name.clone(),
            icon_name: pm.icon.clone(),
            sort_order: pm.sort_order,
        }
    }
}

impl From<PaymentMethodRecord> for PaymentMethod {
    fn from(r: PaymentMethodRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            icon: r.icon_name,
            sort_order: r.sort_order,
        }
    }
}

/// Full snapshot of every collection except preferences.
pub fn export_document(store: &Store) -> Result<BackupDocument> {
    Ok(BackupDocument {
        version: BACKUP_VERSION,
        export_date: Utc::now(),
        transactions: store.all_transactions()?.iter().map(Into::into).collect(),
        categories: store.categories()?.iter().map(Into::into).collect(),
        budgets: store.budgets()?.iter().map(Into::into).collect(),
        goals: store.goals()?.iter().map(Into::into).collect(),
        templates: store.templates()?.iter().map(Into::into).collect(),
        payment_methods: store.payment_methods()?.iter().map(Into::into).collect(),
    })
}

/// Pretty-printed UTF-8 JSON with keys in sorted order.
pub fn export_json(store: &Store) -> Result<Vec<u8>> {
    let doc = export_document(store)?;
    encode_document(&doc)
}

pub fn encode_document(doc: &BackupDocument) -> Result<Vec<u8>> {
    // serde_json::Value keeps object keys in a BTreeMap, which sorts them
    let value = serde_json::to_value(doc).map_err(|e| LedgerError::Encode(e.to_string()))?;
    serde_json::to_vec_pretty(&value).map_err(|e| LedgerError::Encode(e.to_string()))
}

pub fn decode_document(bytes: &[u8]) -> Result<BackupDocument> {
    let doc: BackupDocument = serde_json::from_slice(bytes)?;
    if doc.version < 1 {
        return Err(LedgerError::UnsupportedVersion(doc.version));
    }
    Ok(doc)
}

/// Restores a backup in one transaction. Nothing is written unless every record lands.
///
/// With `replace_existing` every collection but preferences is cleared first.
/// Otherwise categories and payment methods already present win, and every
/// other record is added as a new row.
pub fn import_json(store: &Store, bytes: &[u8], replace_existing: bool) -> Result<ImportSummary> {
    let doc = decode_document(bytes)?;
    let summary = store.write(|c| apply_document(c, doc, replace_existing))?;
    tracing::info!(
        replace_existing,
        transactions = summary.transactions,
        categories = summary.categories,
        budgets = summary.budgets,
        "backup imported"
    );
    Ok(summary)
}

/// Applies the same checks the store runs on every write, so one bad record
/// rejects the whole document. Currency codes come back upper-cased.
fn validate_document(mut doc: BackupDocument) -> Result<BackupDocument> {
    for record in &mut doc.transactions {
        require_positive(record.amount, "transaction amount")?;
        record.currency_code = normalize_currency(&record.currency_code)?;
    }
    for record in &doc.categories {
        require_name(&record.name, "category")?;
    }
    for record in &doc.payment_methods {
        require_name(&record.name, "payment method")?;
    }
    for record in &mut doc.budgets {
        record.month_key = MonthKey::parse(&record.month_key)?.to_string();
        require_non_negative(record.limit, "budget limit")?;
    }
    for record in &doc.goals {
        require_name(&record.name, "goal")?;
        require_positive(record.target_amount, "goal target")?;
        require_non_negative(record.current_amount, "goal saved amount")?;
    }
    for record in &doc.templates {
        require_name(&record.name, "template")?;
        require_positive(record.amount, "template amount")?;
    }
    Ok(doc)
}

fn apply_document(
    conn: &rusqlite::Connection,
    doc: BackupDocument,
    replace_existing: bool,
) -> Result<ImportSummary> {
    let doc = validate_document(doc)?;
    let mut summary = ImportSummary::default();
    if replace_existing {
        db::wipe_records(conn)?;
    }

    let mut category_ids: HashSet<Uuid> = db::category_ids(conn)?.into_iter().collect();
    for record in doc.categories {
        if !category_ids.insert(record.id) {
            summary.skipped_categories += 1;
            continue;
        }
        db::insert_category(conn, &record.into())?;
        summary.categories += 1;
    }

    let mut pm_ids: HashSet<Uuid> = db::payment_method_ids(conn)?.into_iter().collect();
    for record in doc.payment_methods {
        if !pm_ids.insert(record.id) {
            summary.skipped_payment_methods += 1;
            continue;
        }
        db::insert_payment_method(conn, &record.into())?;
        summary.payment_methods += 1;
    }

    let now = Utc::now();
    for record in doc.transactions {
        let id = if db::transaction_exists(conn, record.id)? {
            summary.reassigned_ids += 1;
            Uuid::new_v4()
        } else {
            record.id
        };
        db::insert_transaction(conn, &record.into_transaction(id, now))?;
        summary.transactions += 1;
    }

    let mut pairs: HashMap<(Uuid, String), usize> = HashMap::new();
    for b in db::all_budgets(conn)? {
        *pairs.entry((b.category_id, b.month)).or_insert(0) += 1;
    }
    for record in doc.budgets {
        let seen = pairs
            .entry((record.category_id, record.month_key.clone()))
            .or_insert(0);
        if *seen > 0 {
            tracing::warn!(
                category_id = %record.category_id,
                month = %record.month_key,
                "import adds a second budget for the same category and month"
            );
        }
        *seen += 1;
        let id = match record.id {
            Some(id) if !db::budget_exists(conn, id)? => id,
            Some(_) => {
                summary.reassigned_ids += 1;
                Uuid::new_v4()
            }
            None => Uuid::new_v4(),
        };
        let budget = Budget {
            id,
            category_id: record.category_id,
            month: record.month_key,
            limit: record.limit,
        };
        db::insert_budget(conn, &budget)?;
        summary.budgets += 1;
    }

    for record in doc.goals {
        let id = if db::goal_exists(conn, record.id)? {
            summary.reassigned_ids += 1;
            Uuid::new_v4()
        } else {
            record.id
        };
        let goal = Goal {
            id,
            name: record.name,
            target_amount: record.target_amount,
            target_date: record.target_date,
            current_amount: record.current_amount,
            sort_order: record.sort_order,
        };
        db::insert_goal(conn, &goal)?;
        summary.goals += 1;
    }

    for record in doc.templates {
        let id = if db::template_exists(conn, record.id)? {
            summary.reassigned_ids += 1;
            Uuid::new_v4()
        } else {
            record.id
        };
        let template = Template {
            id,
            name: record.name,
            r#type: parse_type(&record.r#type),
            amount: record.amount,
            category_id: record.category_id,
            payment_method_id: record.payment_method_id,
            sort_order: record.sort_order,
        };
        db::insert_template(conn, &template)?;
        summary.templates += 1;
    }

    Ok(summary)
}

/// `Feb 29, 2024`: the same in every locale.
pub fn csv_date(date: NaiveDateTime) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn export_csv(
    transactions: &[Transaction],
    categories: &[Category],
    currency_code: &str,
) -> Result<Vec<u8>> {
    export_csv_with(transactions, categories, &[], currency_code)
}

/// One row per transaction, newest first. Fields with commas or quotes are quoted,
/// inner quotes doubled; tags are joined with `; `.
pub fn export_csv_with(
    transactions: &[Transaction],
    categories: &[Category],
    payment_methods: &[PaymentMethod],
    currency_code: &str,
) -> Result<Vec<u8>> {
    let category_names: HashMap<Uuid, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let pm_names: HashMap<Uuid, &str> = payment_methods
        .iter()
        .map(|pm| (pm.id, pm.name.as_str()))
        .collect();

    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for tx in sorted {
        let category = category_names
            .get(&tx.category_id)
            .copied()
            .unwrap_or(UNKNOWN_CATEGORY);
        let payment_method = tx
            .payment_method_id
            .and_then(|id| pm_names.get(&id).copied())
            .unwrap_or("");
        wtr.write_record([
            csv_date(tx.date).as_str(),
            tx.r#type.as_str(),
            category,
            tx.amount.to_string().as_str(),
            tx.note.as_str(),
            payment_method,
            tx.tags.join("; ").as_str(),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| LedgerError::Encode(e.to_string()))?;
    tracing::debug!(rows = transactions.len(), currency = currency_code, "csv export built");
    Ok(bytes)
}

/// Whole store as CSV, payment method names resolved.
pub fn export_store_csv(store: &Store) -> Result<Vec<u8>> {
    let prefs = store.preferences()?;
    export_csv_with(
        &store.all_transactions()?,
        &store.categories()?,
        &store.payment_methods()?,
        &prefs.currency,
    )
}

/// Writes `YYYY-MM-DDTHH:MM:SS[.fff]`; also reads RFC 3339 stamps with an offset.
mod iso_datetime {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date-time '{}'", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
    }
}

mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .or_else(|| super::iso_datetime::parse(&raw).map(|dt| dt.date()))
            .ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_accept_offsets_from_other_exporters() {
        let dt = iso_datetime::parse("2025-03-04T10:15:00Z").unwrap();
        assert_eq!(dt.to_string(), "2025-03-04 10:15:00");
        let dt = iso_datetime::parse("2025-03-04T10:15:00.250").unwrap();
        assert_eq!(dt.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn unknown_types_fall_back_to_expense() {
        assert_eq!(parse_type("income"), TransactionType::Income);
        assert_eq!(parse_type("transfer"), TransactionType::Expense);
    }

    #[test]
    fn version_zero_is_rejected() {
        let body = br#"{"version":0,"exportDate":"2025-01-01T00:00:00Z","transactions":[],
            "categories":[],"budgets":[],"goals":[],"templates":[],"paymentMethods":[]}"#;
        assert!(matches!(
            decode_document(body),
            Err(LedgerError::UnsupportedVersion(0))
        ));
    }
}
