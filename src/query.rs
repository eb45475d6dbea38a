// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction filtering, day grouping and decimal totals.

use crate::db;
use crate::error::Result;
use crate::models::{Transaction, TransactionType};
use crate::store::Store;
use crate::utils::MonthKey;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Optional criteria, all ANDed. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub r#type: Option<TransactionType>,
    pub category_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn between(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn in_month(self, month: &MonthKey) -> Self {
        let (start, end) = month.range();
        self.between(start, end)
    }

    pub fn of_type(mut self, r#type: TransactionType) -> Self {
        self.r#type = Some(r#type);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn paid_with(mut self, payment_method_id: Uuid) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    pub fn matching(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.start.is_some_and(|start| tx.date < start) {
            return false;
        }
        if self.end.is_some_and(|end| tx.date > end) {
            return false;
        }
        if self.r#type.is_some_and(|t| tx.r#type != t) {
            return false;
        }
        if self.category_id.is_some_and(|id| tx.category_id != id) {
            return false;
        }
        if self
            .payment_method_id
            .is_some_and(|id| tx.payment_method_id != Some(id))
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => matches_text(tx, &text.to_lowercase()),
            _ => true,
        }
    }
}

/// Case-insensitive substring match against the note or any tag.
fn matches_text(tx: &Transaction, needle: &str) -> bool {
    tx.note.to_lowercase().contains(needle)
        || tx.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub items: Vec<Transaction>,
}

pub struct TransactionQuery<'a> {
    store: &'a Store,
}

impl<'a> TransactionQuery<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Matching transactions, newest first; equal timestamps keep insertion order.
    pub fn query(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let rows =
            db::select_transactions(self.store.conn(), filter.start, filter.end, filter.r#type)?;
        let out: Vec<Transaction> = rows.into_iter().filter(|tx| filter.matches(tx)).collect();
        tracing::debug!(count = out.len(), ?filter, "transaction query");
        Ok(out)
    }

    /// Every transaction dated within the month, last day included up to its final instant.
    pub fn transactions_in_month(
        &self,
        month_key: &str,
        r#type: Option<TransactionType>,
    ) -> Result<Vec<Transaction>> {
        let month = MonthKey::parse(month_key)?;
        self.in_month(&month, r#type)
    }

    pub fn in_month(
        &self,
        month: &MonthKey,
        r#type: Option<TransactionType>,
    ) -> Result<Vec<Transaction>> {
        let mut filter = TransactionFilter::default().in_month(month);
        filter.r#type = r#type;
        self.query(&filter)
    }

    pub fn last_used_category(&self, r#type: TransactionType) -> Result<Option<Uuid>> {
        let latest = db::select_transactions(self.store.conn(), None, None, Some(r#type))?;
        Ok(latest.first().map(|tx| tx.category_id))
    }

    /// Category ids ranked by how many transactions of `r#type` use them; ties by id.
    pub fn frequent_categories(&self, r#type: TransactionType, limit: usize) -> Result<Vec<Uuid>> {
        let txs = self.query(&TransactionFilter::default().of_type(r#type))?;
        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for tx in &txs {
            *counts.entry(tx.category_id).or_insert(0) += 1;
        }
        let mut ranked: Vec<(Uuid, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(ranked.into_iter().take(limit).map(|(id, _)| id).collect())
    }
}

/// Buckets by calendar day, newest day first; items within a day newest first.
pub fn group_by_day(transactions: &[Transaction]) -> Vec<DayGroup> {
    let mut days: BTreeMap<NaiveDate, Vec<Transaction>> = BTreeMap::new();
    for tx in transactions {
        days.entry(tx.date.date()).or_default().push(tx.clone());
    }
    days.into_iter()
        .rev()
        .map(|(day, mut items)| {
            items.sort_by(|a, b| b.date.cmp(&a.date));
            DayGroup { day, items }
        })
        .collect()
}

pub fn total_income(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.is_income())
        .map(|tx| tx.amount)
        .sum()
}

pub fn total_expense(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|tx| tx.is_expense())
        .map(|tx| tx.amount)
        .sum()
}

pub fn net(transactions: &[Transaction]) -> Decimal {
    total_income(transactions) - total_expense(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn tx(kind: TransactionType, amount: Decimal, date: NaiveDateTime) -> Transaction {
        Transaction::new(kind, amount, "USD", Uuid::nil(), date)
    }

    #[test]
    fn net_is_income_minus_expense_exactly() {
        let txs = vec![
            tx(TransactionType::Income, dec!(0.1), at(2025, 1, 1, 9)),
            tx(TransactionType::Income, dec!(0.2), at(2025, 1, 2, 9)),
            tx(TransactionType::Expense, dec!(0.3), at(2025, 1, 3, 9)),
            tx(TransactionType::Expense, dec!(1234.56), at(2025, 1, 4, 9)),
        ];
        assert_eq!(total_income(&txs), dec!(0.3));
        assert_eq!(total_expense(&txs), dec!(1234.86));
        assert_eq!(net(&txs), total_income(&txs) - total_expense(&txs));
        assert_eq!(net(&txs), dec!(-1234.56));
        assert_eq!(net(&[]), Decimal::ZERO);
    }

    #[test]
    fn grouping_orders_days_and_items_descending() {
        let txs = vec![
            tx(TransactionType::Expense, dec!(1), at(2025, 1, 1, 8)),
            tx(TransactionType::Expense, dec!(2), at(2025, 1, 2, 8)),
            tx(TransactionType::Expense, dec!(3), at(2025, 1, 1, 20)),
        ];
        let groups = group_by_day(&txs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].day, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(groups[1].items[0].amount, dec!(3));
        assert_eq!(groups[1].items[1].amount, dec!(1));
        assert_eq!(group_by_day(&txs), groups);
    }

    #[test]
    fn search_hits_notes_and_tags_case_insensitively() {
        let t = tx(TransactionType::Expense, dec!(4), at(2025, 1, 1, 8))
            .with_note("Flat White")
            .with_tags(["Work", "caffeine"]);
        assert!(TransactionFilter::default().matching("white").matches(&t));
        assert!(TransactionFilter::default().matching("CAFF").matches(&t));
        assert!(!TransactionFilter::default().matching("tea").matches(&t));
        assert!(TransactionFilter::default().matching("   ").matches(&t));
    }
}
