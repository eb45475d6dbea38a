// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chart-ready series built on top of the transaction query engine.

use crate::budget::ratio;
use crate::error::Result;
use crate::models::{Transaction, TransactionType};
use crate::query::{total_expense, total_income, TransactionFilter, TransactionQuery};
use crate::store::Store;
use crate::utils::{end_of_day, MonthKey};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdownItem {
    pub category_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increase,
    Decrease,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTrendItem {
    #[serde(flatten)]
    pub item: CategoryBreakdownItem,
    pub previous_amount: Decimal,
    pub trend: Decimal,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeExpenseBar {
    pub month: String,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedAmount {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReview {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_spent: Decimal,
    pub avg_daily_spend: Decimal,
    pub biggest_category: Option<NamedAmount>,
    pub lowest_day: Option<DailyPoint>,
}

/// Relative change against the previous period; 0 when there is no previous spend.
pub fn trend(current: Decimal, previous: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        ratio(current - previous, previous)
    } else {
        Decimal::ZERO
    }
}

/// A positive trend on expenses is an increase, which is the bad direction.
pub fn classify_trend(trend: Decimal) -> TrendDirection {
    if trend > Decimal::ZERO {
        TrendDirection::Increase
    } else if trend < Decimal::ZERO {
        TrendDirection::Decrease
    } else {
        TrendDirection::Flat
    }
}

/// Sparse per-day sums, ascending. Days without transactions are not emitted.
pub fn daily_totals(transactions: &[Transaction]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for tx in transactions {
        *days.entry(tx.date.date()).or_insert(Decimal::ZERO) += tx.amount;
    }
    days.into_iter()
        .map(|(date, amount)| DailyPoint { date, amount })
        .collect()
}

fn sum_by_category(transactions: &[Transaction]) -> HashMap<Uuid, Decimal> {
    let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
    for tx in transactions {
        *totals.entry(tx.category_id).or_insert(Decimal::ZERO) += tx.amount;
    }
    totals
}

pub struct ChartBuilder<'a> {
    store: &'a Store,
    query: TransactionQuery<'a>,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            query: TransactionQuery::new(store),
        }
    }

    pub fn daily_expense_series(&self, month_key: &str) -> Result<Vec<DailyPoint>> {
        let month = MonthKey::parse(month_key)?;
        let expenses = self.query.in_month(&month, Some(TransactionType::Expense))?;
        Ok(daily_totals(&expenses))
    }

    /// Per-category share of the month's expense, largest first. Deleted categories drop out.
    pub fn category_breakdown(&self, month_key: &str) -> Result<Vec<CategoryBreakdownItem>> {
        let month = MonthKey::parse(month_key)?;
        self.breakdown_for(&month)
    }

    fn breakdown_for(&self, month: &MonthKey) -> Result<Vec<CategoryBreakdownItem>> {
        let expenses = self.query.in_month(month, Some(TransactionType::Expense))?;
        let total = total_expense(&expenses);
        if total <= Decimal::ZERO {
            return Ok(Vec::new());
        }
        let names: HashMap<Uuid, String> = self
            .store
            .categories()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let mut items: Vec<CategoryBreakdownItem> = sum_by_category(&expenses)
            .into_iter()
            .filter_map(|(category_id, amount)| {
                let name = names.get(&category_id)?;
                Some(CategoryBreakdownItem {
                    category_id,
                    name: name.clone(),
                    amount,
                    percentage: ratio(amount, total),
                })
            })
            .collect();
        items.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.category_id.cmp(&b.category_id))
        });
        Ok(items)
    }

    /// The month's breakdown, each item compared with the same category last month.
    pub fn category_breakdown_with_trend(&self, month_key: &str) -> Result<Vec<CategoryTrendItem>> {
        let month = MonthKey::parse(month_key)?;
        let previous: HashMap<Uuid, Decimal> = self
            .breakdown_for(&month.previous())?
            .into_iter()
            .map(|item| (item.category_id, item.amount))
            .collect();
        Ok(self
            .breakdown_for(&month)?
            .into_iter()
            .map(|item| {
                let previous_amount = previous
                    .get(&item.category_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let trend = trend(item.amount, previous_amount);
                CategoryTrendItem {
                    item,
                    previous_amount,
                    trend,
                    direction: classify_trend(trend),
                }
            })
            .collect())
    }

    /// Income and expense for the last `month_count` months up to the current one, oldest first.
    pub fn income_vs_expense_series(&self, month_count: usize) -> Result<Vec<IncomeExpenseBar>> {
        self.income_vs_expense_series_ending(&MonthKey::current(), month_count)
    }

    pub fn income_vs_expense_series_ending(
        &self,
        last: &MonthKey,
        month_count: usize,
    ) -> Result<Vec<IncomeExpenseBar>> {
        let mut bars = Vec::with_capacity(month_count);
        for back in (0..month_count).rev() {
            let month = last.shift(-(back as i32));
            let txs = self.query.in_month(&month, None)?;
            bars.push(IncomeExpenseBar {
                month: month.to_string(),
                label: month.label(),
                income: total_income(&txs),
                expense: total_expense(&txs),
            });
        }
        Ok(bars)
    }

    /// Per-day expense for one category. Buckets are days, not weeks.
    pub fn weekly_spend_by_category(
        &self,
        category_id: Uuid,
        month_key: &str,
    ) -> Result<Vec<DailyPoint>> {
        let month = MonthKey::parse(month_key)?;
        let filter = TransactionFilter::default()
            .in_month(&month)
            .of_type(TransactionType::Expense)
            .in_category(category_id);
        Ok(daily_totals(&self.query.query(&filter)?))
    }

    /// Monday-to-Sunday expense review for the week containing `as_of`.
    pub fn weekly_review(&self, as_of: NaiveDate) -> Result<WeeklyReview> {
        let week_start =
            as_of - Duration::days(i64::from(as_of.weekday().num_days_from_monday()));
        let week_end = week_start + Duration::days(6);
        let filter = TransactionFilter::default()
            .between(week_start.and_time(NaiveTime::MIN), week_end.and_time(end_of_day()))
            .of_type(TransactionType::Expense);
        let expenses = self.query.query(&filter)?;

        let total_spent = total_expense(&expenses);
        let elapsed = (as_of.min(week_end) - week_start).num_days().max(1);
        let avg_daily_spend = ratio(total_spent, Decimal::from(elapsed));

        let mut by_category: Vec<(Uuid, Decimal)> =
            sum_by_category(&expenses).into_iter().collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let biggest_category = match by_category.first().copied() {
            Some((id, amount)) => Some(NamedAmount {
                name: self
                    .store
                    .category(id)?
                    .map(|c| c.name)
                    .unwrap_or_else(|| "Other".to_string()),
                amount,
            }),
            None => None,
        };

        let lowest_day = daily_totals(&expenses)
            .into_iter()
            .min_by(|a, b| a.amount.cmp(&b.amount).then_with(|| a.date.cmp(&b.date)));

        Ok(WeeklyReview {
            week_start,
            week_end,
            total_spent,
            avg_daily_spend,
            biggest_category,
            lowest_day,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn trend_needs_previous_spend() {
        assert_eq!(trend(dec!(150), dec!(100)), dec!(0.5));
        assert_eq!(trend(dec!(50), dec!(100)), dec!(-0.5));
        assert_eq!(trend(dec!(50), dec!(0)), Decimal::ZERO);
        assert_eq!(classify_trend(dec!(0.5)), TrendDirection::Increase);
        assert_eq!(classify_trend(dec!(-0.1)), TrendDirection::Decrease);
        assert_eq!(classify_trend(Decimal::ZERO), TrendDirection::Flat);
    }

    #[test]
    fn trend_saturates_instead_of_overflowing() {
        let t = trend(dec!(10000000000000000000000), dec!(0.0000001));
        assert_eq!(t, Decimal::MAX);
        assert_eq!(classify_trend(t), TrendDirection::Increase);
    }

    #[test]
    fn daily_totals_are_sparse_and_ascending() {
        let cat = Uuid::nil();
        let d = |day: u32, h: u32| {
            NaiveDate::from_ymd_opt(2025, 5, day)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let txs = vec![
            Transaction::new(TransactionType::Expense, dec!(5), "USD", cat, d(9, 10)),
            Transaction::new(TransactionType::Expense, dec!(7.5), "USD", cat, d(3, 10)),
            Transaction::new(TransactionType::Expense, dec!(2.5), "USD", cat, d(9, 22)),
        ];
        let points = daily_totals(&txs);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2025, 5, 3).unwrap());
        assert_eq!(points[1].amount, dec!(7.5));
    }
}
