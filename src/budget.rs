// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::error::Result;
use crate::models::{Budget, TransactionType};
use crate::query::TransactionQuery;
use crate::store::{require_non_negative, Store};
use crate::utils::MonthKey;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// 90% of the limit.
pub const NEAR_LIMIT_RATIO: Decimal = Decimal::from_parts(9, 0, 0, false, 1);

/// Spend against one budget row for one month. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub category_id: Uuid,
    pub limit: Decimal,
    pub spent: Decimal,
    pub percentage: Decimal,
    pub is_over: bool,
    pub is_near: bool,
}

impl BudgetSummary {
    pub fn evaluate(category_id: Uuid, limit: Decimal, spent: Decimal) -> Self {
        let percentage = if limit > Decimal::ZERO {
            ratio(spent, limit)
        } else {
            Decimal::ZERO
        };
        let is_over = spent > limit;
        let is_near = limit > Decimal::ZERO && percentage >= NEAR_LIMIT_RATIO && !is_over;
        Self {
            category_id,
            limit,
            spent,
            percentage,
            is_over,
            is_near,
        }
    }

    pub fn overspend(&self) -> Decimal {
        self.spent - self.limit
    }
}

/// `numerator / denominator`, saturating at `Decimal::MAX` when the quotient does not fit.
pub(crate) fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::MAX)
}

pub struct BudgetEngine<'a> {
    store: &'a Store,
    query: TransactionQuery<'a>,
}

impl<'a> BudgetEngine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            query: TransactionQuery::new(store),
        }
    }

    /// One summary per budget row of the month; categories without a row are absent.
    pub fn budget_summaries(&self, month_key: &str) -> Result<Vec<BudgetSummary>> {
        let month = MonthKey::parse(month_key)?;
        let budgets = self.store.budgets_for_month(&month)?;
        if budgets.is_empty() {
            return Ok(Vec::new());
        }
        let expenses = self.query.in_month(&month, Some(TransactionType::Expense))?;
        let mut spent_by_category: HashMap<Uuid, Decimal> = HashMap::new();
        for tx in &expenses {
            *spent_by_category.entry(tx.category_id).or_insert(Decimal::ZERO) += tx.amount;
        }
        Ok(budgets
            .iter()
            .map(|b| {
                let spent = spent_by_category
                    .get(&b.category_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                BudgetSummary::evaluate(b.category_id, b.limit, spent)
            })
            .collect())
    }

    /// Total spent over total limit across the month's budgets, 0 when there is nothing to divide.
    pub fn total_budget_spent_percent(&self, month_key: &str) -> Result<Decimal> {
        let summaries = self.budget_summaries(month_key)?;
        let total_limit: Decimal = summaries.iter().map(|s| s.limit).sum();
        if summaries.is_empty() || total_limit <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        let total_spent: Decimal = summaries.iter().map(|s| s.spent).sum();
        Ok(ratio(total_spent, total_limit))
    }

    /// Over-limit budgets, worst overspend first.
    pub fn top_overspent_categories(
        &self,
        month_key: &str,
        limit: usize,
    ) -> Result<Vec<BudgetSummary>> {
        let mut over: Vec<BudgetSummary> = self
            .budget_summaries(month_key)?
            .into_iter()
            .filter(|s| s.is_over)
            .collect();
        over.sort_by(|a, b| b.overspend().cmp(&a.overspend()));
        over.truncate(limit);
        Ok(over)
    }

    /// Updates the month's budget for the category when one exists, inserts otherwise.
    pub fn create_or_update_budget(
        &self,
        category_id: Uuid,
        month_key: &str,
        limit: Decimal,
    ) -> Result<Budget> {
        let month = MonthKey::parse(month_key)?.to_string();
        require_non_negative(limit, "budget limit")?;
        let budget = self.store.write(|c| match db::budget_for(c, category_id, &month)? {
            Some(mut existing) => {
                db::update_budget_limit(c, existing.id, limit)?;
                existing.limit = limit;
                Ok(existing)
            }
            None => {
                let budget = Budget {
                    id: Uuid::new_v4(),
                    category_id,
                    month: month.clone(),
                    limit,
                };
                db::insert_budget(c, &budget)?;
                Ok(budget)
            }
        })?;
        tracing::info!(%category_id, month = %budget.month, limit = %limit, "budget saved");
        Ok(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn near_and_over_are_exclusive() {
        let cases = [
            (dec!(100), dec!(0)),
            (dec!(100), dec!(89.99)),
            (dec!(100), dec!(90)),
            (dec!(100), dec!(100)),
            (dec!(100), dec!(100.01)),
            (dec!(0), dec!(0)),
            (dec!(0), dec!(5)),
        ];
        for (limit, spent) in cases {
            let s = BudgetSummary::evaluate(Uuid::nil(), limit, spent);
            assert_eq!(s.is_over, spent > limit);
            assert!(!(s.is_over && s.is_near), "{limit}/{spent}");
        }
    }

    #[test]
    fn ninety_percent_is_near() {
        let s = BudgetSummary::evaluate(Uuid::nil(), dec!(100), dec!(90));
        assert_eq!(s.percentage, dec!(0.9));
        assert!(s.is_near);
        let s = BudgetSummary::evaluate(Uuid::nil(), dec!(100), dec!(80));
        assert!(!s.is_near);
    }

    #[test]
    fn tiny_limit_with_huge_spend_saturates() {
        let huge = dec!(10000000000000000000000);
        let s = BudgetSummary::evaluate(Uuid::nil(), dec!(0.0000001), huge);
        assert_eq!(s.percentage, Decimal::MAX);
        assert!(s.is_over);
        assert!(!s.is_near);
    }

    #[test]
    fn zero_limit_has_zero_percentage() {
        let s = BudgetSummary::evaluate(Uuid::nil(), dec!(0), dec!(12));
        assert_eq!(s.percentage, Decimal::ZERO);
        assert!(s.is_over);
        assert!(!s.is_near);
    }
}
