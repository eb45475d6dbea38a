// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(format!("Unknown transaction type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub category_id: Uuid,
    /// Wall-clock time in the reporting timezone.
    pub date: NaiveDateTime,
    pub note: String,
    pub payment_method_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        r#type: TransactionType,
        amount: Decimal,
        currency: &str,
        category_id: Uuid,
        date: NaiveDateTime,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            r#type,
            amount,
            currency: currency.to_string(),
            category_id,
            date,
            note: String::new(),
            payment_method_id: None,
            tags: Vec::new(),
            template_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_payment_method(mut self, payment_method_id: Uuid) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_system: bool,
    pub sort_order: i64,
}

impl Category {
    pub fn new(name: &str, icon: &str, color: &str, sort_order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            is_system: false,
            sort_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub month: String, // YYYY-MM
    pub limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: NaiveDate,
    pub current_amount: Decimal,
    pub sort_order: i64,
}

impl Goal {
    pub fn new(name: &str, target_amount: Decimal, target_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            target_amount,
            target_date,
            current_amount: Decimal::ZERO,
            sort_order: 0,
        }
    }

    /// Saved share of the target, capped at 1. Zero when the target is not positive.
    pub fn progress(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.current_amount / self.target_amount).min(Decimal::ONE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub category_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub sort_order: i64,
}

impl Template {
    pub fn new(
        name: &str,
        r#type: TransactionType,
        amount: Decimal,
        category_id: Uuid,
        sort_order: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            r#type,
            amount,
            category_id,
            payment_method_id: None,
            sort_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub sort_order: i64,
}

impl PaymentMethod {
    pub fn new(name: &str, icon: &str, sort_order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            icon: icon.to_string(),
            sort_order,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Unknown stored values fall back to following the system.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub currency: String,
    pub reminders_enabled: bool,
    pub reminder_time: NaiveTime,
    pub haptics_enabled: bool,
    pub theme: Theme,
    pub budgets_enabled: bool,
    pub onboarding_completed: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            reminders_enabled: false,
            reminder_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            haptics_enabled: true,
            theme: Theme::System,
            budgets_enabled: true,
            onboarding_completed: false,
        }
    }
}
