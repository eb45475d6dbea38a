// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, Result};
use anyhow::Context;
use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

static MONTH_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").unwrap());

/// A validated `YYYY-MM` calendar month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    first: NaiveDate,
}

impl MonthKey {
    pub fn parse(s: &str) -> Result<Self> {
        let caps = MONTH_KEY.captures(s.trim()).ok_or_else(|| {
            LedgerError::validation(format!("Invalid month '{}', expected YYYY-MM", s))
        })?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| LedgerError::validation(format!("Invalid year in month '{}'", s)))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| LedgerError::validation(format!("Invalid month number in '{}'", s)))?;
        Self::new(year, month)
            .ok_or_else(|| LedgerError::validation(format!("Invalid month number {}", month)))
    }

    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// Month containing today's local date.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive bounds: midnight of the first day through the last instant of the last day.
    pub fn range(&self) -> (NaiveDateTime, NaiveDateTime) {
        (
            self.first.and_time(NaiveTime::MIN),
            self.last_day().and_time(end_of_day()),
        )
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let (start, end) = self.range();
        at >= start && at <= end
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    pub fn shift(&self, months: i32) -> Self {
        let step = Months::new(months.unsigned_abs());
        let moved = if months >= 0 {
            self.first.checked_add_months(step)
        } else {
            self.first.checked_sub_months(step)
        };
        Self {
            first: moved.unwrap_or(self.first),
        }
    }

    /// Short month name, e.g. `Feb`.
    pub fn label(&self) -> String {
        self.first.format("%b").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        MonthKey::parse(s)
    }
}

pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

/// Upper-cased three letter ISO 4217 style code.
pub fn normalize_currency(s: &str) -> Result<String> {
    let code = s.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(LedgerError::validation(format!(
            "Invalid currency code '{}', expected three letters",
            s
        )));
    }
    Ok(code)
}

pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS` (space separator works too).
pub fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    let day = parse_date(s)
        .with_context(|| format!("Invalid date-time '{}', expected YYYY-MM-DD[THH:MM[:SS]]", s))?;
    Ok(day.and_time(NaiveTime::MIN))
}

pub fn parse_decimal(s: &str) -> anyhow::Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_uuid(s: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(s.trim()).with_context(|| format!("Invalid id '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn fmt_percent(ratio: &Decimal) -> String {
    format!("{:.1}%", (*ratio * Decimal::ONE_HUNDRED).round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
