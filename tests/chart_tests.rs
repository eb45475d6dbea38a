// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use ledgerly::charts::{ChartBuilder, TrendDirection};
use ledgerly::models::{Category, Transaction, TransactionType};
use ledgerly::utils::MonthKey;
use ledgerly::Store;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn record(store: &Store, r#type: TransactionType, cat: Uuid, amount: Decimal, date: NaiveDateTime) {
    let tx = Transaction::new(r#type, amount, "USD", cat, date);
    store.create_transaction(&tx).unwrap();
}

fn cat(store: &Store, name: &str) -> Uuid {
    store.find_category(name).unwrap().unwrap().id
}

#[test]
fn empty_month_has_empty_breakdown() {
    let store = Store::open_in_memory().unwrap();
    let charts = ChartBuilder::new(&store);
    assert!(charts.category_breakdown("2025-02").unwrap().is_empty());
    assert!(charts.daily_expense_series("2025-02").unwrap().is_empty());
}

#[test]
fn breakdown_is_sorted_and_drops_deleted_categories() {
    let store = Store::open_in_memory().unwrap();
    let pets = Category::new("Pets", "pawprint", "orange", 20);
    store.create_category(&pets).unwrap();
    let groceries = cat(&store, "Groceries");
    let coffee = cat(&store, "Coffee");
    record(&store, TransactionType::Expense, groceries, dec!(60), at(2025, 3, 1));
    record(&store, TransactionType::Expense, coffee, dec!(20), at(2025, 3, 2));
    record(&store, TransactionType::Expense, pets.id, dec!(20), at(2025, 3, 3));
    record(&store, TransactionType::Income, cat(&store, "Salary"), dec!(999), at(2025, 3, 3));
    store.delete_category(pets.id).unwrap();

    let items = ChartBuilder::new(&store).category_breakdown("2025-03").unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Groceries", "Coffee"]);
    // shares are of the whole month's expense, the orphaned spend included
    assert_eq!(items[0].percentage, dec!(0.6));
    assert_eq!(items[1].percentage, dec!(0.2));
}

#[test]
fn daily_series_sums_per_day() {
    let store = Store::open_in_memory().unwrap();
    let groceries = cat(&store, "Groceries");
    record(&store, TransactionType::Expense, groceries, dec!(1.25), at(2025, 4, 10));
    record(&store, TransactionType::Expense, groceries, dec!(2.50), at(2025, 4, 10));
    record(&store, TransactionType::Expense, groceries, dec!(4), at(2025, 4, 2));

    let points = ChartBuilder::new(&store).daily_expense_series("2025-04").unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());
    assert_eq!(points[1].amount, dec!(3.75));
}

#[test]
fn bars_run_oldest_to_newest_across_a_year_boundary() {
    let store = Store::open_in_memory().unwrap();
    record(&store, TransactionType::Income, cat(&store, "Salary"), dec!(3000), at(2024, 12, 28));
    record(&store, TransactionType::Expense, cat(&store, "Rent"), dec!(1200), at(2025, 1, 1));

    let end = MonthKey::parse("2025-01").unwrap();
    let bars = ChartBuilder::new(&store)
        .income_vs_expense_series_ending(&end, 3)
        .unwrap();
    let months: Vec<&str> = bars.iter().map(|b| b.month.as_str()).collect();
    assert_eq!(months, vec!["2024-11", "2024-12", "2025-01"]);
    assert_eq!(bars[1].income, dec!(3000));
    assert_eq!(bars[2].expense, dec!(1200));
    assert_eq!(bars[2].label, "Jan");
    assert_eq!(ChartBuilder::new(&store).income_vs_expense_series(6).unwrap().len(), 6);
}

#[test]
fn trend_compares_with_the_previous_month() {
    let store = Store::open_in_memory().unwrap();
    let coffee = cat(&store, "Coffee");
    let travel = cat(&store, "Travel");
    record(&store, TransactionType::Expense, coffee, dec!(40), at(2025, 4, 5));
    record(&store, TransactionType::Expense, coffee, dec!(30), at(2025, 5, 5));
    record(&store, TransactionType::Expense, travel, dec!(100), at(2025, 5, 6));

    let items = ChartBuilder::new(&store)
        .category_breakdown_with_trend("2025-05")
        .unwrap();
    let coffee_item = items.iter().find(|t| t.item.category_id == coffee).unwrap();
    assert_eq!(coffee_item.previous_amount, dec!(40));
    assert_eq!(coffee_item.trend, dec!(-0.25));
    assert_eq!(coffee_item.direction, TrendDirection::Decrease);
    let travel_item = items.iter().find(|t| t.item.category_id == travel).unwrap();
    assert_eq!(travel_item.direction, TrendDirection::Flat);
}

#[test]
fn category_days_only_include_that_category() {
    let store = Store::open_in_memory().unwrap();
    let coffee = cat(&store, "Coffee");
    record(&store, TransactionType::Expense, coffee, dec!(3), at(2025, 6, 2));
    record(&store, TransactionType::Expense, coffee, dec!(3), at(2025, 6, 2));
    record(&store, TransactionType::Expense, cat(&store, "Rent"), dec!(900), at(2025, 6, 2));

    let points = ChartBuilder::new(&store)
        .weekly_spend_by_category(coffee, "2025-06")
        .unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].amount, dec!(6));
}

#[test]
fn weekly_review_summarises_monday_to_sunday() {
    let store = Store::open_in_memory().unwrap();
    let coffee = cat(&store, "Coffee");
    let groceries = cat(&store, "Groceries");
    // 2025-06-09 is a Monday
    record(&store, TransactionType::Expense, coffee, dec!(4), at(2025, 6, 9));
    record(&store, TransactionType::Expense, groceries, dec!(50), at(2025, 6, 10));
    record(&store, TransactionType::Expense, coffee, dec!(6), at(2025, 6, 11));
    record(&store, TransactionType::Expense, groceries, dec!(500), at(2025, 6, 8));

    let as_of = NaiveDate::from_ymd_opt(2025, 6, 13).unwrap();
    let review = ChartBuilder::new(&store).weekly_review(as_of).unwrap();
    assert_eq!(review.week_start, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
    assert_eq!(review.week_end, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    assert_eq!(review.total_spent, dec!(60));
    assert_eq!(review.avg_daily_spend, dec!(15));
    let biggest = review.biggest_category.unwrap();
    assert_eq!(biggest.name, "Groceries");
    assert_eq!(biggest.amount, dec!(50));
    assert_eq!(review.lowest_day.unwrap().amount, dec!(4));
}

#[test]
fn weekly_review_of_an_empty_week() {
    let store = Store::open_in_memory().unwrap();
    let review = ChartBuilder::new(&store)
        .weekly_review(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap())
        .unwrap();
    assert_eq!(review.total_spent, Decimal::ZERO);
    assert_eq!(review.avg_daily_spend, Decimal::ZERO);
    assert!(review.biggest_category.is_none());
    assert!(review.lowest_day.is_none());
}
