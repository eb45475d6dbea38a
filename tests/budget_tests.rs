// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerly::budget::BudgetEngine;
use ledgerly::models::{Transaction, TransactionType};
use ledgerly::{LedgerError, Store};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn spend(store: &Store, cat: Uuid, amount: Decimal, day: u32) {
    let date = NaiveDate::from_ymd_opt(2025, 8, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let tx = Transaction::new(TransactionType::Expense, amount, "USD", cat, date);
    store.create_transaction(&tx).unwrap();
}

fn setup() -> (Store, Uuid) {
    let store = Store::open_in_memory().unwrap();
    let cat = store.find_category("Entertainment").unwrap().unwrap().id;
    (store, cat)
}

#[test]
fn ninety_percent_of_a_budget_is_near() {
    let (store, cat) = setup();
    let engine = BudgetEngine::new(&store);
    engine.create_or_update_budget(cat, "2025-08", dec!(100)).unwrap();
    spend(&store, cat, dec!(40), 3);
    spend(&store, cat, dec!(50), 9);

    let summaries = engine.budget_summaries("2025-08").unwrap();
    assert_eq!(summaries.len(), 1);
    let s = &summaries[0];
    assert_eq!(s.spent, dec!(90));
    assert_eq!(s.percentage, dec!(0.9));
    assert!(s.is_near);
    assert!(!s.is_over);
}

#[test]
fn eighty_percent_is_neither_near_nor_over() {
    let (store, cat) = setup();
    let engine = BudgetEngine::new(&store);
    engine.create_or_update_budget(cat, "2025-08", dec!(100)).unwrap();
    spend(&store, cat, dec!(30), 3);
    spend(&store, cat, dec!(50), 9);

    let s = &engine.budget_summaries("2025-08").unwrap()[0];
    assert!(!s.is_near);
    assert!(!s.is_over);
}

#[test]
fn upsert_keeps_one_budget_per_category_and_month() {
    let (store, cat) = setup();
    let engine = BudgetEngine::new(&store);
    let first = engine.create_or_update_budget(cat, "2025-08", dec!(100)).unwrap();
    let second = engine.create_or_update_budget(cat, "2025-08", dec!(150)).unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(store.budgets().unwrap().len(), 1);
    assert_eq!(store.budgets().unwrap()[0].limit, dec!(150));

    engine.create_or_update_budget(cat, "2025-09", dec!(80)).unwrap();
    assert_eq!(store.budgets().unwrap().len(), 2);
}

#[test]
fn bad_budget_input_is_rejected() {
    let (store, cat) = setup();
    let engine = BudgetEngine::new(&store);
    assert!(matches!(
        engine.create_or_update_budget(cat, "2025-08", dec!(-1)),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        engine.create_or_update_budget(cat, "2025-8", dec!(10)),
        Err(LedgerError::Validation(_))
    ));
    assert!(store.budgets().unwrap().is_empty());
}

#[test]
fn overall_percentage_and_worst_offenders() {
    let (store, fun) = setup();
    let coffee = store.find_category("Coffee").unwrap().unwrap().id;
    let rent = store.find_category("Rent").unwrap().unwrap().id;
    let engine = BudgetEngine::new(&store);
    assert_eq!(engine.total_budget_spent_percent("2025-08").unwrap(), Decimal::ZERO);

    engine.create_or_update_budget(fun, "2025-08", dec!(50)).unwrap();
    engine.create_or_update_budget(coffee, "2025-08", dec!(20)).unwrap();
    engine.create_or_update_budget(rent, "2025-08", dec!(1000)).unwrap();
    spend(&store, fun, dec!(60), 2);
    spend(&store, coffee, dec!(45), 2);
    spend(&store, rent, dec!(965), 1);

    assert_eq!(engine.total_budget_spent_percent("2025-08").unwrap(), dec!(1));
    let worst = engine.top_overspent_categories("2025-08", 5).unwrap();
    let ids: Vec<Uuid> = worst.iter().map(|s| s.category_id).collect();
    assert_eq!(ids, vec![coffee, fun]);
    assert_eq!(engine.top_overspent_categories("2025-08", 1).unwrap().len(), 1);
}

#[test]
fn income_does_not_count_against_budgets() {
    let (store, cat) = setup();
    let engine = BudgetEngine::new(&store);
    engine.create_or_update_budget(cat, "2025-08", dec!(10)).unwrap();
    let refund = Transaction::new(
        TransactionType::Income,
        dec!(25),
        "USD",
        cat,
        NaiveDate::from_ymd_opt(2025, 8, 4).unwrap().and_hms_opt(9, 0, 0).unwrap(),
    );
    store.create_transaction(&refund).unwrap();
    let s = &engine.budget_summaries("2025-08").unwrap()[0];
    assert_eq!(s.spent, Decimal::ZERO);
}
