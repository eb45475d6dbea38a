// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use ledgerly::models::{Category, Goal, Transaction, TransactionType};
use ledgerly::{LedgerError, Store};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn groceries(store: &Store) -> Uuid {
    store.find_category("groceries").unwrap().unwrap().id
}

#[test]
fn fresh_store_is_seeded_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");
    {
        let store = Store::open(&path).unwrap();
        assert_eq!(store.categories().unwrap().len(), 13);
        assert_eq!(store.payment_methods().unwrap().len(), 3);
        assert_eq!(store.templates().unwrap().len(), 4);
        assert_eq!(store.preferences().unwrap().currency, "USD");
    }
    let store = Store::open(&path).unwrap();
    assert_eq!(store.categories().unwrap().len(), 13);
}

#[test]
fn non_positive_amounts_are_rejected() {
    let store = Store::open_in_memory().unwrap();
    let cat = groceries(&store);
    for amount in [dec!(0), dec!(-3.50)] {
        let tx = Transaction::new(TransactionType::Expense, amount, "USD", cat, at(2025, 1, 1, 9));
        assert!(matches!(
            store.create_transaction(&tx),
            Err(LedgerError::Validation(_))
        ));
    }
    assert!(store.all_transactions().unwrap().is_empty());
}

#[test]
fn edits_and_deletes_of_missing_records_fail() {
    let store = Store::open_in_memory().unwrap();
    let mut ghost = Transaction::new(
        TransactionType::Expense,
        dec!(1),
        "USD",
        groceries(&store),
        at(2025, 1, 1, 9),
    );
    assert!(matches!(
        store.update_transaction(&mut ghost),
        Err(LedgerError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete_transaction(ghost.id),
        Err(LedgerError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete_goal(Uuid::new_v4()),
        Err(LedgerError::NotFound { .. })
    ));
}

#[test]
fn edit_round_trips_every_field() {
    let store = Store::open_in_memory().unwrap();
    let cash = store.find_payment_method("cash").unwrap().unwrap();
    let mut tx = Transaction::new(
        TransactionType::Expense,
        dec!(12.40),
        "usd",
        groceries(&store),
        at(2025, 3, 2, 18),
    )
    .with_note("market")
    .with_tags(["weekly", "food"])
    .with_payment_method(cash.id);
    store.create_transaction(&tx).unwrap();

    let stored = store.transaction(tx.id).unwrap().unwrap();
    assert_eq!(stored.currency, "USD");
    assert_eq!(stored.tags, vec!["weekly", "food"]);
    assert_eq!(stored.payment_method_id, Some(cash.id));

    tx.amount = dec!(13.05);
    tx.note = "farmers market".into();
    store.update_transaction(&mut tx).unwrap();
    let stored = store.transaction(tx.id).unwrap().unwrap();
    assert_eq!(stored.amount, dec!(13.05));
    assert_eq!(stored.note, "farmers market");
    assert!(stored.updated_at >= stored.created_at);
}

#[test]
fn system_categories_cannot_be_deleted() {
    let store = Store::open_in_memory().unwrap();
    let cat = groceries(&store);
    assert!(matches!(
        store.delete_category(cat),
        Err(LedgerError::Validation(_))
    ));

    let custom = Category::new("Pets", "pawprint", "orange", 20);
    store.create_category(&custom).unwrap();
    store.delete_category(custom.id).unwrap();
    assert_eq!(store.category_name(custom.id).unwrap(), "Unknown");
}

#[test]
fn deleting_a_payment_method_leaves_transactions_with_a_blank_name() {
    let store = Store::open_in_memory().unwrap();
    let card = store.find_payment_method("Card").unwrap().unwrap();
    let tx = Transaction::new(
        TransactionType::Expense,
        dec!(9),
        "USD",
        groceries(&store),
        at(2025, 2, 1, 8),
    )
    .with_payment_method(card.id);
    store.create_transaction(&tx).unwrap();
    store.delete_payment_method(card.id).unwrap();

    let stored = store.transaction(tx.id).unwrap().unwrap();
    assert_eq!(stored.payment_method_id, Some(card.id));
    assert_eq!(store.payment_method_name(stored.payment_method_id).unwrap(), "");
}

#[test]
fn duplicate_copies_under_a_new_id() {
    let store = Store::open_in_memory().unwrap();
    let tx = Transaction::new(
        TransactionType::Expense,
        dec!(4.20),
        "EUR",
        groceries(&store),
        at(2025, 4, 1, 8),
    )
    .with_note("bread");
    store.create_transaction(&tx).unwrap();

    let copy = store.duplicate_transaction(tx.id, at(2025, 4, 2, 8)).unwrap();
    assert_ne!(copy.id, tx.id);
    assert_eq!(copy.amount, tx.amount);
    assert_eq!(copy.note, "bread");
    assert_eq!(store.all_transactions().unwrap().len(), 2);
}

#[test]
fn templates_stamp_in_the_preferred_currency() {
    let store = Store::open_in_memory().unwrap();
    let mut prefs = store.preferences().unwrap();
    prefs.currency = "gbp".into();
    store.update_preferences(&prefs).unwrap();

    let coffee = store
        .templates()
        .unwrap()
        .into_iter()
        .find(|t| t.name == "Coffee")
        .unwrap();
    let tx = store.stamp_template(coffee.id, at(2025, 5, 5, 7)).unwrap();
    assert_eq!(tx.currency, "GBP");
    assert_eq!(tx.amount, dec!(5.00));
    assert_eq!(tx.note, "Coffee");
    assert_eq!(tx.template_id, Some(coffee.id));
}

#[test]
fn goal_contributions_accumulate() {
    let store = Store::open_in_memory().unwrap();
    let goal = Goal::new("Bike", dec!(600), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    store.create_goal(&goal).unwrap();
    store.add_to_goal(goal.id, dec!(150)).unwrap();
    let goal = store.add_to_goal(goal.id, dec!(150)).unwrap();
    assert_eq!(goal.current_amount, dec!(300));
    assert_eq!(goal.progress(), dec!(0.5));
    assert!(matches!(
        store.add_to_goal(goal.id, dec!(0)),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn reset_restores_seed_data() {
    let store = Store::open_in_memory().unwrap();
    let custom = Category::new("Pets", "pawprint", "orange", 20);
    store.create_category(&custom).unwrap();
    let tx = Transaction::new(TransactionType::Income, dec!(10), "USD", custom.id, at(2025, 1, 1, 1));
    store.create_transaction(&tx).unwrap();
    let mut prefs = store.preferences().unwrap();
    prefs.currency = "JPY".into();
    store.update_preferences(&prefs).unwrap();

    store.reset_all().unwrap();
    assert!(store.all_transactions().unwrap().is_empty());
    assert_eq!(store.categories().unwrap().len(), 13);
    assert!(store.category(custom.id).unwrap().is_none());
    assert_eq!(store.preferences().unwrap().currency, "USD");
}

#[test]
fn catalog_records_can_be_renamed() {
    let store = Store::open_in_memory().unwrap();
    let mut coffee = store.find_category("Coffee").unwrap().unwrap();
    coffee.name = "Cafés".into();
    store.update_category(&coffee).unwrap();
    assert_eq!(store.category_name(coffee.id).unwrap(), "Cafés");

    coffee.name = "  ".into();
    assert!(matches!(
        store.update_category(&coffee),
        Err(LedgerError::Validation(_))
    ));

    let mut taxi = store
        .templates()
        .unwrap()
        .into_iter()
        .find(|t| t.name == "Taxi")
        .unwrap();
    taxi.amount = dec!(18.50);
    store.update_template(&taxi).unwrap();
    assert_eq!(store.template(taxi.id).unwrap().unwrap().amount, dec!(18.50));

    let mut cash = store.find_payment_method("Cash").unwrap().unwrap();
    cash.icon = "dollarsign".into();
    store.update_payment_method(&cash).unwrap();
    assert_eq!(store.payment_method(cash.id).unwrap().unwrap().icon, "dollarsign");
}
