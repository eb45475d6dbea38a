// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use ledgerly::backup::{export_csv, export_json, export_store_csv, import_json, CSV_HEADER};
use ledgerly::budget::BudgetEngine;
use ledgerly::models::{Goal, Transaction, TransactionType};
use ledgerly::{LedgerError, Store};
use rust_decimal_macros::dec;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn populated() -> Store {
    let store = Store::open_in_memory().unwrap();
    let groceries = store.find_category("Groceries").unwrap().unwrap().id;
    let card = store.find_payment_method("Card").unwrap().unwrap().id;
    let tx = Transaction::new(TransactionType::Expense, dec!(99.99), "USD", groceries, at(2025, 3, 5, 18))
        .with_note("big \"monthly\" shop, mostly veg")
        .with_tags(["food", "weekly"])
        .with_payment_method(card);
    store.create_transaction(&tx).unwrap();
    let salary = store.find_category("Salary").unwrap().unwrap().id;
    let pay = Transaction::new(TransactionType::Income, dec!(2500.50), "USD", salary, at(2025, 3, 1, 9))
        .with_note("March pay");
    store.create_transaction(&pay).unwrap();
    BudgetEngine::new(&store)
        .create_or_update_budget(groceries, "2025-03", dec!(400))
        .unwrap();
    let mut goal = Goal::new("Holiday", dec!(1200), NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
    goal.current_amount = dec!(310.25);
    store.create_goal(&goal).unwrap();
    store
}

#[test]
fn replace_import_restores_everything() {
    let source = populated();
    let body = export_json(&source).unwrap();

    let target = Store::open_in_memory().unwrap();
    let summary = import_json(&target, &body, true).unwrap();
    assert_eq!(summary.transactions, 2);
    assert_eq!(summary.categories, 13);
    assert_eq!(summary.budgets, 1);
    assert_eq!(summary.goals, 1);

    let before = source.all_transactions().unwrap();
    let after = target.all_transactions().unwrap();
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(after.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.amount, b.amount);
        assert_eq!(a.note, b.note);
        assert_eq!(a.date, b.date);
        assert_eq!(a.tags, b.tags);
        assert_eq!(a.category_id, b.category_id);
        assert_eq!(a.payment_method_id, b.payment_method_id);
    }
    assert_eq!(target.categories().unwrap(), source.categories().unwrap());
    assert_eq!(target.goals().unwrap()[0].current_amount, dec!(310.25));
    assert_eq!(target.budgets().unwrap()[0].limit, dec!(400));
    assert_eq!(target.budgets().unwrap()[0].id, source.budgets().unwrap()[0].id);
}

#[test]
fn replace_import_keeps_preferences() {
    let source = populated();
    let body = export_json(&source).unwrap();
    let target = Store::open_in_memory().unwrap();
    let mut prefs = target.preferences().unwrap();
    prefs.currency = "EUR".into();
    target.update_preferences(&prefs).unwrap();

    import_json(&target, &body, true).unwrap();
    assert_eq!(target.preferences().unwrap().currency, "EUR");
}

#[test]
fn merge_import_keeps_existing_records() {
    let store = populated();
    let body = export_json(&store).unwrap();

    let summary = import_json(&store, &body, false).unwrap();
    assert_eq!(summary.categories, 0);
    assert_eq!(summary.skipped_categories, 13);
    assert_eq!(summary.skipped_payment_methods, 3);
    assert_eq!(summary.transactions, 2);
    // transactions, budget, goal and four templates collide with what is already there
    assert_eq!(summary.reassigned_ids, 8);

    assert_eq!(store.categories().unwrap().len(), 13);
    assert_eq!(store.all_transactions().unwrap().len(), 4);
    assert_eq!(store.budgets().unwrap().len(), 2);
    assert_eq!(store.templates().unwrap().len(), 8);
}

#[test]
fn unsupported_version_leaves_the_store_untouched() {
    let store = populated();
    let body = br#"{"version":0,"exportDate":"2025-01-01T00:00:00Z","transactions":[],
        "categories":[],"budgets":[],"goals":[],"templates":[],"paymentMethods":[]}"#;
    let err = import_json(&store, body, true).unwrap_err();
    assert!(matches!(err, LedgerError::UnsupportedVersion(0)));
    assert_eq!(store.all_transactions().unwrap().len(), 2);
    assert_eq!(store.categories().unwrap().len(), 13);
}

fn document_with(transaction: &str, budget: &str) -> Vec<u8> {
    format!(
        r#"{{"version":1,"exportDate":"2025-04-01T00:00:00Z","categories":[],"goals":[],
        "templates":[],"paymentMethods":[],"transactions":[{transaction}],"budgets":[{budget}]}}"#
    )
    .into_bytes()
}

const GOOD_TX: &str = r#"{"id":"6f1c2d3e-0000-4000-8000-000000000001","type":"expense",
    "amount":12.5,"currencyCode":"eur","categoryId":"6f1c2d3e-0000-4000-8000-0000000000aa",
    "date":"2025-03-09T10:00:00"}"#;
const GOOD_BUDGET: &str =
    r#"{"categoryId":"6f1c2d3e-0000-4000-8000-0000000000aa","monthKey":"2025-03","limit":80}"#;

#[test]
fn invalid_records_reject_the_whole_import() {
    let bad_tx = GOOD_TX
        .replace("12.5", "-50")
        .replace("\"eur\"", "\"not-a-code\"");
    let cases = [
        document_with(&bad_tx, GOOD_BUDGET),
        document_with(&GOOD_TX.replace("12.5", "0"), GOOD_BUDGET),
        document_with(&GOOD_TX.replace("eur", "EURO"), GOOD_BUDGET),
        document_with(GOOD_TX, &GOOD_BUDGET.replace("2025-03", "2025-13")),
        document_with(GOOD_TX, &GOOD_BUDGET.replace("\"limit\":80", "\"limit\":-10")),
    ];
    for replace in [false, true] {
        for body in &cases {
            let store = populated();
            let err = import_json(&store, body, replace).unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "{err}");
            assert_eq!(store.all_transactions().unwrap().len(), 2);
            assert_eq!(store.budgets().unwrap().len(), 1);
            assert_eq!(store.categories().unwrap().len(), 13);
        }
    }
}

#[test]
fn imported_currency_codes_are_normalized() {
    let store = populated();
    let summary = import_json(&store, &document_with(GOOD_TX, GOOD_BUDGET), false).unwrap();
    assert_eq!(summary.transactions, 1);
    assert_eq!(summary.budgets, 1);
    let imported = store
        .all_transactions()
        .unwrap()
        .into_iter()
        .find(|tx| tx.amount == dec!(12.5))
        .unwrap();
    assert_eq!(imported.currency, "EUR");
}

#[test]
fn malformed_json_is_a_decode_error() {
    let store = populated();
    for body in [&b"{not json"[..], &br#"{"version":1}"#[..]] {
        let err = import_json(&store, body, true).unwrap_err();
        assert!(matches!(err, LedgerError::Decode(_)), "{err}");
    }
    assert_eq!(store.all_transactions().unwrap().len(), 2);
}

#[test]
fn backup_json_uses_sorted_camel_case_keys_and_numeric_amounts() {
    let store = populated();
    let text = String::from_utf8(export_json(&store).unwrap()).unwrap();
    let budgets = text.find("\"budgets\"").unwrap();
    let payment_methods = text.find("\"paymentMethods\"").unwrap();
    let version = text.find("\"version\"").unwrap();
    assert!(budgets < payment_methods && payment_methods < version);
    assert!(text.contains("\"exportDate\""));

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["version"], 1);
    let amounts: Vec<f64> = value["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["amount"].as_f64().unwrap())
        .collect();
    assert!(amounts.contains(&99.99));
}

#[test]
fn csv_has_header_and_quotes_when_needed() {
    let store = populated();
    let txs = store.all_transactions().unwrap();
    let body = export_csv(&txs, &store.categories().unwrap(), "USD").unwrap();
    let text = String::from_utf8(body).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), CSV_HEADER.join(","));
    assert_eq!(
        lines.next().unwrap(),
        r#""Mar 5, 2025",expense,Groceries,99.99,"big ""monthly"" shop, mostly veg",,food; weekly"#
    );
    assert_eq!(
        lines.next().unwrap(),
        r#""Mar 1, 2025",income,Salary,2500.50,March pay,,"#
    );
    assert!(lines.next().is_none());
}

#[test]
fn store_csv_resolves_payment_methods_and_unknown_categories() {
    let store = populated();
    let text = String::from_utf8(export_store_csv(&store).unwrap()).unwrap();
    assert!(text.contains(",Card,food; weekly"));

    let orphan = Transaction::new(
        TransactionType::Expense,
        dec!(1),
        "USD",
        uuid::Uuid::new_v4(),
        at(2025, 3, 6, 8),
    );
    store.create_transaction(&orphan).unwrap();
    let text = String::from_utf8(export_store_csv(&store).unwrap()).unwrap();
    assert!(text.contains(r#""Mar 6, 2025",expense,Unknown,1,"#));
}
