// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{json_flags, month_or_current, Context};
use crate::models::{Transaction, TransactionType};
use crate::query::{group_by_day, TransactionFilter, TransactionQuery};
use crate::utils::{
    fmt_money, maybe_print_json, parse_datetime, parse_decimal, parse_uuid, pretty_table,
    MonthKey,
};
use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            ctx.store.delete_transaction(id)?;
            ctx.refresh_snapshot();
            println!("Removed transaction {}", id);
        }
        Some(("dup", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            let at = date_or_now(sub)?;
            let copy = ctx.store.duplicate_transaction(id, at)?;
            ctx.refresh_snapshot();
            println!("Duplicated {} as {} on {}", id, copy.id, copy.date);
        }
        Some(("group", sub)) => group(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn date_or_now(sub: &clap::ArgMatches) -> Result<NaiveDateTime> {
    match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s),
        None => Ok(Local::now().naive_local()),
    }
}

fn type_of(sub: &clap::ArgMatches) -> Result<Option<TransactionType>> {
    sub.get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>().map_err(|e| anyhow!(e)))
        .transpose()
}

fn tags_of(sub: &clap::ArgMatches) -> Option<Vec<String>> {
    sub.get_many::<String>("tag")
        .map(|tags| tags.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect())
}

fn add(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let r#type = type_of(sub)?.unwrap_or(TransactionType::Expense);
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = ctx.category(sub.get_one::<String>("category").unwrap())?;
    let date = date_or_now(sub)?;
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.clone(),
        None => ctx.store.preferences()?.currency,
    };

    let mut tx = Transaction::new(r#type, amount, &currency, category.id, date);
    if let Some(note) = sub.get_one::<String>("note") {
        tx = tx.with_note(note.clone());
    }
    if let Some(tags) = tags_of(sub) {
        tx = tx.with_tags(tags);
    }
    if let Some(pm) = sub.get_one::<String>("pm") {
        tx = tx.with_payment_method(ctx.payment_method(pm)?.id);
    }
    ctx.store.create_transaction(&tx)?;
    ctx.refresh_snapshot();
    println!(
        "Recorded {} {} in '{}' on {} ({})",
        tx.r#type,
        fmt_money(&tx.amount, &tx.currency.to_uppercase()),
        category.name,
        tx.date,
        tx.id
    );
    Ok(())
}

fn edit(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
    let mut tx = ctx
        .store
        .transaction(id)?
        .ok_or_else(|| anyhow!("Transaction {} not found", id))?;
    if let Some(t) = type_of(sub)? {
        tx.r#type = t;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        tx.amount = parse_decimal(a)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        tx.category_id = ctx.category(c)?.id;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        tx.date = parse_datetime(d)?;
    }
    if let Some(n) = sub.get_one::<String>("note") {
        tx.note = n.clone();
    }
    if let Some(pm) = sub.get_one::<String>("pm") {
        tx.payment_method_id = if pm.trim().is_empty() {
            None
        } else {
            Some(ctx.payment_method(pm)?.id)
        };
    }
    if let Some(tags) = tags_of(sub) {
        tx.tags = tags;
    }
    ctx.store.update_transaction(&mut tx)?;
    ctx.refresh_snapshot();
    println!("Updated transaction {}", tx.id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    pub payment_method: String,
    pub note: String,
    pub tags: String,
}

/// Builds the filter from `tx list` arguments. `--month` wins over `--from/--to`.
pub fn filter_from(ctx: &Context, sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::default();
    if let Some(month) = sub.get_one::<String>("month") {
        filter = filter.in_month(&MonthKey::parse(month)?);
    } else {
        if let Some(from) = sub.get_one::<String>("from") {
            filter.start = Some(parse_datetime(from)?);
        }
        if let Some(to) = sub.get_one::<String>("to") {
            let end = parse_datetime(to)?;
            // a bare date covers the whole day
            filter.end = Some(if end.time() == NaiveTime::MIN {
                end.date().and_time(crate::utils::end_of_day())
            } else {
                end
            });
        }
    }
    if let Some(t) = type_of(sub)? {
        filter = filter.of_type(t);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        filter = filter.in_category(ctx.category(c)?.id);
    }
    if let Some(pm) = sub.get_one::<String>("pm") {
        filter = filter.paid_with(ctx.payment_method(pm)?.id);
    }
    if let Some(s) = sub.get_one::<String>("search") {
        filter = filter.matching(s.clone());
    }
    Ok(filter)
}

pub fn query_rows(ctx: &Context, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = filter_from(ctx, sub)?;
    let mut txs = TransactionQuery::new(ctx.store).query(&filter)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }
    txs.iter().map(|tx| to_row(ctx, tx)).collect()
}

fn to_row(ctx: &Context, tx: &Transaction) -> Result<TransactionRow> {
    Ok(TransactionRow {
        id: tx.id.to_string(),
        date: tx.date.format("%Y-%m-%d %H:%M").to_string(),
        r#type: tx.r#type.to_string(),
        category: ctx.store.category_name(tx.category_id)?,
        amount: tx.amount.to_string(),
        currency: tx.currency.clone(),
        payment_method: ctx.store.payment_method_name(tx.payment_method_id)?,
        note: tx.note.clone(),
        tags: tx.tags.join(", "),
    })
}

fn render(rows: &[TransactionRow]) -> String {
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.date.clone(),
                r.r#type.clone(),
                r.category.clone(),
                r.amount.clone(),
                r.currency.clone(),
                r.payment_method.clone(),
                r.note.clone(),
                r.tags.clone(),
                r.id.clone(),
            ]
        })
        .collect();
    pretty_table(
        &["Date", "Type", "Category", "Amount", "CCY", "Paid with", "Note", "Tags", "Id"],
        data,
    )
    .to_string()
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let data = query_rows(ctx, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", render(&data));
    }
    Ok(())
}

#[derive(Serialize)]
struct GroupOut {
    day: String,
    items: Vec<TransactionRow>,
}

fn group(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let month = month_or_current(sub);
    let txs = TransactionQuery::new(ctx.store).transactions_in_month(&month, type_of(sub)?)?;
    let mut out = Vec::new();
    for g in group_by_day(&txs) {
        out.push(GroupOut {
            day: g.day.to_string(),
            items: g
                .items
                .iter()
                .map(|tx| to_row(ctx, tx))
                .collect::<Result<_>>()?,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        for g in &out {
            println!("{}", g.day);
            println!("{}", render(&g.items));
        }
    }
    Ok(())
}
