// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{json_flags, month_or_current, Context};
use crate::charts::ChartBuilder;
use crate::snapshot;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_date, pretty_table, MonthKey};
use anyhow::Result;
use chrono::Local;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("daily", sub)) => daily(ctx, sub)?,
        Some(("breakdown", sub)) => breakdown(ctx, sub)?,
        Some(("bars", sub)) => bars(ctx, sub)?,
        Some(("category-days", sub)) => category_days(ctx, sub)?,
        Some(("review", sub)) => review(ctx, sub)?,
        Some(("snapshot", sub)) => month_snapshot(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn currency(ctx: &Context) -> Result<String> {
    Ok(ctx.store.preferences()?.currency)
}

fn daily(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let points = ChartBuilder::new(ctx.store).daily_expense_series(&month_or_current(sub))?;
    if !maybe_print_json(json_flag, jsonl_flag, &points)? {
        let ccy = currency(ctx)?;
        let data = points
            .iter()
            .map(|p| vec![p.date.to_string(), fmt_money(&p.amount, &ccy)])
            .collect();
        println!("{}", pretty_table(&["Day", "Spent"], data));
    }
    Ok(())
}

fn breakdown(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let month = month_or_current(sub);
    let charts = ChartBuilder::new(ctx.store);
    let ccy = currency(ctx)?;
    if sub.get_flag("trend") {
        let items = charts.category_breakdown_with_trend(&month)?;
        if !maybe_print_json(json_flag, jsonl_flag, &items)? {
            let data = items
                .iter()
                .map(|t| {
                    vec![
                        t.item.name.clone(),
                        fmt_money(&t.item.amount, &ccy),
                        fmt_percent(&t.item.percentage),
                        fmt_money(&t.previous_amount, &ccy),
                        fmt_percent(&t.trend),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Category", "Spent", "Share", "Last month", "Change"], data)
            );
        }
        return Ok(());
    }
    let items = charts.category_breakdown(&month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        let data = items
            .iter()
            .map(|i| {
                vec![
                    i.name.clone(),
                    fmt_money(&i.amount, &ccy),
                    fmt_percent(&i.percentage),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], data));
    }
    Ok(())
}

fn bars(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let count = *sub.get_one::<usize>("months").unwrap();
    let ending = match sub.get_one::<String>("ending") {
        Some(m) => MonthKey::parse(m)?,
        None => MonthKey::current(),
    };
    let bars = ChartBuilder::new(ctx.store).income_vs_expense_series_ending(&ending, count)?;
    if !maybe_print_json(json_flag, jsonl_flag, &bars)? {
        let ccy = currency(ctx)?;
        let data = bars
            .iter()
            .map(|b| {
                vec![
                    b.month.clone(),
                    fmt_money(&b.income, &ccy),
                    fmt_money(&b.expense, &ccy),
                    fmt_money(&(b.income - b.expense), &ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], data));
    }
    Ok(())
}

fn category_days(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let category = ctx.category(sub.get_one::<String>("category").unwrap())?;
    let points = ChartBuilder::new(ctx.store)
        .weekly_spend_by_category(category.id, &month_or_current(sub))?;
    if !maybe_print_json(json_flag, jsonl_flag, &points)? {
        let ccy = currency(ctx)?;
        let data = points
            .iter()
            .map(|p| vec![p.date.to_string(), fmt_money(&p.amount, &ccy)])
            .collect();
        println!("{}", pretty_table(&["Day", category.name.as_str()], data));
    }
    Ok(())
}

fn review(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let as_of = match sub.get_one::<String>("as-of") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let review = ChartBuilder::new(ctx.store).weekly_review(as_of)?;
    if maybe_print_json(json_flag, jsonl_flag, &review)? {
        return Ok(());
    }
    let ccy = currency(ctx)?;
    let biggest = review
        .biggest_category
        .as_ref()
        .map(|b| format!("{} ({})", b.name, fmt_money(&b.amount, &ccy)))
        .unwrap_or_else(|| "-".into());
    let lowest = review
        .lowest_day
        .as_ref()
        .map(|d| format!("{} ({})", d.date.format("%a %b %-d"), fmt_money(&d.amount, &ccy)))
        .unwrap_or_else(|| "-".into());
    let data = vec![
        vec!["Week".into(), format!("{} to {}", review.week_start, review.week_end)],
        vec!["Spent".into(), fmt_money(&review.total_spent, &ccy)],
        vec!["Daily average".into(), fmt_money(&review.avg_daily_spend, &ccy)],
        vec!["Biggest category".into(), biggest],
        vec!["Lightest day".into(), lowest],
    ];
    println!("{}", pretty_table(&["Weekly review", ""], data));
    Ok(())
}

fn month_snapshot(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let snap = snapshot::month_snapshot(ctx.store, &month_or_current(sub))?;
    if sub.get_flag("write") {
        snapshot::write_snapshot(&snap, &ctx.snapshot_path)?;
        eprintln!("Wrote {}", ctx.snapshot_path.display());
    }
    if !maybe_print_json(json_flag, jsonl_flag, &snap)? {
        let data = vec![vec![
            snap.month.clone(),
            fmt_money(&snap.income, &snap.currency_code),
            fmt_money(&snap.expense, &snap.currency_code),
            fmt_money(&snap.net, &snap.currency_code),
        ]];
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], data));
    }
    Ok(())
}
