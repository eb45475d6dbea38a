// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{json_flags, month_or_current, Context};
use crate::budget::{BudgetEngine, BudgetSummary};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_decimal, parse_uuid, pretty_table, MonthKey,
};
use anyhow::Result;
use serde::Serialize;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("status", sub)) => status(ctx, sub)?,
        Some(("rm", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            ctx.store.delete_budget(id)?;
            println!("Removed budget {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn set(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub);
    let category = ctx.category(sub.get_one::<String>("category").unwrap())?;
    let limit = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let budget = BudgetEngine::new(ctx.store).create_or_update_budget(category.id, &month, limit)?;
    println!(
        "Budget set for {} / {} = {}",
        budget.month, category.name, budget.limit
    );
    Ok(())
}

#[derive(Serialize)]
struct BudgetRow {
    id: String,
    month: String,
    category: String,
    limit: String,
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let budgets = match sub.get_one::<String>("month") {
        Some(m) => ctx.store.budgets_for_month(&MonthKey::parse(m)?)?,
        None => ctx.store.budgets()?,
    };
    let mut data = Vec::with_capacity(budgets.len());
    for b in budgets {
        data.push(BudgetRow {
            id: b.id.to_string(),
            month: b.month,
            category: ctx.store.category_name(b.category_id)?,
            limit: b.limit.to_string(),
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| vec![r.month.clone(), r.category.clone(), r.limit.clone(), r.id.clone()])
            .collect();
        println!("{}", pretty_table(&["Month", "Category", "Limit", "Id"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusRow {
    category: String,
    #[serde(flatten)]
    summary: BudgetSummary,
}

fn status(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let month = month_or_current(sub);
    let engine = BudgetEngine::new(ctx.store);
    let summaries = match sub.get_one::<usize>("top") {
        Some(n) => engine.top_overspent_categories(&month, *n)?,
        None => engine.budget_summaries(&month)?,
    };
    let mut data = Vec::with_capacity(summaries.len());
    for summary in summaries {
        data.push(StatusRow {
            category: ctx.store.category_name(summary.category_id)?,
            summary,
        });
    }
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    let ccy = ctx.store.preferences()?.currency;
    let rows = data
        .iter()
        .map(|r| {
            let s = &r.summary;
            let flag = if s.is_over {
                "OVER"
            } else if s.is_near {
                "near"
            } else {
                ""
            };
            vec![
                r.category.clone(),
                fmt_money(&s.limit, &ccy),
                fmt_money(&s.spent, &ccy),
                fmt_percent(&s.percentage),
                flag.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Limit", "Spent", "Used", "Status"], rows)
    );
    println!(
        "Overall: {} of budgets used in {}",
        fmt_percent(&engine.total_budget_spent_percent(&month)?),
        month
    );
    Ok(())
}
