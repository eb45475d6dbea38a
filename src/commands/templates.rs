// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{json_flags, Context};
use crate::models::{Template, TransactionType};
use crate::utils::{maybe_print_json, parse_datetime, parse_decimal, pretty_table};
use anyhow::{anyhow, Result};
use chrono::Local;
use uuid::Uuid;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => {
            let (json_flag, jsonl_flag) = json_flags(sub);
            let templates = ctx.store.templates()?;
            if !maybe_print_json(json_flag, jsonl_flag, &templates)? {
                let mut data = Vec::with_capacity(templates.len());
                for t in &templates {
                    data.push(vec![
                        t.name.clone(),
                        t.r#type.to_string(),
                        t.amount.to_string(),
                        ctx.store.category_name(t.category_id)?,
                        ctx.store.payment_method_name(t.payment_method_id)?,
                        t.id.to_string(),
                    ]);
                }
                let headers = ["Template", "Type", "Amount", "Category", "Paid with", "Id"];
                println!("{}", pretty_table(&headers, data));
            }
        }
        Some(("use", sub)) => {
            let template = find(ctx, sub.get_one::<String>("id").unwrap())?;
            let at = match sub.get_one::<String>("date") {
                Some(s) => parse_datetime(s)?,
                None => Local::now().naive_local(),
            };
            let tx = ctx.store.stamp_template(template.id, at)?;
            ctx.refresh_snapshot();
            println!(
                "Recorded '{}' {} {} on {} ({})",
                template.name, tx.amount, tx.currency, tx.date, tx.id
            );
        }
        Some(("rm", sub)) => {
            let template = find(ctx, sub.get_one::<String>("id").unwrap())?;
            ctx.store.delete_template(template.id)?;
            println!("Removed template '{}'", template.name);
        }
        _ => {}
    }
    Ok(())
}

fn add(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let r#type = sub
        .get_one::<String>("type")
        .unwrap()
        .parse::<TransactionType>()
        .map_err(|e| anyhow!(e))?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = ctx.category(sub.get_one::<String>("category").unwrap())?;
    let next_order = ctx
        .store
        .templates()?
        .iter()
        .map(|t| t.sort_order + 1)
        .max()
        .unwrap_or(0);
    let mut template = Template::new(name.trim(), r#type, amount, category.id, next_order);
    if let Some(pm) = sub.get_one::<String>("pm") {
        template.payment_method_id = Some(ctx.payment_method(pm)?.id);
    }
    ctx.store.create_template(&template)?;
    println!("Added template '{}' ({})", template.name, template.id);
    Ok(())
}

fn find(ctx: &Context, name_or_id: &str) -> Result<Template> {
    let needle = name_or_id.trim();
    let templates = ctx.store.templates()?;
    let by_id = Uuid::parse_str(needle).ok();
    templates
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(needle) || Some(t.id) == by_id)
        .ok_or_else(|| anyhow!("Unknown template '{}'", name_or_id))
}
