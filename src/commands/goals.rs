// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{json_flags, Context};
use crate::models::Goal;
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_date, parse_decimal, parse_uuid, pretty_table,
};
use anyhow::Result;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
            let by = parse_date(sub.get_one::<String>("by").unwrap())?;
            let mut goal = Goal::new(name.trim(), target, by);
            goal.sort_order = ctx
                .store
                .goals()?
                .iter()
                .map(|g| g.sort_order + 1)
                .max()
                .unwrap_or(0);
            ctx.store.create_goal(&goal)?;
            println!("Added goal '{}' ({})", goal.name, goal.id);
        }
        Some(("list", sub)) => {
            let (json_flag, jsonl_flag) = json_flags(sub);
            let goals = ctx.store.goals()?;
            if !maybe_print_json(json_flag, jsonl_flag, &goals)? {
                let ccy = ctx.store.preferences()?.currency;
                let data = goals
                    .iter()
                    .map(|g| {
                        vec![
                            g.name.clone(),
                            fmt_money(&g.current_amount, &ccy),
                            fmt_money(&g.target_amount, &ccy),
                            fmt_percent(&g.progress()),
                            g.target_date.to_string(),
                            g.id.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Goal", "Saved", "Target", "Progress", "By", "Id"], data)
                );
            }
        }
        Some(("fund", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let goal = ctx.store.add_to_goal(id, amount)?;
            println!(
                "'{}' now at {} of {} ({})",
                goal.name,
                goal.current_amount,
                goal.target_amount,
                fmt_percent(&goal.progress())
            );
        }
        Some(("rm", sub)) => {
            let id = parse_uuid(sub.get_one::<String>("id").unwrap())?;
            ctx.store.delete_goal(id)?;
            println!("Removed goal {}", id);
        }
        _ => {}
    }
    Ok(())
}
