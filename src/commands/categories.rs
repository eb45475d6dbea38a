// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{json_flags, Context};
use crate::models::Category;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let icon = sub.get_one::<String>("icon").unwrap();
            let color = sub.get_one::<String>("color").unwrap();
            let next_order = ctx
                .store
                .categories()?
                .iter()
                .map(|c| c.sort_order + 1)
                .max()
                .unwrap_or(0);
            let category = Category::new(name.trim(), icon, color, next_order);
            ctx.store.create_category(&category)?;
            println!("Added category '{}' ({})", category.name, category.id);
        }
        Some(("list", sub)) => {
            let (json_flag, jsonl_flag) = json_flags(sub);
            let cats = ctx.store.categories()?;
            if !maybe_print_json(json_flag, jsonl_flag, &cats)? {
                let data = cats
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            c.icon.clone(),
                            c.color.clone(),
                            if c.is_system { "yes".into() } else { String::new() },
                            c.id.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Icon", "Color", "System", "Id"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let category = ctx.category(sub.get_one::<String>("id").unwrap())?;
            ctx.store.delete_category(category.id)?;
            println!("Removed category '{}'", category.name);
        }
        _ => {}
    }
    Ok(())
}
