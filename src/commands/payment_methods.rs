// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{json_flags, Context};
use crate::models::PaymentMethod;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let icon = sub.get_one::<String>("icon").unwrap();
            let next_order = ctx
                .store
                .payment_methods()?
                .iter()
                .map(|pm| pm.sort_order + 1)
                .max()
                .unwrap_or(0);
            let pm = PaymentMethod::new(name.trim(), icon, next_order);
            ctx.store.create_payment_method(&pm)?;
            println!("Added payment method '{}' ({})", pm.name, pm.id);
        }
        Some(("list", sub)) => {
            let (json_flag, jsonl_flag) = json_flags(sub);
            let pms = ctx.store.payment_methods()?;
            if !maybe_print_json(json_flag, jsonl_flag, &pms)? {
                let data = pms
                    .iter()
                    .map(|pm| vec![pm.name.clone(), pm.icon.clone(), pm.id.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Payment method", "Icon", "Id"], data));
            }
        }
        Some(("rm", sub)) => {
            let pm = ctx.payment_method(sub.get_one::<String>("id").unwrap())?;
            ctx.store.delete_payment_method(pm.id)?;
            println!("Removed payment method '{}'", pm.name);
        }
        _ => {}
    }
    Ok(())
}
