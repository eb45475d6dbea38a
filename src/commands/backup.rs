// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Context;
use crate::backup::{export_json, import_json};
use anyhow::{Context as _, Result};

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = sub.get_one::<String>("out").unwrap();
            let body = export_json(ctx.store)?;
            std::fs::write(out, body).with_context(|| format!("Could not write {}", out))?;
            println!("Backup written to {}", out);
        }
        Some(("import", sub)) => {
            let file = sub.get_one::<String>("file").unwrap();
            let replace = sub.get_flag("replace");
            let body = std::fs::read(file).with_context(|| format!("Could not read {}", file))?;
            let summary = import_json(ctx.store, &body, replace)?;
            ctx.refresh_snapshot();
            println!(
                "Imported {} transactions, {} categories, {} budgets, {} goals, {} templates, {} payment methods",
                summary.transactions,
                summary.categories,
                summary.budgets,
                summary.goals,
                summary.templates,
                summary.payment_methods
            );
            if summary.skipped_categories + summary.skipped_payment_methods > 0 {
                println!(
                    "Kept {} existing categories and {} existing payment methods",
                    summary.skipped_categories, summary.skipped_payment_methods
                );
            }
        }
        _ => {}
    }
    Ok(())
}
