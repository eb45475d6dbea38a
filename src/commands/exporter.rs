// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Context;
use crate::backup::export_csv_with;
use crate::query::TransactionQuery;
use crate::utils::MonthKey;
use anyhow::{Context as _, Result};

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => export_csv(ctx, sub),
        _ => Ok(()),
    }
}

fn export_csv(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    let transactions = match sub.get_one::<String>("month") {
        Some(m) => TransactionQuery::new(ctx.store).in_month(&MonthKey::parse(m)?, None)?,
        None => ctx.store.all_transactions()?,
    };
    let body = export_csv_with(
        &transactions,
        &ctx.store.categories()?,
        &ctx.store.payment_methods()?,
        &ctx.store.preferences()?.currency,
    )?;
    std::fs::write(out, body).with_context(|| format!("Could not write {}", out))?;
    println!("Exported {} transactions to {}", transactions.len(), out);
    Ok(())
}
