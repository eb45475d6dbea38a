// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{json_flags, Context};
use crate::models::Theme;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context as _, Result};
use chrono::NaiveTime;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(ctx, sub)?,
        Some(("set", sub)) => set(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let p = ctx.store.preferences()?;
    if maybe_print_json(json_flag, jsonl_flag, &p)? {
        return Ok(());
    }
    let data = vec![
        vec!["currency".into(), p.currency.clone()],
        vec!["theme".into(), p.theme.as_str().into()],
        vec!["reminders".into(), p.reminders_enabled.to_string()],
        vec!["reminder time".into(), p.reminder_time.format("%H:%M").to_string()],
        vec!["haptics".into(), p.haptics_enabled.to_string()],
        vec!["budgets".into(), p.budgets_enabled.to_string()],
        vec!["onboarding completed".into(), p.onboarding_completed.to_string()],
    ];
    println!("{}", pretty_table(&["Preference", "Value"], data));
    Ok(())
}

fn set(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let mut p = ctx.store.preferences()?;
    if let Some(c) = sub.get_one::<String>("currency") {
        p.currency = c.clone();
    }
    if let Some(t) = sub.get_one::<String>("theme") {
        p.theme = Theme::from_stored(t);
    }
    if let Some(v) = sub.get_one::<bool>("reminders") {
        p.reminders_enabled = *v;
    }
    if let Some(t) = sub.get_one::<String>("reminder-time") {
        p.reminder_time = NaiveTime::parse_from_str(t.trim(), "%H:%M")
            .with_context(|| format!("Invalid time '{}', expected HH:MM", t))?;
    }
    if let Some(v) = sub.get_one::<bool>("haptics") {
        p.haptics_enabled = *v;
    }
    if let Some(v) = sub.get_one::<bool>("budgets") {
        p.budgets_enabled = *v;
    }
    if let Some(v) = sub.get_one::<bool>("onboarding-completed") {
        p.onboarding_completed = *v;
    }
    ctx.store.update_preferences(&p)?;
    println!("Preferences saved");
    Ok(())
}
