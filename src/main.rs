// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ledgerly::commands::{self, Context};
use ledgerly::config::Settings;
use ledgerly::{cli, Store};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    let settings = Settings::resolve(
        matches.get_one::<String>("db").map(String::as_str),
        matches.get_one::<String>("snapshot").map(String::as_str),
        matches.get_one::<String>("log-level").map(String::as_str),
    )?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = Store::open(&settings.db_path)?;
    let ctx = Context::new(&store, settings.snapshot_path.clone());

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", settings.db_path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub)?,
        Some(("category", sub)) => commands::categories::handle(&ctx, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&ctx, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&ctx, sub)?,
        Some(("template", sub)) => commands::templates::handle(&ctx, sub)?,
        Some(("pm", sub)) => commands::payment_methods::handle(&ctx, sub)?,
        Some(("prefs", sub)) => commands::prefs::handle(&ctx, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ctx, sub)?,
        Some(("backup", sub)) => commands::backup::handle(&ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub)?,
        Some(("reset", sub)) => {
            if !sub.get_flag("yes") {
                anyhow::bail!("Refusing to reset without --yes");
            }
            store.reset_all()?;
            ctx.refresh_snapshot();
            println!("Ledger reset to defaults");
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
