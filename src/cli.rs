// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Month key, defaults to the current month")
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_parser(["expense", "income"])
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id").required(true).help(help)
}

pub fn build_cli() -> Command {
    Command::new("ledgerly")
        .version(crate_version!())
        .about("Personal finance tracker: transactions, budgets, goals, reports and backups")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite database file (default: $LEDGERLY_DB or the platform data dir)"),
        )
        .arg(
            Arg::new("snapshot")
                .long("snapshot")
                .global(true)
                .value_name("PATH")
                .help("Month snapshot file (default: next to the database)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .value_name("FILTER")
                .help("Tracing filter, e.g. info or ledgerly=debug (default: $LEDGERLY_LOG or warn)"),
        )
        .subcommand(Command::new("init").about("Create the database and seed defaults"))
        .subcommand(transactions_cmd())
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("icon").long("icon").default_value("tag"))
                        .arg(Arg::new("color").long("color").default_value("gray")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg("Category name or id"))),
        )
        .subcommand(budgets_cmd())
        .subcommand(goals_cmd())
        .subcommand(templates_cmd())
        .subcommand(
            Command::new("pm")
                .about("Manage payment methods")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("icon").long("icon").default_value("creditcard")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg("Payment method name or id"))),
        )
        .subcommand(
            Command::new("prefs")
                .about("Show or change preferences")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("currency").long("currency"))
                        .arg(
                            Arg::new("theme")
                                .long("theme")
                                .value_parser(["system", "light", "dark"]),
                        )
                        .arg(
                            Arg::new("reminders")
                                .long("reminders")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(Arg::new("reminder-time").long("reminder-time").value_name("HH:MM"))
                        .arg(
                            Arg::new("haptics")
                                .long("haptics")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(
                            Arg::new("budgets")
                                .long("budgets")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(
                            Arg::new("onboarding-completed")
                                .long("onboarding-completed")
                                .value_parser(value_parser!(bool)),
                        ),
                ),
        )
        .subcommand(reports_cmd())
        .subcommand(
            Command::new("backup")
                .about("Versioned JSON backups")
                .subcommand(
                    Command::new("export").arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("import")
                        .arg(Arg::new("file").required(true))
                        .arg(
                            Arg::new("replace")
                                .long("replace")
                                .action(ArgAction::SetTrue)
                                .help("Wipe existing records first (preferences are kept)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Flat exports")
                .subcommand(
                    Command::new("csv")
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(month_arg().help("Only this month")),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Delete everything and restore the seeded defaults")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the wipe"),
                ),
        )
}

fn transactions_cmd() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand(
            Command::new("add")
                .arg(type_arg().default_value("expense"))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS], defaults to now"),
                )
                .arg(Arg::new("note").long("note"))
                .arg(Arg::new("pm").long("pm").help("Payment method name or id"))
                .arg(Arg::new("tag").long("tag").action(ArgAction::Append))
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .help("Defaults to the preferred currency"),
                ),
        )
        .subcommand(json_args(
            Command::new("list")
                .arg(month_arg().help("Only this month"))
                .arg(Arg::new("from").long("from"))
                .arg(Arg::new("to").long("to"))
                .arg(type_arg())
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("pm").long("pm"))
                .arg(Arg::new("search").long("search"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .arg(id_arg("Transaction id"))
                .arg(type_arg())
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("note").long("note"))
                .arg(Arg::new("pm").long("pm"))
                .arg(Arg::new("tag").long("tag").action(ArgAction::Append)),
        )
        .subcommand(Command::new("rm").arg(id_arg("Transaction id")))
        .subcommand(
            Command::new("dup")
                .arg(id_arg("Transaction id"))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(json_args(
            Command::new("group").arg(month_arg()).arg(type_arg()),
        ))
}

fn budgets_cmd() -> Command {
    Command::new("budget")
        .about("Monthly category budgets")
        .subcommand(
            Command::new("set")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(month_arg()),
        )
        .subcommand(json_args(Command::new("list").arg(month_arg())))
        .subcommand(json_args(
            Command::new("status").arg(month_arg()).arg(
                Arg::new("top")
                    .long("top")
                    .value_parser(value_parser!(usize))
                    .help("Only the N worst overspent categories"),
            ),
        ))
        .subcommand(Command::new("rm").arg(id_arg("Budget id")))
}

fn goals_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("by").long("by").required(true).value_name("YYYY-MM-DD")),
        )
        .subcommand(json_args(Command::new("list")))
        .subcommand(
            Command::new("fund")
                .arg(id_arg("Goal id"))
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(Command::new("rm").arg(id_arg("Goal id")))
}

fn templates_cmd() -> Command {
    Command::new("template")
        .about("Quick-add templates")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").required(true))
                .arg(type_arg().default_value("expense"))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("pm").long("pm")),
        )
        .subcommand(json_args(Command::new("list")))
        .subcommand(
            Command::new("use")
                .arg(id_arg("Template name or id"))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(Command::new("rm").arg(id_arg("Template name or id")))
}

fn reports_cmd() -> Command {
    Command::new("report")
        .about("Chart-ready reports")
        .subcommand(json_args(Command::new("daily").arg(month_arg())))
        .subcommand(json_args(
            Command::new("breakdown").arg(month_arg()).arg(
                Arg::new("trend")
                    .long("trend")
                    .action(ArgAction::SetTrue)
                    .help("Compare with the previous month"),
            ),
        ))
        .subcommand(json_args(
            Command::new("bars")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize))
                        .default_value("6"),
                )
                .arg(Arg::new("ending").long("ending").value_name("YYYY-MM")),
        ))
        .subcommand(json_args(
            Command::new("category-days")
                .arg(Arg::new("category").long("category").required(true))
                .arg(month_arg()),
        ))
        .subcommand(json_args(
            Command::new("review").arg(Arg::new("as-of").long("as-of").value_name("YYYY-MM-DD")),
        ))
        .subcommand(json_args(
            Command::new("snapshot").arg(month_arg()).arg(
                Arg::new("write")
                    .long("write")
                    .action(ArgAction::SetTrue)
                    .help("Also refresh the snapshot file"),
            ),
        ))
}
