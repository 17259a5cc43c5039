// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("pocketledger")
        .version(crate_version!())
        .about("Personal finance ledger, budgets, and financial education progress")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path to the SQLite database (default: platform data dir)"),
        )
        .arg(
            Arg::new("currency")
                .long("currency")
                .global(true)
                .help("Currency code used when printing amounts"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .help("Log level when RUST_LOG is not set"),
        )
        .subcommand(Command::new("init").about("Create the database and seed default data"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description").default_value(""))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(Arg::new("user").long("user")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .help("Regex matched against the description"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(json_flags(
            Command::new("summary").about("Balance and current-month figures"),
        ))
        .subcommand(
            Command::new("stats")
                .about("Statistics")
                .subcommand(json_flags(
                    Command::new("monthly").about("Income and expenses per month"),
                ))
                .subcommand(json_flags(
                    Command::new("categories").about("Current-month expenses per category"),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Budget categories")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("budget").long("budget"))
                        .arg(Arg::new("spent").long("spent"))
                        .arg(Arg::new("color").long("color"))
                        .arg(Arg::new("icon").long("icon")),
                )
                .subcommand(json_flags(Command::new("status")))
                .subcommand(json_flags(Command::new("drift").about(
                    "Compare recorded spent with this month's expense transactions",
                ))),
        )
        .subcommand(
            Command::new("learn")
                .about("Financial education")
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("category").long("category").value_parser([
                            "basics",
                            "budgeting",
                            "savings",
                            "investing",
                            "debt",
                            "advanced",
                        ]))
                        .arg(Arg::new("difficulty").long("difficulty").value_parser([
                            "beginner",
                            "intermediate",
                            "advanced",
                        ])),
                ))
                .subcommand(Command::new("show").arg(Arg::new("id").required(true)))
                .subcommand(
                    Command::new("complete")
                        .arg(Arg::new("id").required(true))
                        .arg(
                            Arg::new("minutes")
                                .long("minutes")
                                .default_value("0")
                                .value_parser(value_parser!(u32)),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("progress").arg(
                        Arg::new("limit")
                            .long("limit")
                            .default_value("5")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(json_flags(Command::new("recommend")))
                .subcommand(json_flags(
                    Command::new("quiz").arg(Arg::new("id").required(true)),
                ))
                .subcommand(
                    Command::new("submit")
                        .arg(Arg::new("id").required(true))
                        .arg(
                            Arg::new("answers")
                                .long("answers")
                                .value_delimiter(',')
                                .value_parser(value_parser!(usize))
                                .required(true)
                                .help("Chosen option index per question, e.g. 1,0"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("api")
                .about("Remote API (not used by the local commands)")
                .subcommand(Command::new("get").arg(Arg::new("endpoint").required(true)))
                .subcommand(
                    Command::new("token")
                        .about("Set the bearer token; empty clears it")
                        .arg(Arg::new("token").required(true).allow_hyphen_values(true)),
                ),
        )
}
