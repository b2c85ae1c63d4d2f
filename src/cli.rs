// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::DB_ENV;
use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

const AMOUNT_HELP: &str = "Amount: 1500.50 or 1.500,50 (1.500 alone is rejected)";

fn year_arg() -> Arg {
    Arg::new("year").long("year").required(true).help("Budget year, e.g. 2026")
}

fn month_arg() -> Arg {
    Arg::new("month").long("month").required(true).help("Month number 1-12")
}

fn category_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("color").long("color").help("Display color, e.g. #FFADAD"))
        .arg(Arg::new("order").long("order").help("Display position"))
        .arg(Arg::new("due_day").long("due-day").help("Day of month the expense is due"))
}

pub fn build_cli() -> Command {
    Command::new("fincontrol")
        .version(crate_version!())
        .about("Household budget: planned vs. actual spend, monthly income, yearly reports")
        .arg(
            Arg::new("db")
                .long("db")
                .env(DB_ENV)
                .global(true)
                .value_name("PATH")
                .help("SQLite database file"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("category")
                .about("Manage spending categories")
                .subcommand(category_fields(
                    Command::new("add").arg(Arg::new("name").long("name").required(true)),
                ))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(category_fields(
                    Command::new("edit")
                        .arg(Arg::new("category").required(true).help("Id or name"))
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("clear_due_day")
                                .long("clear-due-day")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("due_day")
                                .help("Drop the due day; a name with \"Dia NN\" derives it again"),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category and all of its values")
                        .arg(Arg::new("category").required(true).help("Id or name")),
                )
                .subcommand(Command::new("seed").about("Insert the default categories")),
        )
        .subcommand(
            Command::new("tx")
                .about("Planned and actual values per category and month")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(Arg::new("planned").long("planned").help(AMOUNT_HELP))
                        .arg(Arg::new("actual").long("actual").help(AMOUNT_HELP))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(year_arg())
                        .arg(Arg::new("month").long("month")),
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(
                    Command::new("reset-actual")
                        .about("Zero every actual value of a year; planned values are kept")
                        .arg(year_arg()),
                ),
        )
        .subcommand(
            Command::new("income")
                .about("Monthly income")
                .subcommand(
                    Command::new("set")
                        .arg(year_arg())
                        .arg(month_arg())
                        .arg(Arg::new("aposentadoria").long("aposentadoria"))
                        .arg(Arg::new("salario").long("salario"))
                        .arg(Arg::new("recursos_externos").long("recursos-externos"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(Command::new("list").arg(year_arg())))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(json_flags(
            Command::new("summary")
                .about("Yearly totals by month and category")
                .arg(Arg::new("year").help("Defaults to the current year")),
        ))
        .subcommand(
            Command::new("balance")
                .about("Income minus actual spend for one month")
                .arg(Arg::new("year").required(true))
                .arg(Arg::new("month").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk load a year from CSV")
                .subcommand(
                    Command::new("grid")
                        .about("Sheet with header `Mês,<category>,...` and one row per month")
                        .arg(Arg::new("path").required(true))
                        .arg(year_arg())
                        .arg(
                            Arg::new("fill")
                                .long("fill")
                                .value_parser(["both", "planned", "actual"])
                                .default_value("both")
                                .help("Which value the sheet sets; the other is kept"),
                        ),
                )
                .subcommand(
                    Command::new("incomes")
                        .about("Rows `Mês,Aposentadoria,Salário,Recursos externos`; replaces the year's income")
                        .arg(Arg::new("path").required(true))
                        .arg(year_arg()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write the yearly CSV report")
                .arg(Arg::new("year").help("Defaults to the current year"))
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Output file (default relatorio-financeiro-<year>.csv)"),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Report orphaned and malformed records")
                .arg(Arg::new("year").long("year")),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}
