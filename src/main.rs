// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use fincontrol::{cli, commands, db};

fn main() -> Result<()> {
    fincontrol::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_arg = matches.get_one::<String>("db").map(PathBuf::from);
    let conn = db::open_or_init(db_arg.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = db::resolve_db_path(db_arg.as_deref())?;
            println!("Database initialized at {}", path.display());
        }
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("income", sub)) => commands::incomes::handle(&conn, sub)?,
        Some(("summary", sub)) => commands::reports::summary(&conn, sub)?,
        Some(("balance", sub)) => commands::reports::balance(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
