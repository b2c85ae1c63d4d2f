// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::report::{MONTH_NAMES_PT_BR, export_file_name, write_csv_file};
use crate::store::{SqliteStore, summary_for_year};
use crate::utils::year_or_current;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = year_or_current(sub.get_one::<String>("year"))?;
    let out = sub
        .get_one::<String>("out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(export_file_name(year)));

    let store = SqliteStore::new(conn);
    let summary = summary_for_year(&store, year)
        .with_context(|| format!("Could not aggregate {}", year))?;
    write_csv_file(&summary, &MONTH_NAMES_PT_BR, &out)
        .with_context(|| format!("Could not write {}", out.display()))?;
    println!("Exported {} report to {}", year, out.display());
    Ok(())
}
