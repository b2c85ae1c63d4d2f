// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use crate::store::{EntityStore, SqliteStore};
use crate::utils::{
    currency_marker, maybe_print_json, money, parse_decimal, parse_month, parse_year,
    pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("set", sub)) => set(&store, sub)?,
        Some(("list", sub)) => list(conn, &store, sub)?,
        Some(("rm", sub)) => {
            let raw = sub.get_one::<String>("id").unwrap();
            let id: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid id '{}'", raw))?;
            store.delete_transaction(id)?;
            println!("Removed transaction {}", id);
        }
        Some(("reset-actual", sub)) => {
            let year = parse_year(sub.get_one::<String>("year").unwrap())?;
            let n = store.reset_actual(year)?;
            println!("Reset actual values of {} cell(s) in {}", n, year);
        }
        _ => {}
    }
    Ok(())
}

fn set(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let cat = store.find_category(sub.get_one::<String>("category").unwrap())?;
    let year = parse_year(sub.get_one::<String>("year").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    // Cells are edited one field at a time; unspecified fields keep their value.
    let existing = store.transaction_at(cat.id, year, month)?;

    let planned = match sub.get_one::<String>("planned") {
        Some(s) => parse_decimal(s)?,
        None => existing.as_ref().map_or(Decimal::ZERO, |t| t.planned_value),
    };
    let actual = match sub.get_one::<String>("actual") {
        Some(s) => parse_decimal(s)?,
        None => existing.as_ref().map_or(Decimal::ZERO, |t| t.actual_value),
    };
    let notes = sub
        .get_one::<String>("note")
        .map(|s| s.to_string())
        .or_else(|| existing.as_ref().and_then(|t| t.notes.clone()));

    let t = store.upsert_transaction(cat.id, year, month, planned, actual, notes.as_deref())?;
    println!(
        "{} {:02}/{}: planned {} / actual {}",
        cat.name, t.month, t.year, t.planned_value, t.actual_value
    );
    Ok(())
}

fn list(conn: &Connection, store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(sub.get_one::<String>("year").unwrap())?;
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let names: HashMap<i64, String> = store
        .list_categories()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut data: Vec<Transaction> = store
        .list_transactions(year)?
        .into_iter()
        .filter(|t| month.is_none_or(|m| t.month == m))
        .collect();
    data.sort_by_key(|t| (t.month, t.category_id));

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let marker = currency_marker(conn)?;
    let rows = data
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                format!("{:02}/{}", t.month, t.year),
                names
                    .get(&t.category_id)
                    .cloned()
                    .unwrap_or_else(|| format!("(missing #{})", t.category_id)),
                money(&marker, t.planned_value),
                money(&marker, t.actual_value),
                money(&marker, t.actual_value - t.planned_value),
                t.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Month", "Category", "Planned", "Actual", "Diff", "Notes"],
            rows
        )
    );
    Ok(())
}
