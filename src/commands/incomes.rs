// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{EntityStore, SqliteStore};
use crate::utils::{
    currency_marker, maybe_print_json, money, parse_decimal, parse_month, parse_year,
    pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

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
            store.delete_income(id)?;
            println!("Removed income {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn set(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(sub.get_one::<String>("year").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let existing = store.income(year, month)?;

    let field = |name: &str, current: Option<Decimal>| -> Result<Decimal> {
        match sub.get_one::<String>(name) {
            Some(s) => parse_decimal(s),
            None => Ok(current.unwrap_or(Decimal::ZERO)),
        }
    };
    let aposentadoria = field("aposentadoria", existing.as_ref().map(|i| i.aposentadoria))?;
    let salario = field("salario", existing.as_ref().map(|i| i.salario))?;
    let recursos = field(
        "recursos_externos",
        existing.as_ref().map(|i| i.recursos_externos),
    )?;
    let notes = sub
        .get_one::<String>("note")
        .map(|s| s.to_string())
        .or_else(|| existing.as_ref().and_then(|i| i.notes.clone()));

    let inc = store.upsert_income(year, month, aposentadoria, salario, recursos, notes.as_deref())?;
    println!("Income {:02}/{}: total {}", inc.month, inc.year, inc.total()?);
    Ok(())
}

fn list(conn: &Connection, store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(sub.get_one::<String>("year").unwrap())?;
    let data = store.list_incomes(year)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let marker = currency_marker(conn)?;
    let rows = data
        .iter()
        .map(|i| {
            Ok(vec![
                i.id.to_string(),
                format!("{:02}/{}", i.month, i.year),
                money(&marker, i.aposentadoria),
                money(&marker, i.salario),
                money(&marker, i.recursos_externos),
                money(&marker, i.total()?),
            ])
        })
        .collect::<Result<Vec<_>>>()?;
    println!(
        "{}",
        pretty_table(
            &["Id", "Month", "Aposentadoria", "Salário", "Recursos externos", "Total"],
            rows
        )
    );
    Ok(())
}
