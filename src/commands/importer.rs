// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::categories::next_order;
use crate::models::{CategoryDraft, MONTHS_IN_YEAR, palette_color};
use crate::store::{EntityStore, SqliteStore};
use crate::utils::{parse_decimal, parse_month_label, parse_year};
use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord, Trim};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    Both,
    Planned,
    Actual,
}

impl Fill {
    fn from_arg(s: &str) -> Result<Self> {
        match s {
            "both" => Ok(Self::Both),
            "planned" => Ok(Self::Planned),
            "actual" => Ok(Self::Actual),
            other => Err(anyhow!("Unknown fill '{}'", other)),
        }
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("grid", sub)) => import_grid(conn, sub),
        Some(("incomes", sub)) => import_incomes(conn, sub),
        _ => Ok(()),
    }
}

fn reader(path: &str) -> Result<csv::Reader<std::fs::File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))
}

fn is_blank(rec: &StringRecord) -> bool {
    rec.iter().all(str::is_empty)
}

fn amount(raw: &str) -> Result<Decimal> {
    if raw.is_empty() {
        Ok(Decimal::ZERO)
    } else {
        parse_decimal(raw)
    }
}

/// Loads a category x month sheet. Unknown column names become new
/// categories (due day from the name, next order, palette color); known
/// names reuse the existing category. Empty cells count as zero.
fn import_grid(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let year = parse_year(sub.get_one::<String>("year").unwrap())?;
    let fill = Fill::from_arg(sub.get_one::<String>("fill").map_or("both", String::as_str))?;
    let mut rdr = reader(path)?;
    let names: Vec<String> = rdr
        .headers()?
        .iter()
        .skip(1)
        .map(|h| h.replace('\n', " ").trim().to_string())
        .collect();
    if names.iter().all(String::is_empty) {
        return Err(anyhow!("{}: header has no category columns", path));
    }

    let tx = conn.unchecked_transaction()?;
    let store = SqliteStore::new(&tx);
    let mut known = store.list_categories()?;
    let by_name: HashMap<String, i64> = known.iter().map(|c| (c.name.clone(), c.id)).collect();

    let mut columns: Vec<Option<i64>> = Vec::with_capacity(names.len());
    let mut created = 0usize;
    for (i, name) in names.iter().enumerate() {
        if name.is_empty() {
            columns.push(None);
            continue;
        }
        if let Some(&id) = by_name.get(name) {
            columns.push(Some(id));
            continue;
        }
        let cat = store.add_category(&CategoryDraft {
            name: name.clone(),
            due_day: None,
            color: palette_color(i).to_string(),
            order: next_order(&known),
        })?;
        created += 1;
        columns.push(Some(cat.id));
        known.push(cat);
    }

    let mut cells = 0usize;
    let mut seen_months = [false; MONTHS_IN_YEAR];
    for result in rdr.records() {
        let rec = result?;
        if is_blank(&rec) {
            continue;
        }
        let label = rec.get(0).unwrap_or("");
        let month = parse_month_label(label).with_context(|| format!("In {}", path))?;
        if std::mem::replace(&mut seen_months[month as usize - 1], true) {
            return Err(anyhow!("Month '{}' appears twice in {}", label, path));
        }
        for (col, cat_id) in columns.iter().enumerate() {
            let Some(cat_id) = *cat_id else { continue };
            let raw = rec.get(col + 1).unwrap_or("");
            let value = amount(raw).with_context(|| {
                format!("Invalid amount '{}' for {} in month {}", raw, names[col], month)
            })?;
            let current = store.transaction_at(cat_id, year, month)?;
            let kept_planned = current.as_ref().map_or(Decimal::ZERO, |t| t.planned_value);
            let kept_actual = current.as_ref().map_or(Decimal::ZERO, |t| t.actual_value);
            let (planned, actual) = match fill {
                Fill::Both => (value, value),
                Fill::Planned => (value, kept_actual),
                Fill::Actual => (kept_planned, value),
            };
            let notes = current.and_then(|t| t.notes);
            store.upsert_transaction(cat_id, year, month, planned, actual, notes.as_deref())?;
            cells += 1;
        }
    }
    tx.commit()?;
    tracing::info!(year, cells, created, path, "grid imported");
    println!(
        "Imported {} value(s) for {} from {} ({} new categories)",
        cells, year, path, created
    );
    Ok(())
}

/// Loads `month, aposentadoria, salario, recursos_externos[, note]` rows.
/// The year's income is replaced as a whole.
fn import_incomes(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let year = parse_year(sub.get_one::<String>("year").unwrap())?;
    let mut rdr = reader(path)?;

    let tx = conn.unchecked_transaction()?;
    let store = SqliteStore::new(&tx);
    let removed = store.delete_incomes_for_year(year)?;
    let mut created = 0usize;
    for result in rdr.records() {
        let rec = result?;
        if is_blank(&rec) {
            continue;
        }
        let label = rec.get(0).unwrap_or("");
        let month = parse_month_label(label).with_context(|| format!("In {}", path))?;
        let field = |idx: usize, name: &str| -> Result<Decimal> {
            let raw = rec.get(idx).unwrap_or("");
            amount(raw).with_context(|| format!("Invalid {} '{}' in month {}", name, raw, month))
        };
        let aposentadoria = field(1, "aposentadoria")?;
        let salario = field(2, "salario")?;
        let recursos = field(3, "recursos_externos")?;
        let note = rec.get(4).filter(|s| !s.is_empty());
        if store.income(year, month)?.is_some() {
            return Err(anyhow!("Month '{}' appears twice in {}", label, path));
        }
        store.upsert_income(year, month, aposentadoria, salario, recursos, note)?;
        created += 1;
    }
    tx.commit()?;
    tracing::info!(year, removed, created, path, "incomes imported");
    println!(
        "Imported {} income month(s) for {} from {} (replaced {})",
        created, year, path, removed
    );
    Ok(())
}
