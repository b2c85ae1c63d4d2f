// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, CategoryDraft};
use crate::store::{EntityStore, SqliteStore};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

const DEFAULT_COLOR: &str = "#E5E5E5";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let store = SqliteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => add(&store, sub)?,
        Some(("list", sub)) => list(&store, sub)?,
        Some(("edit", sub)) => edit(&store, sub)?,
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("category").unwrap();
            let cat = store.find_category(key)?;
            let removed = store.delete_category(cat.id)?;
            println!(
                "Removed category '{}' and {} monthly value(s)",
                cat.name, removed
            );
        }
        Some(("seed", _)) => {
            let n = store.seed_default_categories()?;
            if n == 0 {
                println!("Categories already exist; nothing seeded");
            } else {
                println!("Initialized {} default categories", n);
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_order(s: &str) -> Result<i32> {
    s.trim()
        .parse::<i32>()
        .with_context(|| format!("Invalid order '{}'", s))
}

fn parse_due_day(s: &str) -> Result<u32> {
    s.trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid due day '{}'", s))
}

fn add(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let order = match sub.get_one::<String>("order") {
        Some(s) => parse_order(s)?,
        None => next_order(&store.list_categories()?),
    };
    let draft = CategoryDraft {
        name,
        due_day: sub
            .get_one::<String>("due_day")
            .map(|s| parse_due_day(s))
            .transpose()?,
        color: sub
            .get_one::<String>("color")
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        order,
    };
    let cat = store.add_category(&draft)?;
    println!("Added category '{}' (id {})", cat.name, cat.id);
    Ok(())
}

/// Position after the last category.
pub fn next_order(existing: &[Category]) -> i32 {
    existing.iter().map(|c| c.order).max().unwrap_or(0) + 1
}

fn edit(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let current = store.find_category(sub.get_one::<String>("category").unwrap())?;
    let due_day = if sub.get_flag("clear_due_day") {
        None
    } else if let Some(s) = sub.get_one::<String>("due_day") {
        Some(parse_due_day(s)?)
    } else {
        current.due_day
    };
    let draft = CategoryDraft {
        name: sub
            .get_one::<String>("name")
            .map(|s| s.trim().to_string())
            .unwrap_or(current.name),
        due_day,
        color: sub.get_one::<String>("color").cloned().unwrap_or(current.color),
        order: match sub.get_one::<String>("order") {
            Some(s) => parse_order(s)?,
            None => current.order,
        },
    };
    let cat = store.update_category(current.id, &draft)?;
    println!("Updated category '{}'", cat.name);
    Ok(())
}

fn list(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let cats = store.list_categories()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
        return Ok(());
    }
    let rows = cats
        .into_iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.order.to_string(),
                c.name,
                c.due_day.map(|d| d.to_string()).unwrap_or_default(),
                c.color,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Order", "Category", "Due day", "Color"], rows)
    );
    Ok(())
}
