// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::format::{BRL_MARKER, DEFAULT_DECIMALS, format_with_marker};
use crate::report::MONTH_NAMES_PT_BR;
use anyhow::{Context, Result};
use chrono::Datelike;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub const CURRENCY_MARKER_KEY: &str = "currency_marker";

pub fn parse_year(s: &str) -> Result<i32> {
    let y: i32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid year '{}'", s))?;
    if !(1900..=9999).contains(&y) {
        anyhow::bail!("Invalid year '{}', expected a four-digit year", s);
    }
    Ok(y)
}

/// Parses an optional year argument, defaulting to the current local year.
pub fn year_or_current(s: Option<&String>) -> Result<i32> {
    match s {
        Some(s) => parse_year(s),
        None => Ok(chrono::Local::now().year()),
    }
}

pub fn parse_month(s: &str) -> Result<u32> {
    let m: u32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid month '{}', expected 1-12", s))?;
    if !(1..=12).contains(&m) {
        anyhow::bail!("Invalid month '{}', expected 1-12", s);
    }
    Ok(m)
}

/// Month column of an imported sheet: a number, a pt-BR month name or its
/// first three letters (`jan`, `Março`, `mar`).
pub fn parse_month_label(s: &str) -> Result<u32> {
    let t = s.trim().to_lowercase();
    if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) {
        return parse_month(&t);
    }
    if t.chars().count() >= 3
        && let Some(i) = MONTH_NAMES_PT_BR.iter().position(|n| n.starts_with(t.as_str()))
    {
        return Ok(i as u32 + 1);
    }
    anyhow::bail!("Invalid month '{}', expected 1-12 or a month name", s)
}

static DOT_GROUPED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(\.\d{3})+$").expect("static regex"));

/// Accepts both `1234.56` and pt-BR `1.234,56`.
///
/// A dot-grouped integer such as `1.500` reads as 1500 in pt-BR and 1.5
/// otherwise, so it is rejected; write `1.500,00` or `1500`.
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let t = s.trim();
    if DOT_GROUPED_RE.is_match(t) {
        anyhow::bail!(
            "Ambiguous amount '{}': use '{},00' for thousands or a plain decimal point",
            s,
            t
        );
    }
    let normalized = if t.contains(',') {
        t.replace('.', "").replace(',', ".")
    } else {
        t.to_string()
    };
    normalized
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn currency_marker(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, CURRENCY_MARKER_KEY)?.unwrap_or_else(|| BRL_MARKER.to_string()))
}

/// Display money with the configured currency marker.
pub fn money(marker: &str, d: Decimal) -> String {
    format_with_marker(marker, Some(d), DEFAULT_DECIMALS)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
