// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::{monthly_balance, total_income};
use crate::report::MONTH_NAMES_PT_BR;
use crate::store::{SqliteStore, overview_for_year, summary_for_year};
use crate::utils::{
    currency_marker, maybe_print_json, money, parse_month, parse_year, pretty_table,
    year_or_current,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = year_or_current(sub.get_one::<String>("year"))?;
    let store = SqliteStore::new(conn);
    let ov = overview_for_year(&store, year)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ov)? {
        return Ok(());
    }

    let marker = currency_marker(conn)?;
    let s = &ov.summary;
    let month_rows = ov
        .months
        .iter()
        .map(|m| {
            vec![
                MONTH_NAMES_PT_BR[m.month as usize - 1].to_string(),
                money(&marker, m.planned),
                money(&marker, m.actual),
                money(&marker, m.actual - m.planned),
                money(&marker, m.income),
                format!("{} ({})", money(&marker, m.balance.magnitude()), m.balance.label()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Mês", "Planejado", "Realizado", "Diferença", "Receitas", "Saldo"],
            month_rows
        )
    );

    let cat_rows = s
        .categories
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                money(&marker, c.planned),
                money(&marker, c.actual),
                money(&marker, c.variance()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Categoria", "Planejado", "Realizado", "Diferença"], cat_rows)
    );

    let totals = vec![
        vec!["Total planejado".into(), money(&marker, s.total_planned)],
        vec!["Total realizado".into(), money(&marker, s.total_actual)],
        vec!["Diferença".into(), money(&marker, s.total_variance())],
        vec!["Média mensal realizada".into(), money(&marker, s.average_monthly_actual())],
        vec![
            format!("Média dos meses ativos ({})", s.active_months()),
            money(&marker, s.average_active_actual()),
        ],
        vec!["Receitas".into(), money(&marker, ov.total_income)],
        vec![
            "Saldo".into(),
            format!("{} ({})", money(&marker, ov.balance.magnitude()), ov.balance.label()),
        ],
    ];
    let head = year.to_string();
    println!("{}", pretty_table(&[head.as_str(), ""], totals));
    if s.orphaned > 0 {
        eprintln!(
            "warning: {} transaction(s) reference deleted categories and were skipped",
            s.orphaned
        );
    }
    Ok(())
}

pub fn balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = parse_year(sub.get_one::<String>("year").unwrap())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let store = SqliteStore::new(conn);
    let s = summary_for_year(&store, year)?;
    let expense = s.month(month).map(|m| m.actual).unwrap_or_default();
    let income = store.income(year, month)?;
    let b = monthly_balance(income.as_ref(), expense)?;

    let marker = currency_marker(conn)?;
    let rows = vec![
        vec!["Receitas".into(), money(&marker, total_income(income.as_ref())?)],
        vec!["Despesas".into(), money(&marker, expense)],
        vec![
            "Saldo".into(),
            format!("{} ({})", money(&marker, b.magnitude()), b.label()),
        ],
    ];
    let title = format!("{} {}", MONTH_NAMES_PT_BR[month as usize - 1], year);
    println!("{}", pretty_table(&[title.as_str(), ""], rows));
    Ok(())
}
