// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fincontrol::store::{EntityStore, SqliteStore};
use fincontrol::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal_macros::dec;

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args.iter().copied());
    match matches.subcommand() {
        Some(("category", sub)) => commands::categories::handle(conn, sub),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub),
        Some(("income", sub)) => commands::incomes::handle(conn, sub),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn tx_set_edits_one_field_at_a_time() {
    let conn = db::open_in_memory().unwrap();
    run(&conn, &["fincontrol", "category", "add", "--name", "Visa (Dia 28)"]).unwrap();
    run(
        &conn,
        &["fincontrol", "tx", "set", "--category", "Visa (Dia 28)", "--year", "2026", "--month", "7", "--planned", "1.200,00"],
    )
    .unwrap();
    run(
        &conn,
        &["fincontrol", "tx", "set", "--category", "Visa (Dia 28)", "--year", "2026", "--month", "7", "--actual", "1180.40"],
    )
    .unwrap();

    let store = SqliteStore::new(&conn);
    let cats = store.list_categories().unwrap();
    assert_eq!(cats[0].due_day, Some(28));
    assert_eq!(cats[0].order, 1);
    let txs = store.list_transactions(2026).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].planned_value, dec!(1200));
    assert_eq!(txs[0].actual_value, dec!(1180.40));
}

#[test]
fn tx_set_rejects_unknown_category_and_bad_month() {
    let conn = db::open_in_memory().unwrap();
    run(&conn, &["fincontrol", "category", "add", "--name", "Mercado"]).unwrap();
    assert!(run(
        &conn,
        &["fincontrol", "tx", "set", "--category", "Nada", "--year", "2026", "--month", "1", "--planned", "1"],
    )
    .is_err());
    assert!(run(
        &conn,
        &["fincontrol", "tx", "set", "--category", "Mercado", "--year", "2026", "--month", "13", "--planned", "1"],
    )
    .is_err());
}

#[test]
fn income_set_keeps_unspecified_sources() {
    let conn = db::open_in_memory().unwrap();
    run(
        &conn,
        &["fincontrol", "income", "set", "--year", "2026", "--month", "2", "--aposentadoria", "1000", "--salario", "3000"],
    )
    .unwrap();
    run(
        &conn,
        &["fincontrol", "income", "set", "--year", "2026", "--month", "2", "--recursos-externos", "250"],
    )
    .unwrap();
    let store = SqliteStore::new(&conn);
    let inc = store.income(2026, 2).unwrap().unwrap();
    assert_eq!(inc.aposentadoria, dec!(1000));
    assert_eq!(inc.salario, dec!(3000));
    assert_eq!(inc.total().unwrap(), dec!(4250));
}

#[test]
fn removing_a_category_by_name_drops_its_values() {
    let conn = db::open_in_memory().unwrap();
    run(&conn, &["fincontrol", "category", "add", "--name", "IPTU (Dia 10)"]).unwrap();
    run(
        &conn,
        &["fincontrol", "tx", "set", "--category", "IPTU (Dia 10)", "--year", "2026", "--month", "3", "--planned", "300"],
    )
    .unwrap();
    run(&conn, &["fincontrol", "category", "rm", "IPTU (Dia 10)"]).unwrap();
    let store = SqliteStore::new(&conn);
    assert!(store.list_categories().unwrap().is_empty());
    assert!(store.list_transactions(2026).unwrap().is_empty());
}

#[test]
fn tx_set_is_not_blocked_by_a_bad_row_elsewhere() {
    let conn = db::open_in_memory().unwrap();
    run(&conn, &["fincontrol", "category", "add", "--name", "A"]).unwrap();
    run(&conn, &["fincontrol", "category", "add", "--name", "B"]).unwrap();
    conn.execute(
        "INSERT INTO transactions(category_id, year, month, planned_value, actual_value)
         SELECT id, 2026, 1, 'abc', '0' FROM categories WHERE name='A'",
        [],
    )
    .unwrap();
    run(
        &conn,
        &["fincontrol", "tx", "set", "--category", "B", "--year", "2026", "--month", "2", "--planned", "10"],
    )
    .unwrap();

    let store = SqliteStore::new(&conn);
    let b = store.find_category("B").unwrap();
    let cell = store.transaction_at(b.id, 2026, 2).unwrap().unwrap();
    assert_eq!(cell.planned_value, dec!(10));
}
