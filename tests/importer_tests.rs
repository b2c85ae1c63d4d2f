// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fincontrol::models::CategoryDraft;
use fincontrol::store::{EntityStore, SqliteStore, overview_for_year, summary_for_year};
use fincontrol::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use std::fs;
use tempfile::tempdir;

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args.iter().copied());
    match matches.subcommand() {
        Some(("import", sub)) => commands::importer::handle(conn, sub),
        Some(("tx", sub)) => commands::transactions::handle(conn, sub),
        _ => panic!("unexpected subcommand"),
    }
}

const GRID: &str = "\
Mês,Energia (Dia 09),Mercado,Água (Dia 30)
jan,180,\"1.012,40\",95.5
fev,190.10,900,
março,,875.05,101

dez,200,1000,99
";

#[test]
fn grid_creates_categories_and_cells() {
    let conn = db::open_in_memory().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("grid.csv");
    fs::write(&path, GRID).unwrap();
    let p = path.to_string_lossy().to_string();

    run(&conn, &["fincontrol", "import", "grid", &p, "--year", "2026"]).unwrap();

    let store = SqliteStore::new(&conn);
    let cats = store.list_categories().unwrap();
    let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Energia (Dia 09)", "Mercado", "Água (Dia 30)"]);
    assert_eq!(cats[0].due_day, Some(9));
    assert_eq!(cats[1].due_day, None);
    assert_eq!(cats[2].due_day, Some(30));
    assert_eq!(cats[0].color, "#FFADAD");
    assert_eq!(cats[1].color, "#FFD6A5");
    assert_eq!(cats.iter().map(|c| c.order).collect::<Vec<_>>(), vec![1, 2, 3]);

    let s = summary_for_year(&store, 2026).unwrap();
    assert_eq!(s.month(1).unwrap().planned, dec!(1287.90));
    assert_eq!(s.month(1).unwrap().actual, dec!(1287.90));
    // empty cells are written as zero
    let agua_feb = store.transaction_at(cats[2].id, 2026, 2).unwrap().unwrap();
    assert!(agua_feb.planned_value.is_zero());
    assert!(s.month(4).unwrap().planned.is_zero());
    assert_eq!(s.month(12).unwrap().planned, dec!(1299));
    assert_eq!(store.list_transactions(2026).unwrap().len(), 12);
}

#[test]
fn grid_reuses_categories_and_keeps_the_other_value() {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let mercado = store
        .add_category(&CategoryDraft {
            name: "Mercado".into(),
            due_day: Some(20),
            color: "#000000".into(),
            order: 7,
        })
        .unwrap();
    store
        .upsert_transaction(mercado.id, 2026, 1, dec!(950), dec!(0), Some("feira"))
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("actual.csv");
    fs::write(&path, "Mês,Mercado\n1,1012.40\n").unwrap();
    let p = path.to_string_lossy().to_string();
    run(
        &conn,
        &["fincontrol", "import", "grid", &p, "--year", "2026", "--fill", "actual"],
    )
    .unwrap();

    assert_eq!(store.list_categories().unwrap().len(), 1);
    let cell = store.transaction_at(mercado.id, 2026, 1).unwrap().unwrap();
    assert_eq!(cell.planned_value, dec!(950));
    assert_eq!(cell.actual_value, dec!(1012.40));
    assert_eq!(cell.notes.as_deref(), Some("feira"));
}

#[test]
fn bad_grid_leaves_database_untouched() {
    let conn = db::open_in_memory().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "Mês,Energia\njan,180\nfev,abc\n").unwrap();
    let p = path.to_string_lossy().to_string();
    let err = run(&conn, &["fincontrol", "import", "grid", &p, "--year", "2026"]).unwrap_err();
    assert!(format!("{:#}", err).contains("'abc'"));

    let store = SqliteStore::new(&conn);
    assert!(store.list_categories().unwrap().is_empty());
    assert!(store.list_transactions(2026).unwrap().is_empty());

    fs::write(&path, "Mês,Energia\njan,1\nJaneiro,2\n").unwrap();
    assert!(run(&conn, &["fincontrol", "import", "grid", &p, "--year", "2026"]).is_err());
}

#[test]
fn incomes_replace_the_year_then_actuals_reset() {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    store
        .upsert_income(2026, 6, dec!(1), dec!(1), dec!(1), None)
        .unwrap();
    store
        .upsert_income(2025, 6, dec!(7), dec!(0), dec!(0), None)
        .unwrap();

    let dir = tempdir().unwrap();
    let grid = dir.path().join("grid.csv");
    fs::write(&grid, "Mês,Mercado\njan,900\nfev,800\n").unwrap();
    let incomes = dir.path().join("incomes.csv");
    fs::write(
        &incomes,
        "Mês,Aposentadoria,Salário,Recursos externos,Obs\n\
         jan,1000,3000,0,\n\
         fev,\"1.000,00\",3000,250,bônus\n",
    )
    .unwrap();
    let g = grid.to_string_lossy().to_string();
    let i = incomes.to_string_lossy().to_string();

    run(&conn, &["fincontrol", "import", "grid", &g, "--year", "2026"]).unwrap();
    run(&conn, &["fincontrol", "import", "incomes", &i, "--year", "2026"]).unwrap();
    run(&conn, &["fincontrol", "tx", "reset-actual", "--year", "2026"]).unwrap();

    let got = store.list_incomes(2026).unwrap();
    assert_eq!(got.len(), 2);
    assert!(store.income(2026, 6).unwrap().is_none());
    assert_eq!(got[1].total().unwrap(), dec!(4250));
    assert_eq!(got[1].notes.as_deref(), Some("bônus"));
    assert!(got[0].notes.is_none());
    assert!(store.income(2025, 6).unwrap().is_some());

    let ov = overview_for_year(&store, 2026).unwrap();
    assert_eq!(ov.summary.total_planned, dec!(1700));
    assert!(ov.summary.total_actual.is_zero());
    assert_eq!(ov.total_income, dec!(8250));
}
