// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fincontrol::db;
use fincontrol::error::FinanceError;
use fincontrol::models::CategoryDraft;
use fincontrol::store::{EntityStore, SqliteStore, overview_for_year, summary_for_year};
use rusqlite::Connection;
use rust_decimal_macros::dec;

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn draft(name: &str, order: i32) -> CategoryDraft {
    CategoryDraft {
        name: name.into(),
        due_day: None,
        color: "#A0C4FF".into(),
        order,
    }
}

#[test]
fn transaction_cell_is_created_then_updated() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let cat = store.add_category(&draft("Mercado", 1)).unwrap();

    let first = store
        .upsert_transaction(cat.id, 2026, 3, dec!(900), dec!(0), None)
        .unwrap();
    let second = store
        .upsert_transaction(cat.id, 2026, 3, dec!(900), dec!(875.05), Some("feira"))
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.actual_value, dec!(875.05));
    assert_eq!(second.notes.as_deref(), Some("feira"));

    let all = store.list_transactions(2026).unwrap();
    assert_eq!(all.len(), 1);
    assert!(store.list_transactions(2025).unwrap().is_empty());
}

#[test]
fn partial_update_keeps_other_fields() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let cat = store.add_category(&draft("Energia (Dia 09)", 1)).unwrap();
    assert_eq!(cat.due_day, Some(9));

    let t = store
        .upsert_transaction(cat.id, 2026, 1, dec!(180), dec!(0), Some("conta"))
        .unwrap();
    let t = store
        .update_transaction(t.id, None, Some(dec!(172.35)), None)
        .unwrap();
    assert_eq!(t.planned_value, dec!(180));
    assert_eq!(t.actual_value, dec!(172.35));
    assert_eq!(t.notes.as_deref(), Some("conta"));
}

#[test]
fn invalid_writes_are_rejected() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let cat = store.add_category(&draft("Mercado", 1)).unwrap();

    assert!(matches!(
        store.upsert_transaction(cat.id, 2026, 13, dec!(1), dec!(1), None),
        Err(FinanceError::Validation(_))
    ));
    assert!(matches!(
        store.upsert_transaction(cat.id, 2026, 1, dec!(-1), dec!(1), None),
        Err(FinanceError::Validation(_))
    ));
    assert!(matches!(
        store.upsert_transaction(999, 2026, 1, dec!(1), dec!(1), None),
        Err(FinanceError::NotFound { .. })
    ));
    assert!(matches!(
        store.add_category(&draft("  ", 2)),
        Err(FinanceError::Validation(_))
    ));
}

#[test]
fn deleting_a_category_cascades_to_its_transactions() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let keep = store.add_category(&draft("Mercado", 1)).unwrap();
    let gone = store.add_category(&draft("IPTU", 2)).unwrap();
    store
        .upsert_transaction(keep.id, 2026, 1, dec!(10), dec!(10), None)
        .unwrap();
    store
        .upsert_transaction(gone.id, 2026, 1, dec!(20), dec!(20), None)
        .unwrap();
    store
        .upsert_transaction(gone.id, 2026, 2, dec!(20), dec!(20), None)
        .unwrap();

    assert_eq!(store.delete_category(gone.id).unwrap(), 2);
    let s = summary_for_year(&store, 2026).unwrap();
    assert_eq!(s.total_planned, dec!(10));
    assert_eq!(s.categories.len(), 1);
    assert_eq!(s.orphaned, 0);
    assert!(matches!(
        store.delete_category(gone.id),
        Err(FinanceError::NotFound { .. })
    ));
}

#[test]
fn seeding_only_fills_an_empty_table() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    assert_eq!(store.seed_default_categories().unwrap(), 16);
    assert_eq!(store.seed_default_categories().unwrap(), 0);
    let cats = store.list_categories().unwrap();
    assert_eq!(cats.len(), 16);
    assert_eq!(cats[0].name, "Manut. Tiggo");
    assert_eq!(cats[15].due_day, Some(30));
    assert!(cats.windows(2).all(|w| w[0].order < w[1].order));
}

#[test]
fn income_is_one_row_per_month() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    store
        .upsert_income(2026, 5, dec!(1000), dec!(3000), dec!(0), None)
        .unwrap();
    let inc = store
        .upsert_income(2026, 5, dec!(1000), dec!(3200), dec!(150), Some("bônus"))
        .unwrap();
    assert_eq!(inc.total().unwrap(), dec!(4350));
    assert_eq!(store.list_incomes(2026).unwrap().len(), 1);
    assert!(store.income(2026, 6).unwrap().is_none());
}

#[test]
fn overview_joins_income_and_spend() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let cat = store.add_category(&draft("Mercado", 1)).unwrap();
    store
        .upsert_transaction(cat.id, 2026, 4, dec!(2000), dec!(2500), None)
        .unwrap();
    store
        .upsert_income(2026, 4, dec!(1000), dec!(3000), dec!(0), None)
        .unwrap();

    let ov = overview_for_year(&store, 2026).unwrap();
    assert_eq!(ov.total_income, dec!(4000));
    assert_eq!(ov.months[3].balance.value, dec!(1500));
    assert_eq!(ov.balance.value, dec!(1500));
}

#[test]
fn unparsable_stored_amount_is_malformed() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let cat = store.add_category(&draft("Mercado", 1)).unwrap();
    conn.execute(
        "INSERT INTO transactions(category_id, year, month, planned_value, actual_value)
         VALUES (?1, 2026, 1, 'abc', '0')",
        [cat.id],
    )
    .unwrap();
    let err = store.list_transactions(2026).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn stored_month_out_of_range_fails_aggregation() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let cat = store.add_category(&draft("Mercado", 1)).unwrap();
    conn.execute(
        "INSERT INTO transactions(category_id, year, month, planned_value, actual_value)
         VALUES (?1, 2026, 14, '1', '1')",
        [cat.id],
    )
    .unwrap();
    assert_eq!(store.list_transactions(2026).unwrap().len(), 1);
    assert!(summary_for_year(&store, 2026).unwrap_err().is_malformed());
}

#[test]
fn category_names_are_unique() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let first = store.add_category(&draft("Mercado", 1)).unwrap();
    let other = store.add_category(&draft("Feira", 2)).unwrap();
    assert!(matches!(
        store.add_category(&draft("Mercado", 3)),
        Err(FinanceError::Duplicate { .. })
    ));
    assert!(matches!(
        store.update_category(other.id, &draft("Mercado", 2)),
        Err(FinanceError::Duplicate { .. })
    ));
    // renaming a category to its own name is fine
    assert!(store.update_category(first.id, &draft("Mercado", 5)).is_ok());
}

#[test]
fn renaming_derives_due_day_like_adding() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let added = store.add_category(&draft("Energia (Dia 09)", 1)).unwrap();
    assert_eq!(added.due_day, Some(9));

    let plain = store.add_category(&draft("Energia", 2)).unwrap();
    assert_eq!(plain.due_day, None);
    let renamed = store
        .update_category(plain.id, &draft("Luz (Dia 12)", 2))
        .unwrap();
    assert_eq!(renamed.due_day, Some(12));

    // an explicit due day still wins over the name
    let mut explicit = draft("Água (Dia 30)", 3);
    explicit.due_day = Some(5);
    let kept = store.update_category(renamed.id, &explicit).unwrap();
    assert_eq!(kept.due_day, Some(5));
}

#[test]
fn cell_lookup_ignores_other_rows_of_the_year() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let a = store.add_category(&draft("A", 1)).unwrap();
    let b = store.add_category(&draft("B", 2)).unwrap();
    conn.execute(
        "INSERT INTO transactions(category_id, year, month, planned_value, actual_value)
         VALUES (?1, 2026, 1, 'abc', '0')",
        [a.id],
    )
    .unwrap();
    store
        .upsert_transaction(b.id, 2026, 2, dec!(10), dec!(0), None)
        .unwrap();

    let cell = store.transaction_at(b.id, 2026, 2).unwrap().unwrap();
    assert_eq!(cell.planned_value, dec!(10));
    assert!(store.transaction_at(b.id, 2026, 3).unwrap().is_none());
    assert!(store.transaction_at(a.id, 2026, 1).unwrap_err().is_malformed());
}

#[test]
fn reset_actual_keeps_plan_and_other_years() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let c = store.add_category(&draft("Mercado", 1)).unwrap();
    store
        .upsert_transaction(c.id, 2026, 1, dec!(900), dec!(875.05), None)
        .unwrap();
    store
        .upsert_transaction(c.id, 2026, 2, dec!(900), dec!(0), None)
        .unwrap();
    store
        .upsert_transaction(c.id, 2025, 1, dec!(800), dec!(812), None)
        .unwrap();

    assert_eq!(store.reset_actual(2026).unwrap(), 1);
    let s = summary_for_year(&store, 2026).unwrap();
    assert!(s.total_actual.is_zero());
    assert_eq!(s.total_planned, dec!(1800));
    assert_eq!(
        summary_for_year(&store, 2025).unwrap().total_actual,
        dec!(812)
    );
}
