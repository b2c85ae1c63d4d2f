// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::income_by_month;
use crate::store::{EntityStore, SqliteStore};
use crate::summary::aggregate;
use crate::utils::{parse_year, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

/// One problem found in the stored data.
pub type Issue = (String, String);

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = sub
        .get_one::<String>("year")
        .map(|s| parse_year(s))
        .transpose()?;
    let rows = check(conn, year)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let data = rows.into_iter().map(|(k, d)| vec![k, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}

pub fn check(conn: &Connection, year: Option<i32>) -> Result<Vec<Issue>> {
    let store = SqliteStore::new(conn);
    let mut rows = Vec::new();

    // 1) Transactions whose category is gone
    for (tx_id, cat_id) in store.orphaned_transactions()? {
        rows.push((
            "orphaned_transaction".to_string(),
            format!("transaction {} -> category {}", tx_id, cat_id),
        ));
    }

    // 2) Rows the aggregator would reject
    let years = match year {
        Some(y) => vec![y],
        None => store.years()?,
    };
    let categories = store.list_categories()?;
    for y in years {
        let spend = store
            .list_transactions(y)
            .and_then(|txs| aggregate(&categories, &txs, y).map(|_| ()));
        let income = store
            .list_incomes(y)
            .and_then(|incs| income_by_month(&incs, y).map(|_| ()));
        for outcome in [spend, income] {
            match outcome {
                Ok(()) => {}
                Err(e) if e.is_malformed() => {
                    rows.push(("malformed_record".to_string(), format!("{}: {}", y, e)));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(rows)
}
