// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{CURRENCY_MARKER_KEY, currency_marker, pretty_table, set_setting};
use anyhow::{Result, bail};
use rusqlite::Connection;

const KNOWN_KEYS: [&str; 1] = [CURRENCY_MARKER_KEY];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap().trim();
            if !KNOWN_KEYS.contains(&key) {
                bail!("Unknown setting '{}' (known: {})", key, KNOWN_KEYS.join(", "));
            }
            if value.is_empty() {
                bail!("Value for '{}' must not be empty", key);
            }
            set_setting(conn, key, value)?;
            println!("{} = {}", key, value);
        }
        _ => {
            let rows = vec![vec![CURRENCY_MARKER_KEY.to_string(), currency_marker(conn)?]];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
    }
    Ok(())
}
