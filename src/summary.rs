// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Year-level aggregation of planned and actual spend.

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, MONTHS_IN_YEAR, Transaction, month_index};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub month: u32,
    pub planned: Decimal,
    pub actual: Decimal,
}

impl MonthTotals {
    pub fn variance(&self) -> Decimal {
        self.actual - self.planned
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub category_id: i64,
    pub name: String,
    pub color: String,
    pub order: i32,
    pub planned: Decimal,
    pub actual: Decimal,
}

impl CategoryTotals {
    pub fn variance(&self) -> Decimal {
        self.actual - self.planned
    }
}

/// Derived view of one budget year. Never persisted.
///
/// `monthly` always holds the twelve calendar months in order and
/// `categories` holds one row per known category sorted by `(order, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub year: i32,
    pub total_planned: Decimal,
    pub total_actual: Decimal,
    pub monthly: Vec<MonthTotals>,
    pub categories: Vec<CategoryTotals>,
    /// Transactions skipped because their category no longer exists.
    pub orphaned: usize,
}

impl Summary {
    pub fn month(&self, month: u32) -> Option<&MonthTotals> {
        self.monthly.iter().find(|m| m.month == month)
    }

    pub fn category(&self, category_id: i64) -> Option<&CategoryTotals> {
        self.categories.iter().find(|c| c.category_id == category_id)
    }

    pub fn total_variance(&self) -> Decimal {
        self.total_actual - self.total_planned
    }

    /// Months with any planned or actual value.
    pub fn active_months(&self) -> usize {
        self.monthly
            .iter()
            .filter(|m| !m.planned.is_zero() || !m.actual.is_zero())
            .count()
    }

    pub fn average_monthly_planned(&self) -> Decimal {
        self.total_planned / Decimal::from(MONTHS_IN_YEAR as u32)
    }

    pub fn average_monthly_actual(&self) -> Decimal {
        self.total_actual / Decimal::from(MONTHS_IN_YEAR as u32)
    }

    /// Mean actual spend over the months that have data; zero for an empty year.
    pub fn average_active_actual(&self) -> Decimal {
        match self.active_months() {
            0 => Decimal::ZERO,
            n => self.total_actual / Decimal::from(n as u32),
        }
    }
}

/// Aggregates a year of transactions into per-month and per-category totals.
///
/// Transactions of other years are ignored. Transactions pointing to an
/// unknown category are skipped and counted in `Summary::orphaned`. A month
/// outside 1..=12 fails with `MalformedRecord`.
pub fn aggregate(
    categories: &[Category],
    transactions: &[Transaction],
    year: i32,
) -> FinanceResult<Summary> {
    let mut monthly: Vec<MonthTotals> = (1..=MONTHS_IN_YEAR as u32)
        .map(|month| MonthTotals {
            month,
            planned: Decimal::ZERO,
            actual: Decimal::ZERO,
        })
        .collect();

    let mut rows: Vec<CategoryTotals> = categories
        .iter()
        .map(|c| CategoryTotals {
            category_id: c.id,
            name: c.name.clone(),
            color: c.color.clone(),
            order: c.order,
            planned: Decimal::ZERO,
            actual: Decimal::ZERO,
        })
        .collect();
    rows.sort_by_key(|r| (r.order, r.category_id));

    let slot: HashMap<i64, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.category_id, i))
        .collect();

    let mut orphaned = 0usize;
    let mut total_planned = Decimal::ZERO;
    let mut total_actual = Decimal::ZERO;
    for t in transactions.iter().filter(|t| t.year == year) {
        let idx = month_index("transaction", t.id, t.month)?;
        let Some(&pos) = slot.get(&t.category_id) else {
            tracing::debug!(
                transaction = t.id,
                category = t.category_id,
                "skipping transaction with unknown category"
            );
            orphaned += 1;
            continue;
        };
        let add = |acc: &mut Decimal, v: Decimal| accumulate("transaction", t.id, acc, v);
        add(&mut monthly[idx].planned, t.planned_value)?;
        add(&mut monthly[idx].actual, t.actual_value)?;
        add(&mut rows[pos].planned, t.planned_value)?;
        add(&mut rows[pos].actual, t.actual_value)?;
        add(&mut total_planned, t.planned_value)?;
        add(&mut total_actual, t.actual_value)?;
        // variance() subtracts; keep it representable too
        for (p, a) in [
            (monthly[idx].planned, monthly[idx].actual),
            (rows[pos].planned, rows[pos].actual),
            (total_planned, total_actual),
        ] {
            if a.checked_sub(p).is_none() {
                let reason = "variance overflows";
                return Err(FinanceError::malformed("transaction", t.id, reason));
            }
        }
    }

    if orphaned > 0 {
        tracing::warn!(year, orphaned, "transactions reference deleted categories");
    }

    Ok(Summary {
        year,
        total_planned,
        total_actual,
        monthly,
        categories: rows,
        orphaned,
    })
}

/// Adds `v` into `acc`, failing instead of panicking when the sum leaves
/// the range of `Decimal`.
pub(crate) fn accumulate(
    kind: &'static str,
    id: i64,
    acc: &mut Decimal,
    v: Decimal,
) -> FinanceResult<()> {
    *acc = acc
        .checked_add(v)
        .ok_or_else(|| FinanceError::malformed(kind, id, "sum overflows"))?;
    Ok(())
}
