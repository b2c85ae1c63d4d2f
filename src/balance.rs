// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income totals and surplus/deficit derivation.

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Category, Income, MONTHS_IN_YEAR, Transaction, month_index};
use crate::summary::{Summary, accumulate, aggregate};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceKind {
    Surplus,
    Deficit,
}

/// Signed balance, displayed as an unsigned magnitude plus a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub value: Decimal,
}

impl Balance {
    pub fn kind(&self) -> BalanceKind {
        if self.value.is_sign_negative() && !self.value.is_zero() {
            BalanceKind::Deficit
        } else {
            BalanceKind::Surplus
        }
    }

    pub fn magnitude(&self) -> Decimal {
        self.value.abs()
    }

    pub fn label(&self) -> &'static str {
        match self.kind() {
            BalanceKind::Surplus => "superávit",
            BalanceKind::Deficit => "déficit",
        }
    }
}

/// Sum of the three income sources; an absent month counts as zero.
pub fn total_income(income: Option<&Income>) -> FinanceResult<Decimal> {
    income.map_or(Ok(Decimal::ZERO), Income::total)
}

pub fn monthly_balance(income: Option<&Income>, month_expense: Decimal) -> FinanceResult<Balance> {
    let id = income.map_or(0, |i| i.id);
    balance_of("income", id, total_income(income)?, month_expense)
}

fn balance_of(
    kind: &'static str,
    id: i64,
    income: Decimal,
    expense: Decimal,
) -> FinanceResult<Balance> {
    income
        .checked_sub(expense)
        .map(|value| Balance { value })
        .ok_or_else(|| FinanceError::malformed(kind, id, "balance overflows"))
}

/// Total income per calendar month of `year`, January first.
pub fn income_by_month(
    incomes: &[Income],
    year: i32,
) -> FinanceResult<[Decimal; MONTHS_IN_YEAR]> {
    let mut out = [Decimal::ZERO; MONTHS_IN_YEAR];
    let mut seen = [false; MONTHS_IN_YEAR];
    for i in incomes.iter().filter(|i| i.year == year) {
        let idx = month_index("income", i.id, i.month)?;
        if seen[idx] {
            tracing::warn!(year, month = i.month, income = i.id, "duplicate income record for month");
        }
        seen[idx] = true;
        accumulate("income", i.id, &mut out[idx], i.total()?)?;
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOverview {
    pub month: u32,
    pub planned: Decimal,
    pub actual: Decimal,
    pub income: Decimal,
    pub balance: Balance,
}

/// A `Summary` joined with the year's income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearOverview {
    pub summary: Summary,
    pub months: Vec<MonthOverview>,
    pub total_income: Decimal,
    pub balance: Balance,
}

pub fn overview(
    categories: &[Category],
    transactions: &[Transaction],
    incomes: &[Income],
    year: i32,
) -> FinanceResult<YearOverview> {
    let summary = aggregate(categories, transactions, year)?;
    let income = income_by_month(incomes, year)?;

    let months = summary
        .monthly
        .iter()
        .zip(income)
        .map(|(m, inc)| {
            Ok(MonthOverview {
                month: m.month,
                planned: m.planned,
                actual: m.actual,
                income: inc,
                balance: balance_of("month", i64::from(m.month), inc, m.actual)?,
            })
        })
        .collect::<FinanceResult<Vec<_>>>()?;
    let mut total_income = Decimal::ZERO;
    for (month, inc) in (1..).zip(income) {
        accumulate("month", month, &mut total_income, inc)?;
    }
    let balance = balance_of("year", i64::from(year), total_income, summary.total_actual)?;

    Ok(YearOverview {
        summary,
        months,
        total_income,
        balance,
    })
}
