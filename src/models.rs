// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{FinanceError, FinanceResult};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MONTHS_IN_YEAR: usize = 12;

/// Colors handed out to imported categories, by column.
pub const PALETTE: [&str; 16] = [
    "#FFADAD", "#FFD6A5", "#FDFFB6", "#CAFFBF", "#9BF6FF", "#A0C4FF", "#BDB2FF", "#FFC6FF",
    "#E5E5E5", "#F4A261", "#2A9D8F", "#E9C46A", "#E76F51", "#8ECAE6", "#219EBC", "#264653",
];

pub fn palette_color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub due_day: Option<u32>,
    pub color: String,
    pub order: i32,
}

/// Fields supplied when creating or editing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub due_day: Option<u32>,
    pub color: String,
    pub order: i32,
}

impl CategoryDraft {
    pub fn validate(&self) -> FinanceResult<()> {
        if self.name.trim().is_empty() {
            return Err(FinanceError::Validation(
                "category name must not be empty".into(),
            ));
        }
        if let Some(day) = self.due_day {
            if !(1..=31).contains(&day) {
                return Err(FinanceError::Validation(format!(
                    "due day {} is outside 1..=31",
                    day
                )));
            }
        }
        Ok(())
    }
}

/// Planned vs. actual spend of one category in one month.
/// `(category_id, year, month)` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub category_id: i64,
    pub year: i32,
    pub month: u32,
    pub planned_value: Decimal,
    pub actual_value: Decimal,
    pub notes: Option<String>,
}

/// Income of one month, split in its three sources.
/// `(year, month)` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub aposentadoria: Decimal,
    pub salario: Decimal,
    pub recursos_externos: Decimal,
    pub notes: Option<String>,
}

impl Income {
    /// Sum of the three sources; `MalformedRecord` if it leaves the `Decimal` range.
    pub fn total(&self) -> FinanceResult<Decimal> {
        self.aposentadoria
            .checked_add(self.salario)
            .and_then(|t| t.checked_add(self.recursos_externos))
            .ok_or_else(|| FinanceError::malformed("income", self.id, "sum overflows"))
    }
}

/// Zero-based bucket index for a 1..=12 month, or `MalformedRecord`.
pub fn month_index(kind: &'static str, id: i64, month: u32) -> FinanceResult<usize> {
    if (1..=MONTHS_IN_YEAR as u32).contains(&month) {
        Ok(month as usize - 1)
    } else {
        Err(FinanceError::malformed(
            kind,
            id,
            format!("month {} is outside 1..=12", month),
        ))
    }
}

pub fn validate_month(month: u32) -> FinanceResult<()> {
    if (1..=MONTHS_IN_YEAR as u32).contains(&month) {
        Ok(())
    } else {
        Err(FinanceError::Validation(format!(
            "month {} is outside 1..=12",
            month
        )))
    }
}

pub fn validate_amount(field: &str, value: Decimal) -> FinanceResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FinanceError::Validation(format!(
            "{} must not be negative (got {})",
            field, value
        )));
    }
    Ok(())
}

static DUE_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bdia\s+(\d{1,2})").expect("static regex"));

/// Reads a due day out of labels such as "Energia (Dia 09)".
pub fn due_day_from_name(name: &str) -> Option<u32> {
    DUE_DAY_RE
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|d| (1..=31).contains(d))
}
