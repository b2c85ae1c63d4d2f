// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Errors raised by the budget core and the entity store.
///
/// Missing data (a month without income, a category without transactions)
/// is never an error; it aggregates as zero.
#[derive(Error, Debug)]
pub enum FinanceError {
    /// A record whose shape cannot be aggregated: month outside 1..=12,
    /// or a stored monetary value that is not a decimal.
    #[error("Malformed {kind} record {id}: {reason}")]
    MalformedRecord {
        kind: &'static str,
        id: i64,
        reason: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} not found: {identifier}")]
    NotFound {
        entity: &'static str,
        identifier: String,
    },

    #[error("{entity} already exists: {identifier}")]
    Duplicate {
        entity: &'static str,
        identifier: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinanceError {
    pub fn malformed(kind: &'static str, id: i64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            kind,
            id,
            reason: reason.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }
}

pub type FinanceResult<T> = Result<T, FinanceError>;
