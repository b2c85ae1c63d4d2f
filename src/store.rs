// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::{YearOverview, overview};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Category, CategoryDraft, Income, Transaction, due_day_from_name, validate_amount,
    validate_month,
};
use crate::summary::{Summary, aggregate};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

/// Read side consumed by the aggregation core.
pub trait EntityStore {
    fn list_categories(&self) -> FinanceResult<Vec<Category>>;
    fn list_transactions(&self, year: i32) -> FinanceResult<Vec<Transaction>>;
    fn list_incomes(&self, year: i32) -> FinanceResult<Vec<Income>>;
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

const DEFAULT_CATEGORIES: [(&str, Option<u32>, &str); 16] = [
    ("Manut. Tiggo", None, "#FFADAD"),
    ("Mantimento (Dia 20)", Some(20), "#FFD6A5"),
    ("Brisanet (Dia 05)", Some(5), "#FDFFB6"),
    ("Energia (Dia 09)", Some(9), "#CAFFBF"),
    ("Cartão C&A (20)", Some(20), "#9BF6FF"),
    ("Condom. (Dia 25)", Some(25), "#A0C4FF"),
    ("Inglês do JP dia 09", Some(9), "#BDB2FF"),
    ("Internet (Dia 20)", Some(20), "#FFC6FF"),
    ("Veículos (Dia 20/28)", Some(20), "#E5E5E5"),
    ("Gastos extras", None, "#F4A261"),
    ("Cel. Cartão (Dia 25)", Some(25), "#2A9D8F"),
    ("Visa (Dia 28)", Some(28), "#E9C46A"),
    ("IPTU (Dia 10)", Some(10), "#F4A261"),
    ("Gastos Diversos", None, "#E76F51"),
    ("Parc. IR 2024", None, "#8ECAE6"),
    ("Água (Dia 30)", Some(30), "#219EBC"),
];

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn category(&self, id: i64) -> FinanceResult<Category> {
        self.conn
            .query_row(
                "SELECT id, name, due_day, color, ord FROM categories WHERE id=?1",
                params![id],
                category_from_row,
            )
            .optional()?
            .ok_or_else(|| FinanceError::NotFound {
                entity: "Category",
                identifier: id.to_string(),
            })
    }

    /// Looks a category up by id or, failing that, by exact name.
    pub fn find_category(&self, key: &str) -> FinanceResult<Category> {
        if let Ok(id) = key.trim().parse::<i64>() {
            return self.category(id);
        }
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE name=?1 ORDER BY ord, id LIMIT 1",
                params![key.trim()],
                |r| r.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.category(id),
            None => Err(FinanceError::NotFound {
                entity: "Category",
                identifier: key.to_string(),
            }),
        }
    }

    pub fn add_category(&self, draft: &CategoryDraft) -> FinanceResult<Category> {
        let draft = with_derived_due_day(draft);
        draft.validate()?;
        self.ensure_unique_name(draft.name.trim(), None)?;
        self.conn.execute(
            "INSERT INTO categories(name, due_day, color, ord) VALUES (?1,?2,?3,?4)",
            params![draft.name.trim(), draft.due_day, draft.color, draft.order],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(category = id, name = %draft.name, "category created");
        self.category(id)
    }

    /// Same derivation as `add_category`: a name carrying "Dia NN" fills an empty due day.
    pub fn update_category(&self, id: i64, draft: &CategoryDraft) -> FinanceResult<Category> {
        let draft = with_derived_due_day(draft);
        draft.validate()?;
        self.ensure_unique_name(draft.name.trim(), Some(id))?;
        let n = self.conn.execute(
            "UPDATE categories SET name=?1, due_day=?2, color=?3, ord=?4 WHERE id=?5",
            params![draft.name.trim(), draft.due_day, draft.color, draft.order, id],
        )?;
        if n == 0 {
            return Err(FinanceError::NotFound {
                entity: "Category",
                identifier: id.to_string(),
            });
        }
        self.category(id)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<i64>) -> FinanceResult<()> {
        let clash: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE name=?1 AND id IS NOT ?2 LIMIT 1",
                params![name, except],
                |r| r.get(0),
            )
            .optional()?;
        match clash {
            Some(_) => Err(FinanceError::Duplicate {
                entity: "Category",
                identifier: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Deletes a category together with all of its transactions.
    /// Returns the number of transactions removed.
    pub fn delete_category(&self, id: i64) -> FinanceResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM transactions WHERE category_id=?1", params![id])?;
        let n = tx.execute("DELETE FROM categories WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(FinanceError::NotFound {
                entity: "Category",
                identifier: id.to_string(),
            });
        }
        tx.commit()?;
        tracing::info!(category = id, removed, "category deleted");
        Ok(removed)
    }

    /// Inserts the default household categories into an empty table.
    pub fn seed_default_categories(&self) -> FinanceResult<usize> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
        if existing > 0 {
            return Ok(0);
        }
        let tx = self.conn.unchecked_transaction()?;
        for (i, (name, due_day, color)) in DEFAULT_CATEGORIES.iter().enumerate() {
            tx.execute(
                "INSERT INTO categories(name, due_day, color, ord) VALUES (?1,?2,?3,?4)",
                params![name, due_day, color, i as i32 + 1],
            )?;
        }
        tx.commit()?;
        Ok(DEFAULT_CATEGORIES.len())
    }

    pub fn transaction(&self, id: i64) -> FinanceResult<Transaction> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, category_id, year, month, planned_value, actual_value, notes
                 FROM transactions WHERE id=?1",
                params![id],
                raw_transaction,
            )
            .optional()?;
        match raw {
            Some(r) => r.parse(),
            None => Err(FinanceError::NotFound {
                entity: "Transaction",
                identifier: id.to_string(),
            }),
        }
    }

    /// Looks a cell up by its natural key. Other rows of the year are not read.
    pub fn transaction_at(
        &self,
        category_id: i64,
        year: i32,
        month: u32,
    ) -> FinanceResult<Option<Transaction>> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, category_id, year, month, planned_value, actual_value, notes
                 FROM transactions WHERE category_id=?1 AND year=?2 AND month=?3",
                params![category_id, year, month],
                raw_transaction,
            )
            .optional()?;
        raw.map(RawTransaction::parse).transpose()
    }

    /// Creates the (category, year, month) cell on first write and updates it afterwards.
    pub fn upsert_transaction(
        &self,
        category_id: i64,
        year: i32,
        month: u32,
        planned: Decimal,
        actual: Decimal,
        notes: Option<&str>,
    ) -> FinanceResult<Transaction> {
        validate_month(month)?;
        validate_amount("planned value", planned)?;
        validate_amount("actual value", actual)?;
        self.category(category_id)?;
        self.conn.execute(
            "INSERT INTO transactions(category_id, year, month, planned_value, actual_value, notes)
             VALUES (?1,?2,?3,?4,?5,?6)
             ON CONFLICT(category_id, year, month) DO UPDATE SET
                planned_value=excluded.planned_value,
                actual_value=excluded.actual_value,
                notes=excluded.notes,
                updated_at=datetime('now')",
            params![
                category_id,
                year,
                month,
                planned.to_string(),
                actual.to_string(),
                notes
            ],
        )?;
        let id: i64 = self.conn.query_row(
            "SELECT id FROM transactions WHERE category_id=?1 AND year=?2 AND month=?3",
            params![category_id, year, month],
            |r| r.get(0),
        )?;
        self.transaction(id)
    }

    /// Partial update; `None` keeps the stored value.
    pub fn update_transaction(
        &self,
        id: i64,
        planned: Option<Decimal>,
        actual: Option<Decimal>,
        notes: Option<&str>,
    ) -> FinanceResult<Transaction> {
        let current = self.transaction(id)?;
        let planned = planned.unwrap_or(current.planned_value);
        let actual = actual.unwrap_or(current.actual_value);
        validate_amount("planned value", planned)?;
        validate_amount("actual value", actual)?;
        let notes = notes.map(str::to_string).or(current.notes);
        self.conn.execute(
            "UPDATE transactions SET planned_value=?1, actual_value=?2, notes=?3,
                updated_at=datetime('now') WHERE id=?4",
            params![planned.to_string(), actual.to_string(), notes, id],
        )?;
        self.transaction(id)
    }

    /// Zeroes every actual value of `year`, keeping the plan. Returns the rows touched.
    pub fn reset_actual(&self, year: i32) -> FinanceResult<usize> {
        let n = self.conn.execute(
            "UPDATE transactions SET actual_value='0', updated_at=datetime('now')
             WHERE year=?1 AND actual_value<>'0'",
            params![year],
        )?;
        tracing::info!(year, reset = n, "actual values reset");
        Ok(n)
    }

    pub fn delete_transaction(&self, id: i64) -> FinanceResult<()> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(FinanceError::NotFound {
                entity: "Transaction",
                identifier: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn income(&self, year: i32, month: u32) -> FinanceResult<Option<Income>> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, year, month, aposentadoria, salario, recursos_externos, notes
                 FROM incomes WHERE year=?1 AND month=?2",
                params![year, month],
                raw_income,
            )
            .optional()?;
        raw.map(RawIncome::parse).transpose()
    }

    pub fn upsert_income(
        &self,
        year: i32,
        month: u32,
        aposentadoria: Decimal,
        salario: Decimal,
        recursos_externos: Decimal,
        notes: Option<&str>,
    ) -> FinanceResult<Income> {
        validate_month(month)?;
        validate_amount("aposentadoria", aposentadoria)?;
        validate_amount("salario", salario)?;
        validate_amount("recursos_externos", recursos_externos)?;
        self.conn.execute(
            "INSERT INTO incomes(year, month, aposentadoria, salario, recursos_externos, notes)
             VALUES (?1,?2,?3,?4,?5,?6)
             ON CONFLICT(year, month) DO UPDATE SET
                aposentadoria=excluded.aposentadoria,
                salario=excluded.salario,
                recursos_externos=excluded.recursos_externos,
                notes=excluded.notes,
                updated_at=datetime('now')",
            params![
                year,
                month,
                aposentadoria.to_string(),
                salario.to_string(),
                recursos_externos.to_string(),
                notes
            ],
        )?;
        self.income(year, month)?.ok_or_else(|| FinanceError::NotFound {
            entity: "Income",
            identifier: format!("{}-{:02}", year, month),
        })
    }

    pub fn delete_income(&self, id: i64) -> FinanceResult<()> {
        let n = self
            .conn
            .execute("DELETE FROM incomes WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(FinanceError::NotFound {
                entity: "Income",
                identifier: id.to_string(),
            });
        }
        Ok(())
    }

    /// Removes every income row of `year`. Returns the rows removed.
    pub fn delete_incomes_for_year(&self, year: i32) -> FinanceResult<usize> {
        let n = self
            .conn
            .execute("DELETE FROM incomes WHERE year=?1", params![year])?;
        Ok(n)
    }

    /// Ids of transactions whose category row no longer exists.
    pub fn orphaned_transactions(&self) -> FinanceResult<Vec<(i64, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.category_id FROM transactions t
             LEFT JOIN categories c ON c.id=t.category_id
             WHERE c.id IS NULL ORDER BY t.id",
        )?;
        let rows = stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Every year that has a transaction or income row.
    pub fn years(&self) -> FinanceResult<Vec<i32>> {
        let mut stmt = self.conn.prepare(
            "SELECT year FROM transactions UNION SELECT year FROM incomes ORDER BY 1",
        )?;
        let rows = stmt.query_map([], |r| r.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl EntityStore for SqliteStore<'_> {
    fn list_categories(&self) -> FinanceResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, due_day, color, ord FROM categories ORDER BY ord, id")?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_transactions(&self, year: i32) -> FinanceResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, year, month, planned_value, actual_value, notes
             FROM transactions WHERE year=?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![year], raw_transaction)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?.parse()?);
        }
        tracing::debug!(year, count = out.len(), "loaded transactions");
        Ok(out)
    }

    fn list_incomes(&self, year: i32) -> FinanceResult<Vec<Income>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, year, month, aposentadoria, salario, recursos_externos, notes
             FROM incomes WHERE year=?1 ORDER BY month",
        )?;
        let rows = stmt.query_map(params![year], raw_income)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?.parse()?);
        }
        Ok(out)
    }
}

fn with_derived_due_day(draft: &CategoryDraft) -> CategoryDraft {
    let mut d = draft.clone();
    if d.due_day.is_none() {
        d.due_day = due_day_from_name(&d.name);
    }
    d
}

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        due_day: r.get(2)?,
        color: r.get(3)?,
        order: r.get(4)?,
    })
}

struct RawTransaction {
    id: i64,
    category_id: i64,
    year: i32,
    month: StoredMonth,
    planned: String,
    actual: String,
    notes: Option<String>,
}

impl RawTransaction {
    fn parse(self) -> FinanceResult<Transaction> {
        Ok(Transaction {
            id: self.id,
            category_id: self.category_id,
            year: self.year,
            month: stored_month("transaction", self.id, self.month)?,
            planned_value: stored_decimal("transaction", self.id, "planned_value", &self.planned)?,
            actual_value: stored_decimal("transaction", self.id, "actual_value", &self.actual)?,
            notes: self.notes,
        })
    }
}

fn raw_transaction(r: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok(RawTransaction {
        id: r.get(0)?,
        category_id: r.get(1)?,
        year: r.get(2)?,
        month: StoredMonth::read(r, 3)?,
        planned: r.get(4)?,
        actual: r.get(5)?,
        notes: r.get(6)?,
    })
}

struct RawIncome {
    id: i64,
    year: i32,
    month: StoredMonth,
    aposentadoria: String,
    salario: String,
    recursos_externos: String,
    notes: Option<String>,
}

impl RawIncome {
    fn parse(self) -> FinanceResult<Income> {
        Ok(Income {
            id: self.id,
            year: self.year,
            month: stored_month("income", self.id, self.month)?,
            aposentadoria: stored_decimal("income", self.id, "aposentadoria", &self.aposentadoria)?,
            salario: stored_decimal("income", self.id, "salario", &self.salario)?,
            recursos_externos: stored_decimal(
                "income",
                self.id,
                "recursos_externos",
                &self.recursos_externos,
            )?,
            notes: self.notes,
        })
    }
}

fn raw_income(r: &Row<'_>) -> rusqlite::Result<RawIncome> {
    Ok(RawIncome {
        id: r.get(0)?,
        year: r.get(1)?,
        month: StoredMonth::read(r, 2)?,
        aposentadoria: r.get(3)?,
        salario: r.get(4)?,
        recursos_externos: r.get(5)?,
        notes: r.get(6)?,
    })
}

/// Month column as found on disk. Rows written by other tools may hold
/// anything SQLite accepts, so the type is checked at parse time.
enum StoredMonth {
    Integer(i64),
    Other(String),
}

impl StoredMonth {
    fn read(r: &Row<'_>, idx: usize) -> rusqlite::Result<Self> {
        Ok(match r.get_ref(idx)? {
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Null => Self::Other("NULL".to_string()),
            ValueRef::Real(f) => Self::Other(f.to_string()),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                Self::Other(String::from_utf8_lossy(t).into_owned())
            }
        })
    }
}

// Range is checked by the aggregator; here only the type conversion can fail.
fn stored_month(kind: &'static str, id: i64, month: StoredMonth) -> FinanceResult<u32> {
    match month {
        StoredMonth::Integer(m) => u32::try_from(m).map_err(|_| {
            FinanceError::malformed(kind, id, format!("month {} is outside 1..=12", m))
        }),
        StoredMonth::Other(raw) => Err(FinanceError::malformed(
            kind,
            id,
            format!("month '{}' is not an integer", raw),
        )),
    }
}

fn stored_decimal(kind: &'static str, id: i64, field: &str, s: &str) -> FinanceResult<Decimal> {
    s.trim().parse::<Decimal>().map_err(|_| {
        FinanceError::malformed(kind, id, format!("{} '{}' is not a decimal", field, s))
    })
}

/// Loads a full year snapshot and aggregates it.
pub fn summary_for_year<S: EntityStore + ?Sized>(store: &S, year: i32) -> FinanceResult<Summary> {
    let categories = store.list_categories()?;
    let transactions = store.list_transactions(year)?;
    aggregate(&categories, &transactions, year)
}

pub fn overview_for_year<S: EntityStore + ?Sized>(
    store: &S,
    year: i32,
) -> FinanceResult<YearOverview> {
    let categories = store.list_categories()?;
    let transactions = store.list_transactions(year)?;
    let incomes = store.list_incomes(year)?;
    overview(&categories, &transactions, &incomes, year)
}
