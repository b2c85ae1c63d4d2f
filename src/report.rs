// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Yearly CSV report.
//!
//! Values are written raw (`1500.5`, not `1.500,50`) so the file can be
//! re-parsed. Fields are never quoted: a comma inside a category name splits
//! that row. Known limitation, left visible on purpose.

use crate::error::FinanceResult;
use crate::summary::Summary;
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use rust_decimal::Decimal;
use std::path::Path;

pub const MONTH_NAMES_PT_BR: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const MONTH_HEADER: [&str; 4] = ["Mês", "Planejado", "Realizado", "Diferença"];
const CATEGORY_HEADER: [&str; 4] = ["Categoria", "Planejado", "Realizado", "Diferença"];

pub fn export_file_name(year: i32) -> String {
    format!("relatorio-financeiro-{}.csv", year)
}

/// Renders `summary` as CSV text. `months` supplies the twelve month labels;
/// a missing label falls back to the month number.
/// Each section gets its own writer; the blank separator lines are literal.
pub fn export_csv(summary: &Summary, months: &[&str]) -> FinanceResult<String> {
    let mut title = section_writer();
    title.write_record([format!("Relatório Financeiro Anual - {}", summary.year)])?;

    let mut by_month = section_writer();
    by_month.write_record(MONTH_HEADER)?;
    for m in &summary.monthly {
        let label = months
            .get(m.month as usize - 1)
            .map(|s| s.to_string())
            .unwrap_or_else(|| m.month.to_string());
        by_month.write_record([label, raw(m.planned), raw(m.actual), raw(m.variance())])?;
    }

    let mut by_category = section_writer();
    by_category.write_record(CATEGORY_HEADER)?;
    for c in &summary.categories {
        by_category.write_record([
            c.name.clone(),
            raw(c.planned),
            raw(c.actual),
            raw(c.variance()),
        ])?;
    }

    let mut out = finish(title)?;
    out.push('\n');
    out.push_str(&finish(by_month)?);
    out.push_str("\n\n");
    out.push_str(&finish(by_category)?);
    Ok(out)
}

/// Writes the report to `path`, returning the number of bytes written.
pub fn write_csv_file(summary: &Summary, months: &[&str], path: &Path) -> FinanceResult<usize> {
    let text = export_csv(summary, months)?;
    std::fs::write(path, text.as_bytes())?;
    tracing::info!(year = summary.year, path = %path.display(), "report exported");
    Ok(text.len())
}

fn section_writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(wtr: Writer<Vec<u8>>) -> FinanceResult<String> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn raw(d: Decimal) -> String {
    d.normalize().to_string()
}
