//! CSV import for transactions and objectives
//!
//! Columns are located by header name, so column order is free. Missing or
//! unparseable values fall back to defaults; a file without at least a
//! header and one data row imports nothing.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Category, Objective, Transaction, TransactionKind};
use crate::stores::IdGenerator;

/// Resolved column positions of a header row
struct Columns {
    headers: StringRecord,
}

impl Columns {
    fn new(headers: StringRecord) -> Self {
        Self { headers }
    }

    /// Non-empty value of column `name` in `record`
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        let idx = self
            .headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))?;
        record.get(idx).filter(|v| !v.is_empty())
    }
}

/// Read every non-blank row; `None` when there is no data row
fn read_rows<R: Read>(reader: R) -> Result<Option<(Columns, Vec<StringRecord>)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let blank = record.len() == 0 || (record.len() == 1 && record[0].trim().is_empty());
        if !blank {
            rows.push(record);
        }
    }

    if rows.len() < 2 {
        debug!(rows = rows.len(), "CSV has no data rows, nothing imported");
        return Ok(None);
    }

    let headers = rows.remove(0);
    Ok(Some((Columns::new(headers), rows)))
}

fn parse_number(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Stored id, or a fresh one when missing, zero or not a number
fn parse_id(value: Option<&str>, ids: &mut IdGenerator) -> i64 {
    let id = parse_number(value) as i64;
    if id != 0 {
        ids.observe(id);
        id
    } else {
        ids.next_id()
    }
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        // Timestamps like 2025-03-02T00:00:00Z
        .or_else(|| {
            value
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
        .ok_or_else(|| Error::Validation(format!("Invalid date '{}' on row {}", value, row)))
}

/// Parse a transactions export
///
/// The amount sign is re-derived from the type. Returns `None` when the
/// file holds no data row.
pub fn parse_transactions_csv<R: Read>(
    reader: R,
    ids: &mut IdGenerator,
    today: NaiveDate,
) -> Result<Option<Vec<Transaction>>> {
    let Some((columns, rows)) = read_rows(reader)? else {
        return Ok(None);
    };

    let mut transactions = Vec::with_capacity(rows.len());
    for (i, record) in rows.iter().enumerate() {
        let row = i + 2;

        let kind = match columns.get(record, "type") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(row, value = raw, "Unknown transaction type, using expense");
                TransactionKind::Expense
            }),
            None => TransactionKind::Expense,
        };

        let date = match columns.get(record, "date") {
            Some(raw) => parse_date(raw, row)?,
            None => today,
        };

        transactions.push(Transaction {
            id: parse_id(columns.get(record, "id"), ids),
            kind,
            description: columns
                .get(record, "description")
                .unwrap_or_default()
                .to_string(),
            amount: kind.signed(parse_number(columns.get(record, "montant"))),
            date,
            category: columns
                .get(record, "categorie")
                .unwrap_or(Category::Autre.as_str())
                .to_string(),
        });
    }

    debug!("Parsed {} transactions from CSV", transactions.len());
    Ok(Some(transactions))
}

/// Parse an objectives export; `None` when the file holds no data row
pub fn parse_objectives_csv<R: Read>(
    reader: R,
    ids: &mut IdGenerator,
) -> Result<Option<Vec<Objective>>> {
    let Some((columns, rows)) = read_rows(reader)? else {
        return Ok(None);
    };

    let objectives: Vec<Objective> = rows
        .iter()
        .map(|record| Objective {
            id: parse_id(columns.get(record, "id"), ids),
            name: columns.get(record, "nom").unwrap_or_default().to_string(),
            target: parse_number(columns.get(record, "cible")),
            saved: parse_number(columns.get(record, "epargne")),
        })
        .collect();

    debug!("Parsed {} objectives from CSV", objectives.len());
    Ok(Some(objectives))
}
