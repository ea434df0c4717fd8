//! Conversions between [`Expense`] and the plain-text column values stored in
//! SQLite.
//!
//! Dates are stored as `YYYY-MM-DD` so that text order is date order.
//! Timestamps are stored as RFC 3339 UTC strings.

use chrono::{DateTime, Utc};
use kakeibo_core::expense::{Expense, format_date, format_timestamp, parse_date};

use crate::{Error, Result};

/// Column list shared by every `SELECT`, in [`RawExpense::from_row`] order.
pub const COLUMNS: &str = "id, date, amount_jpy, category, tags, memo, updated_at";

fn decode_dt(s: &str) -> Result<DateTime<Utc>, String> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| format!("bad updated_at {s:?}: {e}"))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column values of one `expenses` row, in [`COLUMNS`] order. Used both to
/// bind a write and to read a row back.
pub struct RawExpense {
  pub id:         String,
  pub date:       String,
  pub amount_jpy: i64,
  pub category:   String,
  pub tags:       String,
  pub memo:       String,
  pub updated_at: String,
}

impl From<Expense> for RawExpense {
  fn from(e: Expense) -> Self {
    Self {
      date:       format_date(e.date),
      updated_at: format_timestamp(e.updated_at),
      id:         e.id,
      amount_jpy: e.amount_jpy,
      category:   e.category,
      tags:       e.tags,
      memo:       e.memo,
    }
  }
}

impl RawExpense {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      date:       row.get(1)?,
      amount_jpy: row.get(2)?,
      category:   row.get(3)?,
      tags:       row.get(4)?,
      memo:       row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_expense(self) -> Result<Expense> {
    let date = parse_date(&self.date)
      .map_err(|e| Error::Decode { id: self.id.clone(), reason: e.to_string() })?;
    let updated_at = decode_dt(&self.updated_at)
      .map_err(|reason| Error::Decode { id: self.id.clone(), reason })?;

    Ok(Expense {
      id: self.id,
      date,
      amount_jpy: self.amount_jpy,
      category: self.category,
      tags: self.tags,
      memo: self.memo,
      updated_at,
    })
  }
}
