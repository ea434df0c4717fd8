//! CSV serializer.
//!
//! Produces UTF-8 with a leading byte-order mark and CRLF line endings. The
//! free-text `tags` and `memo` columns are always quoted.

use kakeibo_core::expense::{Expense, format_date, format_timestamp};

/// UTF-8 byte-order mark; lets spreadsheet software detect the encoding.
pub const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

pub const HEADER: &str = "id,date,amount_jpy,category,tags,memo,updated_at";

const CRLF: &str = "\r\n";

// ─── Field quoting ────────────────────────────────────────────────────────────

/// Wrap in double quotes, doubling any embedded quote.
fn quoted(s: &str) -> String { format!("\"{}\"", s.replace('"', "\"\"")) }

/// Quote only when the value would otherwise break the row.
fn field(s: &str) -> String {
  if s.contains([',', '"', '\r', '\n']) {
    quoted(s)
  } else {
    s.to_owned()
  }
}

fn row(e: &Expense) -> String {
  [
    field(&e.id),
    format_date(e.date),
    e.amount_jpy.to_string(),
    field(&e.category),
    quoted(&e.tags),
    quoted(&e.memo),
    format_timestamp(e.updated_at),
  ]
  .join(",")
}

// ─── Document ─────────────────────────────────────────────────────────────────

/// Render `expenses` as a complete CSV file, in the order given.
pub fn render(expenses: &[Expense]) -> Vec<u8> {
  let mut text = String::with_capacity(64 * (expenses.len() + 1));
  text.push_str(HEADER);
  text.push_str(CRLF);
  for e in expenses {
    text.push_str(&row(e));
    text.push_str(CRLF);
  }

  let mut out = Vec::with_capacity(BOM.len() + text.len());
  out.extend_from_slice(&BOM);
  out.extend_from_slice(text.as_bytes());
  out
}
