//! CSV export for Kakeibo.
//!
//! Renders expense records as a spreadsheet-friendly CSV file and fetches the
//! records to export from any [`ExpenseStore`].
//!
//! # Quick start
//!
//! ```no_run
//! # async fn run(store: kakeibo_store_sqlite::SqliteStore) -> Result<(), Box<dyn std::error::Error>> {
//! use kakeibo_csv::{ExportFilter, export};
//!
//! let out = export(&store, ExportFilter::All).await?;
//! std::fs::write("expenses.csv", out.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
mod render;

use chrono::NaiveDate;
use kakeibo_core::{
  expense::{DateRange, format_date},
  store::ExpenseStore,
};

pub use error::{Error, Result};
pub use render::{BOM, HEADER, render};

/// Which records to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFilter {
  /// The whole table.
  All,
  /// Records dated within the inclusive range.
  Range(DateRange),
}

/// A rendered export.
#[derive(Debug, Clone)]
pub struct Export {
  /// Number of data rows, excluding the header.
  pub rows:  usize,
  /// The complete file contents, BOM included.
  pub bytes: Vec<u8>,
}

/// Query `store` according to `filter` and render the result.
///
/// An empty selection still yields a header-only file; whether to write it is
/// up to the caller.
pub async fn export<S>(store: &S, filter: ExportFilter) -> Result<Export>
where
  S: ExpenseStore,
{
  let expenses = match filter {
    ExportFilter::All => store.list_all().await,
    ExportFilter::Range(range) => store.list_by_date_range(range).await,
  }
  .map_err(|e| Error::Store(Box::new(e)))?;

  tracing::debug!(rows = expenses.len(), ?filter, "rendering csv export");
  Ok(Export { rows: expenses.len(), bytes: render(&expenses) })
}

/// `expenses_2024-03-05.csv` for an export made on 2024-03-05.
pub fn export_file_name(today: NaiveDate) -> String {
  format!("expenses_{}.csv", format_date(today))
}
