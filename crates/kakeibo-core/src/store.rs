//! The `ExpenseStore` trait.
//!
//! Implemented by storage backends (e.g. `kakeibo-store-sqlite`). The exporter
//! and the CLI depend on this abstraction, not on any concrete backend.
//!
//! There is no `open` here: a backend hands out a store value only once its
//! database is open, so every method below runs against an open store.

use std::future::Future;

use crate::expense::{DateRange, Expense};

/// Durable, ordered, queryable storage of [`Expense`] records.
///
/// Each method is atomic on its own; a sequence of calls is not. Calls that
/// touch the same id commit in the order they were issued.
pub trait ExpenseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `expense`, or fully replace the record with the same id.
  fn put(
    &self,
    expense: Expense,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the record with `id`. Removing a missing id is not an error.
  fn delete<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Fetch one record. `None` means no record has that id.
  fn get<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Expense>, Self::Error>> + Send + 'a;

  /// Every record, newest date first. Records sharing a date come back in a
  /// stable backend-defined order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Expense>, Self::Error>> + Send + '_;

  /// Records whose date lies in `range` (both ends inclusive), oldest first.
  fn list_by_date_range(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<Expense>, Self::Error>> + Send + '_;

  /// Total number of stored records.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
