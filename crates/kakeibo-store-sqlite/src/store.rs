//! [`SqliteStore`] — the SQLite implementation of [`ExpenseStore`].

use std::path::Path;

use kakeibo_core::{
  expense::{DateRange, Expense, format_date},
  store::ExpenseStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{COLUMNS, RawExpense},
  schema::{PRAGMAS, SCHEMA_V1, SCHEMA_VERSION},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An expense store backed by a single SQLite file.
///
/// The only way to obtain one is [`SqliteStore::open`] (or the in-memory
/// variant), so every handle refers to an initialised database. Cloning is
/// cheap and all clones share one connection; calls are executed one at a
/// time, in the order they were issued.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and bring its schema up to date.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path)
      .await
      .map_err(Error::Initialization)?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "expense store open");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Initialization)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// The `user_version` currently recorded in the database file.
  pub async fn schema_version(&self) -> Result<i64> {
    self
      .conn
      .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
      .await
      .map_err(Error::Read)
  }

  async fn init_schema(&self) -> Result<()> {
    let found: i64 = self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
      })
      .await
      .map_err(Error::Initialization)?;

    if found > SCHEMA_VERSION {
      return Err(Error::UnsupportedVersion { found, supported: SCHEMA_VERSION });
    }
    if found == SCHEMA_VERSION {
      return Ok(());
    }

    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_V1)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::Initialization)?;

    tracing::info!(from = found, to = SCHEMA_VERSION, "expense schema created");
    Ok(())
  }

  /// Run a `SELECT {COLUMNS} ...` query and decode every row.
  async fn query_expenses(
    &self,
    sql: String,
    bounds: Option<(String, String)>,
  ) -> Result<Vec<Expense>> {
    let raws: Vec<RawExpense> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match bounds {
          Some((start, end)) => stmt
            .query_map(rusqlite::params![start, end], RawExpense::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawExpense::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await
      .map_err(Error::Read)?;

    raws.into_iter().map(RawExpense::into_expense).collect()
  }
}

// ─── ExpenseStore impl ───────────────────────────────────────────────────────

impl ExpenseStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn put(&self, expense: Expense) -> Result<()> {
    expense.validate()?;
    let row = RawExpense::from(expense);
    tracing::debug!(id = %row.id, date = %row.date, "put expense");

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO expenses (id, date, amount_jpy, category, tags, memo, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT(id) DO UPDATE SET
             date       = excluded.date,
             amount_jpy = excluded.amount_jpy,
             category   = excluded.category,
             tags       = excluded.tags,
             memo       = excluded.memo,
             updated_at = excluded.updated_at",
          rusqlite::params![
            row.id,
            row.date,
            row.amount_jpy,
            row.category,
            row.tags,
            row.memo,
            row.updated_at,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Write)?;
    Ok(())
  }

  async fn delete(&self, id: &str) -> Result<()> {
    let id = id.to_owned();
    tracing::debug!(%id, "delete expense");

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM expenses WHERE id = ?1", rusqlite::params![id])?)
      })
      .await
      .map_err(Error::Write)?;

    if removed == 0 {
      tracing::debug!("delete matched no expense");
    }
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, id: &str) -> Result<Option<Expense>> {
    let id = id.to_owned();

    let raw: Option<RawExpense> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM expenses WHERE id = ?1"),
              rusqlite::params![id],
              RawExpense::from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Read)?;

    raw.map(RawExpense::into_expense).transpose()
  }

  async fn list_all(&self) -> Result<Vec<Expense>> {
    self
      .query_expenses(
        format!("SELECT {COLUMNS} FROM expenses ORDER BY date DESC, id DESC"),
        None,
      )
      .await
  }

  async fn list_by_date_range(&self, range: DateRange) -> Result<Vec<Expense>> {
    let bounds = (format_date(range.start()), format_date(range.end()));
    tracing::debug!(start = %bounds.0, end = %bounds.1, "range scan");

    self
      .query_expenses(
        format!(
          "SELECT {COLUMNS} FROM expenses
           WHERE date BETWEEN ?1 AND ?2
           ORDER BY date ASC, id ASC"
        ),
        Some(bounds),
      )
      .await
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))?)
      })
      .await
      .map_err(Error::Read)?;
    Ok(u64::try_from(n).unwrap_or(0))
  }
}
