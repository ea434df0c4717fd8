//! Integration tests for `SqliteStore`, mostly against an in-memory database.

use chrono::{NaiveDate, TimeZone, Utc};
use kakeibo_core::{
  expense::{DateRange, Expense, ExpenseDraft},
  store::ExpenseStore,
};

use crate::{Error, SCHEMA_VERSION, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn day(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

fn expense(id: &str, date: &str, amount_jpy: i64) -> Expense {
  Expense {
    id:         id.into(),
    date:       day(date),
    amount_jpy,
    category:   "食費".into(),
    tags:       String::new(),
    memo:       String::new(),
    updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
  }
}

fn ids(expenses: &[Expense]) -> Vec<&str> {
  expenses.iter().map(|e| e.id.as_str()).collect()
}

// ─── Open ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_sets_schema_version() {
  let s = store().await;
  assert_eq!(s.schema_version().await.unwrap(), SCHEMA_VERSION);
  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn reopen_keeps_data_and_is_idempotent() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("expenses.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.put(expense("a", "2024-03-05", 1200)).await.unwrap();
  }

  for _ in 0..2 {
    let s = SqliteStore::open(&path).await.unwrap();
    assert_eq!(s.schema_version().await.unwrap(), SCHEMA_VERSION);
    assert_eq!(s.count().await.unwrap(), 1);
    assert_eq!(s.get("a").await.unwrap().unwrap().amount_jpy, 1200);
  }
}

#[tokio::test]
async fn open_rejects_newer_schema() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("future.db");
  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1).unwrap();
  }

  let err = SqliteStore::open(&path).await.err().expect("newer schema must fail");
  assert!(err.is_initialization());
  assert!(matches!(err, Error::UnsupportedVersion { found, .. } if found == SCHEMA_VERSION + 1));
}

#[tokio::test]
async fn open_fails_when_path_is_unusable() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("missing-dir").join("expenses.db");

  let err = SqliteStore::open(&path).await.err().expect("open must fail");
  assert!(err.is_initialization());
}

// ─── Put / get ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_then_get_round_trips_every_field() {
  let s = store().await;
  let input = Expense {
    id:         "a".into(),
    date:       day("2024-03-05"),
    amount_jpy: 1200,
    category:   "食費".into(),
    tags:       "個人;仕事".into(),
    memo:       "コンビニ".into(),
    updated_at: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
  };

  s.put(input.clone()).await.unwrap();
  assert_eq!(s.get("a").await.unwrap(), Some(input));
}

#[tokio::test]
async fn sub_second_timestamps_survive() {
  let s = store().await;
  let e = ExpenseDraft {
    date:       day("2024-03-05"),
    amount_jpy: 300,
    category:   "交通費".into(),
    tags:       vec!["仕事".into()],
    memo:       "電車".into(),
  }
  .create();

  s.put(e.clone()).await.unwrap();
  assert_eq!(s.get(&e.id).await.unwrap(), Some(e));
}

#[tokio::test]
async fn get_missing_is_none_not_error() {
  let s = store().await;
  assert!(s.get("nonexistent-id").await.unwrap().is_none());
}

#[tokio::test]
async fn put_twice_with_same_record_is_idempotent() {
  let s = store().await;
  let e = expense("a", "2024-01-01", 500);

  s.put(e.clone()).await.unwrap();
  s.put(e.clone()).await.unwrap();

  assert_eq!(s.count().await.unwrap(), 1);
  assert_eq!(s.list_all().await.unwrap(), vec![e]);
}

#[tokio::test]
async fn put_new_id_inserts_existing_id_replaces() {
  let s = store().await;
  s.put(expense("a", "2024-01-01", 500)).await.unwrap();
  s.put(expense("b", "2024-01-02", 700)).await.unwrap();
  assert_eq!(s.count().await.unwrap(), 2);

  let replacement = Expense {
    id:         "a".into(),
    date:       day("2024-02-10"),
    amount_jpy: 9800,
    category:   "趣味".into(),
    tags:       "家族".into(),
    memo:       "本".into(),
    updated_at: Utc.with_ymd_and_hms(2024, 2, 10, 9, 30, 0).unwrap(),
  };
  s.put(replacement.clone()).await.unwrap();

  assert_eq!(s.count().await.unwrap(), 2);
  assert_eq!(s.get("a").await.unwrap(), Some(replacement));
}

#[tokio::test]
async fn put_rejects_malformed_record_before_writing() {
  let s = store().await;
  let mut bad = expense("", "2024-01-01", 100);

  let err = s.put(bad.clone()).await.unwrap_err();
  assert!(matches!(err, Error::Invalid(kakeibo_core::Error::EmptyId)));

  bad.id = "x".into();
  bad.tags = "a;;b".into();
  let err = s.put(bad).await.unwrap_err();
  assert!(matches!(err, Error::Invalid(kakeibo_core::Error::EmptyTag(_))));

  assert_eq!(s.count().await.unwrap(), 0);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_record() {
  let s = store().await;
  s.put(expense("a", "2024-01-01", 100)).await.unwrap();
  s.put(expense("b", "2024-01-02", 200)).await.unwrap();

  s.delete("a").await.unwrap();

  assert!(s.get("a").await.unwrap().is_none());
  assert_eq!(ids(&s.list_all().await.unwrap()), ["b"]);
}

#[tokio::test]
async fn delete_twice_succeeds_both_times() {
  let s = store().await;
  s.put(expense("a", "2024-01-01", 100)).await.unwrap();

  s.delete("a").await.unwrap();
  s.delete("a").await.unwrap();
  s.delete("never-existed").await.unwrap();
  assert_eq!(s.count().await.unwrap(), 0);
}

// ─── Ordered listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn list_all_on_empty_store_is_empty() {
  let s = store().await;
  assert!(s.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_all_is_date_descending_and_complete() {
  let s = store().await;
  s.put(expense("m", "2024-02-01", 1)).await.unwrap();
  s.put(expense("k", "2023-12-31", 2)).await.unwrap();
  s.put(expense("z", "2024-01-15", 3)).await.unwrap();
  s.put(expense("a", "2024-03-01", 4)).await.unwrap();

  let all = s.list_all().await.unwrap();
  assert_eq!(all.len() as u64, s.count().await.unwrap());
  assert_eq!(ids(&all), ["a", "m", "z", "k"]);
  assert!(all.windows(2).all(|w| w[0].date >= w[1].date));
}

#[tokio::test]
async fn list_all_breaks_date_ties_by_id() {
  let s = store().await;
  s.put(expense("b", "2024-01-01", 1)).await.unwrap();
  s.put(expense("c", "2024-01-01", 2)).await.unwrap();
  s.put(expense("a", "2024-01-01", 3)).await.unwrap();

  let first = s.list_all().await.unwrap();
  assert_eq!(ids(&first), ["c", "b", "a"]);
  assert_eq!(s.list_all().await.unwrap(), first);
}

#[tokio::test]
async fn index_follows_date_changes() {
  let s = store().await;
  s.put(expense("a", "2024-01-01", 1)).await.unwrap();
  s.put(expense("b", "2024-01-10", 2)).await.unwrap();

  s.put(expense("a", "2024-02-01", 1)).await.unwrap();
  assert_eq!(ids(&s.list_all().await.unwrap()), ["a", "b"]);

  let jan = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
  assert_eq!(ids(&s.list_by_date_range(jan).await.unwrap()), ["b"]);
}

// ─── Range queries ───────────────────────────────────────────────────────────

#[tokio::test]
async fn range_is_inclusive_and_ascending() {
  let s = store().await;
  s.put(expense("feb", "2024-02-01", 3)).await.unwrap();
  s.put(expense("mid", "2024-01-15", 2)).await.unwrap();
  s.put(expense("new", "2024-01-01", 1)).await.unwrap();

  let range = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
  let got = s.list_by_date_range(range).await.unwrap();
  assert_eq!(ids(&got), ["new", "mid"]);
}

#[tokio::test]
async fn range_with_equal_bounds_matches_single_day() {
  let s = store().await;
  s.put(expense("a", "2024-01-14", 1)).await.unwrap();
  s.put(expense("b", "2024-01-15", 2)).await.unwrap();
  s.put(expense("c", "2024-01-16", 3)).await.unwrap();

  let range = DateRange::parse("2024-01-15", "2024-01-15").unwrap();
  assert_eq!(ids(&s.list_by_date_range(range).await.unwrap()), ["b"]);
}

#[tokio::test]
async fn range_without_matches_is_empty() {
  let s = store().await;
  s.put(expense("a", "2024-01-01", 1)).await.unwrap();

  let range = DateRange::parse("2025-01-01", "2025-12-31").unwrap();
  assert!(s.list_by_date_range(range).await.unwrap().is_empty());
}

// ─── Ordering & corruption ───────────────────────────────────────────────────

#[tokio::test]
async fn writes_to_one_id_commit_in_issue_order() {
  let s = store().await;

  // `join!` polls left to right, so the calls reach the connection in this
  // order even though none of them has completed yet.
  let (a, b, c, d) = tokio::join!(
    s.put(expense("same", "2024-01-01", 1)),
    s.put(expense("same", "2024-01-02", 2)),
    s.delete("same"),
    s.put(expense("same", "2024-01-04", 4)),
  );
  a.unwrap();
  b.unwrap();
  c.unwrap();
  d.unwrap();

  let e = s.get("same").await.unwrap().unwrap();
  assert_eq!((e.amount_jpy, e.date), (4, day("2024-01-04")));
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_puts_on_distinct_ids_all_land() {
  let s = store().await;
  let mut set = tokio::task::JoinSet::new();
  for i in 0..25 {
    let s = s.clone();
    set.spawn(async move {
      s.put(expense(&format!("id-{i:02}"), "2024-01-01", i)).await
    });
  }
  while let Some(res) = set.join_next().await {
    res.unwrap().unwrap();
  }
  assert_eq!(s.count().await.unwrap(), 25);
  assert_eq!(s.list_all().await.unwrap().len(), 25);
}

#[tokio::test]
async fn corrupt_row_is_a_read_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("expenses.db");
  SqliteStore::open(&path).await.unwrap();
  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn
      .execute(
        "INSERT INTO expenses (id, date, amount_jpy, category, tags, memo, updated_at)
         VALUES ('bad', 'not-a-date', 1, 'x', '', '', '2024-01-01T00:00:00Z')",
        [],
      )
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let err = s.get("bad").await.unwrap_err();
  assert!(err.is_read());
  assert!(matches!(err, Error::Decode { ref id, .. } if id == "bad"));
  assert!(s.list_all().await.unwrap_err().is_read());
}

// ─── Engine failures ─────────────────────────────────────────────────────────

/// Create an on-disk store, then run `sql` on it through a second connection.
async fn tampered_store(dir: &tempfile::TempDir, seed: &[Expense], sql: &str) -> SqliteStore {
  let path = dir.path().join("expenses.db");
  {
    let s = SqliteStore::open(&path).await.unwrap();
    for e in seed {
      s.put(e.clone()).await.unwrap();
    }
  }
  rusqlite::Connection::open(&path)
    .unwrap()
    .execute_batch(sql)
    .unwrap();
  SqliteStore::open(&path).await.unwrap()
}

#[tokio::test]
async fn rejected_insert_is_a_write_error() {
  let dir = tempfile::tempdir().unwrap();
  let s = tampered_store(
    &dir,
    &[],
    "CREATE TRIGGER reject_insert BEFORE INSERT ON expenses
     BEGIN SELECT RAISE(ABORT, 'full'); END;",
  )
  .await;

  let err = s.put(expense("a", "2024-03-05", 1200)).await.unwrap_err();
  assert!(err.is_write());
  assert!(!err.is_read());
  assert!(matches!(err, Error::Write(_)));
  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn rejected_delete_is_a_write_error() {
  let dir = tempfile::tempdir().unwrap();
  let s = tampered_store(
    &dir,
    &[expense("a", "2024-03-05", 1200)],
    "CREATE TRIGGER reject_delete BEFORE DELETE ON expenses
     BEGIN SELECT RAISE(ABORT, 'locked'); END;",
  )
  .await;

  let err = s.delete("a").await.unwrap_err();
  assert!(err.is_write());
  assert!(matches!(err, Error::Write(_)));
  assert!(s.get("a").await.unwrap().is_some());
}

#[tokio::test]
async fn missing_table_is_a_read_error() {
  let dir = tempfile::tempdir().unwrap();
  let s = tampered_store(&dir, &[expense("a", "2024-03-05", 1200)], "DROP TABLE expenses;").await;

  let err = s.get("a").await.unwrap_err();
  assert!(err.is_read());
  assert!(!err.is_write());
  assert!(matches!(err, Error::Read(_)));

  assert!(matches!(s.list_all().await.unwrap_err(), Error::Read(_)));
  let jan = DateRange::parse("2024-01-01", "2024-12-31").unwrap();
  assert!(matches!(s.list_by_date_range(jan).await.unwrap_err(), Error::Read(_)));
  assert!(matches!(s.count().await.unwrap_err(), Error::Read(_)));
}
