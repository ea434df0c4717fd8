//! `kakeibo` — record, list and export personal expenses.
//!
//! # Usage
//!
//! ```text
//! kakeibo add --amount 1200 --category 食費 --tag 個人 --memo コンビニ
//! kakeibo list
//! kakeibo export --from 2024-01-01 --to 2024-01-31
//! ```

mod settings;
mod view;

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
};

use anyhow::{Context as _, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use kakeibo_core::{
  expense::{DateRange, ExpenseDraft, parse_date},
  store::ExpenseStore,
  vocab::{Category, TAGS, append_memo_template},
};
use kakeibo_csv::{ExportFilter, export, export_file_name};
use kakeibo_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "kakeibo", version, about = "Personal expense tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "kakeibo.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Record a new expense.
  Add {
    /// Defaults to today.
    #[arg(long, value_parser = date_arg)]
    date:     Option<NaiveDate>,
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    amount:   i64,
    #[arg(long, value_parser = category_arg)]
    category: Category,
    /// May be repeated.
    #[arg(long = "tag")]
    tags:     Vec<String>,
    #[arg(long, default_value = "")]
    memo:     String,
    /// Append a memo template phrase; may be repeated.
    #[arg(long = "template")]
    templates: Vec<String>,
  },

  /// Change an existing expense. Omitted fields keep their value.
  Edit {
    id:         String,
    #[arg(long, value_parser = date_arg)]
    date:       Option<NaiveDate>,
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    amount:     Option<i64>,
    #[arg(long, value_parser = category_arg)]
    category:   Option<Category>,
    /// Replaces all tags; may be repeated.
    #[arg(long = "tag")]
    tags:       Vec<String>,
    #[arg(long, conflicts_with = "tags")]
    clear_tags: bool,
    #[arg(long)]
    memo:       Option<String>,
  },

  /// Permanently remove an expense.
  Delete {
    id:  String,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
  },

  /// Print a single expense.
  Show {
    id:   String,
    #[arg(long)]
    json: bool,
  },

  /// List expenses, newest first, or a date range oldest first.
  List {
    #[arg(long, value_parser = date_arg, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = date_arg, requires = "from")]
    to:   Option<NaiveDate>,
    #[arg(long)]
    json: bool,
  },

  /// Write expenses to a CSV file.
  Export {
    #[arg(long, value_parser = date_arg, requires = "to")]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = date_arg, requires = "from")]
    to:   Option<NaiveDate>,
    /// Output file; defaults to `expenses_<today>.csv` in `export_dir`.
    #[arg(short, long)]
    out:  Option<PathBuf>,
  },

  /// Print the known categories, tags and memo templates.
  Categories,
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
  parse_date(s).map_err(|e| e.to_string())
}

fn category_arg(s: &str) -> Result<Category, String> {
  Category::from_label(s).ok_or_else(|| {
    let known: Vec<_> = Category::ALL.iter().map(|c| c.label()).collect();
    format!("unknown category {s:?}; expected one of {}", known.join(", "))
  })
}

fn range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Option<DateRange>> {
  match (from, to) {
    (Some(start), Some(end)) => Ok(Some(DateRange::new(start, end)?)),
    _ => Ok(None),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if let Command::Categories = cli.command {
    print_vocabulary();
    return Ok(());
  }

  let settings = Settings::load(&cli.config)?;
  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  run(cli.command, &store, &settings).await
}

async fn run(command: Command, store: &SqliteStore, settings: &Settings) -> Result<()> {
  match command {
    Command::Add { date, amount, category, tags, memo, templates } => {
      let memo = templates
        .iter()
        .fold(memo, |memo, t| append_memo_template(&memo, t));
      let expense = ExpenseDraft {
        date: date.unwrap_or_else(today),
        amount_jpy: amount,
        category: category.label().to_owned(),
        tags,
        memo,
      }
      .create();

      let id = expense.id.clone();
      store.put(expense).await.context("failed to save expense")?;
      tracing::info!(%id, "expense added");
      println!("{id}");
    }

    Command::Edit { id, date, amount, category, tags, clear_tags, memo } => {
      let existing = store
        .get(&id)
        .await
        .context("failed to load expense")?
        .with_context(|| format!("no expense with id {id}"))?;

      let mut draft = ExpenseDraft::from(&existing);
      if let Some(date) = date {
        draft.date = date;
      }
      if let Some(amount) = amount {
        draft.amount_jpy = amount;
      }
      if let Some(category) = category {
        draft.category = category.label().to_owned();
      }
      if clear_tags {
        draft.tags.clear();
      } else if !tags.is_empty() {
        draft.tags = tags;
      }
      if let Some(memo) = memo {
        draft.memo = memo;
      }

      store
        .put(draft.update(id.clone()))
        .await
        .context("failed to save expense")?;
      tracing::info!(%id, "expense updated");
    }

    Command::Delete { id, yes } => {
      if !yes && !confirm("Delete this expense?")? {
        return Ok(());
      }
      store.delete(&id).await.context("failed to delete expense")?;
      tracing::info!(%id, "expense deleted");
    }

    Command::Show { id, json } => {
      let Some(expense) = store.get(&id).await.context("failed to load expense")? else {
        bail!("no expense with id {id}");
      };
      if json {
        println!("{}", serde_json::to_string_pretty(&expense)?);
      } else {
        println!("{}", view::detail(&expense));
      }
    }

    Command::List { from, to, json } => {
      let expenses = match range(from, to)? {
        Some(r) => store.list_by_date_range(r).await,
        None => store.list_all().await,
      }
      .context("failed to list expenses")?;

      if json {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
      } else if expenses.is_empty() {
        println!("NO DATA");
      } else {
        for e in &expenses {
          println!("{}", view::line(e));
        }
      }
    }

    Command::Export { from, to, out } => {
      let filter = match range(from, to)? {
        Some(r) => ExportFilter::Range(r),
        None => ExportFilter::All,
      };
      let rendered = export(store, filter).await.context("failed to export")?;

      if rendered.rows == 0 && matches!(filter, ExportFilter::Range(_)) {
        println!("no data in range");
        return Ok(());
      }

      let path = out.unwrap_or_else(|| settings.export_dir.join(export_file_name(today())));
      std::fs::write(&path, &rendered.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
      tracing::info!(rows = rendered.rows, path = %path.display(), "export written");
      println!("{}", path.display());
    }

    Command::Categories => print_vocabulary(),
  }
  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn today() -> NaiveDate { Local::now().date_naive() }

fn print_vocabulary() {
  println!("categories:");
  for c in Category::ALL {
    let templates = c.memo_templates();
    if templates.is_empty() {
      println!("  {c}");
    } else {
      println!("  {c}  (memo: {})", templates.join(", "));
    }
  }
  println!("tags: {}", TAGS.join(", "));
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is no.
fn confirm(question: &str) -> Result<bool> {
  print!("{question} [y/N] ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
