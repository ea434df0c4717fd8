//! Plain-text rendering of expenses for the terminal.

use kakeibo_core::expense::{Expense, display_tags, format_date, format_timestamp};

/// `1234567` → `1,234,567`.
pub fn format_amount(amount: i64) -> String {
  let digits = amount.unsigned_abs().to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
  if amount < 0 {
    out.push('-');
  }
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

/// One summary line, as shown by `list`.
pub fn line(e: &Expense) -> String {
  let mut parts = vec![
    format_date(e.date),
    format!("{:>10} 円", format_amount(e.amount_jpy)),
    e.category.clone(),
  ];
  if !e.tags.is_empty() {
    parts.push(display_tags(&e.tags));
  }
  if !e.memo.is_empty() {
    parts.push(e.memo.clone());
  }
  parts.push(format!("[{}]", e.id));
  parts.join("  ")
}

/// Every field, one per line, as shown by `show`.
pub fn detail(e: &Expense) -> String {
  format!(
    "id:         {}\n\
     date:       {}\n\
     amount:     {} 円\n\
     category:   {}\n\
     tags:       {}\n\
     memo:       {}\n\
     updated_at: {}",
    e.id,
    format_date(e.date),
    format_amount(e.amount_jpy),
    e.category,
    display_tags(&e.tags),
    e.memo,
    format_timestamp(e.updated_at),
  )
}
