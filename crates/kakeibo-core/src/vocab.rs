//! The caller-side vocabulary: categories, tag labels and memo templates.
//!
//! None of this is enforced by the store, which accepts any strings.

use serde::{Deserialize, Serialize};

/// The fixed set of categories offered when entering an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  #[serde(rename = "食費")]
  Food,
  #[serde(rename = "交通費")]
  Transport,
  #[serde(rename = "趣味")]
  Hobby,
  #[serde(rename = "固定費")]
  Fixed,
  #[serde(rename = "その他")]
  Other,
}

impl Category {
  pub const ALL: [Category; 5] = [
    Category::Food,
    Category::Transport,
    Category::Hobby,
    Category::Fixed,
    Category::Other,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Category::Food => "食費",
      Category::Transport => "交通費",
      Category::Hobby => "趣味",
      Category::Fixed => "固定費",
      Category::Other => "その他",
    }
  }

  pub fn from_label(label: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|c| c.label() == label)
  }

  /// Quick-pick memo phrases for this category, if any.
  pub fn memo_templates(self) -> &'static [&'static str] {
    match self {
      Category::Food => &["コンビニ", "スーパー", "外食"],
      Category::Transport => &["電車", "バス", "タクシー"],
      _ => &[],
    }
  }
}

impl std::fmt::Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// Tag labels offered as checkboxes.
pub const TAGS: [&str; 4] = ["個人", "仕事", "家族", "緊急"];

/// Append a template phrase to a memo, separated by one space.
pub fn append_memo_template(memo: &str, template: &str) -> String {
  if memo.is_empty() {
    template.to_owned()
  } else {
    format!("{memo} {template}")
  }
}
