//! Runtime settings, layered from an optional TOML file and `KAKEIBO_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "~/.local/share/kakeibo/expenses.db";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
  /// SQLite file holding the expenses. A leading `~/` is expanded.
  pub store_path: PathBuf,
  /// Directory that `export` writes into when `--out` is not given.
  pub export_dir: PathBuf,
}

impl Settings {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("export_dir", ".")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("KAKEIBO"))
      .build()
      .context("failed to read config file")?;

    let mut parsed: Settings = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;
    parsed.store_path = expand_tilde(&parsed.store_path);
    parsed.export_dir = expand_tilde(&parsed.export_dir);
    Ok(parsed)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
