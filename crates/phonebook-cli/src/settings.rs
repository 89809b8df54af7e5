//! Layered settings: CLI flags, then `PHONEBOOK_*` environment variables,
//! then the optional TOML file.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Store file used when nothing else is configured and the user just presses
/// Enter at the path prompt.
pub const DEFAULT_STORE_PATH: &str = "contacts.db";

/// Settings read from the config file and the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
  /// Path of the SQLite file (`PHONEBOOK_STORE_PATH`).
  #[serde(default)]
  pub store_path: Option<PathBuf>,
  /// `tracing` filter directive used when `RUST_LOG` is unset.
  #[serde(default)]
  pub log_filter: Option<String>,
}

impl Settings {
  /// Read `file` (if it exists) and overlay `PHONEBOOK_*` variables.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("PHONEBOOK"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// The store path from `--db`, falling back to the configured one.
  /// `None` means the user has to be asked.
  pub fn store_path(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
    flag
      .or_else(|| self.store_path.clone())
      .filter(|p| !p.as_os_str().is_empty())
      .map(|p| expand_tilde(&p))
  }

  pub fn log_filter(&self) -> &str { self.log_filter.as_deref().unwrap_or("warn") }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
