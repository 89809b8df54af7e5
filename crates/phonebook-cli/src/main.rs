//! `phonebook` — interactive contact directory backed by SQLite.
//!
//! # Usage
//!
//! ```
//! phonebook
//! phonebook --db ~/contacts.db
//! phonebook --config ~/.config/phonebook.toml
//! ```
//!
//! Without `--db`, `PHONEBOOK_STORE_PATH` or `store_path` in the config file
//! the store path is asked for on startup.

mod console;
mod render;
mod settings;
mod shell;

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
};

use anyhow::Context as _;
use clap::Parser;
use console::Console;
use phonebook_store_sqlite::SqliteStore;
use settings::{DEFAULT_STORE_PATH, Settings, expand_tilde};
use shell::Shell;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "phonebook", version, about = "Interactive contact directory")]
struct Cli {
  /// Path to a TOML config file (store_path, log_filter).
  #[arg(short, long, value_name = "FILE", default_value = "phonebook.toml")]
  config: PathBuf,

  /// SQLite file holding the directory.
  #[arg(long, value_name = "PATH")]
  db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  // Logs go to stderr so they never interleave with prompts on stdout.
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(settings.log_filter()))
    .context("invalid log filter")?;
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();

  let mut console = Console::new(io::stdin().lock(), io::stdout());

  let store_path = match settings.store_path(cli.db) {
    Some(path) => path,
    None => ask_store_path(&mut console)?,
  };

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {}", store_path.display()))?;

  let run_result = Shell::new(&store, console).run().await;

  // Close the store regardless of how the shell ended.
  store.close().await.context("failed to close store")?;
  run_result.context("terminal I/O failed")
}

/// Ask for the store file; an empty answer (or closed input) selects
/// [`DEFAULT_STORE_PATH`].
fn ask_store_path<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<PathBuf> {
  let answer = console
    .ask("Введите имя файла базы данных, или Enter для значения по умолчанию: ")?
    .unwrap_or_default();
  let answer = answer.trim();
  if answer.is_empty() {
    return Ok(PathBuf::from(DEFAULT_STORE_PATH));
  }
  Ok(expand_tilde(&PathBuf::from(answer)))
}
