//! Error type for `phonebook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] phonebook_core::Error),

  /// The file could not be opened as a store or the schema could not be
  /// applied. The handle is unusable.
  #[error("schema initialisation failed: {0}")]
  Schema(#[source] tokio_rusqlite::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

impl Error {
  /// `true` for errors the user can fix by changing their input.
  pub fn is_recoverable(&self) -> bool { !matches!(self, Self::Schema(_)) }
}

impl From<phonebook_core::ValidationError> for Error {
  fn from(e: phonebook_core::ValidationError) -> Self { Self::Core(e.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
