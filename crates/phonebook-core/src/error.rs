//! Error types for `phonebook-core`.

use thiserror::Error;

/// Why a contact was refused before anything was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("no valid phone number given")]
  NoValidPhone,

  #[error("malformed email address")]
  BadEmail,

  #[error("malformed date of birth (expected dd.mm.yyyy)")]
  BadDate,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  /// Zero contacts matched an identifier; nothing was changed.
  #[error("contact not found: {0:?}")]
  NotFound(String),

  /// The disambiguation choice was non-numeric or out of range.
  #[error("invalid selection: {0:?}")]
  AmbiguousSelection(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
