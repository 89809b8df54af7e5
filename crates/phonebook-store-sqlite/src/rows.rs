//! Raw row shapes read from SQLite and their conversion into domain types.
//!
//! Name columns are nullable in the schema; a NULL name part reads as an
//! empty string.

use phonebook_core::contact::{CandidateRef, ContactId, ContactView, display_name};

// ─── Contact + phone join ─────────────────────────────────────────────────────

/// One row of `contacts LEFT JOIN phone_numbers`.
pub struct RawContactRow {
  pub id:          i64,
  pub last_name:   Option<String>,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub email:       Option<String>,
  pub dob:         Option<String>,
  pub phone:       Option<String>,
}

impl RawContactRow {
  /// Column order: id, last, first, middle, email, dob, phone.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      last_name:   row.get(1)?,
      first_name:  row.get(2)?,
      middle_name: row.get(3)?,
      email:       row.get(4)?,
      dob:         row.get(5)?,
      phone:       row.get(6)?,
    })
  }

  fn into_view(self) -> ContactView {
    ContactView {
      id:          ContactId(self.id),
      last_name:   self.last_name.unwrap_or_default(),
      first_name:  self.first_name.unwrap_or_default(),
      middle_name: self.middle_name.unwrap_or_default(),
      email:       self.email,
      dob:         self.dob,
      phones:      self.phone.into_iter().collect(),
    }
  }
}

/// Collapse join rows into one view per contact.
///
/// Rows must be ordered by contact id so that all rows of one contact are
/// adjacent; phone order within a contact is kept.
pub fn fold_views(rows: Vec<RawContactRow>) -> Vec<ContactView> {
  let mut views: Vec<ContactView> = Vec::new();
  for row in rows {
    match views.last_mut() {
      Some(view) if view.id.0 == row.id => view.phones.extend(row.phone),
      _ => views.push(row.into_view()),
    }
  }
  views
}

// ─── Candidates ──────────────────────────────────────────────────────────────

/// A contact (optionally with one of its phones) matched by a lookup.
pub struct RawCandidate {
  pub id:          i64,
  pub last_name:   Option<String>,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub email:       Option<String>,
  pub phone:       Option<String>,
}

impl RawCandidate {
  /// Column order: id, last, first, middle, email.
  pub fn from_contact_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      last_name:   row.get(1)?,
      first_name:  row.get(2)?,
      middle_name: row.get(3)?,
      email:       row.get(4)?,
      phone:       None,
    })
  }

  /// Column order: id, last, first, middle, email, phone.
  pub fn from_phone_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { phone: row.get(5)?, ..Self::from_contact_row(row)? })
  }

  pub fn into_candidate(self) -> CandidateRef {
    CandidateRef {
      contact_id:   ContactId(self.id),
      display_name: display_name(
        self.last_name.as_deref().unwrap_or_default(),
        self.first_name.as_deref().unwrap_or_default(),
        self.middle_name.as_deref().unwrap_or_default(),
      ),
      email:        self.email.filter(|e| !e.is_empty()),
      phone:        self.phone,
    }
  }
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// `%query%` with the LIKE wildcards in `query` escaped by `\`, for use with
/// `LIKE ?n ESCAPE '\'`.
pub fn like_pattern(query: &str) -> String {
  let mut pattern = String::with_capacity(query.len() + 2);
  pattern.push('%');
  for c in query.chars() {
    if matches!(c, '\\' | '%' | '_') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}
