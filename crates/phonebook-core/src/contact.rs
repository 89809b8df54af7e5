//! Contact types — what is written to and read back from the store.
//!
//! A contact is a person record identified by a surrogate integer id. For
//! merging purposes it is also identified by the exact (last, first, middle)
//! name triple; that is a convention of `save_contact`, not a constraint.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Surrogate row id of a contact. Stable for the lifetime of the record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Join the non-empty name parts with single spaces.
pub fn display_name(last: &str, first: &str, middle: &str) -> String {
  [last, first, middle]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Input to [`ContactStore::save_contact`](crate::store::ContactStore::save_contact).
///
/// Phones are raw user input; entries failing validation are dropped. Empty
/// `email`/`dob` strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
  pub last_name:   String,
  pub first_name:  String,
  pub middle_name: String,
  pub phones:      Vec<String>,
  pub email:       Option<String>,
  pub dob:         Option<String>,
}

impl NewContact {
  pub fn new(
    last_name: impl Into<String>,
    first_name: impl Into<String>,
    middle_name: impl Into<String>,
  ) -> Self {
    Self {
      last_name: last_name.into(),
      first_name: first_name.into(),
      middle_name: middle_name.into(),
      ..Default::default()
    }
  }

  pub fn with_phones<I, P>(mut self, phones: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: Into<String>,
  {
    self.phones = phones.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = Some(email.into());
    self
  }

  pub fn with_dob(mut self, dob: impl Into<String>) -> Self {
    self.dob = Some(dob.into());
    self
  }

  pub fn display_name(&self) -> String {
    display_name(&self.last_name, &self.first_name, &self.middle_name)
  }
}

/// A [`NewContact`] that passed validation: phones are filtered and
/// deduplicated, empty optionals are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
  pub last_name:   String,
  pub first_name:  String,
  pub middle_name: String,
  pub phones:      Vec<String>,
  pub email:       Option<String>,
  pub dob:         Option<String>,
}

/// What `save_contact` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
  /// A new contact row was written together with its phones.
  Created { id: ContactId },
  /// The name triple already existed; `added` new phones were attached.
  Merged { id: ContactId, added: usize },
}

impl SaveOutcome {
  pub fn id(&self) -> ContactId {
    match self {
      Self::Created { id } | Self::Merged { id, .. } => *id,
    }
  }
}

/// Field changes applied by `edit_contact`.
///
/// - Names overwrite only when `Some` and non-empty.
/// - `email`/`dob` overwrite when `Some`; `Some("")` clears the column.
/// - A non-empty `phones` list replaces all phones of each matched contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEdit {
  pub last_name:   Option<String>,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub phones:      Vec<String>,
  pub email:       Option<String>,
  pub dob:         Option<String>,
}

impl ContactEdit {
  /// Name override, if one was actually given.
  pub fn name_part(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
  }

  /// `true` when applying this edit would change nothing.
  pub fn is_empty(&self) -> bool {
    Self::name_part(&self.last_name).is_none()
      && Self::name_part(&self.first_name).is_none()
      && Self::name_part(&self.middle_name).is_none()
      && self.phones.is_empty()
      && self.email.is_none()
      && self.dob.is_none()
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// The read model returned by `load_all` and `search`: a contact and its
/// phones in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactView {
  pub id:          ContactId,
  pub last_name:   String,
  pub first_name:  String,
  pub middle_name: String,
  pub email:       Option<String>,
  pub dob:         Option<String>,
  pub phones:      Vec<String>,
}

impl ContactView {
  pub fn display_name(&self) -> String {
    display_name(&self.last_name, &self.first_name, &self.middle_name)
  }
}

/// A contact matched by an identifier lookup, pending disambiguation.
///
/// `phone` is set when the candidate stands for one specific phone row
/// (the `delete_phone` flow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRef {
  pub contact_id:   ContactId,
  pub display_name: String,
  pub email:        Option<String>,
  pub phone:        Option<String>,
}

impl fmt::Display for CandidateRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.display_name)?;
    if let Some(email) = &self.email {
      write!(f, " <{email}>")?;
    }
    if let Some(phone) = &self.phone {
      write!(f, ": {phone}")?;
    }
    Ok(())
  }
}

/// Row counts of both tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
  pub contacts: u64,
  pub phones:   u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_name_skips_empty_parts() {
    assert_eq!(display_name("Ivanov", "Ivan", "Ivanovich"), "Ivanov Ivan Ivanovich");
    assert_eq!(display_name("Ivanov", "Ivan", ""), "Ivanov Ivan");
    assert_eq!(display_name("Ivanov", "", "Ivanovich"), "Ivanov Ivanovich");
    assert_eq!(display_name(" ", "", ""), "");
  }

  #[test]
  fn candidate_display_includes_phone_and_email() {
    let c = CandidateRef {
      contact_id:   ContactId(3),
      display_name: "Petrov Petr".into(),
      email:        Some("p@example.com".into()),
      phone:        Some("+7 999".into()),
    };
    assert_eq!(c.to_string(), "Petrov Petr <p@example.com>: +7 999");
  }

  #[test]
  fn save_outcome_json_is_tagged() {
    let merged = SaveOutcome::Merged { id: ContactId(7), added: 2 };
    let json = serde_json::to_value(merged).unwrap();
    assert_eq!(json, serde_json::json!({ "outcome": "merged", "id": 7, "added": 2 }));
    assert_eq!(serde_json::from_value::<SaveOutcome>(json).unwrap(), merged);
  }

  #[test]
  fn contact_view_json_uses_bare_id() {
    let view = ContactView {
      id:          ContactId(3),
      last_name:   "Ivanov".into(),
      first_name:  "Ivan".into(),
      middle_name: String::new(),
      email:       None,
      dob:         Some("01.02.1990".into()),
      phones:      vec!["+7 123".into()],
    };
    let json = serde_json::to_string(&view).unwrap();
    assert!(json.starts_with(r#"{"id":3,"#));
    assert_eq!(serde_json::from_str::<ContactView>(&json).unwrap(), view);
  }

  #[test]
  fn empty_name_override_is_ignored() {
    let edit = ContactEdit { last_name: Some(String::new()), ..Default::default() };
    assert!(edit.is_empty());

    let edit = ContactEdit { email: Some(String::new()), ..Default::default() };
    assert!(!edit.is_empty());
  }
}
