//! Directory operations composed from [`ContactStore`] primitives.
//!
//! Each function is a lookup followed by a mutation. Lookups never write, so
//! a failed lookup (not found, invalid selection) leaves the store untouched.

use serde::Serialize;

use crate::{
  Error,
  contact::{CandidateRef, ContactEdit},
  resolve::{Disambiguator, resolve_candidate},
  store::ContactStore,
  validate::valid_phones,
};

/// What `edit_contact` changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditReport {
  /// Contact rows updated.
  pub updated:     usize,
  /// Phones written per contact when the edit replaced phones.
  pub phones_kept: Option<usize>,
}

/// A contact removed by `delete_contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedContact {
  pub contact:        CandidateRef,
  pub phones_removed: usize,
}

/// A blank identifier would match every contact (or every contact with an
/// empty middle name), so it never matches anything.
fn require_identifier(identifier: &str) -> Result<(), Error> {
  if identifier.trim().is_empty() {
    return Err(Error::NotFound(identifier.to_owned()));
  }
  Ok(())
}

/// Edit every contact whose last, first, middle name, email or dob equals
/// `identifier`.
///
/// Field changes and phone replacement apply to all matched contacts. New
/// email and dob values are written as given; only phones are filtered.
pub async fn edit_contact<S>(
  store: &S,
  identifier: &str,
  edit: ContactEdit,
) -> Result<EditReport, S::Error>
where
  S: ContactStore,
{
  require_identifier(identifier)?;

  let candidates = store.find_exact(identifier).await?;
  if candidates.is_empty() {
    tracing::debug!(identifier, "edit matched no contacts");
    return Err(Error::NotFound(identifier.to_owned()).into());
  }

  let phones_kept = (!edit.phones.is_empty()).then(|| valid_phones(&edit.phones).len());
  let ids = candidates.iter().map(|c| c.contact_id).collect();
  let updated = store.apply_edit(ids, edit).await?;

  Ok(EditReport { updated, phones_kept })
}

/// Delete the contact `identifier` refers to, asking `chooser` when the
/// name or email substring matches several contacts.
pub async fn delete_contact<S, D>(
  store: &S,
  identifier: &str,
  chooser: &mut D,
) -> Result<DeletedContact, S::Error>
where
  S: ContactStore,
  D: Disambiguator + ?Sized,
{
  require_identifier(identifier)?;
  let candidates = store.find_contacts(identifier).await?;
  let contact = resolve_candidate(identifier, candidates, chooser)?;
  let phones_removed = store.delete_contact_by_id(contact.contact_id).await?;
  Ok(DeletedContact { contact, phones_removed })
}

/// Delete one phone number. `identifier` may match the owner's name parts or
/// email, or the number itself; each matching (contact, phone) pair is a
/// candidate.
pub async fn delete_phone<S, D>(
  store: &S,
  identifier: &str,
  chooser: &mut D,
) -> Result<CandidateRef, S::Error>
where
  S: ContactStore,
  D: Disambiguator + ?Sized,
{
  require_identifier(identifier)?;
  let candidates = store.find_phones(identifier).await?;
  let chosen = resolve_candidate(identifier, candidates, chooser)?;
  let Some(phone) = chosen.phone.as_deref() else {
    return Err(Error::NotFound(identifier.to_owned()).into());
  };
  store.delete_phone(chosen.contact_id, phone).await?;
  Ok(chosen)
}
