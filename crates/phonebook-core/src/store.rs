//! The `ContactStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `phonebook-store-sqlite`). The operations in [`crate::directory`] are
//! written against it; the binary picks the backend.

use std::future::Future;

use crate::contact::{
  CandidateRef, ContactEdit, ContactId, ContactView, NewContact, SaveOutcome, StoreStats,
};

/// Abstraction over a contact directory backend.
///
/// Every method is one unit of work against the store: multi-statement
/// writes either commit together or not at all.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded runtime.
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + From<crate::Error> + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Validate and persist a contact, merging into an existing contact with
  /// the same (last, first, middle) triple.
  ///
  /// Fails with [`ValidationError`](crate::ValidationError) before anything
  /// is written.
  fn save_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<SaveOutcome, Self::Error>> + Send + '_;

  /// Apply `edit` to every contact in `ids` in one transaction.
  ///
  /// Returns the number of contact rows updated. A non-empty `edit.phones`
  /// replaces the phones of each of those contacts with the valid subset.
  fn apply_edit(
    &self,
    ids: Vec<ContactId>,
    edit: ContactEdit,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete a contact and all of its phones. Returns the number of phones
  /// removed; fails with `NotFound` when the id does not exist.
  fn delete_contact_by_id(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete one (contact, phone) pair; fails with `NotFound` when no such
  /// row exists.
  fn delete_phone<'a>(
    &'a self,
    id: ContactId,
    phone: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every contact with its phones.
  fn load_all(&self) -> impl Future<Output = Result<Vec<ContactView>, Self::Error>> + Send + '_;

  /// One contact by id, or `None`.
  fn get_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<ContactView>, Self::Error>> + Send + '_;

  /// Contacts where any name part, email, dob or phone contains `query`.
  /// An empty query matches everything.
  fn search<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<ContactView>, Self::Error>> + Send + 'a;

  /// Row counts of both tables.
  fn stats(&self) -> impl Future<Output = Result<StoreStats, Self::Error>> + Send + '_;

  // ── Candidate lookups ─────────────────────────────────────────────────

  /// Contacts whose last, first, middle name, email or dob equals
  /// `identifier` exactly.
  fn find_exact<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<Vec<CandidateRef>, Self::Error>> + Send + 'a;

  /// Contacts whose last, first, middle name or email contains
  /// `identifier`. One candidate per contact.
  fn find_contacts<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<Vec<CandidateRef>, Self::Error>> + Send + 'a;

  /// One candidate per (contact, phone) pair where either the contact's
  /// name parts or email, or the phone itself, contains `identifier`.
  fn find_phones<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<Vec<CandidateRef>, Self::Error>> + Send + 'a;
}
