//! Text rendering of contacts and candidate lists.

use std::fmt::Write as _;

use phonebook_core::contact::{CandidateRef, ContactView};

pub const EMPTY_DIRECTORY: &str = "Справочник пуст.";

/// `Last First Middle: phone1, phone2 Email: e Дата рождения: d`
pub fn contact_line(view: &ContactView) -> String {
  let mut line = format!("{}: {}", view.display_name(), view.phones.join(", "));
  if let Some(email) = view.email.as_deref().filter(|e| !e.is_empty()) {
    let _ = write!(line, " Email: {email}");
  }
  if let Some(dob) = view.dob.as_deref().filter(|d| !d.is_empty()) {
    let _ = write!(line, " Дата рождения: {dob}");
  }
  line
}

/// The whole listing, one contact per line.
pub fn contact_list(views: &[ContactView]) -> String {
  if views.is_empty() {
    return format!("{EMPTY_DIRECTORY}\n");
  }
  let mut out = String::from("Контакты:\n");
  for view in views {
    out.push_str(&contact_line(view));
    out.push('\n');
  }
  out
}

/// Numbered candidate list, starting at 1.
pub fn candidate_list(candidates: &[CandidateRef]) -> String {
  candidates
    .iter()
    .enumerate()
    .map(|(i, c)| format!("{}. {c}\n", i + 1))
    .collect()
}
