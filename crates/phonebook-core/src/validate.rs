//! Input validation for phone numbers, email addresses and dates of birth.
//!
//! All checks are grammar-only. In particular `validate_date` does not look
//! at the calendar: `99.99.9999` is accepted.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
  ValidationError,
  contact::{NewContact, ValidContact},
};

static PHONE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("phone pattern compiles"));

static EMAIL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[\w.\-]+@[\w.\-]+\.\w+$").expect("email pattern compiles"));

static DATE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("date pattern compiles"));

/// An optional `+` followed by digits, whitespace, `-`, `(` and `)` only.
pub fn validate_phone(s: &str) -> bool { PHONE_RE.is_match(s) }

/// `local@domain.tld`, where the parts are word characters, dots or hyphens.
pub fn validate_email(s: &str) -> bool { EMAIL_RE.is_match(s) }

/// `DD.MM.YYYY` digit grouping.
pub fn validate_date(s: &str) -> bool { DATE_RE.is_match(s) }

/// Split a comma-separated phone list as typed in the shell.
///
/// Spaces are stripped from each entry and empty entries are dropped, so an
/// empty line yields an empty list.
pub fn parse_phone_list(input: &str) -> Vec<String> {
  input
    .split(',')
    .map(|entry| entry.chars().filter(|c| *c != ' ').collect::<String>())
    .map(|entry| entry.trim().to_owned())
    .filter(|entry| !entry.is_empty())
    .collect()
}

/// The phones that pass [`validate_phone`], in input order, without repeats.
pub fn valid_phones(phones: &[String]) -> Vec<String> {
  let mut kept: Vec<String> = Vec::with_capacity(phones.len());
  for phone in phones {
    if validate_phone(phone) && !kept.contains(phone) {
      kept.push(phone.clone());
    }
  }
  kept
}

fn non_empty(value: Option<String>) -> Option<String> { value.filter(|v| !v.is_empty()) }

/// Check a contact before it is saved.
///
/// Checks run in order: phones, then email, then date of birth; the first
/// failure wins.
pub fn validate_contact(input: NewContact) -> Result<ValidContact, ValidationError> {
  let phones = valid_phones(&input.phones);
  if phones.is_empty() {
    return Err(ValidationError::NoValidPhone);
  }
  if phones.len() < input.phones.len() {
    tracing::debug!(
      given = input.phones.len(),
      kept = phones.len(),
      "dropped invalid or repeated phone numbers"
    );
  }

  let email = non_empty(input.email);
  if email.as_deref().is_some_and(|e| !validate_email(e)) {
    return Err(ValidationError::BadEmail);
  }

  let dob = non_empty(input.dob);
  if dob.as_deref().is_some_and(|d| !validate_date(d)) {
    return Err(ValidationError::BadDate);
  }

  Ok(ValidContact {
    last_name: input.last_name,
    first_name: input.first_name,
    middle_name: input.middle_name,
    phones,
    email,
    dob,
  })
}
