//! Turning a list of candidates into the one contact an operation acts on.
//!
//! Lookups (`find_contacts`, `find_phones`, ...) may return several
//! candidates. How one of them is chosen is up to the caller: the shell asks
//! the user, tests and scripts can take the first match or refuse.

use crate::{Error, Result, contact::CandidateRef};

/// Picks one of several candidates.
pub trait Disambiguator {
  /// Return the index of the chosen candidate. Called only with two or more
  /// candidates.
  fn choose(&mut self, candidates: &[CandidateRef]) -> Result<usize>;
}

/// Always takes the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatch;

impl Disambiguator for FirstMatch {
  fn choose(&mut self, _candidates: &[CandidateRef]) -> Result<usize> { Ok(0) }
}

/// Refuses to pick when more than one candidate matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAmbiguous;

impl Disambiguator for RejectAmbiguous {
  fn choose(&mut self, candidates: &[CandidateRef]) -> Result<usize> {
    Err(Error::AmbiguousSelection(format!("{} candidates matched", candidates.len())))
  }
}

/// Parse a 1-based choice typed by the user into an index into a list of
/// `count` candidates.
pub fn parse_selection(input: &str, count: usize) -> Result<usize> {
  let trimmed = input.trim();
  match trimmed.parse::<usize>() {
    Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
    _ => Err(Error::AmbiguousSelection(trimmed.to_owned())),
  }
}

/// Reduce `candidates` to one.
///
/// - none: [`Error::NotFound`] carrying `identifier`;
/// - one: that candidate;
/// - several: whatever `chooser` picks, rejected if out of range.
pub fn resolve_candidate<D>(
  identifier: &str,
  mut candidates: Vec<CandidateRef>,
  chooser: &mut D,
) -> Result<CandidateRef>
where
  D: Disambiguator + ?Sized,
{
  match candidates.len() {
    0 => Err(Error::NotFound(identifier.to_owned())),
    1 => Ok(candidates.remove(0)),
    n => {
      let index = chooser.choose(&candidates)?;
      if index >= n {
        return Err(Error::AmbiguousSelection(index.saturating_add(1).to_string()));
      }
      tracing::debug!(index, of = n, "candidate chosen");
      Ok(candidates.swap_remove(index))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::contact::ContactId;

  fn candidate(id: i64, name: &str) -> CandidateRef {
    CandidateRef {
      contact_id:   ContactId(id),
      display_name: name.into(),
      email:        None,
      phone:        None,
    }
  }

  struct Fixed(usize);

  impl Disambiguator for Fixed {
    fn choose(&mut self, _: &[CandidateRef]) -> Result<usize> { Ok(self.0) }
  }

  #[test]
  fn no_candidates_is_not_found() {
    let err = resolve_candidate("Smith", vec![], &mut FirstMatch).unwrap_err();
    assert!(matches!(err, Error::NotFound(ref id) if id == "Smith"));
  }

  #[test]
  fn single_candidate_skips_the_chooser() {
    let got = resolve_candidate("a", vec![candidate(1, "A")], &mut RejectAmbiguous).unwrap();
    assert_eq!(got.contact_id, ContactId(1));
  }

  #[test]
  fn several_candidates_use_the_chooser() {
    let list = vec![candidate(1, "A"), candidate(2, "B"), candidate(3, "C")];

    let got = resolve_candidate("x", list.clone(), &mut Fixed(1)).unwrap();
    assert_eq!(got.contact_id, ContactId(2));

    let got = resolve_candidate("x", list.clone(), &mut FirstMatch).unwrap();
    assert_eq!(got.contact_id, ContactId(1));

    let err = resolve_candidate("x", list.clone(), &mut RejectAmbiguous).unwrap_err();
    assert!(matches!(err, Error::AmbiguousSelection(_)));

    let err = resolve_candidate("x", list, &mut Fixed(3)).unwrap_err();
    assert!(matches!(err, Error::AmbiguousSelection(_)));
  }

  #[test]
  fn chooser_returning_max_index_is_rejected() {
    let list = vec![candidate(1, "A"), candidate(2, "B")];
    let err = resolve_candidate("x", list, &mut Fixed(usize::MAX)).unwrap_err();
    assert!(matches!(err, Error::AmbiguousSelection(ref s) if *s == usize::MAX.to_string()));
  }

  #[test]
  fn selection_is_one_based_and_bounded() {
    assert_eq!(parse_selection("1", 3).unwrap(), 0);
    assert_eq!(parse_selection(" 3\n", 3).unwrap(), 2);
    for bad in ["0", "4", "-1", "abc", ""] {
      assert!(
        matches!(parse_selection(bad, 3), Err(Error::AmbiguousSelection(_))),
        "{bad:?} should be rejected"
      );
    }
  }
}
