//! Line-oriented terminal I/O, generic over the reader and writer so that
//! sessions can be scripted in tests.

use std::{
  fmt::Display,
  io::{self, BufRead, Write},
};

use phonebook_core::{
  Error,
  contact::CandidateRef,
  resolve::{Disambiguator, parse_selection},
};

use crate::render::candidate_list;

pub struct Console<R, W> {
  input:  R,
  output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
  pub fn new(input: R, output: W) -> Self { Self { input, output } }

  /// Print `prompt` and read one line without its line terminator.
  /// Returns `None` at end of input.
  pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
    write!(self.output, "{prompt}")?;
    self.output.flush()?;

    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
  }

  /// Like [`ask`](Self::ask), but end of input is an `UnexpectedEof` error.
  pub fn field(&mut self, prompt: &str) -> io::Result<String> {
    self
      .ask(prompt)?
      .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"))
  }

  pub fn say(&mut self, text: impl Display) -> io::Result<()> {
    writeln!(self.output, "{text}")
  }

  pub fn print(&mut self, text: &str) -> io::Result<()> {
    self.output.write_all(text.as_bytes())?;
    self.output.flush()
  }

  fn prompt_choice(&mut self, candidates: &[CandidateRef]) -> io::Result<Option<String>> {
    self.say("Найдено несколько совпадений:")?;
    self.print(&candidate_list(candidates))?;
    self.ask(&format!("Выберите номер (1-{}): ", candidates.len()))
  }
}

/// Asks the user to pick from a numbered list.
impl<R: BufRead, W: Write> Disambiguator for Console<R, W> {
  fn choose(&mut self, candidates: &[CandidateRef]) -> phonebook_core::Result<usize> {
    match self.prompt_choice(candidates) {
      Ok(Some(answer)) => parse_selection(&answer, candidates.len()),
      Ok(None) => Err(Error::AmbiguousSelection(String::new())),
      Err(e) => Err(Error::AmbiguousSelection(e.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use phonebook_core::contact::ContactId;

  use super::*;

  fn candidates() -> Vec<CandidateRef> {
    ["A", "B"]
      .iter()
      .enumerate()
      .map(|(i, name)| CandidateRef {
        contact_id:   ContactId(i as i64 + 1),
        display_name: (*name).into(),
        email:        None,
        phone:        None,
      })
      .collect()
  }

  #[test]
  fn ask_strips_line_endings_and_reports_eof() {
    let mut out = Vec::new();
    let mut console = Console::new("one\r\ntwo\n".as_bytes(), &mut out);
    assert_eq!(console.ask("> ").unwrap().as_deref(), Some("one"));
    assert_eq!(console.ask("> ").unwrap().as_deref(), Some("two"));
    assert_eq!(console.ask("> ").unwrap(), None);
    assert_eq!(
      console.field("> ").unwrap_err().kind(),
      io::ErrorKind::UnexpectedEof
    );
    assert_eq!(String::from_utf8(out).unwrap(), "> > > > ");
  }

  #[test]
  fn choose_lists_candidates_and_parses_answer() {
    let mut out = Vec::new();
    let mut console = Console::new("2\n".as_bytes(), &mut out);
    assert_eq!(console.choose(&candidates()).unwrap(), 1);

    let shown = String::from_utf8(out).unwrap();
    assert!(shown.contains("1. A\n2. B\n"));
    assert!(shown.ends_with("Выберите номер (1-2): "));
  }

  #[test]
  fn choose_rejects_bad_answers() {
    for input in ["3\n", "x\n", ""] {
      let mut out = Vec::new();
      let mut console = Console::new(input.as_bytes(), &mut out);
      assert!(matches!(
        console.choose(&candidates()),
        Err(Error::AmbiguousSelection(_))
      ));
    }
  }
}
