//! The interactive menu loop.
//!
//! The shell keeps no contact state of its own: every listing is read fresh
//! from the store, so the screen always reflects the last mutation.

use std::io::{self, BufRead, Write};

use phonebook_core::{
  ValidationError,
  contact::{ContactEdit, NewContact, SaveOutcome},
  directory,
  store::ContactStore,
  validate::parse_phone_list,
};
use phonebook_store_sqlite::{Error, SqliteStore};

use crate::{console::Console, render};

const MENU: &str = "
Меню:
1. Показать все контакты
2. Добавить контакт
3. Поиск контактов
4. Редактировать контакт
5. Удалить номер телефона
6. Удалить контакт
7. Выход
";

/// Typed at an edit prompt to clear the email or date of birth.
const CLEAR_MARKER: &str = "-";

enum Flow {
  Continue,
  Exit,
}

pub struct Shell<'s, R, W> {
  store:   &'s SqliteStore,
  console: Console<R, W>,
}

impl<'s, R: BufRead, W: Write> Shell<'s, R, W> {
  pub fn new(store: &'s SqliteStore, console: Console<R, W>) -> Self { Self { store, console } }

  /// Run until the user picks "exit" or input ends.
  pub async fn run(&mut self) -> io::Result<()> {
    loop {
      self.console.print(MENU)?;
      let Some(choice) = self.console.ask("Выберите действие (1-7): ")? else {
        break;
      };

      match self.dispatch(choice.trim()).await {
        Ok(Flow::Continue) => {}
        Ok(Flow::Exit) => break,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
        Err(e) => return Err(e),
      }
    }
    Ok(())
  }

  async fn dispatch(&mut self, choice: &str) -> io::Result<Flow> {
    tracing::debug!(choice, "menu choice");
    match choice {
      "1" => self.show_all().await?,
      "2" => self.add_contact().await?,
      "3" => self.search().await?,
      "4" => self.edit_contact().await?,
      "5" => self.delete_phone().await?,
      "6" => self.delete_contact().await?,
      "7" => return Ok(Flow::Exit),
      _ => self.console.say("Неверный выбор. Попробуйте снова.")?,
    }
    Ok(Flow::Continue)
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  async fn show_all(&mut self) -> io::Result<()> {
    match self.store.load_all().await {
      Ok(views) => self.console.print(&render::contact_list(&views)),
      Err(e) => self.report(&e, ""),
    }
  }

  async fn add_contact(&mut self) -> io::Result<()> {
    let last_name = self.console.field("Введите фамилию: ")?;
    let first_name = self.console.field("Введите имя: ")?;
    let middle_name = self.console.field("Введите отчество (при наличии): ")?;
    let phones = self.console.field("Введите номера телефонов через запятую: ")?;
    let email = self.console.field("Введите email (при наличии): ")?;
    let dob = self.console.field("Введите дату рождения (при наличии): ")?;

    let input = NewContact {
      last_name,
      first_name,
      middle_name,
      phones: parse_phone_list(&phones),
      email: optional(&email),
      dob: optional(&dob),
    };
    let name = input.display_name();

    match self.store.save_contact(input).await {
      Ok(SaveOutcome::Created { .. }) => self.console.say("Контакт добавлен."),
      Ok(SaveOutcome::Merged { added, .. }) => self.console.say(format!(
        "Новые номера телефонов ({added}) добавлены к существующему контакту '{name}'."
      )),
      Err(e) => self.report(&e, "Контакт не сохранен."),
    }
  }

  async fn search(&mut self) -> io::Result<()> {
    let query = self.console.field(
      "Введите критерий поиска (имя, фамилию, отчество, номер телефона, email или дату рождения): ",
    )?;
    match self.store.search(query.trim()).await {
      Ok(views) => self.console.print(&render::contact_list(&views)),
      Err(e) => self.report(&e, ""),
    }
  }

  async fn edit_contact(&mut self) -> io::Result<()> {
    let identifier = self.console.field(
      "Введите имя, фамилию, отчество, email или дату рождения контакта для редактирования: ",
    )?;
    let keep = "(или Enter, чтобы оставить без изменений)";
    let last_name = self.console.field(&format!("Введите новую фамилию {keep}: "))?;
    let first_name = self.console.field(&format!("Введите новое имя {keep}: "))?;
    let middle_name = self.console.field(&format!("Введите новое отчество {keep}: "))?;
    let phones = self
      .console
      .field(&format!("Введите новые номера телефонов через запятую {keep}: "))?;
    let email = self.console.field(&format!(
      "Введите новый email {keep}, '{CLEAR_MARKER}' чтобы удалить: "
    ))?;
    let dob = self.console.field(&format!(
      "Введите новую дату рождения {keep}, '{CLEAR_MARKER}' чтобы удалить: "
    ))?;

    let edit = ContactEdit {
      last_name:   optional(&last_name),
      first_name:  optional(&first_name),
      middle_name: optional(&middle_name),
      phones:      parse_phone_list(&phones),
      email:       clearable(&email),
      dob:         clearable(&dob),
    };

    match directory::edit_contact(self.store, identifier.trim(), edit).await {
      Ok(report) => {
        self.console.say(format!("Контакт отредактирован (записей: {}).", report.updated))?;
        if report.phones_kept == Some(0) {
          self.console.say("Ни один из новых номеров не прошел проверку; номера удалены.")?;
        }
        Ok(())
      }
      Err(e) => self.report(&e, "Изменения не внесены."),
    }
  }

  async fn delete_phone(&mut self) -> io::Result<()> {
    let identifier = self.console.field(
      "Введите имя, фамилию, отчество, номер телефона или email контакта для удаления номера телефона: ",
    )?;
    match directory::delete_phone(self.store, identifier.trim(), &mut self.console).await {
      Ok(removed) => self.console.say(format!(
        "Номер телефона {} удален из контакта '{}'.",
        removed.phone.unwrap_or_default(),
        removed.display_name
      )),
      Err(e) => self.report(&e, "Изменения не внесены."),
    }
  }

  async fn delete_contact(&mut self) -> io::Result<()> {
    let identifier = self
      .console
      .field("Введите имя, фамилию, отчество или email контакта для удаления: ")?;
    match directory::delete_contact(self.store, identifier.trim(), &mut self.console).await {
      Ok(deleted) => self
        .console
        .say(format!("Контакт '{}' удален.", deleted.contact.display_name)),
      Err(e) => self.report(&e, "Изменения не внесены."),
    }
  }

  // ── Errors ────────────────────────────────────────────────────────────────

  fn report(&mut self, error: &Error, rejected: &str) -> io::Result<()> {
    self.console.say(error_message(error, rejected))
  }
}

/// User-facing text for a failed operation. `rejected` is appended to
/// validation and selection messages.
fn error_message(error: &Error, rejected: &str) -> String {
  use phonebook_core::Error as Core;

  match error {
    Error::Core(Core::Validation(v)) => {
      let what = match v {
        ValidationError::NoValidPhone => "Некорректный формат номера телефона.",
        ValidationError::BadEmail => "Некорректный формат email.",
        ValidationError::BadDate => "Некорректный формат даты рождения.",
      };
      format!("{what} {rejected}").trim_end().to_owned()
    }
    Error::Core(Core::NotFound(_)) => "Контакт не найден.".to_owned(),
    Error::Core(Core::AmbiguousSelection(choice)) => {
      format!("Неверный выбор {choice:?}. {rejected}").trim_end().to_owned()
    }
    other if other.is_recoverable() => {
      tracing::warn!(error = %other, "store operation failed");
      format!("Ошибка базы данных: {other}")
    }
    other => {
      tracing::error!(error = %other, "store is unusable");
      format!("Хранилище недоступно, перезапустите программу: {other}")
    }
  }
}

fn optional(input: &str) -> Option<String> {
  let trimmed = input.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Empty keeps the value, [`CLEAR_MARKER`] clears it.
fn clearable(input: &str) -> Option<String> {
  match input.trim() {
    "" => None,
    CLEAR_MARKER => Some(String::new()),
    value => Some(value.to_owned()),
  }
}
