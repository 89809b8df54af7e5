//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value};

use phonebook_core::{
  contact::{
    CandidateRef, ContactEdit, ContactId, ContactView, NewContact, SaveOutcome, StoreStats,
  },
  store::ContactStore,
  validate::{valid_phones, validate_contact},
};

use crate::{
  Error, Result,
  rows::{RawCandidate, RawContactRow, fold_views, like_pattern},
  schema::SCHEMA,
};

// ─── SQL ─────────────────────────────────────────────────────────────────────

const SELECT_VIEWS: &str = "
  SELECT c.id, c.last_name, c.first_name, c.middle_name, c.email, c.dob, pn.phone_number
  FROM contacts c
  LEFT JOIN phone_numbers pn ON pn.contact_id = c.id";

/// Fixed update: `?1..?3` are name overrides (NULL keeps the column),
/// `?4`/`?6` say whether email/dob are overwritten with `?5`/`?7`.
const UPDATE_CONTACT: &str = "
  UPDATE contacts SET
    last_name   = COALESCE(?1, last_name),
    first_name  = COALESCE(?2, first_name),
    middle_name = COALESCE(?3, middle_name),
    email       = CASE WHEN ?4 THEN ?5 ELSE email END,
    dob         = CASE WHEN ?6 THEN ?7 ELSE dob END
  WHERE id = ?8";

fn insert_phones(
  conn: &rusqlite::Connection,
  contact_id: i64,
  phones: &[String],
) -> rusqlite::Result<usize> {
  let mut stmt = conn
    .prepare_cached("INSERT INTO phone_numbers (contact_id, phone_number) VALUES (?1, ?2)")?;
  for phone in phones {
    stmt.execute(rusqlite::params![contact_id, phone])?;
  }
  Ok(phones.len())
}

fn not_found(what: impl ToString) -> Error {
  Error::Core(phonebook_core::Error::NotFound(what.to_string()))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact directory backed by a single SQLite file.
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Any failure is reported as [`Error::Schema`]; a connection that was
  /// opened but could not be initialised is closed first.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::Schema)?;
    let store = Self::init(conn).await?;
    tracing::info!(path = %path.display(), "opened contact store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Schema)?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let applied = conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await;

    match applied {
      Ok(()) => Ok(Self { conn }),
      Err(e) => {
        if let Err(close_err) = conn.close().await {
          tracing::warn!(error = %close_err, "closing uninitialised store failed");
        }
        Err(Error::Schema(e))
      }
    }
  }

  /// Release the connection. Pending writes are already committed; this
  /// only waits for the background thread to finish.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::info!("closed contact store");
    Ok(())
  }

  async fn query_views(
    &self,
    sql: String,
    param: Option<Value>,
  ) -> Result<Vec<ContactView>> {
    let rows: Vec<RawContactRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt.query_map(rusqlite::params![p], RawContactRow::from_row)?,
          None => stmt.query_map([], RawContactRow::from_row)?,
        }
        .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(fold_views(rows))
  }

  async fn query_candidates(
    &self,
    sql: &'static str,
    identifier: String,
    with_phone: bool,
  ) -> Result<Vec<CandidateRef>> {
    let raws: Vec<RawCandidate> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let map_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<RawCandidate> = if with_phone {
          RawCandidate::from_phone_row
        } else {
          RawCandidate::from_contact_row
        };
        let rows = stmt
          .query_map(rusqlite::params![identifier], map_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawCandidate::into_candidate).collect())
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn save_contact(&self, input: NewContact) -> Result<SaveOutcome> {
    let name = input.display_name();
    let valid = validate_contact(input).inspect_err(|e| {
      tracing::warn!(contact = %name, reason = %e, "contact rejected");
    })?;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
          .query_row(
            "SELECT id FROM contacts
             WHERE last_name = ?1 AND first_name = ?2 AND middle_name = ?3
             ORDER BY id LIMIT 1",
            rusqlite::params![valid.last_name, valid.first_name, valid.middle_name],
            |r| r.get(0),
          )
          .optional()?;

        let outcome = match existing {
          Some(id) => {
            let present: Vec<String> = {
              let mut stmt =
                tx.prepare("SELECT phone_number FROM phone_numbers WHERE contact_id = ?1")?;
              stmt
                .query_map(rusqlite::params![id], |r| r.get(0))?
                .collect::<rusqlite::Result<_>>()?
            };
            let fresh: Vec<String> = valid
              .phones
              .into_iter()
              .filter(|p| !present.contains(p))
              .collect();
            let added = insert_phones(&tx, id, &fresh)?;
            SaveOutcome::Merged { id: ContactId(id), added }
          }
          None => {
            tx.execute(
              "INSERT INTO contacts (last_name, first_name, middle_name, email, dob)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![
                valid.last_name,
                valid.first_name,
                valid.middle_name,
                valid.email,
                valid.dob,
              ],
            )?;
            let id = tx.last_insert_rowid();
            insert_phones(&tx, id, &valid.phones)?;
            SaveOutcome::Created { id: ContactId(id) }
          }
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    tracing::info!(contact = %name, ?outcome, "contact saved");
    Ok(outcome)
  }

  async fn apply_edit(&self, ids: Vec<ContactId>, edit: ContactEdit) -> Result<usize> {
    let last = ContactEdit::name_part(&edit.last_name).map(str::to_owned);
    let first = ContactEdit::name_part(&edit.first_name).map(str::to_owned);
    let middle = ContactEdit::name_part(&edit.middle_name).map(str::to_owned);
    let set_email = edit.email.is_some();
    let email = edit.email.filter(|e| !e.is_empty());
    let set_dob = edit.dob.is_some();
    let dob = edit.dob.filter(|d| !d.is_empty());
    let phones = (!edit.phones.is_empty()).then(|| valid_phones(&edit.phones));

    let id_count = ids.len();
    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut updated = 0;
        {
          let mut update = tx.prepare(UPDATE_CONTACT)?;
          let mut clear = tx.prepare("DELETE FROM phone_numbers WHERE contact_id = ?1")?;
          for id in &ids {
            let rows = update.execute(rusqlite::params![
              last, first, middle, set_email, email, set_dob, dob, id.0,
            ])?;
            if rows == 0 {
              continue;
            }
            updated += rows;
            if let Some(phones) = &phones {
              clear.execute(rusqlite::params![id.0])?;
              insert_phones(&tx, id.0, phones)?;
            }
          }
        }
        tx.commit()?;
        Ok(updated)
      })
      .await?;

    tracing::info!(requested = id_count, updated, "contacts edited");
    Ok(updated)
  }

  async fn delete_contact_by_id(&self, id: ContactId) -> Result<usize> {
    let removed: Option<usize> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let phones = tx.execute(
          "DELETE FROM phone_numbers WHERE contact_id = ?1",
          rusqlite::params![id.0],
        )?;
        let contacts =
          tx.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id.0])?;
        if contacts == 0 {
          // Dropping the transaction rolls it back.
          return Ok(None);
        }
        tx.commit()?;
        Ok(Some(phones))
      })
      .await?;

    let phones = removed.ok_or_else(|| not_found(id))?;
    tracing::info!(%id, phones, "contact deleted");
    Ok(phones)
  }

  async fn delete_phone(&self, id: ContactId, phone: &str) -> Result<()> {
    let phone_owned = phone.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM phone_numbers WHERE contact_id = ?1 AND phone_number = ?2",
          rusqlite::params![id.0, phone_owned],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(not_found(phone));
    }
    tracing::info!(%id, removed, "phone number deleted");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn load_all(&self) -> Result<Vec<ContactView>> {
    self
      .query_views(format!("{SELECT_VIEWS} ORDER BY c.id, pn.id"), None)
      .await
  }

  async fn get_contact(&self, id: ContactId) -> Result<Option<ContactView>> {
    let views = self
      .query_views(
        format!("{SELECT_VIEWS} WHERE c.id = ?1 ORDER BY pn.id"),
        Some(Value::Integer(id.0)),
      )
      .await?;
    Ok(views.into_iter().next())
  }

  async fn search(&self, query: &str) -> Result<Vec<ContactView>> {
    tracing::debug!(query, "searching contacts");
    if query.is_empty() {
      return self.load_all().await;
    }

    let sql = format!(
      r"{SELECT_VIEWS}
        WHERE c.id IN (
          SELECT c2.id
          FROM contacts c2
          LEFT JOIN phone_numbers p2 ON p2.contact_id = c2.id
          WHERE c2.last_name     LIKE ?1 ESCAPE '\'
             OR c2.first_name    LIKE ?1 ESCAPE '\'
             OR c2.middle_name   LIKE ?1 ESCAPE '\'
             OR c2.email         LIKE ?1 ESCAPE '\'
             OR c2.dob           LIKE ?1 ESCAPE '\'
             OR p2.phone_number  LIKE ?1 ESCAPE '\'
        )
        ORDER BY c.id, pn.id"
    );
    self.query_views(sql, Some(Value::Text(like_pattern(query)))).await
  }

  async fn stats(&self) -> Result<StoreStats> {
    let (contacts, phones): (i64, i64) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT (SELECT COUNT(*) FROM contacts), (SELECT COUNT(*) FROM phone_numbers)",
          [],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?)
      })
      .await?;

    Ok(StoreStats { contacts: contacts as u64, phones: phones as u64 })
  }

  // ── Candidate lookups ─────────────────────────────────────────────────────

  async fn find_exact(&self, identifier: &str) -> Result<Vec<CandidateRef>> {
    self
      .query_candidates(
        "SELECT id, last_name, first_name, middle_name, email
         FROM contacts
         WHERE last_name = ?1 OR first_name = ?1 OR middle_name = ?1
            OR email = ?1 OR dob = ?1
         ORDER BY id",
        identifier.to_owned(),
        false,
      )
      .await
  }

  async fn find_contacts(&self, identifier: &str) -> Result<Vec<CandidateRef>> {
    self
      .query_candidates(
        r"SELECT id, last_name, first_name, middle_name, email
          FROM contacts
          WHERE last_name   LIKE ?1 ESCAPE '\'
             OR first_name  LIKE ?1 ESCAPE '\'
             OR middle_name LIKE ?1 ESCAPE '\'
             OR email       LIKE ?1 ESCAPE '\'
          ORDER BY id",
        like_pattern(identifier),
        false,
      )
      .await
  }

  async fn find_phones(&self, identifier: &str) -> Result<Vec<CandidateRef>> {
    self
      .query_candidates(
        r"SELECT c.id, c.last_name, c.first_name, c.middle_name, c.email, pn.phone_number
          FROM contacts c
          JOIN phone_numbers pn ON pn.contact_id = c.id
          WHERE c.last_name     LIKE ?1 ESCAPE '\'
             OR c.first_name    LIKE ?1 ESCAPE '\'
             OR c.middle_name   LIKE ?1 ESCAPE '\'
             OR c.email         LIKE ?1 ESCAPE '\'
             OR pn.phone_number LIKE ?1 ESCAPE '\'
          ORDER BY c.id, pn.id",
        like_pattern(identifier),
        true,
      )
      .await
  }
}
