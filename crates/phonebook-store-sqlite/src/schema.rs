//! SQL schema for the phonebook SQLite store.
//!
//! Executed once at connection startup. There are no migrations; the DDL is
//! idempotent thanks to `CREATE ... IF NOT EXISTS`.

/// Full schema DDL.
///
/// Phone rows reference their contact, but nothing cascades: the store
/// deletes a contact's phones itself before deleting the contact.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contacts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    last_name   TEXT,
    first_name  TEXT,
    middle_name TEXT,
    email       TEXT,
    dob         TEXT             -- dd.mm.yyyy, grammar-checked only
);

CREATE TABLE IF NOT EXISTS phone_numbers (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id   INTEGER NOT NULL REFERENCES contacts(id),
    phone_number TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS phone_numbers_contact_idx ON phone_numbers(contact_id);
";
