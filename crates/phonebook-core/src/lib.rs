//! Core types and trait definitions for the phonebook contact directory.
//!
//! This crate is deliberately free of database dependencies. The SQLite
//! backend and the interactive shell both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod contact;
pub mod directory;
pub mod error;
pub mod resolve;
pub mod store;
pub mod validate;

pub use error::{Error, Result, ValidationError};
