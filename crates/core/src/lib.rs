//! `bookstack-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** logic (no storage, no HTTP): the
//! `Author` and `Book` entities, input validation, the external-catalog
//! payload transform, and the shared status-label table.

pub mod author;
pub mod book;
pub mod catalog;
pub mod error;
pub mod status;

pub use author::Author;
pub use book::{Book, BookPatch, NewBook};
pub use error::{DomainError, DomainResult};
