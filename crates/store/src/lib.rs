//! `bookstack-store` — SQLite-backed persistence for authors and books.
//!
//! Repository-style data access over a `sqlx` connection pool. The only
//! cross-request invariant lives here: author get-or-create rides on the
//! `UNIQUE` name column plus a single atomic upsert statement, never
//! check-then-insert.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::Store;
