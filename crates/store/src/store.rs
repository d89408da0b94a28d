//! SQLite-backed store for authors, books, and their association.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::instrument;

use bookstack_core::{Author, Book, BookPatch, NewBook};

use crate::error::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS authors (
  id   INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS books (
  id              INTEGER PRIMARY KEY AUTOINCREMENT,
  name            TEXT NOT NULL,
  isbn            TEXT NOT NULL,
  country         TEXT NOT NULL,
  number_of_pages INTEGER NOT NULL,
  publisher       TEXT NOT NULL,
  release_date    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS book_authors (
  book_id   INTEGER NOT NULL REFERENCES books(id),
  author_id INTEGER NOT NULL REFERENCES authors(id),
  PRIMARY KEY (book_id, author_id)
);
"#;

/// SQLite-backed repository for authors and books.
///
/// Cloning is cheap; the underlying `sqlx` pool is shared and thread-safe.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open a pool against `url` (e.g. `sqlite://books.db` or
    /// `sqlite::memory:`) and bootstrap the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::Connect)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory SQLite database exists per connection, so the pool
        // must hold exactly one connection and never recycle it.
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(StoreError::Connect)?;

        Ok(Self { pool })
    }

    /// Return the author with `name`, inserting it first if absent.
    ///
    /// The upsert is a single statement, so two concurrent calls with the
    /// same name both resolve to the one row the unique index allows.
    #[instrument(skip(self), err)]
    pub async fn get_or_create_author(&self, name: &str) -> Result<Author, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO authors (name) VALUES (?1)
            ON CONFLICT(name) DO UPDATE SET name = excluded.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(Author {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }

    /// Persist a new book and associate it with the given (already
    /// resolved) authors, in order.
    #[instrument(skip(self, new, authors), err)]
    pub async fn create_book(
        &self,
        new: &NewBook,
        authors: &[Author],
    ) -> Result<Book, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO books (name, isbn, country, number_of_pages, publisher, release_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(&new.isbn)
        .bind(&new.country)
        .bind(new.number_of_pages)
        .bind(&new.publisher)
        .bind(&new.release_date)
        .fetch_one(&mut *tx)
        .await?;
        let book_id: i64 = row.try_get("id")?;

        for author in authors {
            sqlx::query("INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2)")
                .bind(book_id)
                .bind(author.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Book {
            id: book_id,
            name: new.name.clone(),
            isbn: new.isbn.clone(),
            country: new.country.clone(),
            authors: authors.iter().map(|a| a.name.clone()).collect(),
            number_of_pages: new.number_of_pages,
            publisher: new.publisher.clone(),
            release_date: new.release_date.clone(),
        })
    }

    /// Load one book with its author names, or `None` if absent.
    #[instrument(skip(self), err)]
    pub async fn get_book(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, isbn, country, number_of_pages, publisher, release_date
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let authors = self.author_names_for_book(id).await?;
        Ok(Some(book_from_row(&row, authors)?))
    }

    /// List all books in insertion order, each with its author names.
    #[instrument(skip(self), err)]
    pub async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, isbn, country, number_of_pages, publisher, release_date
            FROM books
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let authors = self.author_names_for_book(id).await?;
            books.push(book_from_row(&row, authors)?);
        }
        Ok(books)
    }

    /// Apply a partial update to a book's scalar fields.
    ///
    /// Returns the post-update book, or `None` if the id is unknown.
    #[instrument(skip(self, patch), err)]
    pub async fn update_book(
        &self,
        id: i64,
        patch: &BookPatch,
    ) -> Result<Option<Book>, StoreError> {
        let Some(mut book) = self.get_book(id).await? else {
            return Ok(None);
        };
        patch.apply(&mut book);

        sqlx::query(
            r#"
            UPDATE books
            SET name = ?1, isbn = ?2, country = ?3, number_of_pages = ?4,
                publisher = ?5, release_date = ?6
            WHERE id = ?7
            "#,
        )
        .bind(&book.name)
        .bind(&book.isbn)
        .bind(&book.country)
        .bind(book.number_of_pages)
        .bind(&book.publisher)
        .bind(&book.release_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(book))
    }

    /// Delete a book and its association rows. Authors survive.
    ///
    /// Returns the pre-delete book (the deletion message needs its name),
    /// or `None` if the id is unknown.
    #[instrument(skip(self), err)]
    pub async fn delete_book(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let Some(book) = self.get_book(id).await? else {
            return Ok(None);
        };

        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;
        sqlx::query("DELETE FROM book_authors WHERE book_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(book))
    }

    /// Relation lookup: all books associated with an author, in book
    /// insertion order.
    #[instrument(skip(self), err)]
    pub async fn books_for_author(&self, author_id: i64) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.name, b.isbn, b.country, b.number_of_pages, b.publisher, b.release_date
            FROM books b
            JOIN book_authors ba ON ba.book_id = b.id
            WHERE ba.author_id = ?1
            ORDER BY b.id ASC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let authors = self.author_names_for_book(id).await?;
            books.push(book_from_row(&row, authors)?);
        }
        Ok(books)
    }

    /// Relation lookup: a book's authors in association-insertion order.
    pub async fn authors_for_book(&self, book_id: i64) -> Result<Vec<Author>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.name
            FROM authors a
            JOIN book_authors ba ON ba.author_id = a.id
            WHERE ba.book_id = ?1
            ORDER BY ba.rowid ASC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        let mut authors = Vec::with_capacity(rows.len());
        for row in rows {
            authors.push(Author {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            });
        }
        Ok(authors)
    }

    async fn author_names_for_book(&self, book_id: i64) -> Result<Vec<String>, StoreError> {
        Ok(self
            .authors_for_book(book_id)
            .await?
            .into_iter()
            .map(|a| a.name)
            .collect())
    }
}

fn book_from_row(row: &sqlx::sqlite::SqliteRow, authors: Vec<String>) -> Result<Book, StoreError> {
    Ok(Book {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        isbn: row.try_get("isbn")?,
        country: row.try_get("country")?,
        authors,
        number_of_pages: row.try_get("number_of_pages")?,
        publisher: row.try_get("publisher")?,
        release_date: row.try_get("release_date")?,
    })
}
