//! Book entity and its create/update input shapes.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Maximum length of free-text columns (name, country, publisher, ...).
pub const MAX_TEXT_LEN: usize = 256;

/// Maximum length of the ISBN column. The check digit is not validated.
pub const MAX_ISBN_LEN: usize = 14;

/// A stored book. `authors` is rendered as a list of author names on output
/// even though identifiers are resolved internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub isbn: String,
    pub country: String,
    pub authors: Vec<String>,
    pub number_of_pages: i64,
    pub publisher: String,
    pub release_date: String,
}

/// Input shape for creating a book. `authors` is a list of plain name
/// strings; the handler resolves them to `Author` rows before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewBook {
    pub name: String,
    pub isbn: String,
    pub country: String,
    pub authors: Vec<String>,
    pub number_of_pages: i64,
    pub publisher: String,
    pub release_date: String,
}

impl NewBook {
    /// Field-level validation mirroring the column constraints.
    pub fn validate(&self) -> DomainResult<()> {
        check_text("name", &self.name)?;
        check_isbn(&self.isbn)?;
        check_text("country", &self.country)?;
        check_text("publisher", &self.publisher)?;
        check_text("release_date", &self.release_date)?;
        for author in &self.authors {
            crate::author::validate_author_name(author)?;
        }
        Ok(())
    }
}

/// Partial update of a book's scalar fields. Absent fields are left
/// untouched; the author relation is not updatable through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookPatch {
    pub name: Option<String>,
    pub isbn: Option<String>,
    pub country: Option<String>,
    pub number_of_pages: Option<i64>,
    pub publisher: Option<String>,
    pub release_date: Option<String>,
}

impl BookPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            check_text("name", name)?;
        }
        if let Some(isbn) = &self.isbn {
            check_isbn(isbn)?;
        }
        if let Some(country) = &self.country {
            check_text("country", country)?;
        }
        if let Some(publisher) = &self.publisher {
            check_text("publisher", publisher)?;
        }
        if let Some(release_date) = &self.release_date {
            check_text("release_date", release_date)?;
        }
        Ok(())
    }

    /// Apply the present fields on top of an existing book.
    pub fn apply(&self, book: &mut Book) {
        if let Some(name) = &self.name {
            book.name = name.clone();
        }
        if let Some(isbn) = &self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(country) = &self.country {
            book.country = country.clone();
        }
        if let Some(number_of_pages) = self.number_of_pages {
            book.number_of_pages = number_of_pages;
        }
        if let Some(publisher) = &self.publisher {
            book.publisher = publisher.clone();
        }
        if let Some(release_date) = &self.release_date {
            book.release_date = release_date.clone();
        }
    }
}

fn check_text(field: &str, value: &str) -> DomainResult<()> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

fn check_isbn(value: &str) -> DomainResult<()> {
    if value.chars().count() > MAX_ISBN_LEN {
        return Err(DomainError::validation(format!(
            "isbn must be at most {MAX_ISBN_LEN} characters"
        )));
    }
    Ok(())
}
