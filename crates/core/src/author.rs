//! Author entity.

use serde::{Deserialize, Serialize};

use crate::book::MAX_TEXT_LEN;
use crate::error::{DomainError, DomainResult};

/// An author record. Authors are shared across books (association only, no
/// ownership) and are created on demand when a book references a
/// not-yet-seen name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

impl Author {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl core::fmt::Display for Author {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Validate an author name before it is used for get-or-create.
pub fn validate_author_name(name: &str) -> DomainResult<()> {
    if name.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::validation(format!(
            "author name must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}
