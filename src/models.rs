//! Domain models that mirror the SQLite schema and get passed between the
//! store and the command interpreter. They stay light-weight data holders so
//! the other layers can focus on dialogue and persistence logic.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A book row as persisted in the `books` table.
pub struct Book {
    /// Primary key from the database. The interpreter never shows it, but
    /// update/delete flows bubble it back to the persistence layer.
    pub id: i64,
    pub name: String,
    pub author: String,
}

impl Book {
    /// Overwrite every editable field with the candidate values, keeping the
    /// row identity.
    pub fn set_data(&mut self, data: &BookData) {
        self.name = data.name.clone();
        self.author = data.author.clone();
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.author, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Name and author of a book that has not been persisted (yet). Parsed
/// statements produce this, and the uniqueness checks run against it.
pub struct BookData {
    pub name: String,
    pub author: String,
}

impl BookData {
    /// Author first, like the `add` statement reads.
    pub fn new(author: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
        }
    }
}

impl fmt::Display for BookData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.author, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Substring filters for `all books`. Every present field must be contained
/// (case-insensitively) in the matching column; absent fields match anything.
pub struct BookFilter {
    pub name: Option<String>,
    pub author: Option<String>,
}

impl BookFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.author.is_none()
    }
}
