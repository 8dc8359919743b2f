//! The record store the interpreter talks to.
//!
//! `BookStore` is intentionally conflict-blind: inserts and updates never
//! check for duplicates. The interpreter enforces that no two books share a
//! name and author under case-insensitive comparison before calling in here.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::db;
use crate::models::{Book, BookData, BookFilter};

/// CRUD and lookup operations over book records. Listings are ordered by
/// case-folded name, then case-folded author.
pub trait BookStore {
    /// Persist a new record and return it with its assigned identity.
    fn insert(&mut self, data: &BookData) -> Result<Book>;
    /// Overwrite all fields of an already persisted record.
    fn replace(&mut self, book: &Book) -> Result<Book>;
    fn delete(&mut self, book: &Book) -> Result<()>;
    fn delete_all(&mut self) -> Result<()>;
    fn list_all(&self) -> Result<Vec<Book>>;
    /// Records containing every filter value as a case-insensitive substring
    /// of the matching field. An empty filter behaves like [`list_all`].
    ///
    /// [`list_all`]: BookStore::list_all
    fn search(&self, filter: &BookFilter) -> Result<Vec<Book>>;
    /// Exact, case-sensitive match on both fields.
    fn exists_exact(&self, data: &BookData) -> Result<bool>;
    /// A record equal to `data` under case-insensitive comparison.
    fn find_case_variant(&self, data: &BookData) -> Result<Option<Book>>;
    /// Exact, case-sensitive match on the name.
    fn find_by_name(&self, name: &str) -> Result<Vec<Book>>;
}

/// SQLite-backed [`BookStore`]. Each mutation runs in its own transaction.
pub struct SqliteBookStore {
    conn: Connection,
}

impl SqliteBookStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(db::open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(db::open_in_memory()?))
    }
}

impl BookStore for SqliteBookStore {
    fn insert(&mut self, data: &BookData) -> Result<Book> {
        let tx = self
            .conn
            .transaction()
            .context("failed to begin insert transaction")?;
        let book = db::create_book(&tx, data)?;
        tx.commit().context("failed to commit insert")?;
        log::info!("inserted book id={}", book.id);
        Ok(book)
    }

    fn replace(&mut self, book: &Book) -> Result<Book> {
        let tx = self
            .conn
            .transaction()
            .context("failed to begin update transaction")?;
        db::update_book(&tx, book)?;
        tx.commit().context("failed to commit update")?;
        log::info!("updated book id={}", book.id);
        Ok(book.clone())
    }

    fn delete(&mut self, book: &Book) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("failed to begin delete transaction")?;
        db::delete_book(&tx, book.id)?;
        tx.commit().context("failed to commit delete")?;
        log::info!("deleted book id={}", book.id);
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .context("failed to begin clean transaction")?;
        let removed = db::delete_all_books(&tx)?;
        tx.commit().context("failed to commit clean")?;
        log::info!("deleted all books count={removed}");
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Book>> {
        db::fetch_books(&self.conn)
    }

    fn search(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        log::debug!("searching books filter={filter:?}");
        db::search_books(&self.conn, filter)
    }

    fn exists_exact(&self, data: &BookData) -> Result<bool> {
        db::book_exists(&self.conn, data)
    }

    fn find_case_variant(&self, data: &BookData) -> Result<Option<Book>> {
        db::find_case_variant(&self.conn, data)
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Book>> {
        db::fetch_books_by_name(&self.conn, name)
    }
}
