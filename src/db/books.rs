use anyhow::{anyhow, Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::models::{Book, BookData, BookFilter};

/// Ordering shared by every listing query. Case-folded name first, then
/// author; the id keeps rows with identical folded values stable.
const ORDER_BY: &str = "ORDER BY fold_case(name), fold_case(author), id";

fn map_book(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        name: row.get(1)?,
        author: row.get(2)?,
    })
}

/// Fetch every book in display order.
pub fn fetch_books(conn: &Connection) -> Result<Vec<Book>> {
    search_books(conn, &BookFilter::default())
}

/// Fetch the books whose columns contain every filter value, compared on
/// case-folded text. An empty filter returns the whole table.
pub fn search_books(conn: &Connection, filter: &BookFilter) -> Result<Vec<Book>> {
    let mut sql = String::from("SELECT id, name, author FROM books");
    let mut conditions = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    for (column, needle) in [("name", &filter.name), ("author", &filter.author)] {
        if let Some(needle) = needle {
            values.push(Value::Text(needle.to_lowercase()));
            conditions.push(format!("instr(fold_case({column}), ?{}) > 0", values.len()));
        }
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push(' ');
    sql.push_str(ORDER_BY);

    let mut stmt = conn
        .prepare(&sql)
        .context("failed to prepare book search query")?;

    let books = stmt
        .query_map(params_from_iter(values), map_book)
        .context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books")?;

    Ok(books)
}

/// Books whose name equals `name` exactly (case-sensitive).
pub fn fetch_books_by_name(conn: &Connection, name: &str) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, name, author FROM books WHERE name = ?1 {ORDER_BY}"
        ))
        .context("failed to prepare books by name query")?;

    let books = stmt
        .query_map([name], map_book)
        .context("failed to iterate books by name")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books by name")?;

    Ok(books)
}

/// Whether a row with exactly this name and author exists.
pub fn book_exists(conn: &Connection, data: &BookData) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM books WHERE name = ?1 AND author = ?2)",
        params![data.name, data.author],
        |row| row.get(0),
    )
    .context("failed to check book existence")
}

/// Find a row equal to `data` once both sides are case-folded. Callers run
/// [`book_exists`] first, so a hit here differs only in letter case.
pub fn find_case_variant(conn: &Connection, data: &BookData) -> Result<Option<Book>> {
    conn.query_row(
        "SELECT id, name, author FROM books
         WHERE fold_case(name) = fold_case(?1) AND fold_case(author) = fold_case(?2)
         ORDER BY id
         LIMIT 1",
        params![data.name, data.author],
        map_book,
    )
    .optional()
    .context("failed to look up case variant")
}

/// Insert a brand new book, returning the hydrated struct.
pub fn create_book(conn: &Connection, data: &BookData) -> Result<Book> {
    conn.execute(
        "INSERT INTO books (name, author) VALUES (?1, ?2)",
        params![data.name, data.author],
    )
    .context("failed to insert book")?;

    let id = conn.last_insert_rowid();
    Ok(Book {
        id,
        name: data.name.clone(),
        author: data.author.clone(),
    })
}

/// Overwrite all fields of an existing book. Zero touched rows means the
/// book vanished in the meantime.
pub fn update_book(conn: &Connection, book: &Book) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE books SET name = ?1, author = ?2 WHERE id = ?3",
            params![book.name, book.author, book.id],
        )
        .context("failed to update book")?;

    if updated == 0 {
        Err(anyhow!("Book not found"))
    } else {
        Ok(())
    }
}

pub fn delete_book(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM books WHERE id = ?1", params![id])
        .context("failed to delete book")?;

    if deleted == 0 {
        Err(anyhow!("Book not found"))
    } else {
        Ok(())
    }
}

/// Remove every row and report how many went away.
pub fn delete_all_books(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM books", [])
        .context("failed to delete books")
}
