use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".book-library";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.sqlite";

/// Name of the SQL scalar function that lowercases with full Unicode rules.
/// SQLite's own `LOWER` and `COLLATE NOCASE` only fold ASCII letters.
const FOLD_CASE_FN: &str = "fold_case";

/// Open (or create) the database file at `path`, run lazy migrations, and
/// return a live connection.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    prepare(&conn)?;
    log::debug!("opened book database at {}", path.display());
    Ok(conn)
}

/// Throw-away database used by tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> Result<()> {
    register_functions(conn)?;
    ensure_schema(conn)
}

/// Create the `books` table if it is missing. There is deliberately no unique
/// index: the interpreter owns the case-insensitive uniqueness policy.
fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            author TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create books table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS books_name ON books (name)",
        [],
    )
    .context("failed to create books name index")?;

    Ok(())
}

/// Install `fold_case(text)` on the connection.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: String = ctx.get(0)?;
            Ok(value.to_lowercase())
        },
    )
    .context("failed to register fold_case function")
}

/// Resolve the absolute path to the SQLite database inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
