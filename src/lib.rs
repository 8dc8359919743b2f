//! Core library surface for the Book Library line-command tool.
//!
//! The binary only wires things together: it opens the store, picks a
//! console and hands both to [`Interpreter`]. Tests drive the same pieces
//! with an in-memory store and a scripted console.
pub mod config;
pub mod console;
pub mod db;
pub mod interpreter;
pub mod models;
pub mod store;

/// Line I/O used by the interpreter.
pub use console::{Console, ScriptedConsole, StdConsole};

/// The interactive entry point and its command grammar.
pub use interpreter::{Command, Interpreter};

/// The domain types other layers manipulate.
pub use models::{Book, BookData, BookFilter};

/// Persistence contract and its SQLite implementation.
pub use store::{BookStore, SqliteBookStore};
