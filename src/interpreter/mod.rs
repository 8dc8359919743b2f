//! The command interpreter: classifies each input line, parses its
//! statement, resolves ambiguous names through follow-up prompts and keeps
//! book records unique regardless of letter case.

mod command;
mod grammar;
mod session;

pub use command::{normalize_whitespace, split_command, Command};
pub use grammar::{
    extract_book, is_confirmation, parse_search, parse_selection, split_quoted, SearchError,
    SearchField, Selection, StatementError,
};
pub use session::Interpreter;
