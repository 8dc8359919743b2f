//! Persistence module split across logical submodules.

mod books;
mod connection;

pub use books::{
    book_exists, create_book, delete_all_books, delete_book, fetch_books, fetch_books_by_name,
    find_case_variant, search_books, update_book,
};
pub use connection::{default_db_path, open_database, open_in_memory};
