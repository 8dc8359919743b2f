//! Start-up configuration taken from the command line or the environment.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::db::default_db_path;

#[derive(Debug, Parser)]
#[command(name = "book-library", version, about = "Interactive book library")]
pub struct Cli {
    /// SQLite database file. Defaults to ~/.book-library/library.sqlite.
    #[arg(long, env = "BOOK_LIBRARY_DB")]
    pub db: Option<PathBuf>,

    /// Log filter for stderr diagnostics (error, warn, info, debug, trace, off).
    #[arg(long, env = "BOOK_LIBRARY_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_db_path_wins() {
        let cli = Cli::parse_from(["book-library", "--db", "/tmp/books.sqlite"]);
        assert_eq!(cli.db_path().unwrap(), PathBuf::from("/tmp/books.sqlite"));
    }

    #[test]
    fn log_level_from_flag() {
        let cli = Cli::try_parse_from(["book-library", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, "debug");
    }
}
