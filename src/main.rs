//! Binary entry point that glues the SQLite-backed store to the line-command
//! interpreter: parse configuration, bring up logging and the database, then
//! drive the dialogue on stdin/stdout until the user exits.
use book_library::config::Cli;
use book_library::{Interpreter, SqliteBookStore, StdConsole};
use clap::Parser;

/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable data directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    let db_path = cli.db_path()?;
    log::info!("using database {}", db_path.display());
    let store = SqliteBookStore::open(&db_path)?;

    let mut interpreter = Interpreter::new(store, StdConsole::stdio());
    interpreter.run()
}
