use anyhow::{Error, Result};

use crate::console::Console;
use crate::models::{Book, BookData};
use crate::store::BookStore;

use super::command::{normalize_whitespace, Command};
use super::grammar::{
    extract_book, is_confirmation, parse_search, parse_selection, Selection, StatementError,
};

const GREETING: &str =
    "I'm Book Library and I'm ready to work. I'm waiting for your commands. Please write";
const STATEMENT_EXAMPLE: &str = "Karan Mahajan \"The Association of Small Bombs\"";
const NAME_EXAMPLE: &str = "A Little Princess";

/// Commands that touch a single book. Used to word prompts and feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Remove,
    Edit,
}

impl Action {
    fn keyword(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Edit => "edit",
        }
    }

    fn gerund(self) -> &'static str {
        match self {
            Action::Add => "Adding",
            Action::Remove => "Removing",
            Action::Edit => "Editing",
        }
    }
}

/// Interactive command session over a book store.
///
/// One command runs to completion before the next line is read. Handlers
/// that need an answer (author selection, case-conflict confirmation, new
/// values for `edit`) read it synchronously from the same console.
pub struct Interpreter<S, C> {
    store: S,
    console: C,
    alive: bool,
}

impl<S: BookStore, C: Console> Interpreter<S, C> {
    pub fn new(store: S, console: C) -> Self {
        Self {
            store,
            console,
            alive: true,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_parts(self) -> (S, C) {
        (self.store, self.console)
    }

    /// False once `exit` has been executed.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn greet(&mut self) -> Result<()> {
        self.say(GREETING)
    }

    /// Greet, then execute lines until `exit` or end of input. A failing
    /// store call only aborts the command that triggered it.
    pub fn run(&mut self) -> Result<()> {
        self.greet()?;
        while self.alive {
            let Some(line) = self.console.read_line()? else {
                log::info!("input closed, ending session");
                break;
            };
            if let Err(err) = self.execute(&line) {
                log::error!("command failed: {err:#}");
                self.say(format!("Something went wrong: {}", surface_error(&err)))?;
            }
        }
        Ok(())
    }

    /// Execute a single top-level line, including any follow-up prompts.
    pub fn execute(&mut self, line: &str) -> Result<()> {
        let command = Command::parse(line);
        log::debug!("executing {command:?}");
        match command {
            Command::Add(statement) => self.add(statement.as_deref()),
            Command::Remove(name) => self.remove(name.as_deref()),
            Command::Edit(name) => self.edit(name.as_deref()),
            Command::All(rest) => self.all(rest.as_deref()),
            Command::Clean => self.clean(),
            Command::Exit => self.exit(),
            Command::Unknown(keyword) => self.unknown(&keyword),
        }
    }

    fn add(&mut self, statement: Option<&str>) -> Result<()> {
        let candidate = match extract_book(statement) {
            Ok(candidate) => candidate,
            Err(StatementError::Missing) => {
                return self.say(format!(
                    "Invalid `add` command. You must enter the book author and its name in \
                     quotes. For example, add {STATEMENT_EXAMPLE}"
                ));
            }
            Err(err) => {
                log::debug!("rejected add statement: {err}");
                return self.say(format!(
                    "Invalid statement of `add` command. You must enter the book author and \
                     its name in quotes. For example, add {STATEMENT_EXAMPLE}"
                ));
            }
        };
        self.store_candidate(candidate, None, Action::Add)
    }

    fn remove(&mut self, name: Option<&str>) -> Result<()> {
        let Some(book) = self.resolve_by_name(name, Action::Remove)? else {
            return Ok(());
        };
        self.store.delete(&book)?;
        self.say(format!("Book {book} was removed"))
    }

    fn edit(&mut self, name: Option<&str>) -> Result<()> {
        let Some(book) = self.resolve_by_name(name, Action::Edit)? else {
            return Ok(());
        };

        self.say(format!("Please enter new author and name of the book {book}"))?;
        let reply = normalize_whitespace(&self.ask()?);
        match extract_book(Some(&reply)) {
            Ok(candidate) => self.store_candidate(candidate, Some(book), Action::Edit),
            Err(err) => {
                log::debug!("rejected edit statement: {err}");
                self.say(format!(
                    "Invalid statement. You must enter the book author and its name in \
                     quotes. For example, {STATEMENT_EXAMPLE}. Editing canceled"
                ))
            }
        }
    }

    fn all(&mut self, rest: Option<&str>) -> Result<()> {
        let Some(rest) = rest else {
            return self.say("Please use `all books` command. Simple command `all` doesn't exist");
        };
        let filter = match parse_search(rest) {
            Ok(filter) => filter,
            Err(err) => return self.say(err.to_string()),
        };

        let searching = !filter.is_empty();
        let books = if searching {
            self.store.search(&filter)?
        } else {
            self.store.list_all()?
        };

        match (books.is_empty(), searching) {
            (true, true) => self.say("No books found"),
            (true, false) => self.say("Pity to say, but we do not have any books"),
            (false, _) => {
                self.say(if searching { "Found books:" } else { "Our books:" })?;
                for book in &books {
                    self.say(format!("      {book}"))?;
                }
                Ok(())
            }
        }
    }

    fn clean(&mut self) -> Result<()> {
        self.store.delete_all()?;
        self.say("All books removed")
    }

    fn exit(&mut self) -> Result<()> {
        self.alive = false;
        self.say("Goodbye")
    }

    fn unknown(&mut self, keyword: &str) -> Result<()> {
        if keyword.is_empty() {
            self.say("Please don't write empty commands")
        } else {
            self.say(format!(
                "Command `{keyword}` doesn't exist. Please write carefully"
            ))
        }
    }

    /// Persist `candidate` while keeping (name, author) unique regardless of
    /// letter case. Without a `target` the candidate becomes a new book;
    /// with one, the target is overwritten in place.
    ///
    /// An exact duplicate is rejected. A duplicate that differs only in case
    /// is offered for replacement, and on confirmation that record is
    /// overwritten instead of the target.
    fn store_candidate(
        &mut self,
        candidate: BookData,
        target: Option<Book>,
        action: Action,
    ) -> Result<()> {
        if self.store.exists_exact(&candidate)? {
            return match action {
                Action::Add => self.say(format!("Book {candidate} already exists")),
                _ => self.say(format!(
                    "Book {candidate} already exists. {} canceled",
                    action.gerund()
                )),
            };
        }

        if let Some(mut variant) = self.store.find_case_variant(&candidate)? {
            self.say(format!(
                "There is a book {variant} which has same author and name, but only in another \
                 case. If you want to replace it with new ones, press y. Otherwise, to cancel \
                 the operation enter any other character"
            ))?;
            if is_confirmation(&self.ask()?) {
                variant.set_data(&candidate);
                let updated = self.store.replace(&variant)?;
                return self.say(format!("Book {updated} was updated"));
            }
            return self.say(format!("{} canceled", action.gerund()));
        }

        match target {
            None => {
                let book = self.store.insert(&candidate)?;
                self.say(format!("Book {book} was added"))
            }
            Some(mut book) => {
                book.set_data(&candidate);
                let updated = self.store.replace(&book)?;
                self.say(format!("Book {updated} was updated"))
            }
        }
    }

    /// Narrow `name` down to one book, asking the user to pick an author when
    /// several books share the name. `None` means the command is over.
    fn resolve_by_name(&mut self, name: Option<&str>, action: Action) -> Result<Option<Book>> {
        let Some(name) = name else {
            let keyword = action.keyword();
            self.say(format!(
                "Invalid `{keyword}` command. You must enter the name of the book. \
                 For example, {keyword} {NAME_EXAMPLE}"
            ))?;
            return Ok(None);
        };

        let mut books = self.store.find_by_name(name)?;
        let count = books.len();
        match count {
            0 => {
                self.say(format!(
                    "Book with name \"{name}\" doesn't exist. Please check if you have entered \
                     it correct"
                ))?;
                Ok(None)
            }
            1 => Ok(books.pop()),
            _ => {
                self.say(format!(
                    "There are {count} books with name \"{name}\" written by different authors:"
                ))?;
                for (index, book) in books.iter().enumerate() {
                    self.say(format!("    {:>3}. {}", index + 1, book.author))?;
                }
                self.say(format!(
                    "Please enter number of author whose book you want to {} or any non digital \
                     character or 0 to cancel",
                    action.keyword()
                ))?;

                match parse_selection(&self.ask()?, count) {
                    Selection::Chosen(index) => Ok(Some(books.swap_remove(index))),
                    Selection::Canceled => {
                        self.say(format!("{} canceled", action.gerund()))?;
                        Ok(None)
                    }
                    Selection::OutOfRange(digits) => {
                        self.say(format!(
                            "Number {digits} doesn't match any author. {} canceled",
                            action.gerund()
                        ))?;
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Read a follow-up answer. End of input counts as an empty answer.
    fn ask(&mut self) -> Result<String> {
        let reply = self.console.read_line()?;
        if reply.is_none() {
            log::warn!("input closed while waiting for an answer");
        }
        Ok(reply.unwrap_or_default())
    }

    fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.console.write_line(text.as_ref())
    }
}

/// Extract the most relevant error message from a chained error.
fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
