//! Line-based dialogue channel between the user and the interpreter.
//!
//! Handlers read follow-up answers synchronously through the same console
//! they write to, so a nested prompt is just another `read_line` call in the
//! middle of a command.

use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::style::Stylize;

pub trait Console {
    /// Block until the next line is available. `None` signals end of input.
    fn read_line(&mut self) -> Result<Option<String>>;
    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// Console over any reader/writer pair, printing the `U: ` / `P: ` markers of
/// a user/program transcript.
pub struct LineConsole<R, W> {
    reader: R,
    writer: W,
    styled: bool,
    /// Set after a read until the program's first reply line is written.
    replying: bool,
}

pub type StdConsole = LineConsole<StdinLock<'static>, Stdout>;

impl StdConsole {
    pub fn stdio() -> Self {
        LineConsole::new(io::stdin().lock(), io::stdout(), true)
    }
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(reader: R, writer: W, styled: bool) -> Self {
        Self {
            reader,
            writer,
            styled,
            replying: true,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn marker(&self, text: &'static str) -> String {
        if self.styled {
            text.dark_cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self) -> Result<Option<String>> {
        let marker = self.marker("U:");
        write!(self.writer, "{marker} ").context("failed to write prompt")?;
        self.writer.flush().context("failed to flush prompt")?;

        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .context("failed to read input line")?;
        if read == 0 {
            writeln!(self.writer).context("failed to finish prompt line")?;
            return Ok(None);
        }

        self.replying = true;
        // Invalid UTF-8 is replaced, not rejected.
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        if self.replying {
            let marker = self.marker("P:");
            write!(self.writer, "{marker} ").context("failed to write reply marker")?;
            self.replying = false;
        }
        writeln!(self.writer, "{line}").context("failed to write output line")?;
        self.writer.flush().context("failed to flush output")
    }
}

/// In-memory console fed from a fixed script. Every written line is kept so
/// callers can inspect the whole transcript afterwards.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    pub fn push_input(&mut self, line: impl Into<String>) {
        self.input.push_back(line.into());
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Drain the transcript collected so far.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Lines still waiting to be read.
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_console_marks_first_reply_line_only() {
        let input = io::Cursor::new("add x \"y\"\n");
        let mut console = LineConsole::new(input, Vec::new(), false);

        let line = console.read_line().unwrap();
        assert_eq!(line.as_deref(), Some("add x \"y\""));
        console.write_line("first").unwrap();
        console.write_line("second").unwrap();
        assert_eq!(console.read_line().unwrap(), None);

        let transcript = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(transcript, "U: P: first\nsecond\nU: \n");
    }

    #[test]
    fn line_console_replaces_invalid_utf8_and_keeps_reading() {
        let input = io::Cursor::new(b"add Caf\xe9 \"X\"\r\nexit\n".to_vec());
        let mut console = LineConsole::new(input, Vec::new(), false);

        assert_eq!(
            console.read_line().unwrap().as_deref(),
            Some("add Caf\u{FFFD} \"X\"")
        );
        assert_eq!(console.read_line().unwrap().as_deref(), Some("exit"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn session_survives_invalid_utf8_line() {
        use crate::interpreter::Interpreter;
        use crate::store::{BookStore, SqliteBookStore};

        let input = io::Cursor::new(
            b"add Frank Herbert \"Dune\"\nadd Caf\xe9 \"X\"\nall books\nexit\n".to_vec(),
        );
        let console = LineConsole::new(input, Vec::new(), false);
        let store = SqliteBookStore::open_in_memory().unwrap();
        let mut session = Interpreter::new(store, console);

        session.run().unwrap();
        assert!(!session.is_alive());

        let (store, console) = session.into_parts();
        assert_eq!(store.list_all().unwrap().len(), 2);
        let transcript = String::from_utf8(console.into_writer()).unwrap();
        assert!(transcript.contains("Book Caf\u{FFFD} \"X\" was added"));
        assert!(transcript.contains("Our books:"));
        assert!(transcript.contains("Goodbye"));
    }

    #[test]
    fn scripted_console_replays_input_in_order() {
        let mut console = ScriptedConsole::new(["one", "two"]);
        assert_eq!(console.read_line().unwrap().as_deref(), Some("one"));
        console.write_line("reply").unwrap();
        assert_eq!(console.remaining_input(), 1);
        assert_eq!(console.take_output(), vec!["reply".to_string()]);
        assert!(console.output().is_empty());
    }
}
