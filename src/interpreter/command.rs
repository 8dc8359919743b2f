/// Top-level commands understood by the interpreter. The payload is the
/// unparsed remainder of the line, if the user typed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Option<String>),
    Remove(Option<String>),
    Edit(Option<String>),
    All(Option<String>),
    Clean,
    Exit,
    /// Anything else, including the empty keyword.
    Unknown(String),
}

impl Command {
    /// Classify a raw input line by its first word.
    pub fn parse(line: &str) -> Self {
        let (keyword, rest) = split_command(line);
        match keyword.as_str() {
            "add" => Command::Add(rest),
            "remove" => Command::Remove(rest),
            "edit" => Command::Edit(rest),
            "all" => Command::All(rest),
            "clean" => Command::Clean,
            "exit" => Command::Exit,
            _ => Command::Unknown(keyword),
        }
    }
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn normalize_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a line into its keyword and the remainder after the first space.
pub fn split_command(line: &str) -> (String, Option<String>) {
    let normalized = normalize_whitespace(line);
    match normalized.split_once(' ') {
        Some((keyword, rest)) => (keyword.to_string(), Some(rest.to_string())),
        None => (normalized, None),
    }
}
