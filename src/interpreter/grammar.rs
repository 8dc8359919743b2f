//! Grammar rules for the free-text parts of commands: the `<author> "<name>"`
//! statement, `all books` search parameters, numeric author selection and
//! yes/no confirmation.

use std::fmt;

use thiserror::Error;

use crate::models::{BookData, BookFilter};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatementError {
    #[error("statement is missing")]
    Missing,
    #[error("expected an author followed by a quoted book name")]
    Malformed,
    /// The quotes matched but the author or name is only whitespace. Such
    /// statements are refused instead of storing an empty field.
    #[error("author and book name must not be blank")]
    Blank,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Command `all {0}` doesn't exist. Maybe you wanted to write `all books`?")]
    UnknownTarget(String),
    #[error("Invalid search entry. Parameter `{0}` assigned twice")]
    AssignedTwice(SearchField),
}

/// Book fields that `all books` can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Author,
}

impl SearchField {
    const ALL: [SearchField; 2] = [SearchField::Name, SearchField::Author];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Author => "author",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split `text` into the part before the quoted segment and the quoted
/// content. The prefix holds at least one character; the segment opens at
/// the first `"` after it and closes at the last `"` on the line, with at
/// least one character in between.
pub fn split_quoted(text: &str) -> Option<(&str, &str)> {
    let first_len = text.chars().next()?.len_utf8();
    let open = first_len + text[first_len..].find('"')?;
    let close = text.rfind('"')?;
    let content_start = open + 1;
    if close <= content_start {
        return None;
    }
    Some((&text[..open], &text[content_start..close]))
}

/// Parse `<author> "<name>"`. Both parts are trimmed.
pub fn extract_book(statement: Option<&str>) -> Result<BookData, StatementError> {
    let statement = statement.ok_or(StatementError::Missing)?;
    let (author, name) = split_quoted(statement).ok_or(StatementError::Malformed)?;
    let (author, name) = (author.trim(), name.trim());
    if author.is_empty() || name.is_empty() {
        return Err(StatementError::Blank);
    }
    Ok(BookData::new(author, name))
}

/// Parse the remainder of an `all` command. It must start with the `books`
/// token; any `name "<v>"` / `author "<v>"` pairs after it become filters.
/// Text that is not a recognised pair is skipped.
pub fn parse_search(rest: &str) -> Result<BookFilter, SearchError> {
    let (target, params) = match rest.split_once(' ') {
        Some((target, params)) => (target, Some(params)),
        None => (rest, None),
    };
    if target != "books" {
        return Err(SearchError::UnknownTarget(target.to_string()));
    }

    let mut filter = BookFilter::default();
    let Some(mut remaining) = params else {
        return Ok(filter);
    };

    while let Some(first) = remaining.chars().next() {
        match match_parameter(remaining) {
            Some((field, value, consumed)) => {
                let slot = match field {
                    SearchField::Name => &mut filter.name,
                    SearchField::Author => &mut filter.author,
                };
                if slot.is_some() {
                    return Err(SearchError::AssignedTwice(field));
                }
                *slot = Some(value.to_string());
                remaining = &remaining[consumed..];
            }
            None => remaining = &remaining[first.len_utf8()..],
        }
    }

    Ok(filter)
}

/// Try to read `<field><whitespace>"<value>"` at the very start of `text`.
/// The value is non-empty and ends at the next `"`.
fn match_parameter(text: &str) -> Option<(SearchField, &str, usize)> {
    SearchField::ALL.into_iter().find_map(|field| {
        let keyword = field.as_str();
        let after = text.strip_prefix(keyword)?;
        let gap = after.chars().next().filter(|c| c.is_whitespace())?;
        let body = after[gap.len_utf8()..].strip_prefix('"')?;
        let first_len = body.chars().next()?.len_utf8();
        let close = first_len + body[first_len..].find('"')?;
        let consumed = keyword.len() + gap.len_utf8() + 1 + close + 1;
        Some((field, &body[..close], consumed))
    })
}

/// Outcome of asking the user to pick one of several authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the candidate list.
    Chosen(usize),
    Canceled,
    /// The digits the user typed, which name no candidate.
    OutOfRange(String),
}

/// Interpret a reply to the author selection prompt against `count`
/// candidates. Only replies starting with 1-9 select anything; the leading
/// digit run is the 1-based position.
pub fn parse_selection(reply: &str, count: usize) -> Selection {
    let reply = reply.trim();
    if !matches!(reply.chars().next(), Some('1'..='9')) {
        return Selection::Canceled;
    }
    let end = reply
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(reply.len());
    let digits = &reply[..end];
    match digits.parse::<usize>() {
        Ok(position) if position <= count => Selection::Chosen(position - 1),
        _ => Selection::OutOfRange(digits.to_string()),
    }
}

/// A reply confirms when its first non-blank character is `y` or `Y`.
pub fn is_confirmation(reply: &str) -> bool {
    matches!(reply.trim().chars().next(), Some('y' | 'Y'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_author_and_name() {
        let book = extract_book(Some("J.K. Rowling \"Harry Potter\"")).unwrap();
        assert_eq!(book, BookData::new("J.K. Rowling", "Harry Potter"));
    }

    #[test]
    fn name_runs_to_the_last_quote() {
        let book = extract_book(Some("Anon \"Say \"Hi\" Again\" ")).unwrap();
        assert_eq!(book.name, "Say \"Hi\" Again");
        assert_eq!(book.author, "Anon");
    }

    #[test]
    fn statement_errors() {
        assert_eq!(extract_book(None), Err(StatementError::Missing));
        assert_eq!(
            extract_book(Some("Frank Herbert Dune")),
            Err(StatementError::Malformed)
        );
        assert_eq!(
            extract_book(Some("\"Dune\"")),
            Err(StatementError::Malformed)
        );
        assert_eq!(
            extract_book(Some("Frank Herbert \"\"")),
            Err(StatementError::Malformed)
        );
        assert_eq!(
            extract_book(Some("Frank Herbert \" \"")),
            Err(StatementError::Blank)
        );
    }

    #[test]
    fn split_quoted_requires_a_prefix() {
        assert_eq!(split_quoted("a\"b\""), Some(("a", "b")));
        assert_eq!(split_quoted("\"b\""), None);
        assert_eq!(split_quoted("ü \"é\""), Some(("ü ", "é")));
    }

    #[test]
    fn search_requires_books_token() {
        assert_eq!(
            parse_search("book"),
            Err(SearchError::UnknownTarget("book".into()))
        );
        assert_eq!(
            parse_search("booksy name \"x\""),
            Err(SearchError::UnknownTarget("booksy".into()))
        );
        assert_eq!(parse_search("books"), Ok(BookFilter::default()));
    }

    #[test]
    fn search_collects_both_fields() {
        let filter = parse_search("books author \"herbert\" name \"Dune \"").unwrap();
        assert_eq!(filter.author.as_deref(), Some("herbert"));
        assert_eq!(filter.name.as_deref(), Some("Dune "));
    }

    #[test]
    fn search_skips_unrecognised_text() {
        let filter = parse_search("books by name please").unwrap();
        assert!(filter.is_empty());

        let filter = parse_search("books with name \"abc\" thanks").unwrap();
        assert_eq!(filter.name.as_deref(), Some("abc"));
        assert_eq!(filter.author, None);
    }

    #[test]
    fn search_rejects_repeated_field() {
        assert_eq!(
            parse_search("books name \"a\" name \"b\""),
            Err(SearchError::AssignedTwice(SearchField::Name))
        );
        assert_eq!(
            SearchError::AssignedTwice(SearchField::Author).to_string(),
            "Invalid search entry. Parameter `author` assigned twice"
        );
    }

    #[test]
    fn selection_rules() {
        assert_eq!(parse_selection("2", 3), Selection::Chosen(1));
        assert_eq!(parse_selection(" 3rd ", 3), Selection::Chosen(2));
        assert_eq!(parse_selection("0", 3), Selection::Canceled);
        assert_eq!(parse_selection("02", 3), Selection::Canceled);
        assert_eq!(parse_selection("", 3), Selection::Canceled);
        assert_eq!(parse_selection("no", 3), Selection::Canceled);
        assert_eq!(parse_selection("4", 3), Selection::OutOfRange("4".into()));
        assert_eq!(
            parse_selection("99999999999999999999999", 3),
            Selection::OutOfRange("99999999999999999999999".into())
        );
    }

    #[test]
    fn confirmation_rules() {
        assert!(is_confirmation("y"));
        assert!(is_confirmation(" Yes please"));
        assert!(!is_confirmation("n"));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("okay"));
    }
}
