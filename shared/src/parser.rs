//! Line parser for client commands.
//!
//! A [`Cursor`] walks the line token by token; each command keyword has its
//! own small production. Parsing never panics: malformed input comes back as
//! a [`ParseError`] whose `Display` text is the reason sent to the client.

use crate::Point;
use thiserror::Error;

/// Filters accepted by `GET`. Absent filters match every note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub colour: Option<String>,
    pub contains: Option<Point>,
    pub refers_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Post {
        origin: Point,
        colour: String,
        message: String,
    },
    Get(NoteFilter),
    GetPins,
    Pin(Point),
    Unpin(Point),
    Shake,
    Clear,
    Disconnect,
}

impl Command {
    /// Protocol keyword, used for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Post { .. } => "POST",
            Command::Get(_) => "GET",
            Command::GetPins => "GET PINS",
            Command::Pin(_) => "PIN",
            Command::Unpin(_) => "UNPIN",
            Command::Shake => "SHAKE",
            Command::Clear => "CLEAR",
            Command::Disconnect => "DISCONNECT",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("POST requires coordinates, color, and message")]
    IncompletePost,
    #[error("{command} requires x and y coordinates")]
    MissingCoordinates { command: &'static str },
    #[error("Coordinates must be integers, got '{0}'")]
    InvalidCoordinate(String),
    #[error("contains requires two coordinates")]
    IncompleteContains,
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
    #[error("{command} got unexpected arguments: {extra}")]
    UnexpectedArguments { command: &'static str, extra: String },
}

#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line.trim() }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            self.rest = trimmed;
            return None;
        }

        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(token)
    }

    /// Everything left on the line, verbatim apart from leading whitespace.
    fn remainder(self) -> &'a str {
        self.rest.trim_start()
    }

    fn expect_end(self, command: &'static str) -> Result<(), ParseError> {
        match self.remainder() {
            "" => Ok(()),
            extra => Err(ParseError::UnexpectedArguments {
                command,
                extra: extra.to_string(),
            }),
        }
    }
}

/// Parses one protocol line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut cursor = Cursor::new(line);
    let keyword = cursor.next_token().ok_or(ParseError::Empty)?;

    match keyword {
        "POST" => parse_post(cursor),
        "GET" => parse_get(cursor),
        "PIN" => {
            let point = parse_point(&mut cursor, "PIN")?;
            cursor.expect_end("PIN")?;
            Ok(Command::Pin(point))
        }
        "UNPIN" => {
            let point = parse_point(&mut cursor, "UNPIN")?;
            cursor.expect_end("UNPIN")?;
            Ok(Command::Unpin(point))
        }
        "SHAKE" => cursor.expect_end("SHAKE").map(|_| Command::Shake),
        "CLEAR" => cursor.expect_end("CLEAR").map(|_| Command::Clear),
        "DISCONNECT" => cursor.expect_end("DISCONNECT").map(|_| Command::Disconnect),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_coordinate(token: &str) -> Result<i32, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::InvalidCoordinate(token.to_string()))
}

fn parse_point(cursor: &mut Cursor<'_>, command: &'static str) -> Result<Point, ParseError> {
    match (cursor.next_token(), cursor.next_token()) {
        (Some(x), Some(y)) => Ok(Point::new(parse_coordinate(x)?, parse_coordinate(y)?)),
        _ => Err(ParseError::MissingCoordinates { command }),
    }
}

fn parse_post(mut cursor: Cursor<'_>) -> Result<Command, ParseError> {
    let (Some(x), Some(y), Some(colour)) =
        (cursor.next_token(), cursor.next_token(), cursor.next_token())
    else {
        return Err(ParseError::IncompletePost);
    };

    let message = cursor.remainder();
    if message.is_empty() {
        return Err(ParseError::IncompletePost);
    }

    Ok(Command::Post {
        origin: Point::new(parse_coordinate(x)?, parse_coordinate(y)?),
        colour: colour.to_string(),
        message: message.to_string(),
    })
}

fn parse_get(mut cursor: Cursor<'_>) -> Result<Command, ParseError> {
    // `GET PINS` is its own two-token form, not a filter
    let mut probe = cursor;
    if probe.next_token() == Some("PINS") && probe.remainder().is_empty() {
        return Ok(Command::GetPins);
    }

    let mut filter = NoteFilter::default();

    loop {
        let before = cursor;
        let Some(token) = cursor.next_token() else {
            break;
        };

        if let Some(colour) = token
            .strip_prefix("color=")
            .or_else(|| token.strip_prefix("colour="))
        {
            filter.colour = Some(colour.to_string());
        } else if token == "contains" {
            filter.contains = Some(parse_contains(None, &mut cursor)?);
        } else if let Some(x) = token.strip_prefix("contains=") {
            filter.contains = Some(parse_contains(Some(x), &mut cursor)?);
        } else if token.starts_with("refersTo=") {
            let text = &before.remainder()["refersTo=".len()..];
            filter.refers_to = Some(text.to_string());
            break;
        } else {
            return Err(ParseError::UnknownFilter(token.to_string()));
        }
    }

    Ok(Command::Get(filter))
}

/// `contains <x> <y>` or `contains=<x> <y>`; `inline_x` is the part after `=`.
fn parse_contains(inline_x: Option<&str>, cursor: &mut Cursor<'_>) -> Result<Point, ParseError> {
    let x = match inline_x {
        Some(x) => Some(x),
        None => cursor.next_token(),
    };

    match (x, cursor.next_token()) {
        (Some(x), Some(y)) => Ok(Point::new(parse_coordinate(x)?, parse_coordinate(y)?)),
        _ => Err(ParseError::IncompleteContains),
    }
}
