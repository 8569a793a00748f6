//! Protocol vocabulary shared by the bulletin board server and its clients.
//!
//! Everything that crosses the wire lives here: the typed [`Command`] a line
//! parses into, the [`Reply`] the server writes back, and the [`Handshake`]
//! sent once per connection.

use std::fmt;
use thiserror::Error;

pub mod parser;

pub use parser::{parse_command, Command, NoteFilter, ParseError};

pub const DEFAULT_PORT: u16 = 8080;

/// Number of lines the server sends before accepting commands.
pub const HANDSHAKE_LINES: usize = 4;

/// A board coordinate. Pins are identified by their point alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// Error tokens that follow `ERROR` on a reply line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidFormat,
    ColourNotSupported,
    OutOfBounds,
    CompleteOverlap,
    NoNoteAtCoordinate,
    PinNotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "INVALID_FORMAT",
            ErrorKind::ColourNotSupported => "COLOUR_NOT_SUPPORTED",
            ErrorKind::OutOfBounds => "OUT_OF_BOUNDS",
            ErrorKind::CompleteOverlap => "COMPLETE_OVERLAP",
            ErrorKind::NoNoteAtCoordinate => "NO_NOTE_AT_COORDINATE",
            ErrorKind::PinNotFound => "PIN_NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A note as reported by `GET`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub origin: Point,
    pub colour: String,
    pub message: String,
    pub pinned: bool,
}

impl fmt::Display for NoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NOTE {} {} {} PINNED={}",
            self.origin, self.colour, self.message, self.pinned
        )
    }
}

/// Server reply to a single command.
///
/// `Display` renders the exact wire text without the final newline. `Notes`
/// and `Pins` span several lines joined by `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    NotePosted,
    Notes(Vec<NoteRecord>),
    Pins(Vec<Point>),
    PinAdded,
    PinRemoved,
    ShakeComplete,
    BoardCleared,
    Disconnected,
    Error { kind: ErrorKind, reason: String },
}

impl Reply {
    pub fn error(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Reply::Error {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        !matches!(self, Reply::Error { .. })
    }
}

impl From<ParseError> for Reply {
    fn from(err: ParseError) -> Self {
        Reply::error(ErrorKind::InvalidFormat, err.to_string())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::NotePosted => f.write_str("OK NOTE_POSTED"),
            Reply::Notes(notes) => {
                write!(f, "OK {}", notes.len())?;
                for note in notes {
                    write!(f, "\n{}", note)?;
                }
                Ok(())
            }
            Reply::Pins(pins) => {
                write!(f, "OK {}", pins.len())?;
                for pin in pins {
                    write!(f, "\nPIN {}", pin)?;
                }
                Ok(())
            }
            Reply::PinAdded => f.write_str("OK PIN_ADDED"),
            Reply::PinRemoved => f.write_str("OK PIN_REMOVED"),
            Reply::ShakeComplete => f.write_str("OK SHAKE_COMPLETE"),
            Reply::BoardCleared => f.write_str("OK BOARD_CLEARED"),
            Reply::Disconnected => f.write_str("OK DISCONNECTED"),
            Reply::Error { kind, reason } => write!(f, "ERROR {} {}", kind, reason),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("expected {expected} handshake line, got '{line}'")]
    UnexpectedLine { expected: &'static str, line: String },
    #[error("handshake ended after {0} lines")]
    Truncated(usize),
    #[error("invalid number '{0}' in handshake")]
    InvalidNumber(String),
    #[error("COLOURS announced {announced} colours but listed {listed}")]
    ColourCountMismatch { announced: usize, listed: usize },
}

/// Board geometry and colour vocabulary announced to every new connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub board_width: i32,
    pub board_height: i32,
    pub note_width: i32,
    pub note_height: i32,
    pub colours: Vec<String>,
}

impl Handshake {
    /// The four handshake lines in send order.
    pub fn lines(&self) -> [String; HANDSHAKE_LINES] {
        let mut colours = format!("COLOURS {}", self.colours.len());
        for colour in &self.colours {
            colours.push(' ');
            colours.push_str(colour);
        }

        [
            "OK HANDSHAKE".to_string(),
            format!("BOARD {} {}", self.board_width, self.board_height),
            format!("NOTE {} {}", self.note_width, self.note_height),
            colours,
        ]
    }

    /// Rebuilds a handshake from the lines a client received.
    pub fn parse<'a, I>(lines: I) -> Result<Self, HandshakeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut lines = lines.into_iter().map(str::trim);
        let mut seen = 0;
        let mut next = |expected: &'static str| -> Result<Vec<&'a str>, HandshakeError> {
            let line = lines.next().ok_or(HandshakeError::Truncated(seen))?;
            seen += 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.first() != Some(&expected) {
                return Err(HandshakeError::UnexpectedLine {
                    expected,
                    line: line.to_string(),
                });
            }
            Ok(tokens)
        };

        let ack = next("OK")?;
        if ack.get(1) != Some(&"HANDSHAKE") {
            return Err(HandshakeError::UnexpectedLine {
                expected: "OK HANDSHAKE",
                line: ack.join(" "),
            });
        }

        let board = next("BOARD")?;
        let note = next("NOTE")?;
        let colours = next("COLOURS")?;

        let announced = colours
            .get(1)
            .ok_or_else(|| HandshakeError::InvalidNumber(String::new()))
            .and_then(|count| {
                count
                    .parse::<usize>()
                    .map_err(|_| HandshakeError::InvalidNumber(count.to_string()))
            })?;
        let listed: Vec<String> = colours.iter().skip(2).map(|c| c.to_string()).collect();
        if listed.len() != announced {
            return Err(HandshakeError::ColourCountMismatch {
                announced,
                listed: listed.len(),
            });
        }

        Ok(Self {
            board_width: number(&board, 1)?,
            board_height: number(&board, 2)?,
            note_width: number(&note, 1)?,
            note_height: number(&note, 2)?,
            colours: listed,
        })
    }
}

fn number(tokens: &[&str], index: usize) -> Result<i32, HandshakeError> {
    let token = tokens.get(index).copied().unwrap_or_default();
    token
        .parse()
        .map_err(|_| HandshakeError::InvalidNumber(token.to_string()))
}
