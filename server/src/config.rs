//! Startup configuration for the board.
//!
//! Geometry and colours are fixed for the lifetime of the server, so they are
//! validated once here and never re-checked by board operations.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: i32 },
    #[error("a {note_width}x{note_height} note does not fit on a {board_width}x{board_height} board")]
    NoteTooLarge {
        board_width: i32,
        board_height: i32,
        note_width: i32,
        note_height: i32,
    },
    #[error("at least one colour must be specified")]
    NoColours,
    #[error("colour '{0}' must be a single non-empty word")]
    InvalidColour(String),
    #[error("colour '{0}' is listed more than once")]
    DuplicateColour(String),
}

/// Validated board geometry and colour vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub board_width: i32,
    pub board_height: i32,
    pub note_width: i32,
    pub note_height: i32,
    pub colours: Vec<String>,
}

impl BoardConfig {
    pub fn new(
        board_width: i32,
        board_height: i32,
        note_width: i32,
        note_height: i32,
        colours: Vec<String>,
    ) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("board width", board_width),
            ("board height", board_height),
            ("note width", note_width),
            ("note height", note_height),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }

        if note_width > board_width || note_height > board_height {
            return Err(ConfigError::NoteTooLarge {
                board_width,
                board_height,
                note_width,
                note_height,
            });
        }

        if colours.is_empty() {
            return Err(ConfigError::NoColours);
        }

        for (i, colour) in colours.iter().enumerate() {
            // colours travel as single tokens in POST and COLOURS lines
            if colour.is_empty() || colour.contains(char::is_whitespace) {
                return Err(ConfigError::InvalidColour(colour.clone()));
            }
            if colours[..i].contains(colour) {
                return Err(ConfigError::DuplicateColour(colour.clone()));
            }
        }

        Ok(Self {
            board_width,
            board_height,
            note_width,
            note_height,
            colours,
        })
    }
}
