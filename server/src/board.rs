//! The shared bulletin board: notes, pins and the operations on them.
//!
//! A [`Board`] is a plain owned aggregate. Every method runs to completion
//! without awaiting, so wrapping the whole board in a single mutex
//! ([`SharedBoard`]) makes each operation atomic with respect to every other
//! connection.
//!
//! Pins are kept in two places: the board-wide registry (one entry per
//! coordinate, in insertion order) and the pin set of each note that covered
//! the coordinate when the pin was added. Both are updated inside the same
//! method so they never diverge.

use crate::config::BoardConfig;
use log::{debug, info};
use shared::{ErrorKind, Handshake, NoteFilter, NoteRecord, Point, Reply};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Single lock over the entire board. Readers and writers are not
/// distinguished.
pub type SharedBoard = Arc<Mutex<Board>>;

/// Domain failures. The board is left unchanged whenever one is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("{0} is not a valid color")]
    ColourNotSupported(String),
    #[error("Note exceeds board boundaries")]
    OutOfBounds,
    #[error("Note overlaps an existing note entirely")]
    CompleteOverlap,
    #[error("No note contains the given point")]
    NoNoteAtCoordinate,
    #[error("No pin exists at the given coordinates")]
    PinNotFound,
}

impl BoardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::ColourNotSupported(_) => ErrorKind::ColourNotSupported,
            BoardError::OutOfBounds => ErrorKind::OutOfBounds,
            BoardError::CompleteOverlap => ErrorKind::CompleteOverlap,
            BoardError::NoNoteAtCoordinate => ErrorKind::NoNoteAtCoordinate,
            BoardError::PinNotFound => ErrorKind::PinNotFound,
        }
    }
}

impl From<BoardError> for Reply {
    fn from(err: BoardError) -> Self {
        Reply::error(err.kind(), err.to_string())
    }
}

/// A posted note. Its footprint size is the board's uniform note size.
#[derive(Debug, Clone)]
pub struct Note {
    origin: Point,
    colour: String,
    message: String,
    pins: Vec<Point>,
}

impl Note {
    pub fn is_pinned(&self) -> bool {
        !self.pins.is_empty()
    }

    fn covers(&self, point: Point, width: i32, height: i32) -> bool {
        let (x, y) = (i64::from(self.origin.x), i64::from(self.origin.y));
        let (px, py) = (i64::from(point.x), i64::from(point.y));

        px >= x && px < x + i64::from(width) && py >= y && py < y + i64::from(height)
    }

    fn attach(&mut self, pin: Point) {
        if !self.pins.contains(&pin) {
            self.pins.push(pin);
        }
    }

    fn detach(&mut self, pin: Point) {
        self.pins.retain(|p| *p != pin);
    }

    fn record(&self) -> NoteRecord {
        NoteRecord {
            origin: self.origin,
            colour: self.colour.clone(),
            message: self.message.clone(),
            pinned: self.is_pinned(),
        }
    }
}

#[derive(Debug)]
pub struct Board {
    config: BoardConfig,
    notes: Vec<Note>,
    pins: Vec<Point>,
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            notes: Vec::new(),
            pins: Vec::new(),
        }
    }

    /// Wraps the board in the lock shared by all connections.
    pub fn into_shared(self) -> SharedBoard {
        Arc::new(Mutex::new(self))
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Geometry and colours announced to a new connection.
    pub fn handshake(&self) -> Handshake {
        Handshake {
            board_width: self.config.board_width,
            board_height: self.config.board_height,
            note_width: self.config.note_width,
            note_height: self.config.note_height,
            colours: self.config.colours.clone(),
        }
    }

    fn fits(&self, origin: Point) -> bool {
        let (x, y) = (i64::from(origin.x), i64::from(origin.y));

        x >= 0
            && y >= 0
            && x + i64::from(self.config.note_width) <= i64::from(self.config.board_width)
            && y + i64::from(self.config.note_height) <= i64::from(self.config.board_height)
    }

    fn covering(&self, point: Point) -> impl Iterator<Item = &Note> {
        let (width, height) = (self.config.note_width, self.config.note_height);
        self.notes
            .iter()
            .filter(move |note| note.covers(point, width, height))
    }

    /// Posts a new unpinned note.
    ///
    /// Colour, bounds and overlap are checked in that order. Overlap means an
    /// existing note with the identical origin; partially overlapping notes
    /// are allowed.
    pub fn post(&mut self, origin: Point, colour: String, message: String) -> Result<(), BoardError> {
        if !self.config.colours.contains(&colour) {
            return Err(BoardError::ColourNotSupported(colour));
        }

        if !self.fits(origin) {
            return Err(BoardError::OutOfBounds);
        }

        if self.notes.iter().any(|note| note.origin == origin) {
            return Err(BoardError::CompleteOverlap);
        }

        debug!("Posted {} note at ({})", colour, origin);
        self.notes.push(Note {
            origin,
            colour,
            message,
            pins: Vec::new(),
        });
        Ok(())
    }

    /// Notes matching every supplied filter, in posting order.
    pub fn query_notes(&self, filter: &NoteFilter) -> Vec<NoteRecord> {
        let (width, height) = (self.config.note_width, self.config.note_height);

        self.notes
            .iter()
            .filter(|note| filter.colour.as_ref().map_or(true, |c| note.colour == *c))
            .filter(|note| {
                filter
                    .contains
                    .map_or(true, |point| note.covers(point, width, height))
            })
            .filter(|note| {
                filter
                    .refers_to
                    .as_ref()
                    .map_or(true, |text| note.message.contains(text.as_str()))
            })
            .map(Note::record)
            .collect()
    }

    /// Registered pins in insertion order.
    pub fn query_pins(&self) -> Vec<Point> {
        self.pins.clone()
    }

    /// Pins every note currently covering `point`. A coordinate is
    /// registered at most once, so re-pinning only reaches notes posted
    /// under it since the last time.
    pub fn add_pin(&mut self, point: Point) -> Result<(), BoardError> {
        if self.covering(point).next().is_none() {
            return Err(BoardError::NoNoteAtCoordinate);
        }

        if !self.pins.contains(&point) {
            self.pins.push(point);
        }

        let (width, height) = (self.config.note_width, self.config.note_height);
        for note in self
            .notes
            .iter_mut()
            .filter(|note| note.covers(point, width, height))
        {
            note.attach(point);
        }

        debug!("Pin added at ({})", point);
        Ok(())
    }

    pub fn remove_pin(&mut self, point: Point) -> Result<(), BoardError> {
        let Some(index) = self.pins.iter().position(|p| *p == point) else {
            return Err(BoardError::PinNotFound);
        };

        self.pins.remove(index);
        for note in &mut self.notes {
            note.detach(point);
        }

        debug!("Pin removed at ({})", point);
        Ok(())
    }

    /// Drops every unpinned note and returns how many were removed.
    ///
    /// Pins are left alone, including ones that no longer cover any note.
    pub fn shake(&mut self) -> usize {
        let before = self.notes.len();
        self.notes.retain(Note::is_pinned);
        let removed = before - self.notes.len();

        info!("Shake removed {} notes, {} remain", removed, self.notes.len());
        removed
    }

    pub fn clear(&mut self) {
        info!(
            "Clearing board ({} notes, {} pins)",
            self.notes.len(),
            self.pins.len()
        );
        self.notes.clear();
        self.pins.clear();
    }
}
