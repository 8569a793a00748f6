//! Per-connection protocol state machine.
//!
//! Each accepted socket gets its own [`Connection`], driven to completion on
//! its own task. The connection walks `Handshake -> CommandLoop -> Closed`:
//! it greets the client with the board description, then answers one command
//! line at a time until the client disconnects or the transport fails.
//!
//! Transport failures never reach the board. They end the connection and are
//! only logged at debug level. Bytes that are not valid UTF-8 are not a
//! transport failure: they are decoded with replacement characters and the
//! line is served like any other.

use crate::board::{Board, SharedBoard};
use log::{debug, info};
use shared::{parse_command, Command, Reply};
use std::io;
use tokio::io::{
    split, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Handshake,
    CommandLoop,
    Closed,
}

pub struct Connection<S> {
    id: u32,
    board: SharedBoard,
    reader: BufReader<ReadHalf<S>>,
    line: Vec<u8>,
    writer: WriteHalf<S>,
    state: ConnectionState,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite,
{
    pub fn new(id: u32, stream: S, board: SharedBoard) -> Self {
        let (read_half, writer) = split(stream);

        Self {
            id,
            board,
            reader: BufReader::new(read_half),
            line: Vec::new(),
            writer,
            state: ConnectionState::Handshake,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Runs the state machine until the connection closes, then releases
    /// the transport.
    pub async fn run(mut self) {
        while self.state != ConnectionState::Closed {
            self.state = self.step().await;
        }

        if let Err(e) = self.writer.shutdown().await {
            debug!("Connection {}: shutdown failed: {}", self.id, e);
        }
        info!("Connection {} closed", self.id);
    }

    async fn step(&mut self) -> ConnectionState {
        match self.state {
            ConnectionState::Handshake => match self.send_handshake().await {
                Ok(()) => ConnectionState::CommandLoop,
                Err(e) => {
                    debug!("Connection {}: handshake failed: {}", self.id, e);
                    ConnectionState::Closed
                }
            },
            ConnectionState::CommandLoop => self.serve_command().await,
            ConnectionState::Closed => ConnectionState::Closed,
        }
    }

    async fn send_handshake(&mut self) -> io::Result<()> {
        let handshake = self.board.lock().await.handshake();

        for line in handshake.lines() {
            self.write_line(&line).await?;
        }
        Ok(())
    }

    /// Next raw line, lossily decoded. `None` at end of stream.
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.line).into_owned()))
    }

    /// Reads and answers a single command line.
    async fn serve_command(&mut self) -> ConnectionState {
        let line = match self.read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Connection {}: end of stream", self.id);
                return ConnectionState::Closed;
            }
            Err(e) => {
                debug!("Connection {}: read failed: {}", self.id, e);
                return ConnectionState::Closed;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            return ConnectionState::CommandLoop;
        }

        let (reply, next) = match parse_command(line) {
            Ok(Command::Disconnect) => {
                debug!("Connection {}: {}", self.id, Command::Disconnect.name());
                (Reply::Disconnected, ConnectionState::Closed)
            }
            Ok(command) => {
                debug!("Connection {}: {}", self.id, command.name());
                // rendered under the lock, written after it is released
                let reply = {
                    let mut board = self.board.lock().await;
                    dispatch(&mut board, command)
                };
                (reply, ConnectionState::CommandLoop)
            }
            Err(e) => {
                debug!("Connection {}: rejected '{}': {}", self.id, line, e);
                (Reply::from(e), ConnectionState::CommandLoop)
            }
        };

        if let Err(e) = self.write_line(&reply.to_string()).await {
            debug!("Connection {}: write failed: {}", self.id, e);
            return ConnectionState::Closed;
        }
        next
    }

    async fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

/// Applies a parsed command to the board.
pub fn dispatch(board: &mut Board, command: Command) -> Reply {
    match command {
        Command::Post {
            origin,
            colour,
            message,
        } => board
            .post(origin, colour, message)
            .map_or_else(Reply::from, |_| Reply::NotePosted),
        Command::Get(filter) => Reply::Notes(board.query_notes(&filter)),
        Command::GetPins => Reply::Pins(board.query_pins()),
        Command::Pin(point) => board
            .add_pin(point)
            .map_or_else(Reply::from, |_| Reply::PinAdded),
        Command::Unpin(point) => board
            .remove_pin(point)
            .map_or_else(Reply::from, |_| Reply::PinRemoved),
        Command::Shake => {
            board.shake();
            Reply::ShakeComplete
        }
        Command::Clear => {
            board.clear();
            Reply::BoardCleared
        }
        Command::Disconnect => Reply::Disconnected,
    }
}
