//! TCP connection to a bulletin board server.
//!
//! The client consumes the four-line handshake on connect, then exchanges
//! one command for one reply. `GET` and `GET PINS` replies announce how many
//! follow-up lines they carry (`OK <n>`), and [`Client::send`] collects them
//! all before returning.

use log::{debug, info, warn};
use shared::{parse_command, Command, Handshake, HandshakeError, Reply, HANDSHAKE_LINES};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid handshake: {0}")]
    Handshake(#[from] HandshakeError),
    #[error("server closed the connection")]
    Closed,
    #[error("malformed reply count in '{0}'")]
    MalformedCount(String),
}

pub struct Client {
    reader: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    handshake: Handshake,
}

impl Client {
    /// Connects and reads the server's handshake.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();
        let mut reader = BufReader::new(read_half).lines();

        let mut lines = Vec::with_capacity(HANDSHAKE_LINES);
        for _ in 0..HANDSHAKE_LINES {
            lines.push(reader.next_line().await?.ok_or(ClientError::Closed)?);
        }
        let handshake = Handshake::parse(lines.iter().map(String::as_str))?;

        info!(
            "Connected to {}: board {}x{}, notes {}x{}, {} colours",
            addr,
            handshake.board_width,
            handshake.board_height,
            handshake.note_width,
            handshake.note_height,
            handshake.colours.len()
        );

        Ok(Client {
            reader,
            writer,
            handshake,
        })
    }

    pub fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    /// Sends one command line and returns every line of the reply.
    ///
    /// Lines that do not parse are answered locally with the same
    /// `ERROR INVALID_FORMAT` reply the server would give.
    pub async fn send(&mut self, line: &str) -> Result<Vec<String>, ClientError> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("Not sending '{}': {}", line.trim(), e);
                return Ok(vec![Reply::from(e).to_string()]);
            }
        };

        debug!("Sending {}", command.name());
        self.writer.write_all(line.trim().as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;

        let first = self.next_line().await?;
        let follow_ups = match command {
            Command::Get(_) | Command::GetPins => announced_count(&first)?,
            _ => 0,
        };

        let mut reply = Vec::with_capacity(follow_ups + 1);
        reply.push(first);
        for _ in 0..follow_ups {
            reply.push(self.next_line().await?);
        }
        Ok(reply)
    }

    /// Says goodbye and waits for the server to acknowledge.
    pub async fn disconnect(mut self) -> Result<(), ClientError> {
        let reply = self.send("DISCONNECT").await?;
        info!("{}", reply.join(" "));
        Ok(())
    }

    async fn next_line(&mut self) -> Result<String, ClientError> {
        self.reader.next_line().await?.ok_or(ClientError::Closed)
    }
}

/// Number of lines following an `OK <n>` header. Error replies carry none.
fn announced_count(header: &str) -> Result<usize, ClientError> {
    match header.strip_prefix("OK ") {
        Some(count) => count
            .trim()
            .parse()
            .map_err(|_| ClientError::MalformedCount(header.to_string())),
        None => Ok(0),
    }
}
