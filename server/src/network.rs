//! TCP listener that hands every accepted socket to its own connection task

use crate::board::{Board, SharedBoard};
use crate::connection::Connection;
use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Accept loop sharing one board between all connections.
///
/// There is no connection cap: every accepted socket is spawned onto its own
/// task immediately, and all tasks contend on the single board lock.
pub struct Server {
    listener: TcpListener,
    board: SharedBoard,
}

impl Server {
    pub async fn bind(addr: &str, board: Board) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            board: board.into_shared(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle to the board served by this listener.
    pub fn board(&self) -> SharedBoard {
        SharedBoard::clone(&self.board)
    }

    /// Accepts connections forever. Accept failures are logged and the loop
    /// keeps going.
    pub async fn run(self) {
        let mut next_connection_id: u32 = 1;

        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    let id = next_connection_id;
                    next_connection_id = next_connection_id.wrapping_add(1);
                    info!("Connection {} accepted from {}", id, addr);

                    let connection = Connection::new(id, socket, self.board());
                    tokio::spawn(connection.run());
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}
